use std::sync::Arc;

use recite_core::fetcher::DictionaryFetcher;
use recite_core::request_log::{RequestContext, RequestLogger};
use recite_core::words::parse_word;
use recite_store::{StoreError, WordStore};
use recite_types::{RawDefinition, WordRecord};

use crate::Result;

/// Durable word cache the resolver reads from and populates
#[async_trait::async_trait]
pub trait WordCache: Send + Sync {
    async fn get_by_word(&self, word: &str) -> std::result::Result<Option<WordRecord>, StoreError>;

    /// Must fail with a unique violation when `definition.word` is already stored
    async fn create(&self, definition: &RawDefinition) -> std::result::Result<WordRecord, StoreError>;
}

#[async_trait::async_trait]
impl WordCache for WordStore {
    async fn get_by_word(&self, word: &str) -> std::result::Result<Option<WordRecord>, StoreError> {
        WordStore::get_by_word(self, word).await
    }

    async fn create(&self, definition: &RawDefinition) -> std::result::Result<WordRecord, StoreError> {
        WordStore::create(self, definition).await
    }
}

/// Cache-or-populate lookup of a single word.
///
/// Concurrent first lookups of the same word may all fetch, but only one insert
/// survives the `UNIQUE(word)` constraint and every caller gets that row back.
#[derive(Clone)]
pub struct WordResolver {
    words: Arc<dyn WordCache>,
    fetcher: Arc<dyn DictionaryFetcher>,
    logger: RequestLogger,
}

impl WordResolver {
    pub fn new(words: Arc<dyn WordCache>, fetcher: Arc<dyn DictionaryFetcher>, logger: RequestLogger) -> Self {
        Self {
            words,
            fetcher,
            logger,
        }
    }

    pub async fn resolve(&self, ctx: &RequestContext, raw: &str) -> Result<WordRecord> {
        let word = parse_word(raw)?;

        if let Some(record) = self.words.get_by_word(&word).await? {
            self.logger.info(ctx, "resolve", format_args!("cache hit for {word}"));
            return Ok(record);
        }

        let mut definition = match self.fetcher.fetch(&word).await {
            Ok(definition) => definition,
            Err(e) => {
                self.logger.error(ctx, "resolve", format_args!("fetch {word} failed: {e}"));
                return Err(e.into());
            }
        };
        definition.word = word.clone();

        match self.words.create(&definition).await {
            Ok(record) => {
                self.logger.info(ctx, "resolve", format_args!("stored {word} as {}", record.id));
                Ok(record)
            }
            Err(err) if err.is_unique_violation() => match self.words.get_by_word(&word).await {
                Ok(Some(record)) => {
                    self.logger
                        .info(ctx, "resolve", format_args!("{word} was stored concurrently"));
                    Ok(record)
                }
                _ => Err(err.into()),
            },
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use recite_core::request_log::{RequestContext, RequestLogger};
    use recite_store::Database;

    use super::*;
    use crate::ReciteError;
    use crate::testing::FakeFetcher;

    async fn resolver(fetcher: Arc<FakeFetcher>) -> (Database, WordResolver) {
        let db = Database::in_memory().await.unwrap();
        let resolver = WordResolver::new(Arc::new(db.words()), fetcher, RequestLogger::new(true));
        (db, resolver)
    }

    /// Cache whose lookups always miss while inserts hit the real table
    struct MissingReads {
        words: WordStore,
    }

    #[async_trait::async_trait]
    impl WordCache for MissingReads {
        async fn get_by_word(&self, _word: &str) -> std::result::Result<Option<WordRecord>, StoreError> {
            Ok(None)
        }

        async fn create(&self, definition: &RawDefinition) -> std::result::Result<WordRecord, StoreError> {
            self.words.create(definition).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_lookups_converge() {
        let fetcher = Arc::new(FakeFetcher::with_barrier(2));
        let (db, resolver) = resolver(fetcher.clone()).await;
        let ctx = RequestContext::new();

        let (first, second) = tokio::join!(
            resolver.resolve(&ctx, "apple"),
            resolver.resolve(&ctx, " Apple ")
        );
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(db.words().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let fetcher = Arc::new(FakeFetcher::new());
        let (_db, resolver) = resolver(fetcher.clone()).await;
        let ctx = RequestContext::new();

        let first = resolver.resolve(&ctx, "apple").await.unwrap();
        let second = resolver.resolve(&ctx, "APPLE").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_word_never_reaches_fetcher() {
        let fetcher = Arc::new(FakeFetcher::new());
        let (_db, resolver) = resolver(fetcher.clone()).await;

        let err = resolver.resolve(&RequestContext::new(), "123abc").await.unwrap_err();
        assert!(matches!(err, ReciteError::Validation(_)));
        assert_eq!(err.code(), 1001);

        let err = resolver.resolve(&RequestContext::new(), "   ").await.unwrap_err();
        assert_eq!(err.to_string(), "word is empty");

        // compatibility forms are not folded into ASCII
        for raw in ["ＡＰＰＬＥ", "\u{FB01}sh"] {
            let err = resolver.resolve(&RequestContext::new(), raw).await.unwrap_err();
            assert!(matches!(err, ReciteError::Validation(_)), "{raw} -> {err}");
        }

        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_stores_nothing() {
        let fetcher = Arc::new(FakeFetcher::failing());
        let (db, resolver) = resolver(fetcher.clone()).await;

        let err = resolver.resolve(&RequestContext::new(), "apple").await.unwrap_err();
        assert!(matches!(err, ReciteError::Fetch(_)));
        assert_eq!(err.code(), 1003);
        assert_eq!(db.words().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_conflict_without_winner_returns_insert_error() {
        let db = Database::in_memory().await.unwrap();
        let fetcher = Arc::new(FakeFetcher::new());
        let ctx = RequestContext::new();

        // a plain resolver stores the word, the second one then collides with that row
        let seeded = WordResolver::new(Arc::new(db.words()), fetcher.clone(), RequestLogger::default());
        seeded.resolve(&ctx, "apple").await.unwrap();

        let cache = MissingReads { words: db.words() };
        let resolver = WordResolver::new(Arc::new(cache), fetcher.clone(), RequestLogger::default());

        let err = resolver.resolve(&ctx, "apple").await.unwrap_err();
        match &err {
            ReciteError::Store(store) => assert!(store.is_unique_violation()),
            other => panic!("expected a store error, got {other:?}"),
        }
        assert_eq!(err.code(), 1);
        assert_eq!(err.public_message(), "internal error");
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(db.words().count().await.unwrap(), 1);
    }
}
