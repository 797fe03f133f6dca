use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rand::seq::SliceRandom;
use recite_config::Config;
use recite_core::fetcher::DictionaryFetcher;
use recite_core::request_log::{RequestContext, RequestLogger};
use recite_core::review::review_date_options;
use recite_core::words::parse_word;
use recite_store::{Database, StoreError};
use recite_types::{Accent, Unit};

use crate::view::{AudioStatus, ClientConfig, ReviewWords, UnitWordItem, WordInfo, renumber};
use crate::{ReciteError, Result, WordResolver};

const DEFAULT_RECENT_DAYS: i64 = 7;
const MAX_RECENT_DAYS: i64 = 60;

/// Units, word lists, review and forgotten words over one database
pub struct ReciteService {
    db: Database,
    resolver: WordResolver,
    fetcher: Arc<dyn DictionaryFetcher>,
    review_intervals: Vec<i64>,
    default_accent: Accent,
    logger: RequestLogger,
}

impl ReciteService {
    pub fn new(db: Database, fetcher: Arc<dyn DictionaryFetcher>, config: &Config) -> Self {
        let logger = RequestLogger::new(config.log.enable_request_log);
        let resolver = WordResolver::new(Arc::new(db.words()), Arc::clone(&fetcher), logger);

        Self {
            db,
            resolver,
            fetcher,
            review_intervals: config.recite.review_intervals_days.clone(),
            default_accent: config.recite.accent(),
            logger,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            default_accent: self.default_accent,
            review_intervals_days: self.review_intervals.clone(),
        }
    }

    pub async fn query_word(&self, ctx: &RequestContext, word: &str) -> Result<WordInfo> {
        let record = self.resolver.resolve(ctx, word).await?;
        Ok(record.into())
    }

    pub async fn ensure_word_audio(&self, ctx: &RequestContext, word: &str) -> Result<AudioStatus> {
        let word = parse_word(word)?;
        let report = self.fetcher.ensure_audio_files(&word).await?;
        self.logger.info(
            ctx,
            "ensure_word_audio",
            format_args!("{word}: en {}, am {}", report.en, report.am),
        );
        Ok(report.into())
    }

    // Units

    pub async fn list_units(&self) -> Result<Vec<Unit>> {
        Ok(self.db.units().list().await?)
    }

    pub async fn create_unit(&self, ctx: &RequestContext, name: &str, recite_date: &str) -> Result<Unit> {
        let name = unit_name(name)?;
        let recite_date = parse_date(recite_date)?;

        let unit = self.db.units().create(name, recite_date).await?;
        self.logger
            .info(ctx, "create_unit", format_args!("unit {} '{}'", unit.id, unit.name));
        Ok(unit)
    }

    pub async fn rename_unit(
        &self,
        ctx: &RequestContext,
        unit_id: i64,
        name: &str,
        recite_date: &str,
    ) -> Result<Unit> {
        check_unit_id(unit_id)?;
        let name = unit_name(name)?;
        let recite_date = parse_date(recite_date)?;

        let units = self.db.units();
        if !units.rename(unit_id, name, recite_date).await? {
            return Err(unit_not_found(unit_id));
        }
        self.logger.info(ctx, "rename_unit", format_args!("unit {unit_id} -> '{name}'"));

        units
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| unit_not_found(unit_id))
    }

    /// First id becomes the frontmost unit
    pub async fn reorder_units(&self, ctx: &RequestContext, unit_ids: &[i64]) -> Result<()> {
        match self.db.units().reorder(unit_ids).await {
            Ok(()) => {
                self.logger
                    .info(ctx, "reorder_units", format_args!("{} units", unit_ids.len()));
                Ok(())
            }
            Err(e @ (StoreError::UnknownUnit(_) | StoreError::DuplicateUnit(_))) => {
                Err(ReciteError::Validation(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_unit(&self, ctx: &RequestContext, unit_id: i64) -> Result<()> {
        check_unit_id(unit_id)?;
        if !self.db.units().delete(unit_id).await? {
            return Err(unit_not_found(unit_id));
        }
        self.logger.info(ctx, "delete_unit", format_args!("unit {unit_id}"));
        Ok(())
    }

    // Unit words

    pub async fn add_word_to_unit(&self, ctx: &RequestContext, unit_id: i64, word: &str) -> Result<WordInfo> {
        self.require_unit(unit_id).await?;

        let record = self.resolver.resolve(ctx, word).await?;
        self.db.unit_words().add(unit_id, record.id).await?;
        self.logger
            .info(ctx, "add_word_to_unit", format_args!("{} -> unit {unit_id}", record.word));
        Ok(record.into())
    }

    /// Words of a unit, most recently added first
    pub async fn list_unit_words(&self, unit_id: i64) -> Result<Vec<UnitWordItem>> {
        self.require_unit(unit_id).await?;

        let memberships = self.db.unit_words().list_by_unit(unit_id).await?;
        let word_ids: Vec<i64> = memberships.iter().map(|m| m.word_id).collect();
        self.word_items(&word_ids).await
    }

    pub async fn unit_dictation(&self, unit_id: i64) -> Result<Vec<UnitWordItem>> {
        let mut items = self.list_unit_words(unit_id).await?;
        shuffle(&mut items);
        Ok(items)
    }

    // Review

    /// Units due on `date` (`YYYY-MM-DD`, empty for today): those whose recite date is
    /// exactly one of the configured intervals before it
    pub async fn due_units(&self, date: &str) -> Result<Vec<Unit>> {
        let date = review_day(date)?;
        let units = self
            .db
            .units()
            .list_review_by_date(date, &self.review_intervals)
            .await?;
        tracing::debug!("{} units due on {}", units.len(), date);
        Ok(units)
    }

    /// Words of every unit due on `date`, each word listed once
    pub async fn review_words(&self, date: &str) -> Result<ReviewWords> {
        let units = self.due_units(date).await?;

        let unit_ids: Vec<i64> = units.iter().map(|u| u.id).collect();
        let mut by_unit: HashMap<i64, Vec<i64>> = HashMap::with_capacity(units.len());
        for membership in self.db.unit_words().list_by_units(&unit_ids).await? {
            by_unit.entry(membership.unit_id).or_default().push(membership.word_id);
        }

        // Unit order first, then each unit's newest-first order
        let mut seen = HashSet::new();
        let mut word_ids = Vec::new();
        for unit in &units {
            for word_id in by_unit.remove(&unit.id).unwrap_or_default() {
                if seen.insert(word_id) {
                    word_ids.push(word_id);
                }
            }
        }

        let words = self.word_items(&word_ids).await?;
        Ok(ReviewWords { words, units })
    }

    pub async fn review_dictation(&self, date: &str) -> Result<Vec<UnitWordItem>> {
        let mut items = self.review_words(date).await?.words;
        shuffle(&mut items);
        Ok(items)
    }

    /// Dates a caller may browse for past reviews, newest first
    pub fn review_date_options(&self, recent_days: Option<i64>) -> Result<Vec<String>> {
        let recent_days = recent_days.unwrap_or(DEFAULT_RECENT_DAYS);
        if recent_days <= 0 {
            return Err(ReciteError::Validation(format!(
                "recent_days must be positive, got {recent_days}"
            )));
        }
        let recent_days = recent_days.min(MAX_RECENT_DAYS) as u32;

        Ok(review_date_options(today(), recent_days)
            .into_iter()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .collect())
    }

    // Forgotten words

    pub async fn add_forgotten_word(&self, ctx: &RequestContext, word: &str) -> Result<WordInfo> {
        let record = self.resolver.resolve(ctx, word).await?;
        self.db.forgotten_words().add(&record.word).await?;
        self.logger
            .info(ctx, "add_forgotten_word", format_args!("{}", record.word));
        Ok(record.into())
    }

    /// Currently unremembered words, most recently marked first
    pub async fn list_forgotten_words(&self) -> Result<Vec<UnitWordItem>> {
        let words = self.db.forgotten_words().list_unremembered().await?;

        let store = self.db.words();
        let mut items = Vec::with_capacity(words.len());
        for word in words {
            match store.get_by_word(&word).await? {
                Some(record) => items.push(UnitWordItem::new(record, items.len() + 1)),
                None => tracing::warn!("Forgotten word '{}' is not in the word cache", word),
            }
        }
        Ok(items)
    }

    /// Returns how many marks were cleared
    pub async fn remember_forgotten_word(&self, ctx: &RequestContext, word: &str) -> Result<u64> {
        let word = parse_word(word)?;
        let cleared = self.db.forgotten_words().mark_remembered(&word).await?;
        self.logger.info(
            ctx,
            "remember_forgotten_word",
            format_args!("{word}: {cleared} marks cleared"),
        );
        Ok(cleared)
    }

    pub async fn forgotten_dictation(&self) -> Result<Vec<UnitWordItem>> {
        let mut items = self.list_forgotten_words().await?;
        shuffle(&mut items);
        Ok(items)
    }

    async fn require_unit(&self, unit_id: i64) -> Result<Unit> {
        check_unit_id(unit_id)?;
        self.db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| unit_not_found(unit_id))
    }

    /// Load words by id, keeping `word_ids` order and numbering from 1
    async fn word_items(&self, word_ids: &[i64]) -> Result<Vec<UnitWordItem>> {
        let mut records = self.db.words().get_by_ids(word_ids).await?;

        let mut items = Vec::with_capacity(word_ids.len());
        for id in word_ids {
            if let Some(record) = records.remove(id) {
                items.push(UnitWordItem::new(record, items.len() + 1));
            }
        }
        Ok(items)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn check_unit_id(unit_id: i64) -> Result<()> {
    if unit_id <= 0 {
        return Err(ReciteError::Validation(format!("invalid unit_id {unit_id}")));
    }
    Ok(())
}

fn unit_not_found(unit_id: i64) -> ReciteError {
    ReciteError::NotFound(format!("unit {unit_id} does not exist"))
}

fn unit_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ReciteError::Validation("unit name is empty".to_string()));
    }
    Ok(name)
}

/// `YYYY-MM-DD`, or empty for no date
fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ReciteError::Validation(format!("invalid date {raw:?}, expected YYYY-MM-DD")))
}

fn review_day(raw: &str) -> Result<NaiveDate> {
    Ok(parse_date(raw)?.unwrap_or_else(today))
}

fn shuffle(items: &mut [UnitWordItem]) {
    items.shuffle(&mut rand::rng());
    renumber(items);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::FakeFetcher;

    async fn service() -> (ReciteService, Arc<FakeFetcher>) {
        let fetcher = Arc::new(FakeFetcher::new());
        let db = Database::in_memory().await.unwrap();

        let mut config = Config::default();
        config.recite.review_intervals_days = vec![1, 7];
        config.log.enable_request_log = true;

        (ReciteService::new(db, fetcher.clone(), &config), fetcher)
    }

    fn ids(units: &[Unit]) -> Vec<i64> {
        units.iter().map(|u| u.id).collect()
    }

    fn words(items: &[UnitWordItem]) -> Vec<&str> {
        items.iter().map(|i| i.word.as_str()).collect()
    }

    fn seqs(items: &[UnitWordItem]) -> Vec<usize> {
        items.iter().map(|i| i.seq).collect()
    }

    #[tokio::test]
    async fn test_reorder_units() {
        let (service, _) = service().await;
        let ctx = RequestContext::new();
        for name in ["one", "two", "three"] {
            service.create_unit(&ctx, name, "").await.unwrap();
        }

        service.reorder_units(&ctx, &[3, 1, 2]).await.unwrap();
        assert_eq!(ids(&service.list_units().await.unwrap()), vec![3, 1, 2]);

        let err = service.reorder_units(&ctx, &[2, 99, 1]).await.unwrap_err();
        assert_eq!(err.code(), 1001);
        let err = service.reorder_units(&ctx, &[2, 2, 1]).await.unwrap_err();
        assert_eq!(err.code(), 1001);
        assert_eq!(ids(&service.list_units().await.unwrap()), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_due_units() {
        let (service, _) = service().await;
        let ctx = RequestContext::new();
        let week_ago = service.create_unit(&ctx, "a", "2024-03-03").await.unwrap();
        let yesterday = service.create_unit(&ctx, "b", "2024-03-09").await.unwrap();
        service.create_unit(&ctx, "c", "2024-03-05").await.unwrap();
        service.create_unit(&ctx, "d", "").await.unwrap();

        let due = service.due_units("2024-03-10").await.unwrap();
        assert_eq!(ids(&due), vec![yesterday.id, week_ago.id]);

        let err = service.due_units("2024/03/10").await.unwrap_err();
        assert!(matches!(err, ReciteError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unit_crud_validation() {
        let (service, _) = service().await;
        let ctx = RequestContext::new();

        let err = service.create_unit(&ctx, "   ", "").await.unwrap_err();
        assert_eq!(err.code(), 1001);
        let err = service.create_unit(&ctx, "unit", "10/03/2024").await.unwrap_err();
        assert_eq!(err.code(), 1001);

        let unit = service.create_unit(&ctx, "  unit one ", "").await.unwrap();
        assert_eq!(unit.name, "unit one");
        assert_eq!(unit.recite_date, None);

        let renamed = service
            .rename_unit(&ctx, unit.id, "unit 1", "2024-03-10")
            .await
            .unwrap();
        assert_eq!(renamed.name, "unit 1");
        assert_eq!(renamed.recite_date, NaiveDate::from_ymd_opt(2024, 3, 10));

        let err = service.rename_unit(&ctx, 42, "x", "").await.unwrap_err();
        assert_eq!(err.code(), 1002);
        let err = service.delete_unit(&ctx, 42).await.unwrap_err();
        assert_eq!(err.code(), 1002);
        let err = service.list_unit_words(0).await.unwrap_err();
        assert_eq!(err.code(), 1001);
    }

    #[tokio::test]
    async fn test_unit_words() {
        let (service, fetcher) = service().await;
        let ctx = RequestContext::new();
        let unit = service.create_unit(&ctx, "fruit", "").await.unwrap();

        let apple = service.add_word_to_unit(&ctx, unit.id, "Apple").await.unwrap();
        assert_eq!(apple.en_audio_url, "/word_mp3/en/ap/apple.mp3");
        assert_eq!(apple.am_audio_url, "/word_mp3/am/ap/apple.mp3");
        service.add_word_to_unit(&ctx, unit.id, "pear").await.unwrap();
        service.add_word_to_unit(&ctx, unit.id, "apple").await.unwrap();
        assert_eq!(fetcher.calls(), 2);

        let items = service.list_unit_words(unit.id).await.unwrap();
        assert_eq!(words(&items), vec!["pear", "apple"]);
        assert_eq!(seqs(&items), vec![1, 2]);

        let dictation = service.unit_dictation(unit.id).await.unwrap();
        assert_eq!(seqs(&dictation), vec![1, 2]);
        let mut shuffled = words(&dictation);
        shuffled.sort();
        assert_eq!(shuffled, vec!["apple", "pear"]);

        let err = service.add_word_to_unit(&ctx, 99, "plum").await.unwrap_err();
        assert_eq!(err.code(), 1002);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_deleted_unit_keeps_words() {
        let (service, fetcher) = service().await;
        let ctx = RequestContext::new();
        let unit = service.create_unit(&ctx, "fruit", "").await.unwrap();
        let apple = service.add_word_to_unit(&ctx, unit.id, "apple").await.unwrap();

        service.delete_unit(&ctx, unit.id).await.unwrap();

        let err = service.list_unit_words(unit.id).await.unwrap_err();
        assert!(matches!(err, ReciteError::NotFound(_)));

        let again = service.query_word(&ctx, "apple").await.unwrap();
        assert_eq!(again.id, apple.id);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_review_words_are_merged() {
        let (service, _) = service().await;
        let ctx = RequestContext::new();
        let first = service.create_unit(&ctx, "first", "2024-03-09").await.unwrap();
        let second = service.create_unit(&ctx, "second", "2024-03-09").await.unwrap();
        let idle = service.create_unit(&ctx, "idle", "2024-03-08").await.unwrap();

        service.add_word_to_unit(&ctx, first.id, "apple").await.unwrap();
        service.add_word_to_unit(&ctx, second.id, "apple").await.unwrap();
        service.add_word_to_unit(&ctx, second.id, "pear").await.unwrap();
        service.add_word_to_unit(&ctx, idle.id, "plum").await.unwrap();

        let review = service.review_words("2024-03-10").await.unwrap();
        assert_eq!(ids(&review.units), vec![second.id, first.id]);
        assert_eq!(words(&review.words), vec!["pear", "apple"]);
        assert_eq!(seqs(&review.words), vec![1, 2]);

        let dictation = service.review_dictation("2024-03-10").await.unwrap();
        assert_eq!(dictation.len(), 2);
        assert_eq!(seqs(&dictation), vec![1, 2]);

        let empty = service.review_words("2024-03-12").await.unwrap();
        assert!(empty.units.is_empty());
        assert!(empty.words.is_empty());
    }

    #[tokio::test]
    async fn test_review_date_options() {
        let (service, _) = service().await;

        let dates = service.review_date_options(None).unwrap();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], today().format("%Y-%m-%d").to_string());

        assert_eq!(service.review_date_options(Some(100)).unwrap().len(), 60);

        let err = service.review_date_options(Some(0)).unwrap_err();
        assert_eq!(err.code(), 1001);
        assert!(service.review_date_options(Some(-3)).is_err());
    }

    #[tokio::test]
    async fn test_forgotten_words() {
        let (service, _) = service().await;
        let ctx = RequestContext::new();

        service.add_forgotten_word(&ctx, "apple").await.unwrap();
        service.add_forgotten_word(&ctx, "pear").await.unwrap();
        let err = service.add_forgotten_word(&ctx, "p3ar").await.unwrap_err();
        assert_eq!(err.code(), 1001);

        let items = service.list_forgotten_words().await.unwrap();
        assert_eq!(words(&items), vec!["pear", "apple"]);
        assert_eq!(seqs(&items), vec![1, 2]);

        assert_eq!(service.remember_forgotten_word(&ctx, " PEAR ").await.unwrap(), 1);
        assert_eq!(words(&service.list_forgotten_words().await.unwrap()), vec!["apple"]);
        assert_eq!(service.forgotten_dictation().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_client_config_and_audio() {
        let (service, fetcher) = service().await;
        let ctx = RequestContext::new();

        let config = service.client_config();
        assert_eq!(config.default_accent, Accent::En);
        assert_eq!(config.review_intervals_days, vec![1, 7]);

        let status = service.ensure_word_audio(&ctx, "apple").await.unwrap();
        assert_eq!(status.en, "skipped");
        assert_eq!(status.am, "skipped");

        let err = service.ensure_word_audio(&ctx, "123").await.unwrap_err();
        assert_eq!(err.code(), 1001);
        assert_eq!(fetcher.audio_calls(), 1);
    }
}
