use std::sync::atomic::{AtomicUsize, Ordering};

use recite_core::fetcher::{AudioReport, DictionaryFetcher, FetchError};
use recite_types::{PartOfSpeech, RawDefinition};
use tokio::sync::Barrier;

/// In-process dictionary that counts lookups
pub(crate) struct FakeFetcher {
    calls: AtomicUsize,
    audio_calls: AtomicUsize,
    barrier: Option<Barrier>,
    fail: bool,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            audio_calls: AtomicUsize::new(0),
            barrier: None,
            fail: false,
        }
    }

    /// Hold every fetch until `n` of them are in flight
    pub(crate) fn with_barrier(n: usize) -> Self {
        Self {
            barrier: Some(Barrier::new(n)),
            ..Self::new()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn audio_calls(&self) -> usize {
        self.audio_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DictionaryFetcher for FakeFetcher {
    async fn fetch(&self, word: &str) -> Result<RawDefinition, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.fail {
            return Err(FetchError::NotFound(word.to_string()));
        }
        Ok(RawDefinition {
            word: word.to_string(),
            ph_en: format!("{word}-en"),
            ph_am: format!("{word}-am"),
            mean_tag: "noun".into(),
            parts: vec![PartOfSpeech {
                part: "n.".into(),
                means: vec![format!("meaning of {word}")],
            }],
            ..RawDefinition::default()
        })
    }

    async fn ensure_audio_files(&self, word: &str) -> Result<AudioReport, FetchError> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FetchError::NotFound(word.to_string()));
        }
        Ok(AudioReport::skipped())
    }
}
