use std::fmt;

use recite_types::{Accent, RawDefinition};

/// Source of dictionary definitions and pronunciation audio
#[async_trait::async_trait]
pub trait DictionaryFetcher: Send + Sync {
    /// Fetch and parse the definition of an already normalized word
    async fn fetch(&self, word: &str) -> Result<RawDefinition, FetchError>;

    /// Make sure both accent audio files exist locally, downloading what is missing
    async fn ensure_audio_files(&self, word: &str) -> Result<AudioReport, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream responded with HTTP {0}")]
    Status(u16),

    #[error("cannot find dictionary data in page")]
    MissingData,

    #[error("malformed dictionary data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("word not found upstream: {0}")]
    NotFound(String),

    #[error("word content empty: {0}")]
    EmptyContent(String),

    #[error("audio file still missing for {word}: {accents}")]
    AudioMissing { word: String, accents: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one accent's audio download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    Downloaded,
    /// A non-empty file was already in place
    Skipped,
    Failed(String),
}

impl AudioOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, AudioOutcome::Failed(_))
    }
}

impl fmt::Display for AudioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioOutcome::Downloaded => f.write_str("downloaded"),
            AudioOutcome::Skipped => f.write_str("skipped"),
            AudioOutcome::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReport {
    pub en: AudioOutcome,
    pub am: AudioOutcome,
}

impl AudioReport {
    pub fn skipped() -> Self {
        Self {
            en: AudioOutcome::Skipped,
            am: AudioOutcome::Skipped,
        }
    }

    pub fn get(&self, accent: Accent) -> &AudioOutcome {
        match accent {
            Accent::En => &self.en,
            Accent::Am => &self.am,
        }
    }

    pub fn set(&mut self, accent: Accent, outcome: AudioOutcome) {
        match accent {
            Accent::En => self.en = outcome,
            Accent::Am => self.am = outcome,
        }
    }

    pub fn failed_accents(&self) -> Vec<Accent> {
        Accent::ALL
            .into_iter()
            .filter(|accent| self.get(*accent).is_failed())
            .collect()
    }

    /// Turn the aggregated per-accent outcomes into the call result
    pub fn into_result(self, word: &str) -> Result<AudioReport, FetchError> {
        let failed = self.failed_accents();
        if failed.is_empty() {
            return Ok(self);
        }
        let accents = failed
            .iter()
            .map(|accent| format!("{accent} {}", self.get(*accent)))
            .collect::<Vec<_>>()
            .join(", ");
        Err(FetchError::AudioMissing {
            word: word.to_string(),
            accents,
        })
    }
}
