use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One part-of-speech block of a dictionary entry, e.g. `n.` with its meanings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartOfSpeech {
    pub part: String,
    pub means: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: i64,
    pub en: String,
    pub cn: String,
    pub from: String,
    #[serde(rename = "ttsUrl")]
    pub tts_url: String,
    #[serde(rename = "ttsSize")]
    pub tts_size: i64,
    #[serde(rename = "likeNum")]
    pub like_num: i64,
}

/// Example sentences grouped under one sense of the word
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceGroup {
    pub tag: String,
    pub word: String,
    pub meaning: String,
    pub sentences: Vec<Sentence>,
}

/// Cached dictionary data for one normalized word.
///
/// Created once on the first successful fetch and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: i64,
    pub word: String,
    pub ph_en: String,
    pub ph_am: String,
    pub mean_tag: String,
    pub parts: Vec<PartOfSpeech>,
    pub sentence_groups: Vec<SentenceGroup>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// What the dictionary source returned for a word, before it is stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDefinition {
    pub word: String,
    pub ph_en: String,
    pub ph_am: String,
    pub ph_en_mp3: String,
    pub ph_am_mp3: String,
    pub mean_tag: String,
    pub parts: Vec<PartOfSpeech>,
    pub sentence_groups: Vec<SentenceGroup>,
}

impl RawDefinition {
    /// Source URL of the pronunciation audio for an accent, empty if unknown
    pub fn audio_source(&self, accent: Accent) -> &str {
        match accent {
            Accent::En => &self.ph_en_mp3,
            Accent::Am => &self.ph_am_mp3,
        }
    }
}

/// Pronunciation variant with its own audio asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    En,
    Am,
}

impl Accent {
    pub const ALL: [Accent; 2] = [Accent::En, Accent::Am];

    pub fn as_str(&self) -> &'static str {
        match self {
            Accent::En => "en",
            Accent::Am => "am",
        }
    }

    /// Lenient parse used for configuration: anything but `am` is `en`
    pub fn from_config(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "am" => Accent::Am,
            _ => Accent::En,
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub recite_date: Option<NaiveDate>,
    /// Higher values sort first
    pub sort_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Membership of a word in a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWord {
    pub id: i64,
    pub unit_id: i64,
    pub word_id: i64,
    pub created_at: NaiveDateTime,
}
