use recite_core::fetcher::AudioReport;
use recite_core::words::audio_url;
use recite_types::{Accent, PartOfSpeech, SentenceGroup, Unit, WordRecord};
use serde::Serialize;

/// A word as shown to callers, with public audio URLs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordInfo {
    pub id: i64,
    pub word: String,
    pub ph_en: String,
    pub ph_am: String,
    pub mean_tag: String,
    pub en_audio_url: String,
    pub am_audio_url: String,
    pub parts: Vec<PartOfSpeech>,
    pub sentence_groups: Vec<SentenceGroup>,
}

impl From<WordRecord> for WordInfo {
    fn from(record: WordRecord) -> Self {
        Self {
            en_audio_url: audio_url(Accent::En, &record.word),
            am_audio_url: audio_url(Accent::Am, &record.word),
            id: record.id,
            word: record.word,
            ph_en: record.ph_en,
            ph_am: record.ph_am,
            mean_tag: record.mean_tag,
            parts: record.parts,
            sentence_groups: record.sentence_groups,
        }
    }
}

/// One numbered row of a word list (unit, review or forgotten words)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitWordItem {
    /// 1-based position in the list
    pub seq: usize,
    pub word: String,
    pub ph_en: String,
    pub ph_am: String,
    pub mean_tag: String,
    pub en_audio: String,
    pub am_audio: String,
    pub parts: Vec<PartOfSpeech>,
    pub sentence_groups: Vec<SentenceGroup>,
}

impl UnitWordItem {
    pub fn new(record: WordRecord, seq: usize) -> Self {
        let info = WordInfo::from(record);
        Self {
            seq,
            word: info.word,
            ph_en: info.ph_en,
            ph_am: info.ph_am,
            mean_tag: info.mean_tag,
            en_audio: info.en_audio_url,
            am_audio: info.am_audio_url,
            parts: info.parts,
            sentence_groups: info.sentence_groups,
        }
    }
}

/// Words due on a date together with the units they came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewWords {
    pub words: Vec<UnitWordItem>,
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientConfig {
    pub default_accent: Accent,
    pub review_intervals_days: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioStatus {
    pub en: String,
    pub am: String,
}

impl From<AudioReport> for AudioStatus {
    fn from(report: AudioReport) -> Self {
        Self {
            en: report.en.to_string(),
            am: report.am.to_string(),
        }
    }
}

/// Renumber `seq` after reordering
pub(crate) fn renumber(items: &mut [UnitWordItem]) {
    for (idx, item) in items.iter_mut().enumerate() {
        item.seq = idx + 1;
    }
}
