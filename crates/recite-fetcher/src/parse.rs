//! Extraction of the word data embedded in an iciba word page.
//!
//! The page carries a Next.js `__NEXT_DATA__` JSON block. It is parsed into a loose
//! [`serde_json::Value`] tree and projected into a [`RawDefinition`] by
//! [`project_definition`], which is the only place that knows the upstream layout.

use std::sync::LazyLock;

use recite_core::fetcher::FetchError;
use recite_types::{PartOfSpeech, RawDefinition, Sentence, SentenceGroup};
use regex::Regex;
use serde_json::Value;

static NEXT_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?si)<script\b[^>]*?\bid\s*=\s*["']__NEXT_DATA__["'][^>]*?>(.*?)</script>"#)
        .expect("next data pattern compiles")
});

static MEAN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<p class="Mean_tag[^"]*">(.*?)</p>"#).expect("mean tag pattern compiles")
});

const WORD_INFO_POINTER: &str = "/props/pageProps/initialReduxState/word/wordInfo";

/// Parse a full word page into a definition
pub fn parse_page(word: &str, html: &str) -> Result<RawDefinition, FetchError> {
    let mean_tag = extract_mean_tag(html);
    let block = extract_next_data(html).ok_or(FetchError::MissingData)?;
    let tree: Value = serde_json::from_str(block)?;
    project_definition(word, &tree, mean_tag)
}

pub fn extract_next_data(html: &str) -> Option<&str> {
    NEXT_DATA
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Short summary line shown above the meanings, empty if the page has none
pub fn extract_mean_tag(html: &str) -> String {
    MEAN_TAG
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).trim().to_string())
        .unwrap_or_default()
}

/// Map the upstream data tree onto a [`RawDefinition`].
///
/// Missing or mistyped fields become empty values; only the absence of any phonetic
/// symbol (unknown word) or of all content is an error.
pub fn project_definition(
    word: &str,
    tree: &Value,
    mean_tag: String,
) -> Result<RawDefinition, FetchError> {
    let info = tree.pointer(WORD_INFO_POINTER).unwrap_or(&Value::Null);

    let symbol = info
        .pointer("/baesInfo/symbols/0")
        .ok_or_else(|| FetchError::NotFound(word.to_string()))?;

    let tts = str_field(symbol, "ph_tts_mp3");
    let with_fallback = |key: &str| {
        let url = str_field(symbol, key);
        if url.is_empty() { tts.clone() } else { url }
    };

    let parts = array_field(symbol, "parts")
        .iter()
        .map(|part| PartOfSpeech {
            part: str_field(part, "part"),
            means: array_field(part, "means")
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect(),
        })
        .collect::<Vec<_>>();

    let sentence_groups = array_field(info, "new_sentence")
        .iter()
        .map(|group| SentenceGroup {
            tag: str_field(group, "tag"),
            word: str_field(group, "word"),
            meaning: str_field(group, "meaning"),
            sentences: array_field(group, "sentences")
                .iter()
                .map(project_sentence)
                .collect(),
        })
        .collect();

    let definition = RawDefinition {
        word: word.to_string(),
        ph_en: str_field(symbol, "ph_en"),
        ph_am: str_field(symbol, "ph_am"),
        ph_en_mp3: with_fallback("ph_en_mp3"),
        ph_am_mp3: with_fallback("ph_am_mp3"),
        mean_tag,
        parts,
        sentence_groups,
    };

    if definition.ph_en.is_empty() && definition.ph_am.is_empty() && definition.parts.is_empty() {
        return Err(FetchError::EmptyContent(word.to_string()));
    }
    Ok(definition)
}

fn project_sentence(sentence: &Value) -> Sentence {
    Sentence {
        id: int_field(sentence, "id"),
        kind: int_field(sentence, "type"),
        en: str_field(sentence, "en"),
        cn: str_field(sentence, "cn"),
        from: str_field(sentence, "from"),
        tts_url: str_field(sentence, "ttsUrl"),
        tts_size: int_field(sentence, "ttsSize"),
        like_num: int_field(sentence, "likeNum"),
    }
}

fn str_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

// Upstream sometimes sends numbers as strings
fn int_field(value: &Value, key: &str) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
