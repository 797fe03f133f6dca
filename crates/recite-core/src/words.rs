use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use recite_types::Accent;
use regex::Regex;

static VALID_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z'-]*$").expect("word pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("word is empty")]
    Empty,

    #[error("invalid word {0:?}: only letters, apostrophes and hyphens are allowed, starting with a letter")]
    Invalid(String),
}

/// Trim and lowercase user input. Anything outside ASCII is left for validation to reject.
pub fn normalize_word(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn validate_word(word: &str) -> Result<(), WordError> {
    if word.is_empty() {
        return Err(WordError::Empty);
    }
    if !VALID_WORD.is_match(word) {
        return Err(WordError::Invalid(word.to_string()));
    }
    Ok(())
}

/// Normalize and validate in one step
pub fn parse_word(raw: &str) -> Result<String, WordError> {
    let word = normalize_word(raw);
    validate_word(&word)?;
    Ok(word)
}

/// Sharding directory for a word: its first two characters
pub fn word_prefix(word: &str) -> String {
    word.chars().take(2).collect()
}

/// `{root}/{accent}/{prefix}/{word}.mp3`
pub fn audio_path(root: &Path, accent: Accent, word: &str) -> PathBuf {
    root.join(accent.as_str())
        .join(word_prefix(word))
        .join(format!("{word}.mp3"))
}

/// Public URL the static file server exposes for [`audio_path`]
pub fn audio_url(accent: Accent, word: &str) -> String {
    format!("/word_mp3/{}/{}/{}.mp3", accent, word_prefix(word), word)
}
