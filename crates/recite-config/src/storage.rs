use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_word_mp3_dir() -> String {
    "store/word_mp3".to_string()
}

/// Local file storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the `{accent}/{prefix}/{word}.mp3` tree
    #[serde(default = "default_word_mp3_dir")]
    pub word_mp3_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            word_mp3_dir: default_word_mp3_dir(),
        }
    }
}

impl StorageConfig {
    pub fn word_mp3_root(&self) -> PathBuf {
        PathBuf::from(&self.word_mp3_dir)
    }

    pub(crate) fn normalize(&mut self) {
        if self.word_mp3_dir.trim().is_empty() {
            self.word_mp3_dir = default_word_mp3_dir();
        }
    }
}
