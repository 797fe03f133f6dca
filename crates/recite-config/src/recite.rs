use std::collections::HashSet;

use recite_types::Accent;
use serde::{Deserialize, Serialize};

fn default_accent() -> String {
    "en".to_string()
}

pub fn default_review_intervals() -> Vec<i64> {
    vec![1, 2, 4, 7, 15, 30]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciteConfig {
    /// Accent played first by clients, `en` or `am`
    #[serde(default = "default_accent")]
    pub default_accent: String,
    /// Days after a unit's recite date on which it comes up for review
    #[serde(default = "default_review_intervals")]
    pub review_intervals_days: Vec<i64>,
}

impl Default for ReciteConfig {
    fn default() -> Self {
        Self {
            default_accent: default_accent(),
            review_intervals_days: default_review_intervals(),
        }
    }
}

impl ReciteConfig {
    pub fn accent(&self) -> Accent {
        Accent::from_config(&self.default_accent)
    }

    pub(crate) fn normalize(&mut self) {
        self.default_accent = self.accent().as_str().to_string();
        self.review_intervals_days = normalize_review_intervals(&self.review_intervals_days);
    }
}

/// Drop non-positive and repeated days, keeping first-seen order.
/// Falls back to the default set when nothing usable remains.
pub fn normalize_review_intervals(raw: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(raw.len());
    let intervals: Vec<i64> = raw
        .iter()
        .copied()
        .filter(|d| *d > 0 && seen.insert(*d))
        .collect();

    if intervals.is_empty() {
        default_review_intervals()
    } else {
        intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_review_intervals() {
        assert_eq!(normalize_review_intervals(&[7, 1, 7, 0, -2, 1]), vec![7, 1]);
        assert_eq!(normalize_review_intervals(&[]), default_review_intervals());
        assert_eq!(normalize_review_intervals(&[0, -1]), default_review_intervals());
    }
}
