use serde::{Deserialize, Serialize};

fn default_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Emit per-request trace lines (log id, location, elapsed ms)
    #[serde(default)]
    pub enable_request_log: bool,
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Structured JSON output instead of plain text
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enable_request_log: false,
            filter: default_filter(),
            json: false,
        }
    }
}

impl LogConfig {
    pub(crate) fn normalize(&mut self) {
        if self.filter.trim().is_empty() {
            self.filter = default_filter();
        }
    }
}
