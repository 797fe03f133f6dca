use serde::{Deserialize, Serialize};

fn default_database_url() -> String {
    "sqlite://store/recite.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl StoreConfig {
    pub(crate) fn normalize(&mut self) {
        if self.database_url.trim().is_empty() {
            self.database_url = default_database_url();
        }
        if self.max_connections == 0 {
            self.max_connections = default_max_connections();
        }
    }
}
