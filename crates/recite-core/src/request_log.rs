use std::fmt::Display;
use std::time::Instant;

use chrono::Local;
use rand::Rng;

/// Per-request metadata threaded through service calls
#[derive(Debug, Clone)]
pub struct RequestContext {
    log_id: String,
    started_at: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            log_id: build_log_id(),
            started_at: Instant::now(),
        }
    }

    pub fn log_id(&self) -> &str {
        &self.log_id
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// `yyyymmddHHMMSS` followed by six random digits
fn build_log_id() -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    format!("{}{:06}", Local::now().format("%Y%m%d%H%M%S"), suffix)
}

/// Request-scoped trace lines, switched on or off when the service is built
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger {
    enabled: bool,
}

impl RequestLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn info(&self, ctx: &RequestContext, location: &str, message: impl Display) {
        if !self.enabled {
            return;
        }
        tracing::info!(
            log_id = ctx.log_id(),
            loc = location,
            cost_ms = ctx.elapsed_ms() as u64,
            "{message}"
        );
    }

    pub fn error(&self, ctx: &RequestContext, location: &str, message: impl Display) {
        if !self.enabled {
            return;
        }
        tracing::error!(
            log_id = ctx.log_id(),
            loc = location,
            cost_ms = ctx.elapsed_ms() as u64,
            "{message}"
        );
    }
}
