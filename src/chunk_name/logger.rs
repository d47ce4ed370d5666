//! Debug-gated logging

use std::fmt::Display;

use super::PLUGIN_NAME;

/// Forwards to `tracing` only when the plugin's `debug` option is on
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    enabled: bool,
}

impl Logger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn info(&self, msg: impl Display) {
        if self.enabled {
            tracing::info!(target: "chunk_name", "[{}] {}", PLUGIN_NAME, msg);
        }
    }

    pub fn warn(&self, msg: impl Display) {
        if self.enabled {
            tracing::warn!(target: "chunk_name", "[{}] {}", PLUGIN_NAME, msg);
        }
    }
}
