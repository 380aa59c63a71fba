//! # Debugging and Logging Utilities
//!
//! Conditional logging and timing helpers for the toolchain pipelines,
//! gated by environment variables, plus the JSON token dump behind the
//! `--dump-tokens` flag.

use crate::jack::tokenizer::Token;
use std::time::Instant;

/// Checks if debug logging is active.
///
/// Enabled when the `HACKC_DEBUG` environment variable is set.
pub fn is_debug_enabled() -> bool {
    std::env::var("HACKC_DEBUG").is_ok()
}

/// Checks if performance tracking is active.
///
/// Enabled when the `HACKC_VERBOSE` environment variable is set.
pub fn is_perf_enabled() -> bool {
    std::env::var("HACKC_VERBOSE").is_ok()
}

/// Logs a driver-phase message, only if debug mode is active.
pub fn log_driver(msg: &str) {
    if is_debug_enabled() {
        println!("DRIVER: {msg}");
    }
}

/// Renders a token stream as pretty-printed JSON.
pub fn tokens_to_json(tokens: &[Token]) -> String {
    serde_json::to_string_pretty(tokens).expect("token stream serializes")
}

/// A simple structure for timing the duration of specific operations.
///
/// Usage: `let timer = PerfTimer::new("Main.jack"); ... timer.finish();`
pub struct PerfTimer {
    start: Instant,
    label: String,
}

impl PerfTimer {
    pub fn new(label: &str) -> Self {
        Self {
            start: Instant::now(),
            label: label.to_string(),
        }
    }

    /// Stops the timer and prints the elapsed duration if performance
    /// tracking is active.
    pub fn finish(self) {
        if is_perf_enabled() {
            let duration = self.start.elapsed();
            println!("{}: {duration:?}", self.label);
        }
    }
}
