//! Logging helpers
//!
//! Subscriber setup plus the banner/summary lines printed by the driver.
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::SkillLevel;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins when set; otherwise `debug` when `verbose` is on and
/// `info` when it is not. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Startup banner
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 LearnIQ started - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("🤖 backend: {} / {}", config.generation_backend, config.llm_model_name);
    info!("📄 chunk size: {} chars", config.chunk_target_size);
    info!("{}", "=".repeat(60));
}

/// Document loaded and chunked
pub fn log_document_loaded(source: &str, chars: usize, chunks: usize) {
    info!("✓ loaded {} ({} chars, {} chunks)", source, chars, chunks);
}

/// Quiz finished
pub fn log_quiz_complete(correct: usize, total: usize, level: SkillLevel) {
    info!("\n{}", "─".repeat(60));
    info!("📊 quiz complete: {}/{} correct", correct, total);
    info!("🎯 level: {}", level.as_str().to_uppercase());
    info!("{}", "─".repeat(60));
}

/// Truncate long text for log previews
///
/// # Arguments
/// - `text`: original text
/// - `max_len`: maximum number of characters kept
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_text("ñññññ", 2), "ññ...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
