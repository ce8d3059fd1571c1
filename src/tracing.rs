//! Logging setup
//!
//! Console output goes to stderr since stdout carries the highlighted text.
//! `RUST_LOG` takes precedence over `-v`:
//! - `RUST_LOG=hue::syntax::store=debug` - store loads only
//! - `RUST_LOG=hue=trace` - everything from this crate
//!
//! A daily-rotated debug log is kept in `~/.config/hue/logs/hue.log` unless
//! `HUE_NO_LOG_FILE` is set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const NO_LOG_FILE_ENV: &str = "HUE_NO_LOG_FILE";

/// Console level for a `-v` count
pub fn console_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init(verbosity: u8) {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(console_level(verbosity))),
        );

    let file = if std::env::var_os(NO_LOG_FILE_ENV).is_some() {
        None
    } else {
        match crate::config_paths::ensure_logs_dir() {
            Ok(dir) => Some(
                fmt::layer()
                    .with_writer(tracing_appender::rolling::daily(dir, "hue.log"))
                    .with_ansi(false)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("hue=debug")),
            ),
            Err(e) => {
                eprintln!("hue: file logging disabled: {}", e);
                None
            }
        }
    };

    tracing_subscriber::registry().with(console).with(file).init();
}
