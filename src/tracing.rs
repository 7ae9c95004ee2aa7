//! Log setup for the `livemark` binary
//!
//! # Targets
//!
//! Events are emitted under the module path of the code that logs them:
//! - `livemark::coordinator` - debug per applied edit (range, delta, rescan
//!   region, token count), document resets, full restyles, background scans
//!   applied or discarded as stale; warn on rejected and re-entrant edits
//! - `livemark::syntax` - trace token counts per region scan; debug when the
//!   scan thread coalesces queued snapshots or finishes one; warn if it panicked
//! - `livemark::style` - trace region bounds and attribute write counts
//! - `livemark::text` - trace line index updates (lines removed and added)
//! - `livemark::config`, `livemark::theme` - where settings and themes came from
//!
//! # Usage
//!
//! The console filter comes from RUST_LOG and defaults to `warn`:
//! - `RUST_LOG=livemark::coordinator=debug` - one line per edit
//! - `RUST_LOG=livemark::syntax=trace,livemark::style=trace` - scan and paint volume
//!
//! # Log Files
//!
//! The file at `~/.config/livemark/logs/livemark.log` rotates daily and
//! always records debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Console filter when RUST_LOG is unset or invalid
const DEFAULT_CONSOLE_FILTER: &str = "warn";

/// Filter for the rolling log file
const FILE_FILTER: &str = "debug";

/// Initialize tracing subscriber with console and file logging
///
/// Console output goes to stderr so it never mixes with JSON on stdout.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "livemark.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(FILE_FILTER)),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
