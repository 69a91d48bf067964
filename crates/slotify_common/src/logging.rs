//! Tracing bootstrap shared by the binary and the tests.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at the default INFO level.
///
/// Call once at startup. Subsequent calls are no-ops, so tests that share
/// a process can all call it safely.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize logging at an explicit level for the `slotify` crates.
///
/// `RUST_LOG` directives still apply on top, so individual targets can be
/// raised or silenced from the environment.
pub fn init_with_level(level: Level) {
    let filter =
        EnvFilter::from_default_env().add_directive(format!("slotify={}", level).parse().unwrap());

    // try_init: a second initialization (tests, embedded use) is not an error.
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
