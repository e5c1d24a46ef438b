//! Kiln benchmark driver.
//!
//! Library half of the `kilnc` binary: option parsing, the benchmark
//! workloads and logging setup. The criterion benches reuse the workloads.

pub mod commands;
mod config;

pub use config::{parse_bench_options, BenchConfig};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the `EnvFilter` directive.
pub const LOG_ENV: &str = "KILN_LOG";

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `KILN_LOG=kiln_cache=debug` or `KILN_LOG=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if KILN_LOG is set
        if std::env::var(LOG_ENV).is_ok() {
            let filter = EnvFilter::from_env(LOG_ENV);
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
