//! Diagnostic logging for the `vloc` binary.
//!
//! The engine emits `tracing` events (trie builds, dropped references,
//! merged literals). They are only printed when `VLOC_LOG` (or `RUST_LOG`)
//! is set:
//!
//! ```bash
//! VLOC_LOG=debug vloc references src --resources entries.json
//! VLOC_LOG="vloc::core::merge=trace" vloc literals Form1.vb
//! ```

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "VLOC_LOG";

/// Build an `EnvFilter` from `VLOC_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV_VAR) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber, writing to stderr so reports on stdout
/// stay machine-readable.
///
/// Does nothing when neither variable is set.
pub fn init_tracing() {
    if std::env::var_os(LOG_ENV_VAR).is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
