//! Logging utilities for relalg
//!
//! Operators echo themselves as `tracing` events (`DDL>`, `DML>`, `RA>`);
//! these helpers install a subscriber so the echoes become visible.
//!
//! # Targets
//!
//! | target          | events                                  |
//! |-----------------|-----------------------------------------|
//! | `relalg::ddl`   | table creation                          |
//! | `relalg::dml`   | inserts                                 |
//! | `relalg::ra`    | operator echoes and join strategy notes |
//! | `relalg::index` | repeated keys in derived tables         |
//!
//! Warnings about unknown attributes and save/load reports use the
//! default module targets, such as `relalg_core::schema` and `relalg_core::persist`.
//! Filter with `RUST_LOG` directives, e.g.
//!
//! ```text
//! RUST_LOG=info,relalg::ra=debug cargo run --example movie_db --features logging
//! ```

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with default settings
///
/// # Environment Variables
/// - `RUST_LOG` - Log level filter (default: "info")
///
/// # Example
/// ```rust
/// relalg_core::logging::init();
/// ```
#[cfg(feature = "logging")]
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific level
///
/// Use `"debug"` to see every operator echo.
///
/// # Example
/// ```rust
/// relalg_core::logging::init_with_level("debug");
/// ```
#[cfg(feature = "logging")]
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Initialize logging for tests
#[cfg(feature = "logging")]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

// Stub implementations when logging feature is disabled
#[cfg(not(feature = "logging"))]
pub fn init() {}

#[cfg(not(feature = "logging"))]
pub fn init_with_level(_level: &str) {}

#[cfg(not(feature = "logging"))]
pub fn init_test() {}
