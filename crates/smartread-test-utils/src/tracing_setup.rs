//! Tracing initialisation helpers for tests.
//!
//! Call [`init_test_tracing`] at the top of any test that emits tracing events
//! and wants them captured by the test harness. Repeated calls are ignored.

use tracing_subscriber::EnvFilter;

/// Initialise a subscriber that writes to the test-harness writer and
/// respects `RUST_LOG` (default `debug` for the smartread crates).
///
/// # Example
///
/// ```ignore
/// #[test]
/// fn my_test() {
///     smartread_test_utils::tracing_setup::init_test_tracing();
///     tracing::debug!("visible when RUST_LOG allows it");
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("smartread_core=debug,info")),
        )
        .with_test_writer()
        .try_init();
}
