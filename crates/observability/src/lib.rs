//! Shared observability setup (tracing/logging).

/// Tracing configuration (filter + JSON formatter).
pub mod tracing;

/// Initialize process-wide observability.
///
/// Idempotent: only the first call installs the subscriber.
pub fn init() {
    tracing::init();
}
