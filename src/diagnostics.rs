//! Error reporting.
//!
//! Nothing in the engine is fatal. Errors are handed to a [`DiagnosticsSink`]
//! and the screen carries on. The default sink writes them to `tracing`.

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod diagnostics_test;

use tracing::{debug, warn};

use crate::error::{ErrorCode, TripError};

/// Receives every error the screen produces.
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, error: &TripError);
}

/// Logs errors with their code. Stale route discards are routine and go to
/// debug; everything else is a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, error: &TripError) {
        if error.is_user_visible() {
            warn!(code = error.error_code(), retryable = error.retryable(), error = %error, "trip error");
        } else {
            debug!(code = error.error_code(), error = %error, "trip event");
        }
    }
}
