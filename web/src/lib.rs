//! # holdem-web: HTTP front end for the tournament engine
//!
//! A thin async JSON API over `holdem-engine`'s command surface (spec.md
//! §6 / SPEC_FULL.md §6a). Every handler opens (or re-derives) a
//! [`holdem_engine::engine::TournamentEngine`] call and serializes its
//! [`holdem_engine::snapshot::Snapshot`] straight back to the client —
//! this crate owns no betting logic of its own.

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod server;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use metrics::{MetricsCollector, MetricsSnapshot, RequestTimer};
pub use middleware::{log_response, with_request_logging, RequestMetrics};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_provides_shared_engine() {
        let ctx = AppContext::new_for_tests();
        assert!(ctx.metrics().snapshot().total_requests == 0);
    }
}
