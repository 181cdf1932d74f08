//! Structured reporting for server lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use stag_config::{Config, ConfigDiagnostic, SocketEndpoint};

use crate::supervisor::SupervisorError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait ServerReporter: Send + Sync {
    /// Invoked once the configuration is resolved, before binding.
    fn server_starting(&self, config: &Config);

    /// Invoked for each rc file line that was skipped.
    fn config_ignored(&self, diagnostic: &ConfigDiagnostic);

    /// Invoked once the listener accepts connections.
    fn listening(&self, endpoint: &SocketEndpoint, address: Option<SocketAddr>);

    /// Invoked after a producer process launches.
    fn producer_spawned(&self, command: &str, pid: u32);

    /// Invoked when a producer process cannot be launched.
    fn producer_failed(&self, error: &SupervisorError);

    /// Invoked when a shutdown signal has been received.
    fn server_stopping(&self);
}

impl<T> ServerReporter for Arc<T>
where
    T: ServerReporter,
{
    fn server_starting(&self, config: &Config) {
        (**self).server_starting(config);
    }

    fn config_ignored(&self, diagnostic: &ConfigDiagnostic) {
        (**self).config_ignored(diagnostic);
    }

    fn listening(&self, endpoint: &SocketEndpoint, address: Option<SocketAddr>) {
        (**self).listening(endpoint, address);
    }

    fn producer_spawned(&self, command: &str, pid: u32) {
        (**self).producer_spawned(command, pid);
    }

    fn producer_failed(&self, error: &SupervisorError) {
        (**self).producer_failed(error);
    }

    fn server_stopping(&self) {
        (**self).server_stopping();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredServerReporter;

impl StructuredServerReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ServerReporter for StructuredServerReporter {
    fn server_starting(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_starting",
            endpoint = %config.socket_endpoint(),
            producers = config.spawn.len(),
            debug_requests = config.debug_requests,
            log_format = ?config.log_format(),
            "starting status server"
        );
    }

    fn config_ignored(&self, diagnostic: &ConfigDiagnostic) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "config_ignored",
            line = diagnostic.line,
            reason = %diagnostic.reason,
            "ignored configuration line"
        );
    }

    fn listening(&self, endpoint: &SocketEndpoint, address: Option<SocketAddr>) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listening",
            endpoint = %endpoint,
            address = ?address,
            "accepting producer connections"
        );
    }

    fn producer_spawned(&self, command: &str, pid: u32) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "producer_spawned",
            command,
            pid,
            "producer launched"
        );
    }

    fn producer_failed(&self, error: &SupervisorError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "producer_failed",
            error = %error,
            "producer failed to launch"
        );
    }

    fn server_stopping(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_stopping",
            "stopping status server"
        );
    }
}
