//! Waiting for the signal that ends the server.

use std::fmt;
use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Abstraction over shutdown notification mechanisms.
///
/// Implementations must already be listening when constructed so a signal
/// that arrives before [`ShutdownSignal::wait`] is not lost.
pub trait ShutdownSignal: Send {
    /// Blocks until shutdown should proceed.
    fn wait(&mut self) -> Result<(), ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Waits for `SIGTERM`, `SIGINT`, `SIGQUIT` or `SIGHUP`.
pub struct SystemShutdownSignal {
    signals: Signals,
}

impl SystemShutdownSignal {
    /// Registers the signal handlers.
    ///
    /// From this point on the default action no longer runs for these
    /// signals; they are queued until [`ShutdownSignal::wait`] consumes one.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] if the handlers cannot be registered.
    pub fn install() -> Result<Self, ShutdownError> {
        let signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
            .map_err(|source| ShutdownError::Install { source })?;
        Ok(Self { signals })
    }
}

impl fmt::Debug for SystemShutdownSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SystemShutdownSignal")
            .finish_non_exhaustive()
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&mut self) -> Result<(), ShutdownError> {
        if let Some(signal) = self.signals.forever().next() {
            info!(target: PROCESS_TARGET, signal, "shutdown signal received");
        }
        Ok(())
    }
}
