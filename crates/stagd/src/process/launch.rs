//! Sequences server start-up and shutdown.

use std::io;
use std::sync::Arc;

use stag_blocks::ValidationPolicy;
use stag_config::{Config, LoadedConfig};
use tracing::info;

use crate::dispatch::{BlockBoard, BlockConnectionHandler};
use crate::health::{ServerReporter, StructuredServerReporter};
use crate::render::BarOutput;
use crate::supervisor::ProducerSupervisor;
use crate::telemetry;
use crate::transport::SocketListener;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to run the server.
pub(crate) struct LaunchPlan<S> {
    pub(crate) loaded: LoadedConfig,
    pub(crate) output: BarOutput,
    pub(crate) shutdown: S,
    pub(crate) reporter: Arc<dyn ServerReporter>,
}

/// Runs the server until a termination signal arrives.
///
/// Installs telemetry from `loaded`, renders to stdout, and launches the
/// configured producers.
///
/// # Errors
///
/// Returns an error if telemetry cannot be installed, the endpoint cannot be
/// bound, or signal handlers cannot be registered.
pub fn run_server(loaded: LoadedConfig) -> Result<(), LaunchError> {
    telemetry::initialise(&loaded.config)?;
    let shutdown = SystemShutdownSignal::install()?;
    let plan = LaunchPlan {
        loaded,
        output: Box::new(io::stdout()),
        shutdown,
        reporter: Arc::new(StructuredServerReporter::new()),
    };
    run_server_with(plan)
}

/// Runs the server with injected collaborators.
pub(crate) fn run_server_with<S>(plan: LaunchPlan<S>) -> Result<(), LaunchError>
where
    S: ShutdownSignal,
{
    let LaunchPlan {
        loaded,
        output,
        mut shutdown,
        reporter,
    } = plan;
    let LoadedConfig {
        config,
        diagnostics,
        ..
    } = loaded;

    reporter.server_starting(&config);
    for diagnostic in &diagnostics {
        reporter.config_ignored(diagnostic);
    }

    let listener = SocketListener::bind(&config.socket_endpoint())?;
    let board = BlockBoard::new(output, validation_policy(&config));
    board.open_stream()?;

    let endpoint = listener.endpoint().clone();
    let address = listener.local_addr();
    let handler = Arc::new(BlockConnectionHandler::new(board, config.read_timeout));
    let listener_handle = listener.start(handler)?;
    reporter.listening(&endpoint, address);

    let mut producers =
        ProducerSupervisor::spawn_all(&config.spawn, config.spawn_delay, reporter.as_ref());

    let waited = shutdown.wait();
    reporter.server_stopping();
    listener_handle.shutdown();
    let joined = listener_handle.join();
    producers.terminate();
    waited?;
    joined?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}

const fn validation_policy(config: &Config) -> ValidationPolicy {
    ValidationPolicy {
        debug_requests: config.debug_requests,
    }
}
