//! Server runtime for the stag status aggregator.
//!
//! Producers connect over TCP and send one JSON block command per
//! connection. Each accepted connection is served on its own thread, but the
//! block store and the bar renderer sit behind a single lock, so a request's
//! validate, mutate and render steps run as one critical section and every
//! frame written to stdout reflects a fully applied mutation.
//!
//! Stdout carries only the bar stream: the `{"version":1}` header, the opening
//! `[[],` of the never-closed outer array, then one frame per accepted
//! mutation. Logs go to stderr.
//!
//! [`run_server`] wires the pieces together: telemetry, the listener, the
//! producer supervisor, and signal-driven shutdown.

mod dispatch;
mod health;
mod process;
mod render;
mod supervisor;
mod telemetry;
mod transport;

pub use dispatch::{BlockBoard, DispatchError};
pub use health::{ServerReporter, StructuredServerReporter};
pub use process::{LaunchError, ShutdownError, run_server};
pub use render::{BarOutput, RenderError, StatusRenderer};
pub use supervisor::{ProducerSupervisor, SupervisorError};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
