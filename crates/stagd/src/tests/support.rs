//! Shared doubles for server tests.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Condvar, Mutex};

use stag_config::{Config, ConfigDiagnostic, SocketEndpoint};

use crate::health::ServerReporter;
use crate::process::shutdown::{ShutdownError, ShutdownSignal};
use crate::supervisor::SupervisorError;

/// In-memory bar output that can be inspected while the server writes to it.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        let bytes = self.bytes.lock().expect("output buffer poisoned");
        String::from_utf8(bytes.clone()).expect("bar output should be utf8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .expect("output buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Bar output whose reader has gone away.
pub(crate) struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

/// Lifecycle events captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ServerEvent {
    Starting,
    ConfigIgnored(usize),
    Listening(Option<SocketAddr>),
    ProducerSpawned(String),
    ProducerFailed(String),
    Stopping,
}

/// Records lifecycle events for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<ServerEvent>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<ServerEvent> {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .clone()
    }

    pub(crate) fn listening_address(&self) -> Option<SocketAddr> {
        self.events().into_iter().find_map(|event| match event {
            ServerEvent::Listening(address) => address,
            _ => None,
        })
    }

    pub(crate) fn spawned(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ServerEvent::ProducerSpawned(command) => Some(command),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ServerEvent) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(event);
    }
}

impl ServerReporter for RecordingReporter {
    fn server_starting(&self, _config: &Config) {
        self.record(ServerEvent::Starting);
    }

    fn config_ignored(&self, diagnostic: &ConfigDiagnostic) {
        self.record(ServerEvent::ConfigIgnored(diagnostic.line));
    }

    fn listening(&self, _endpoint: &SocketEndpoint, address: Option<SocketAddr>) {
        self.record(ServerEvent::Listening(address));
    }

    fn producer_spawned(&self, command: &str, _pid: u32) {
        self.record(ServerEvent::ProducerSpawned(command.to_owned()));
    }

    fn producer_failed(&self, error: &SupervisorError) {
        self.record(ServerEvent::ProducerFailed(error.to_string()));
    }

    fn server_stopping(&self) {
        self.record(ServerEvent::Stopping);
    }
}

/// Shutdown signal released explicitly by the test.
#[derive(Clone)]
pub(crate) struct TestShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl TestShutdownSignal {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub(crate) fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().expect("shutdown mutex poisoned");
        *triggered = true;
        cvar.notify_all();
    }
}

impl ShutdownSignal for TestShutdownSignal {
    fn wait(&mut self) -> Result<(), ShutdownError> {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().expect("shutdown mutex poisoned");
        while !*triggered {
            triggered = cvar
                .wait(triggered)
                .expect("shutdown mutex poisoned during wait");
        }
        Ok(())
    }
}
