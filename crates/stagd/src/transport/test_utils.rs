//! Connection handler double for listener tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use super::{ConnectionHandler, ConnectionStream};

/// Records the peer of every accepted connection and closes it unanswered.
#[derive(Default)]
pub(crate) struct RecordingHandler {
    peers: Mutex<Vec<Option<SocketAddr>>>,
}

impl RecordingHandler {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn accepted(&self) -> usize {
        self.peers.lock().expect("peer log poisoned").len()
    }

    pub(crate) fn peers(&self) -> Vec<Option<SocketAddr>> {
        self.peers.lock().expect("peer log poisoned").clone()
    }
}

impl ConnectionHandler for RecordingHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.peers
            .lock()
            .expect("peer log poisoned")
            .push(stream.peer());
    }
}
