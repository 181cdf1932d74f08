//! Listener implementation for the producer socket.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use stag_config::SocketEndpoint;

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Listener bound to the configured TCP endpoint.
#[derive(Debug)]
pub(crate) struct SocketListener {
    endpoint: SocketEndpoint,
    listener: TcpListener,
}

impl SocketListener {
    pub(crate) fn bind(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        let listener = bind_tcp(&endpoint.host, endpoint.port)?;
        Ok(Self {
            endpoint: endpoint.clone(),
            listener,
        })
    }

    pub(crate) const fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    /// Actual bound address; differs from the endpoint when port 0 was asked for.
    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || run_accept_loop(&self, &shutdown_flag, &handler));
        Ok(ListenerHandle {
            shutdown,
            handle: Some(handle),
        })
    }
}

/// Handle to the background listener thread.
pub(crate) struct ListenerHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ListenerError::ThreadPanic),
            None => Ok(()),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &SocketListener,
    shutdown: &AtomicBool,
    handler: &Arc<dyn ConnectionHandler>,
) {
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.endpoint,
        "socket listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match accept_connection(&listener.listener) {
            Ok(Some(stream)) => {
                last_error = None;
                debug!(
                    target: LISTENER_TARGET,
                    peer = ?stream.peer(),
                    "producer connected"
                );
                let handler = Arc::clone(handler);
                thread::spawn(move || handler.handle(stream));
            }
            Ok(None) => thread::sleep(ACCEPT_BACKOFF),
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.endpoint,
        "socket listener stopped"
    );
}

fn accept_connection(listener: &TcpListener) -> io::Result<Option<ConnectionStream>> {
    match listener.accept() {
        Ok((stream, _)) => {
            stream.set_nonblocking(false)?;
            Ok(Some(ConnectionStream::new(stream)))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}

#[cfg(test)]
mod tests {
    use std::net::TcpStream;
    use std::time::Instant;

    use super::*;
    use crate::transport::RecordingHandler;

    fn wait_for(handler: &RecordingHandler, expected: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if handler.accepted() >= expected {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn accepts_connections_on_background_thread() {
        let listener =
            SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0)).expect("bind listener");
        let addr = listener.local_addr().expect("local address");
        let handler = RecordingHandler::shared();
        let handle = listener
            .start(Arc::clone(&handler) as Arc<dyn ConnectionHandler>)
            .expect("start listener");

        let first = TcpStream::connect(addr).expect("connect first producer");
        let second = TcpStream::connect(addr).expect("connect second producer");

        assert!(wait_for(&handler, 2), "expected two connections");
        let local = [first.local_addr().ok(), second.local_addr().ok()];
        for peer in handler.peers() {
            assert!(local.contains(&peer), "unexpected peer {peer:?}");
        }
        handle.shutdown();
        handle.join().expect("join listener");
    }

    #[test]
    fn bind_fails_when_port_is_taken() {
        let occupied = TcpListener::bind(("127.0.0.1", 0)).expect("reserve port");
        let port = occupied.local_addr().expect("reserved address").port();
        let error = SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", port))
            .expect_err("second bind should fail");
        assert!(matches!(error, ListenerError::BindTcp { .. }));
    }
}
