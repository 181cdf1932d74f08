//! Socket transport for sending one request to the server.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::Serialize;
use stag_blocks::Response;
use stag_config::SocketEndpoint;

use crate::errors::AppError;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends `request` as one JSON line and waits for the server's response.
pub(crate) fn exchange<T: Serialize>(
    endpoint: &SocketEndpoint,
    request: &T,
) -> Result<Response, AppError> {
    let mut stream = connect(endpoint)?;
    let mut bytes = serde_json::to_vec(request).map_err(AppError::SerialiseRequest)?;
    bytes.push(b'\n');
    stream.write_all(&bytes).map_err(AppError::SendRequest)?;
    stream.flush().map_err(AppError::SendRequest)?;
    stream
        .shutdown(Shutdown::Write)
        .map_err(AppError::SendRequest)?;

    stream
        .set_read_timeout(Some(RESPONSE_TIMEOUT))
        .map_err(AppError::ReadResponse)?;
    let mut line = String::new();
    BufReader::new(stream)
        .read_line(&mut line)
        .map_err(AppError::ReadResponse)?;
    if line.trim().is_empty() {
        return Err(AppError::MissingResponse);
    }
    serde_json::from_str(&line).map_err(AppError::ParseResponse)
}

fn connect(endpoint: &SocketEndpoint) -> Result<TcpStream, AppError> {
    let address = resolve_tcp_address(&endpoint.host, endpoint.port).map_err(|source| {
        AppError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        }
    })?;
    TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT).map_err(|source| {
        AppError::Connect {
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
