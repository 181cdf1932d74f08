//! Connection handler that applies one block command per connection.

use std::io::{self, Read};
use std::time::Duration;

use serde::de::IgnoredAny;
use stag_blocks::Response;
use tracing::{debug, warn};

use crate::transport::{ConnectionHandler, ConnectionStream};

use super::DISPATCH_TARGET;
use super::board::BlockBoard;
use super::errors::DispatchError;

/// Maximum size of a single request in bytes.
pub(crate) const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Reads a request, applies it to the board, and writes one response line.
///
/// A request ends at end of stream, as soon as the bytes received so far form
/// a complete JSON value, or at a newline that follows a complete or
/// unrecoverable value. Producers may either close their write side or leave
/// it open.
#[derive(Debug)]
pub(crate) struct BlockConnectionHandler {
    board: BlockBoard,
    read_timeout: Duration,
}

impl BlockConnectionHandler {
    pub(crate) const fn new(board: BlockBoard, read_timeout: Duration) -> Self {
        Self {
            board,
            read_timeout,
        }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        let response = match self.read_and_apply(&mut stream) {
            Ok(Some(response)) => response,
            Ok(None) => {
                debug!(
                    target: DISPATCH_TARGET,
                    peer = ?stream.peer(),
                    "producer disconnected without request"
                );
                return;
            }
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    peer = ?stream.peer(),
                    %error,
                    "request failed"
                );
                Response::failure(error)
            }
        };

        debug!(
            target: DISPATCH_TARGET,
            success = response.success,
            message = %response.message,
            "responding to producer"
        );
        if let Err(error) = response.write_to(&mut stream) {
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
        }
        if let Err(error) = stream.close()
            && error.kind() != io::ErrorKind::NotConnected
        {
            debug!(target: DISPATCH_TARGET, %error, "failed to close connection");
        }
    }

    fn read_and_apply(
        &self,
        stream: &mut ConnectionStream,
    ) -> Result<Option<Response>, DispatchError> {
        stream.set_read_timeout(self.read_timeout)?;
        let Some(request) = read_request(stream)? else {
            return Ok(None);
        };
        self.board.submit(&request).map(Some)
    }
}

impl ConnectionHandler for BlockConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

/// Reads one bounded request from the stream.
///
/// A newline only ends the request once the bytes before it can no longer
/// grow into a valid JSON value, so pretty-printed requests arrive whole.
/// Returns `Ok(None)` if the producer disconnects without sending data.
fn read_request<R: Read>(stream: &mut R) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        let bytes_read = read_with_retry(stream, &mut chunk)?;
        let Some(received) = chunk.get(..bytes_read).filter(|bytes| !bytes.is_empty()) else {
            return Ok(if buffer.iter().all(u8::is_ascii_whitespace) {
                None
            } else {
                Some(buffer)
            });
        };

        let scanned = buffer.len();
        buffer.extend_from_slice(received);
        enforce_limit(buffer.len())?;

        if let Some(end) = request_end(&buffer, scanned) {
            buffer.truncate(end);
            return Ok(Some(buffer));
        }
        if probe_json(&buffer) == JsonProbe::Complete {
            return Ok(Some(buffer));
        }
    }
}

/// Finds the first newline at or after `from` that closes a request.
fn request_end(buffer: &[u8], from: usize) -> Option<usize> {
    buffer
        .iter()
        .enumerate()
        .skip(from)
        .filter(|(_, byte)| **byte == b'\n')
        .map(|(position, _)| position + 1)
        .find(|end| {
            buffer
                .get(..*end)
                .is_some_and(|line| probe_json(line) != JsonProbe::Incomplete)
        })
}

/// Reads from the stream, retrying on interrupts.
fn read_with_retry<R: Read>(stream: &mut R, buf: &mut [u8]) -> Result<usize, DispatchError> {
    loop {
        match stream.read(buf) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(DispatchError::from_read(error)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonProbe {
    Complete,
    Incomplete,
    Invalid,
}

fn probe_json(buffer: &[u8]) -> JsonProbe {
    match serde_json::from_slice::<IgnoredAny>(buffer) {
        Ok(_) => JsonProbe::Complete,
        Err(error) if error.is_eof() => JsonProbe::Incomplete,
        Err(_) => JsonProbe::Invalid,
    }
}

/// Enforces the maximum request size limit.
fn enforce_limit(size: usize) -> Result<(), DispatchError> {
    if size > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(size, MAX_REQUEST_BYTES));
    }
    Ok(())
}
