//! Writes the block store to the bar as an incremental JSON array.
//!
//! The stream opens with a protocol header and the start of an outer array
//! that is never closed. Each frame is one complete JSON array of blocks
//! followed by a comma, so the bar host can parse frames as they arrive.

use std::io::{self, Write};

use stag_blocks::Block;
use thiserror::Error;
use tracing::warn;

const RENDER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::render");

/// Protocol header written once before any frame.
pub const STREAM_HEADER: &[u8] = b"{\"version\":1}\n";
/// Opens the outer array with an initial empty frame.
pub const STREAM_OPENING: &[u8] = b"[[],\n";
const EMPTY_FRAME: &[u8] = b"[],";

/// Destination of the bar stream.
pub type BarOutput = Box<dyn Write + Send>;

/// Errors raised while writing the bar stream.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The bar stopped reading; later frames are dropped.
    #[error("bar output stream closed: {source}")]
    OutputStreamClosed {
        /// Underlying write failure.
        #[source]
        source: io::Error,
    },
    /// A block could not be serialised.
    #[error("failed to serialise blocks: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// Append-only writer for the bar stream.
///
/// After the first failed write the renderer marks itself closed and
/// silently drops every later frame.
#[derive(Debug)]
pub struct StatusRenderer<W> {
    writer: W,
    closed: bool,
}

impl<W: Write> StatusRenderer<W> {
    /// Wraps the bar's output stream.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            closed: false,
        }
    }

    /// Writes the protocol header and opens the outer array.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OutputStreamClosed`] if the write or flush
    /// fails. Once closed, the renderer writes nothing further and reports
    /// success.
    pub fn write_preamble(&mut self) -> Result<(), RenderError> {
        let mut preamble = Vec::with_capacity(STREAM_HEADER.len() + STREAM_OPENING.len());
        preamble.extend_from_slice(STREAM_HEADER);
        preamble.extend_from_slice(STREAM_OPENING);
        self.emit(&preamble)
    }

    /// Writes one frame holding `blocks` in order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialise`] if a block cannot be encoded, or
    /// [`RenderError::OutputStreamClosed`] if the write or flush fails.
    pub fn render(&mut self, blocks: &[Block]) -> Result<(), RenderError> {
        if self.closed {
            return Ok(());
        }
        if blocks.is_empty() {
            return self.emit(EMPTY_FRAME);
        }
        let mut frame = serde_json::to_vec(blocks)?;
        frame.push(b',');
        self.emit(&frame)
    }

    /// Whether an earlier write failed.
    #[cfg(test)]
    pub(crate) const fn is_closed(&self) -> bool {
        self.closed
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<(), RenderError> {
        if self.closed {
            return Ok(());
        }
        let result = self
            .writer
            .write_all(bytes)
            .and_then(|()| self.writer.flush());
        if let Err(source) = result {
            self.closed = true;
            warn!(
                target: RENDER_TARGET,
                error = %source,
                "bar output closed; suppressing further frames"
            );
            return Err(RenderError::OutputStreamClosed { source });
        }
        Ok(())
    }
}
