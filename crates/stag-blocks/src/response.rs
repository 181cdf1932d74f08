//! The reply sent to a producer after each request.

use std::fmt::Display;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Message carried by every successful mutation.
pub const SUCCESS_MESSAGE: &str = "success";

/// Outcome reported to the producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request changed (or would have changed) the store.
    pub success: bool,
    /// Human-readable status, or a store dump for debug requests.
    pub message: String,
}

impl Response {
    /// A successful mutation.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
        }
    }

    /// A rejected request.
    pub fn failure(reason: impl Display) -> Self {
        Self {
            success: false,
            message: reason.to_string(),
        }
    }

    /// A debug dump: the serialised block sequence, reported as unsuccessful
    /// because nothing was mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if a block cannot be serialised.
    pub fn debug(blocks: &[Block]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            success: false,
            message: serde_json::to_string(blocks)?,
        })
    }

    /// Writes the response as one newline-terminated JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_wire_form() {
        let mut buffer = Vec::new();
        Response::success()
            .write_to(&mut buffer)
            .expect("write response");
        assert_eq!(buffer, b"{\"success\":true,\"message\":\"success\"}\n");
    }

    #[test]
    fn failure_uses_display_text() {
        let response = Response::failure(crate::RequestError::MissingName);
        assert!(!response.success);
        assert_eq!(response.message, "Block does not have a name.");
    }

    #[test]
    fn debug_dump_lists_blocks_in_order() {
        let blocks = [
            Block::new("a", 1).with_attribute("full_text", "x"),
            Block::new("b", 2),
        ];
        let response = Response::debug(&blocks).expect("serialise blocks");
        assert!(!response.success);
        assert_eq!(
            response.message,
            r#"[{"name":"a","sort_order":1,"full_text":"x"},{"name":"b","sort_order":2}]"#
        );
    }

    #[test]
    fn debug_dump_of_empty_store() {
        let response = Response::debug(&[]).expect("serialise blocks");
        assert_eq!(response.message, "[]");
    }
}
