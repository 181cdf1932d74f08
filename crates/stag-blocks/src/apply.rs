//! Applying one request to the block store.

use tracing::debug;

use crate::request::decode_request;
use crate::response::Response;
use crate::store::BlockStore;
use crate::validator::{BlockCommand, ValidationPolicy, validate};

/// What a processed request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Reply for the producer.
    pub response: Response,
    /// Whether the store was mutated and the bar needs re-rendering.
    pub changed: bool,
}

impl Outcome {
    const fn unchanged(response: Response) -> Self {
        Self {
            response,
            changed: false,
        }
    }
}

/// Decodes, validates and applies one raw request.
///
/// Rejected requests leave `store` untouched. A removal of an absent block
/// still succeeds and still counts as a change, so every accepted mutation
/// produces a fresh frame.
pub fn apply_request(store: &mut BlockStore, bytes: &[u8], policy: ValidationPolicy) -> Outcome {
    let command = decode_request(bytes)
        .and_then(|payload| validate(payload, store.lowest_sort_order(), policy));
    match command {
        Ok(command) => apply_command(store, command),
        Err(error) => {
            debug!(target: APPLY_TARGET, %error, "request rejected");
            Outcome::unchanged(Response::failure(error))
        }
    }
}

/// Applies an already validated command.
pub fn apply_command(store: &mut BlockStore, command: BlockCommand) -> Outcome {
    match command {
        BlockCommand::Debug => match Response::debug(store.snapshot()) {
            Ok(response) => Outcome::unchanged(response),
            Err(error) => Outcome::unchanged(Response::failure(error)),
        },
        BlockCommand::Upsert(block) => {
            debug!(
                target: APPLY_TARGET,
                name = block.name(),
                sort_order = block.sort_order(),
                "block upserted"
            );
            store.upsert(block);
            Outcome {
                response: Response::success(),
                changed: true,
            }
        }
        BlockCommand::Remove { name } => {
            let existed = store.remove(&name);
            debug!(target: APPLY_TARGET, %name, existed, "block removed");
            Outcome {
                response: Response::success(),
                changed: true,
            }
        }
    }
}

const APPLY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::apply");
