//! Block model and request protocol for the stag status aggregator.
//!
//! Producers send one JSON object per connection. [`decode_request`] turns the
//! raw bytes into a payload, [`validate`] normalises it into a
//! [`BlockCommand`], and [`apply_command`] mutates a [`BlockStore`], always
//! answering with a [`Response`]. [`apply_request`] chains the three steps.
//!
//! The store keeps blocks unique by name and ordered by `sort_order`, with
//! ties kept in insertion order. Blocks keep every attribute the producer sent
//! and serialise back to the same object, so display attributes pass through
//! to the bar untouched.

mod apply;
mod block;
mod errors;
mod request;
mod response;
mod store;
mod validator;

pub use apply::{Outcome, apply_command, apply_request};
pub use block::{Block, NAME_KEY, SORT_ORDER_KEY};
pub use errors::RequestError;
pub use request::{Payload, decode_request};
pub use response::{Response, SUCCESS_MESSAGE};
pub use store::BlockStore;
pub use validator::{
    BlockCommand, DEBUG_KEY, JSON_KEY, REMOVE_KEY, ValidationPolicy, default_sort_order, validate,
};

#[cfg(test)]
mod tests;
