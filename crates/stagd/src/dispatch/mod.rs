//! Request handling for producer connections.
//!
//! [`BlockConnectionHandler`] reads one request per connection, applies it
//! through the shared [`BlockBoard`], and answers with a single JSON
//! response line.

mod board;
mod errors;
mod handler;

pub use self::board::BlockBoard;
pub use self::errors::DispatchError;
pub(crate) use self::handler::BlockConnectionHandler;

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
