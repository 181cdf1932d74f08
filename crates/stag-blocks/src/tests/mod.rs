//! Behavioural tests for the block protocol.
