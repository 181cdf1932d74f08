//! Test suites for the status server.

pub(crate) mod support;
