//! Test suites for configuration loading.
