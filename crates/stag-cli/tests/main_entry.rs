//! Integration tests for the `stag` binary entry point.
//!
//! Covers help output, client-side validation of block options, and the
//! error reported when no server is listening.

use std::net::TcpListener;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn help_lists_subcommands() {
    let mut command = cargo_bin_cmd!("stag");
    command.arg("--help");
    command
        .assert()
        .success()
        .stdout(contains("server"))
        .stdout(contains("block"))
        .stdout(contains("debug"));
}

#[test]
fn invalid_colour_is_rejected() {
    let mut command = cargo_bin_cmd!("stag");
    command.args(["block", "-n", "clock", "-c", "#12"]);
    command
        .assert()
        .failure()
        .stderr(contains("Invalid color: #12"));
}

#[test]
fn block_without_server_fails_to_connect() {
    let port = TcpListener::bind(("127.0.0.1", 0))
        .and_then(|listener| listener.local_addr())
        .expect("reserve port")
        .port();
    let mut command = cargo_bin_cmd!("stag");
    command.args([
        "--config-path",
        "/nonexistent/stagrc",
        "--host",
        "127.0.0.1",
        "--port",
        &port.to_string(),
        "block",
        "-n",
        "clock",
    ]);
    command
        .assert()
        .failure()
        .stderr(contains("Could not connect"));
}
