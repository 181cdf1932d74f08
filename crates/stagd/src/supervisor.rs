//! Launches and reaps the producer commands listed in the configuration.
//!
//! Each producer runs under `sh -c` in its own process group so shutdown can
//! signal the shell and everything it started in one call. Producer stdout is
//! discarded; only the server writes to the bar stream.

use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use thiserror::Error;
use tracing::{debug, warn};

use crate::health::ServerReporter;

const SUPERVISOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::supervisor");
const SHELL: &str = "sh";
/// How long producers get to exit after `SIGTERM` before being killed.
pub const TERMINATION_GRACE: Duration = Duration::from_millis(500);
const REAP_POLL: Duration = Duration::from_millis(20);

/// Errors raised while launching producers.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The shell could not be started.
    #[error("failed to launch producer '{command}': {source}")]
    Spawn {
        /// Configured producer command.
        command: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

struct Producer {
    command: String,
    child: Child,
}

/// Owns the running producer processes and terminates them on shutdown.
pub struct ProducerSupervisor {
    producers: Vec<Producer>,
    grace: Duration,
}

impl ProducerSupervisor {
    /// A supervisor with nothing to supervise.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            producers: Vec::new(),
            grace: TERMINATION_GRACE,
        }
    }

    /// Launches every command, staggering launch `i` (one-based) by
    /// `i * delay`. Commands that fail to launch are reported and skipped.
    pub fn spawn_all(commands: &[String], delay: Duration, reporter: &dyn ServerReporter) -> Self {
        let mut supervisor = Self::empty();
        for (index, command) in (1_u32..).zip(commands) {
            let script = launch_script(command, delay.saturating_mul(index));
            match spawn_producer(command, &script) {
                Ok(child) => {
                    reporter.producer_spawned(command, child.id());
                    supervisor.producers.push(Producer {
                        command: command.clone(),
                        child,
                    });
                }
                Err(error) => reporter.producer_failed(&error),
            }
        }
        supervisor
    }

    /// Number of producers still owned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Whether no producers are owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Process IDs of the owned producers, in launch order.
    #[must_use]
    pub fn pids(&self) -> Vec<u32> {
        self.producers.iter().map(|producer| producer.child.id()).collect()
    }

    /// Sends `SIGTERM` to every producer group, waits up to the grace period,
    /// then kills whatever is left.
    pub fn terminate(&mut self) {
        if self.producers.is_empty() {
            return;
        }
        for producer in &self.producers {
            signal_group(producer, Signal::SIGTERM);
        }

        let deadline = Instant::now() + self.grace;
        let mut survivors = std::mem::take(&mut self.producers);
        while !survivors.is_empty() && Instant::now() < deadline {
            survivors.retain_mut(|producer| !has_exited(producer));
            if !survivors.is_empty() {
                thread::sleep(REAP_POLL);
            }
        }

        for mut producer in survivors {
            signal_group(&producer, Signal::SIGKILL);
            if let Err(error) = producer.child.wait() {
                warn!(
                    target: SUPERVISOR_TARGET,
                    command = %producer.command,
                    %error,
                    "failed to reap producer"
                );
            }
        }
    }
}

impl Default for ProducerSupervisor {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for ProducerSupervisor {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Shell script that waits `delay` and then runs `command`.
fn launch_script(command: &str, delay: Duration) -> String {
    if delay.is_zero() {
        return command.to_owned();
    }
    format!(
        "sleep {}.{:03}; {command}",
        delay.as_secs(),
        delay.subsec_millis()
    )
}

fn spawn_producer(command: &str, script: &str) -> Result<Child, SupervisorError> {
    Command::new(SHELL)
        .arg("-c")
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .process_group(0)
        .spawn()
        .map_err(|source| SupervisorError::Spawn {
            command: command.to_owned(),
            source,
        })
}

fn has_exited(producer: &mut Producer) -> bool {
    match producer.child.try_wait() {
        Ok(Some(status)) => {
            debug!(
                target: SUPERVISOR_TARGET,
                command = %producer.command,
                %status,
                "producer exited"
            );
            true
        }
        Ok(None) => false,
        Err(error) => {
            warn!(
                target: SUPERVISOR_TARGET,
                command = %producer.command,
                %error,
                "failed to poll producer"
            );
            false
        }
    }
}

fn signal_group(producer: &Producer, signal: Signal) {
    let Ok(raw) = i32::try_from(producer.child.id()) else {
        return;
    };
    match killpg(Pid::from_raw(raw), signal) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(error) => warn!(
            target: SUPERVISOR_TARGET,
            command = %producer.command,
            ?signal,
            %error,
            "failed to signal producer group"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::tests::support::RecordingReporter;

    fn wait_for_file(path: &Path) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if path.exists() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[rstest]
    #[case::immediate("bar-clock", Duration::ZERO, "bar-clock")]
    #[case::staggered("bar-clock", Duration::from_millis(300), "sleep 0.300; bar-clock")]
    #[case::whole_seconds("bar-clock", Duration::from_secs(2), "sleep 2.000; bar-clock")]
    fn launch_script_prefixes_delay(
        #[case] command: &str,
        #[case] delay: Duration,
        #[case] expected: &str,
    ) {
        assert_eq!(launch_script(command, delay), expected);
    }

    #[test]
    fn producers_run_and_are_reported() {
        let dir = TempDir::new().expect("temp dir");
        let marker = dir.path().join("ran");
        let reporter = RecordingReporter::default();
        let commands = vec![format!("touch '{}'", marker.display())];

        let mut supervisor = ProducerSupervisor::spawn_all(&commands, Duration::ZERO, &reporter);

        assert_eq!(supervisor.len(), 1);
        assert!(wait_for_file(&marker), "producer should have run");
        assert_eq!(reporter.spawned(), commands);
        supervisor.terminate();
        assert!(supervisor.is_empty());
    }

    #[test]
    fn terminate_stops_long_running_producers() {
        let reporter = RecordingReporter::default();
        let commands = vec!["sleep 30".to_owned(), "sleep 30".to_owned()];
        let mut supervisor =
            ProducerSupervisor::spawn_all(&commands, Duration::from_millis(10), &reporter);
        assert_eq!(supervisor.pids().len(), 2);

        let started = Instant::now();
        supervisor.terminate();
        assert!(supervisor.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn dropping_the_supervisor_terminates_producers() {
        let reporter = RecordingReporter::default();
        let supervisor =
            ProducerSupervisor::spawn_all(&["sleep 30".to_owned()], Duration::ZERO, &reporter);
        let pid = supervisor.pids().first().copied().expect("one producer");
        drop(supervisor);

        let raw = i32::try_from(pid).expect("pid fits i32");
        assert_eq!(
            nix::sys::signal::kill(Pid::from_raw(raw), None),
            Err(Errno::ESRCH)
        );
    }
}
