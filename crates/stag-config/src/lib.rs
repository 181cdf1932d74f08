//! Shared configuration for the stag status aggregator.
//!
//! Settings are resolved in three layers: built-in defaults, then the
//! line-oriented rc file (`$XDG_CONFIG_HOME/stagrc` or `~/.stagrc`), then
//! command-line overrides. Loading never fails; lines the rc parser cannot use
//! are reported as [`ConfigDiagnostic`] values instead.

mod defaults;
mod logging;
mod rc;
mod socket;

use std::fs;
use std::io;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, DEFAULT_READ_TIMEOUT, DEFAULT_SPAWN_DELAY,
    RC_FILE_NAME, default_config_path, default_log_format,
};
pub use logging::LogFormat;
pub use rc::ConfigDiagnostic;
pub use socket::SocketEndpoint;

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host the server binds and producers connect to.
    pub host: String,
    /// TCP port the server binds and producers connect to.
    pub port: u16,
    /// Producer commands launched alongside the server, in launch order.
    pub spawn: Vec<String>,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Whether `debug` requests dump the block store.
    pub debug_requests: bool,
    /// Read timeout applied to each producer connection.
    pub read_timeout: Duration,
    /// Stagger between successive producer launches.
    pub spawn_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            spawn: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: default_log_format(),
            debug_requests: true,
            read_timeout: DEFAULT_READ_TIMEOUT,
            spawn_delay: DEFAULT_SPAWN_DELAY,
        }
    }
}

impl Config {
    /// Loads configuration from the default rc file location.
    #[must_use]
    pub fn load() -> LoadedConfig {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => LoadedConfig::defaults(),
        }
    }

    /// Loads configuration from an explicit rc file path.
    ///
    /// A missing file yields the defaults without diagnostics; any other read
    /// failure yields the defaults plus a file-level diagnostic.
    #[must_use]
    pub fn load_from(path: &Utf8Path) -> LoadedConfig {
        let mut config = Self::default();
        let diagnostics = match fs::read_to_string(path) {
            Ok(contents) => rc::apply_rc(&contents, &mut config),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(error) => vec![ConfigDiagnostic::new(
                0,
                format!("failed to read '{path}': {error}"),
            )],
        };
        LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            diagnostics,
        }
    }

    /// Parses rc file contents on top of the defaults.
    #[must_use]
    pub fn from_rc_str(contents: &str) -> LoadedConfig {
        let mut config = Self::default();
        let diagnostics = rc::apply_rc(contents, &mut config);
        LoadedConfig {
            config,
            source: None,
            diagnostics,
        }
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.host {
            self.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(filter) = &overrides.log_filter {
            self.log_filter.clone_from(filter);
        }
        if let Some(format) = overrides.log_format {
            self.log_format = format;
        }
    }

    /// Returns the endpoint described by `host` and `port`.
    #[must_use]
    pub fn socket_endpoint(&self) -> SocketEndpoint {
        SocketEndpoint::tcp(self.host.clone(), self.port)
    }

    /// Returns the configured log filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

/// Values supplied on the command line that win over the rc file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replacement host.
    pub host: Option<String>,
    /// Replacement port.
    pub port: Option<u16>,
    /// Replacement log filter.
    pub log_filter: Option<String>,
    /// Replacement log format.
    pub log_format: Option<LogFormat>,
}

/// Configuration together with the rc lines that were ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// The resolved configuration.
    pub config: Config,
    /// The rc file consulted, if any.
    pub source: Option<Utf8PathBuf>,
    /// Lines of the rc file that were skipped.
    pub diagnostics: Vec<ConfigDiagnostic>,
}

impl LoadedConfig {
    /// Built-in defaults with no rc file consulted.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            config: Config::default(),
            source: None,
            diagnostics: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests;
