use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Host the server binds when no configuration overrides it.
pub const DEFAULT_HOST: &str = "localhost";

/// Port the server binds when no configuration overrides it.
pub const DEFAULT_PORT: u16 = 5000;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// How long a connection may stay silent before the server gives up on it.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-index stagger applied when launching producer commands.
pub const DEFAULT_SPAWN_DELAY: Duration = Duration::from_millis(300);

/// Name of the rc file looked up in the configuration directories.
pub const RC_FILE_NAME: &str = "stagrc";

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Resolves the rc file path.
///
/// `$XDG_CONFIG_HOME/stagrc` wins when the variable is set; otherwise the
/// dotfile `~/.stagrc` is used. Returns `None` when neither location can be
/// expressed as UTF-8.
#[must_use]
pub fn default_config_path() -> Option<Utf8PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
        return Utf8PathBuf::from_path_buf(dir.into())
            .ok()
            .map(|dir| dir.join(RC_FILE_NAME));
    }
    let home = dirs::home_dir()?;
    Utf8PathBuf::from_path_buf(home)
        .ok()
        .map(|home| home.join(format!(".{RC_FILE_NAME}")))
}
