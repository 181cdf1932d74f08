//! CLI argument definitions for the `stag` command.

use camino::Utf8PathBuf;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use stag_config::{ConfigOverrides, LogFormat};

/// Command-line interface for the stag status aggregator.
///
/// Block options follow the i3bar protocol:
/// <https://i3wm.org/docs/i3bar-protocol.html>.
#[derive(Parser, Debug)]
#[command(name = "stag", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Reads settings from this rc file instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config_path: Option<Utf8PathBuf>,
    /// Host the server binds and producers connect to.
    #[arg(long, global = true)]
    pub(crate) host: Option<String>,
    /// TCP port the server binds and producers connect to.
    #[arg(long, global = true)]
    pub(crate) port: Option<u16>,
    /// `tracing` filter directive for server logs.
    #[arg(long, global = true, value_name = "FILTER")]
    pub(crate) log_filter: Option<String>,
    /// Server log format (`json` or `compact`).
    #[arg(long, global = true, value_name = "FORMAT")]
    pub(crate) log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

impl Cli {
    pub(crate) fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            log_filter: self.log_filter.clone(),
            log_format: self.log_format,
        }
    }
}

/// Subcommands of the `stag` CLI.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Starts the status server and renders blocks to stdout.
    Server,
    /// Adds, updates or removes a block.
    Block(BlockArgs),
    /// Prints the server's current blocks.
    Debug,
}

/// Horizontal alignment of a block's text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// Markup language of a block's text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Markup {
    #[default]
    Pango,
    None,
}

/// Block attributes; flag names mirror the wire keys.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BlockArgs {
    /// Text alignment.
    #[arg(short = 'a', long, value_enum, default_value_t = Align::Center)]
    pub(crate) align: Align,
    /// Background colour. Format: #rrggbb[aa].
    #[arg(long, visible_alias = "bg", value_parser = parse_colour)]
    pub(crate) background: Option<String>,
    /// Border colour. Format: #rrggbb[aa].
    #[arg(short = 'b', long, value_parser = parse_colour)]
    pub(crate) border: Option<String>,
    /// Foreground colour. Format: #rrggbb[aa].
    #[arg(short = 'c', long, value_parser = parse_colour)]
    pub(crate) color: Option<String>,
    /// Full text to display in the block.
    #[arg(short = 'f', long = "full_text")]
    pub(crate) full_text: Option<String>,
    /// Passed along to the bar untouched.
    #[arg(short = 'i', long)]
    pub(crate) instance: Option<String>,
    /// Extra attributes as a raw JSON object.
    #[arg(short = 'j', long)]
    pub(crate) json: Option<String>,
    /// Whether the bar should interpret Pango markup.
    #[arg(short = 'm', long, value_enum, default_value_t = Markup::Pango)]
    pub(crate) markup: Markup,
    /// Unique name of the block.
    #[arg(short = 'n', long)]
    pub(crate) name: Option<String>,
    /// Removes the block named by `--name`.
    #[arg(short = 'r', long)]
    pub(crate) remove: bool,
    /// Whether to draw a separator after the block.
    #[arg(short = 's', long, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub(crate) separator: Option<bool>,
    /// Width of the separator block in pixels.
    #[arg(long = "separator_block_width", visible_alias = "sbw", default_value_t = 21)]
    pub(crate) separator_block_width: u32,
    /// Position of the block; lower numbers sit further left.
    #[arg(short = 'o', long = "sort_order", allow_negative_numbers = true)]
    pub(crate) sort_order: Option<i64>,
    /// Shortened text for narrow bars.
    #[arg(long = "short_text", visible_alias = "st")]
    pub(crate) short_text: Option<String>,
    /// Whether the block is urgent.
    #[arg(
        short = 'u',
        long,
        action = ArgAction::Set,
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    pub(crate) urgent: bool,
    /// Minimum width of the block in pixels.
    #[arg(short = 'w', long = "min_width")]
    pub(crate) min_width: Option<u32>,
}

/// Accepts `#rrggbb` or `#rrggbbaa`.
pub(crate) fn parse_colour(value: &str) -> Result<String, String> {
    let invalid = || format!("Invalid color: {value}");
    let digits = value.strip_prefix('#').ok_or_else(invalid)?;
    if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    Ok(value.to_owned())
}
