//! Request payloads sent to the server.

use serde::Serialize;
use serde_json::{Value, json};
use stag_blocks::DEBUG_KEY;

use crate::cli::{Align, BlockArgs, Markup};
use crate::markup::escape_pango;

/// A block command as sent over the wire.
///
/// Unset options are omitted so the server never sees explicit nulls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BlockPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_text: Option<String>,
    align: Align,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instance: Option<String>,
    markup: Markup,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    separator: Option<bool>,
    separator_block_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<i64>,
    urgent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    json: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    remove: bool,
}

impl From<BlockArgs> for BlockPayload {
    fn from(args: BlockArgs) -> Self {
        let escape = |text: Option<String>| match args.markup {
            Markup::Pango => text.map(|value| escape_pango(&value)),
            Markup::None => text,
        };
        Self {
            full_text: escape(args.full_text),
            short_text: escape(args.short_text),
            name: args.name,
            align: args.align,
            color: args.color,
            background: args.background,
            border: args.border,
            instance: args.instance,
            markup: args.markup,
            min_width: args.min_width,
            separator: args.separator,
            separator_block_width: args.separator_block_width,
            sort_order: args.sort_order,
            urgent: args.urgent,
            json: args.json,
            remove: args.remove,
        }
    }
}

/// The request asking the server for a store dump.
pub(crate) fn debug_request() -> Value {
    json!({ DEBUG_KEY: true })
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(args: BlockArgs) -> Value {
        serde_json::to_value(BlockPayload::from(args)).expect("serialise payload")
    }

    #[test]
    fn minimal_block_sends_defaults_only() {
        let args = BlockArgs {
            name: Some("clock".to_owned()),
            separator_block_width: 21,
            ..BlockArgs::default()
        };
        assert_eq!(
            serde_json::to_string(&BlockPayload::from(args)).expect("serialise payload"),
            r#"{"name":"clock","align":"center","markup":"pango","separator_block_width":21,"urgent":false}"#
        );
    }

    #[test]
    fn pango_markup_escapes_text() {
        let value = payload(BlockArgs {
            name: Some("music".to_owned()),
            full_text: Some("Simon & Garfunkel".to_owned()),
            short_text: Some("<S&G>".to_owned()),
            ..BlockArgs::default()
        });
        assert_eq!(value["full_text"], "Simon &amp; Garfunkel");
        assert_eq!(value["short_text"], "&lt;S&amp;G&gt;");
    }

    #[test]
    fn plain_markup_leaves_text_alone() {
        let value = payload(BlockArgs {
            name: Some("music".to_owned()),
            full_text: Some("Simon & Garfunkel".to_owned()),
            markup: Markup::None,
            ..BlockArgs::default()
        });
        assert_eq!(value["full_text"], "Simon & Garfunkel");
        assert_eq!(value["markup"], "none");
    }

    #[test]
    fn remove_flag_is_sent_only_when_set() {
        let kept = payload(BlockArgs::default());
        assert!(kept.get("remove").is_none());
        let removed = payload(BlockArgs {
            name: Some("a".to_owned()),
            remove: true,
            ..BlockArgs::default()
        });
        assert_eq!(removed["remove"], true);
    }

    #[test]
    fn debug_request_wire_form() {
        assert_eq!(debug_request().to_string(), r#"{"debug":true}"#);
    }
}
