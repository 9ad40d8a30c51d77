//! Chat text cleanup.
//!
//! The game client embeds UI escape sequences in chat text. An item link
//! looks like this on the wire:
//!
//! ```text
//! |cff0070dd|Hitem:19019:0:0:0:0:0:0:0:80|h[Thunderfury]|h|r
//!  └─color──┘└──────link payload────────┘  └─name──────┘ └reset
//! ```
//!
//! A literal `|` typed by a player arrives doubled (`||`).

use std::sync::LazyLock;

use regex::Regex;

static ITEM_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|(?:.*?)\|Hitem:(?:.*?)\|.\[([^\]]+)(?:\]\|.\|.)?")
        .expect("item link pattern is valid")
});

/// Placeholder for an escaped pipe while single pipes are stripped.
const PIPE_PLACEHOLDER: &str = "\0\0";

/// Strips client markup from `message`.
///
/// Item links collapse to their bracketed name, every other single `|`
/// control character is removed, and doubled `||` survive unchanged.
///
/// ```
/// use tcrelay_session::sanitize;
///
/// let raw = "wts |cffffffff|Hitem:1234:0:0:0:0:0:0:0:0:0|h[Sword of Testing]|h|r pst";
/// assert_eq!(sanitize(raw), "wts [Sword of Testing] pst");
/// assert_eq!(sanitize("a||b"), "a||b");
/// ```
pub fn sanitize(message: &str) -> String {
    let linked = ITEM_LINK.replace_all(message, "[${1}]");
    linked
        .replace("||", PIPE_PLACEHOLDER)
        .replace('|', "")
        .replace(PIPE_PLACEHOLDER, "||")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_item_link_keeps_bracketed_name() {
        let raw = "|cffffffff|Hitem:1234:0:0:0:0:0:0:0:0:0|h[Sword of Testing]|h|r";
        assert_eq!(sanitize(raw), "[Sword of Testing]");
    }

    #[test]
    fn test_sanitize_multiple_links_in_sentence() {
        let raw = "trade |cff1eff00|Hitem:2589:0:0:0|h[Linen Cloth]|h|r for \
                   |cff0070dd|Hitem:19019:0:0:0|h[Thunderfury]|h|r?";
        assert_eq!(sanitize(raw), "trade [Linen Cloth] for [Thunderfury]?");
    }

    #[test]
    fn test_sanitize_link_without_trailing_suffix() {
        let raw = "|cff9d9d9d|Hitem:3:0|h[Broken Fang";
        assert_eq!(sanitize(raw), "[Broken Fang]");
    }

    #[test]
    fn test_sanitize_plain_text_unchanged() {
        let raw = "anyone up for ICC 25? need heals";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn test_sanitize_doubled_pipe_preserved() {
        assert_eq!(sanitize("a||b"), "a||b");
    }

    #[test]
    fn test_sanitize_single_pipes_stripped() {
        assert_eq!(sanitize("|cffff0000red|r text"), "cffff0000redr text");
        assert_eq!(sanitize("a|b"), "ab");
    }

    #[test]
    fn test_sanitize_triple_pipe_keeps_one_pair() {
        assert_eq!(sanitize("a|||b"), "a||b");
    }

    #[test]
    fn test_sanitize_non_item_hyperlink_is_only_unpiped() {
        // Spell links are not item links; only their pipes go.
        let raw = "|cff71d5ff|Hspell:1459|h[Arcane Intellect]|h|r";
        assert_eq!(
            sanitize(raw),
            "cff71d5ffHspell:1459h[Arcane Intellect]hr"
        );
    }
}
