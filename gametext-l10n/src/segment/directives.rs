//! Inline markup that splits a sentence into further units: HTML-like tags,
//! `{...}` engine directives and `[...]` action labels.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Token the engine substitutes with the player's name
pub const PLAYER_TOKEN: &str = "{PLAYER}";
/// Token standing in for any money/gold amount
pub const MONEY_TOKEN: &str = "{MONEY}";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static LORD_LADY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{lordLady\}").expect("lord lady regex"));
static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("directive regex"));
static ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("action regex"));

/// Split on HTML-like tags, keeping the non-empty text between them.
pub fn split_html(text: &str) -> Vec<String> {
    TAG.split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `{...}` directives.
///
/// `{lordLady}` forks the text into a "lord" and a "lady" variant. Of the
/// remaining directives, `{getName}` becomes [`PLAYER_TOKEN`], `{addXp|N}`
/// becomes the number `N`, `{getMoney...}`/`{getGold...}` become
/// [`MONEY_TOKEN`] and anything else is removed.
pub fn split_directives(text: &str) -> Vec<String> {
    let forms = if LORD_LADY.is_match(text) {
        vec![
            LORD_LADY.replace_all(text, "lord").into_owned(),
            LORD_LADY.replace_all(text, "lady").into_owned(),
        ]
    } else {
        vec![text.to_string()]
    };

    forms
        .iter()
        .map(|form| DIRECTIVE.replace_all(form, replace_directive).trim().to_string())
        .filter(|form| !form.is_empty())
        .collect()
}

fn replace_directive(caps: &Captures) -> String {
    let body = &caps[1];
    let lower = body.to_ascii_lowercase();
    if lower == "getname" {
        PLAYER_TOKEN.to_string()
    } else if lower.starts_with("addxp") {
        let amount = lower.split_once('|').map_or("", |(_, amount)| amount);
        amount.trim().parse::<i64>().unwrap_or(0).to_string()
    } else if lower.starts_with("getmoney") || lower.starts_with("getgold") {
        MONEY_TOKEN.to_string()
    } else {
        String::new()
    }
}

/// Separate `[action]` labels from the surrounding text: first the text with
/// every label removed (when anything is left), then each label's contents.
pub fn split_actions(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let without = ACTION.replace_all(text, "");
    let without = without.trim();
    if !without.is_empty() {
        pieces.push(without.to_string());
    }
    for caps in ACTION.captures_iter(text) {
        let label = caps[1].trim();
        if !label.is_empty() {
            pieces.push(label.to_string());
        }
    }
    pieces
}
