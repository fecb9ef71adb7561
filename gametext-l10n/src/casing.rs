//! Letter-case helpers for shout-cased UI labels.
//!
//! Menus and buttons often render their labels fully uppercased ("OPEN DOOR")
//! while the dictionary stores them in title case ("Open Door"). The resolver
//! bridges the two with [`is_shout_case`] and [`to_title_case`].

use regex::Regex;
use std::sync::LazyLock;

static SHOUT_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\p{P}\p{Lu}\s]+$").expect("shout case regex"));

/// Words kept lowercase by [`to_title_case`] unless they open the phrase.
const MINOR_WORDS: [&str; 3] = ["of", "as", "for"];

/// True when the text has at least one uppercase letter and nothing but
/// uppercase letters, digits, punctuation and whitespace.
///
/// # Example
/// ```ignore
/// assert!(is_shout_case("OPEN DOOR"));
/// assert!(!is_shout_case("Open Door"));
/// ```
pub fn is_shout_case(text: &str) -> bool {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.chars().any(char::is_uppercase) {
        return false;
    }
    SHOUT_CASE.is_match(&collapsed)
}

/// Title-case a phrase: lowercase everything, then uppercase the first
/// letter of every word except "of", "as" and "for" in non-initial position.
/// Whitespace runs are preserved as they are.
pub fn to_title_case(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut word = String::new();
    let mut first_word = true;

    for c in lowered.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                push_word(&mut out, &word, first_word);
                word.clear();
                first_word = false;
            }
            out.push(c);
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        push_word(&mut out, &word, first_word);
    }
    out
}

fn push_word(out: &mut String, word: &str, first_word: bool) {
    if !first_word && MINOR_WORDS.contains(&word) {
        out.push_str(word);
        return;
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
        _ => out.push_str(word),
    }
}
