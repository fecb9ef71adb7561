//! Fragment cleanup: strips decoration that never needs translating and
//! discards fragments with nothing translatable left.

use super::directives::{MONEY_TOKEN, PLAYER_TOKEN};
use super::normalize::{MASK, PARAGRAPH, unmask};
use regex::Regex;
use std::sync::LazyLock;

const QUOTES: [char; 5] = ['"', '“', '”', '«', '»'];

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+\-]?\d+(?:\.\d+)?%?\s*(?:[).]\s*|\s+)").expect("numeric prefix regex")
});
static MULTIPLIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*:?\bx\d+(?:\.\d+)?\s*$").expect("multiplier regex"));
static LETTERLESS_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^\p{L})]*\)\s*$").expect("letterless group regex"));
static OPEN_LETTERLESS_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\([^\p{L}]*$").expect("open group regex"));
static NUMERIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d+(?:[-/]\d+)*\s*$").expect("numeric suffix regex"));
static NUMERIC_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+(?:[./]\d+)*(?:\s*[a-z]+)?$").expect("numeric only regex")
});
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("spaces regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[^\W\d_]+\b").expect("word regex"));
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*|\s+\d+\s+").expect("list separator regex"));

/// Clean one fragment, returning an empty string when nothing translatable
/// remains.
///
/// In order: strip outer quotes, drop a leading bullet/ordinal number, unmask
/// abbreviations, drop bare `{PLAYER}`/`{MONEY}` tokens, strip a trailing
/// multiplier (`x2`, `:x1.5`), strip trailing letterless parenthesised groups
/// and numeric ranges, discard purely numeric fragments, collapse whitespace
/// and discard fragments without letters.
pub fn clean_fragment(text: &str) -> String {
    let text = strip_sentence_quotes(text);
    let text = NUMERIC_PREFIX.replace(&text, "");
    let text = unmask(&text);
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case(PLAYER_TOKEN) || trimmed.eq_ignore_ascii_case(MONEY_TOKEN) {
        return String::new();
    }

    let text = MULTIPLIER.replace(trimmed, "");
    let text = LETTERLESS_GROUP.replace(&text, "");
    if OPEN_LETTERLESS_GROUP.is_match(&text) {
        return String::new();
    }
    let text = NUMERIC_SUFFIX.replace(&text, "");
    if NUMERIC_ONLY.is_match(text.trim()) {
        return String::new();
    }
    let text = SPACES.replace_all(&text, " ");
    let text = text.trim();
    if !text.chars().any(char::is_alphabetic) {
        return String::new();
    }
    trim_edges(text).to_string()
}

/// Remove every leading quote, and trailing quotes including a quote that
/// sits just before final `.`, `!` or `?`.
fn strip_sentence_quotes(text: &str) -> String {
    let chars: Vec<char> = text.trim().chars().collect();
    let start = chars.iter().take_while(|c| QUOTES.contains(c)).count();
    let mut end = chars.len();
    while end > start {
        let last = chars[end - 1];
        let quote_before_stop = end >= 2
            && matches!(last, '.' | '!' | '?')
            && QUOTES.contains(&chars[end - 2]);
        if QUOTES.contains(&last) || quote_before_stop {
            end -= 1;
        } else {
            break;
        }
    }
    chars[start..end].iter().collect::<String>().trim().to_string()
}

/// Trim paragraph markers, mask characters, `*` and guillemets from both
/// ends, plus leading list dashes.
fn trim_edges(text: &str) -> &str {
    let mut s = text;
    loop {
        let before = s.len();
        s = s.trim();
        s = s.strip_prefix(PARAGRAPH).unwrap_or(s);
        s = s.strip_suffix(PARAGRAPH).unwrap_or(s);
        s = s.trim_start_matches(|c: char| matches!(c, '*' | '«' | '»' | '-') || c == MASK);
        s = s.trim_end_matches(|c: char| matches!(c, '*' | '«' | '»') || c == MASK);
        if s.len() == before {
            return s;
        }
    }
}

/// Split title-like lists such as `Sword, Shield, Bow` into their items.
///
/// Applies only when every word starts with an uppercase letter; the split
/// happens at commas and at numbers standing between words.
pub fn split_title_list(text: &str) -> Vec<String> {
    let mut words = WORD.find_iter(text).peekable();
    if words.peek().is_none() {
        return vec![text.to_string()];
    }
    let title_like = words.all(|w| w.as_str().chars().next().is_some_and(char::is_uppercase));
    if !title_like {
        return vec![text.to_string()];
    }
    LIST_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello, traveler!", "Hello, traveler!")]
    #[case("Welcome home.", "Welcome home.")]
    #[case("\"Run!\"", "Run!")]
    #[case("“Hi”.", "Hi")]
    #[case("1. Open the chest", "Open the chest")]
    #[case("+2 Strength", "Strength")]
    #[case("3) Leave", "Leave")]
    #[case("Healing Potion x3", "Healing Potion")]
    #[case("Damage:x1.5", "Damage")]
    #[case("Iron Sword (12)", "Iron Sword")]
    #[case("Rest for 8-10", "Rest for")]
    #[case("Day 3/4", "Day")]
    #[case("A   lot   of   space", "A lot of space")]
    #[case("|PAR|Next chapter", "Next chapter")]
    #[case("First paragraph.|PAR|", "First paragraph.")]
    #[case("* Bullet point", "Bullet point")]
    #[case("- Listed", "Listed")]
    #[case("«Bonjour»", "Bonjour")]
    #[case("Ask Max10 about it", "Ask Max10 about it")]
    fn test_clean_fragment(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_fragment(input), expected);
    }

    #[rstest]
    #[case("{PLAYER}")]
    #[case("{money}")]
    #[case("42")]
    #[case("10/20")]
    #[case("3.5")]
    #[case("(100)")]
    #[case("(12")]
    #[case("...")]
    #[case("\"\"")]
    #[case("")]
    fn test_clean_fragment_discards(#[case] input: &str) {
        assert_eq!(clean_fragment(input), "");
    }

    #[test]
    fn test_clean_fragment_unmasks() {
        assert_eq!(clean_fragment(&format!("Raise {MASK}STR.{MASK} now")), "Raise STR. now");
    }

    #[test]
    fn test_split_title_list() {
        assert_eq!(split_title_list("Sword, Shield, Bow"), vec!["Sword", "Shield", "Bow"]);
        assert_eq!(split_title_list("Gold 5 Silver"), vec!["Gold", "Silver"]);
        assert_eq!(split_title_list("Hello, traveler!"), vec!["Hello, traveler!"]);
        assert_eq!(split_title_list("Open Door"), vec!["Open Door"]);
        assert_eq!(split_title_list("..."), vec!["..."]);
    }
}
