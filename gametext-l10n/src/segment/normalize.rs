//! Text repairs applied before conditional expansion and splitting.

use regex::Regex;
use std::sync::LazyLock;

/// Paragraph marker inserted wherever the source had a blank line
pub const PARAGRAPH: &str = "|PAR|";

/// Private-use character wrapped around protected abbreviations
pub const MASK: char = '\u{E000}';

/// Stat and attribute abbreviations whose trailing period never ends a sentence
pub const KNOWN_ABBREVIATIONS: [&str; 15] = [
    "P.", "DMG.", "STR.", "DEX.", "INT.", "CHA.", "CON.", "HP.", "AC.", "DC.", "SPD.", "PER.",
    "WIS.", "AGI.", "LVL.",
];

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m);;.*$").expect("annotation regex"));
static BROKEN_IF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#\s*-\s*IF").expect("broken if regex"));
static DASH_BEFORE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-\s*\)\s*#(ELSE|END)").expect("dash keyword regex"));
static SPACE_BEFORE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\)\s*#(ELSE|END)").expect("space keyword regex"));
static STAR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*[ \t]*(?:\r?\n|$)").expect("star line regex"));
static ENTRY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^(ENTRY\s+\d+.*?)\r?$").expect("entry line regex"));
static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\s*\r?\n").expect("blank line regex"));
static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").expect("newline regex"));
static ABBREVIATIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    KNOWN_ABBREVIATIONS
        .iter()
        .map(|abbr| {
            Regex::new(&format!(r"(?i)\b{}", regex::escape(abbr))).expect("abbreviation regex")
        })
        .collect()
});

/// Drop translator annotations: everything from `;;` to the end of its line.
pub fn strip_annotations(text: &str) -> String {
    ANNOTATION.replace_all(text, "").into_owned()
}

/// Repair common authoring slips and turn blank lines into paragraph markers.
///
/// * `# -IF` becomes `#IF`
/// * `-)#ELSE` / `-)#END` and `) #ELSE` / `) #END` lose the stray dash/space
/// * lines holding only `*` are removed
/// * `ENTRY <n>` lines get a paragraph marker appended
/// * every blank line becomes [`PARAGRAPH`]
pub fn pre_normalize(text: &str) -> String {
    let text = BROKEN_IF.replace_all(text, "#IF");
    let text = DASH_BEFORE_KEYWORD.replace_all(&text, ")#$1");
    let text = SPACE_BEFORE_KEYWORD.replace_all(&text, ")#$1");
    let text = STAR_LINE.replace_all(&text, "");
    let text = ENTRY_LINE.replace_all(&text, format!("${{1}}{PARAGRAPH}"));
    BLANK_LINE.replace_all(&text, PARAGRAPH).into_owned()
}

/// Collapse remaining line breaks into single spaces.
pub fn flatten_lines(text: &str) -> String {
    NEWLINES.replace_all(text, " ").trim().to_string()
}

/// Wrap every known abbreviation in [`MASK`] characters so that its period
/// is not followed directly by whitespace.
pub fn mask_abbreviations(text: &str) -> String {
    let mut masked = text.to_string();
    for re in ABBREVIATIONS.iter() {
        masked = re
            .replace_all(&masked, format!("{MASK}${{0}}{MASK}"))
            .into_owned();
    }
    masked
}

pub fn unmask(text: &str) -> String {
    text.replace(MASK, "")
}
