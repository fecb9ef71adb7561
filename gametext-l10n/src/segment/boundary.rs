//! Sentence boundary detection.
//!
//! A boundary is a (possibly empty) run of separator characters between two
//! sentences. The separator itself is dropped; the text on each side becomes
//! its own piece. Detection is a left-to-right scan: at every position the
//! rules are tried in order and the first one that fits decides how much
//! separator text to consume.
//!
//! Abbreviations must already be masked (see
//! [`mask_abbreviations`](super::normalize::mask_abbreviations)), otherwise a
//! stat label like `STR.` followed by a capital letter reads as a sentence end.

use super::normalize::PARAGRAPH;

/// Split flattened text at sentence boundaries.
///
/// Pieces are returned untrimmed and may be empty; the caller cleans them.
pub fn split_sentences(text: &str) -> Vec<String> {
    let scanner = Scanner::new(text);
    let mut pieces = Vec::new();
    let mut last = 0;
    let mut i = 0;

    while i < scanner.len() {
        match scanner.boundary_at(i) {
            Some(end) => {
                pieces.push(scanner.slice(last, i));
                last = end;
                i = if end > i { end } else { i + 1 };
            }
            None => i += 1,
        }
    }
    pieces.push(scanner.slice(last, scanner.len()));
    pieces
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closing_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '”')
}

fn is_opening_quote(c: char) -> bool {
    matches!(c, '“' | '"' | '\'')
}

/// Character-indexed view of the text with the boundary rules.
struct Scanner {
    chars: Vec<char>,
    paragraph: Vec<char>,
}

impl Scanner {
    fn new(text: &str) -> Self {
        Scanner {
            chars: text.chars().collect(),
            paragraph: PARAGRAPH.chars().collect(),
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start.min(end)..end].iter().collect()
    }

    fn at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    /// The character `back` positions before `i`.
    fn before(&self, i: usize, back: usize) -> Option<char> {
        i.checked_sub(back).and_then(|k| self.at(k))
    }

    fn before_is(&self, i: usize, back: usize, pred: impl Fn(char) -> bool) -> bool {
        self.before(i, back).is_some_and(pred)
    }

    fn is(&self, i: usize, pred: impl Fn(char) -> bool) -> bool {
        self.at(i).is_some_and(pred)
    }

    fn skip_whitespace(&self, mut i: usize) -> usize {
        while self.is(i, char::is_whitespace) {
            i += 1;
        }
        i
    }

    fn paragraph_at(&self, i: usize) -> bool {
        self.chars[i.min(self.len())..].starts_with(&self.paragraph)
    }

    fn paragraph_ends_at(&self, i: usize) -> bool {
        i >= self.paragraph.len() && self.chars[i - self.paragraph.len()..i] == self.paragraph[..]
    }

    /// Capital letter, optionally preceded by an opening quote.
    fn capital_at(&self, i: usize) -> bool {
        self.is(i, char::is_uppercase)
            || (self.is(i, is_opening_quote) && self.is(i + 1, char::is_uppercase))
    }

    /// `[.!?…]` optionally followed by one closing quote or parenthesis.
    fn after_terminal(&self, i: usize) -> bool {
        self.before_is(i, 1, is_terminal)
            || (self.before_is(i, 1, |c| is_closing_quote(c) || c == ')')
                && self.before_is(i, 2, is_terminal))
    }

    /// `[.!?…]` followed by exactly one closing quote.
    fn after_quoted_terminal(&self, i: usize) -> bool {
        self.before_is(i, 1, is_closing_quote) && self.before_is(i, 2, is_terminal)
    }

    /// `)` optionally followed by one closing quote.
    fn after_paren(&self, i: usize) -> bool {
        self.before_is(i, 1, |c| c == ')')
            || (self.before_is(i, 1, |c| matches!(c, '”' | '"' | '\''))
                && self.before_is(i, 2, |c| c == ')'))
    }

    /// Try every rule at position `i`; returns where the next piece starts.
    fn boundary_at(&self, i: usize) -> Option<usize> {
        let ws_end = self.skip_whitespace(i);
        let has_ws = ws_end > i;

        // Sentence end, then a capitalised sentence
        if self.after_terminal(i) && has_ws && self.capital_at(ws_end) {
            return Some(ws_end);
        }
        // Quoted sentence end, then a lowercase continuation
        if self.after_quoted_terminal(i) && has_ws && self.is(ws_end, char::is_lowercase) {
            return Some(ws_end);
        }
        // Closing quote, then a capital
        if self.before_is(i, 1, |c| matches!(c, '"' | '”'))
            && has_ws
            && self.is(ws_end, char::is_uppercase)
        {
            return Some(ws_end);
        }
        // Colon introducing a sentence
        if self.before_is(i, 1, |c| c == ':') && has_ws && self.capital_at(ws_end) {
            return Some(ws_end);
        }
        // Comma then an opening quote: `He said, "Go`
        if self.after_comma_quote(i) && self.is(ws_end, char::is_uppercase) {
            return Some(ws_end);
        }
        // Quoted sentence end, comma, capital
        if self.after_quoted_terminal(i) && self.is(i, |c| c == ',') {
            let next = self.skip_whitespace(i + 1);
            if next > i + 1 && self.is(next, char::is_uppercase) {
                return Some(next);
            }
        }
        // Comma inside a closing quote: `"Wait," she said`
        if self.before_is(i, 1, |c| matches!(c, '\'' | '"' | '“' | '”'))
            && self.before_is(i, 2, |c| c == ',')
            && has_ws
            && self.is(ws_end, char::is_alphabetic)
        {
            return Some(ws_end);
        }
        // Ellipsis used as a separator between sentences
        if self.after_terminal(i) && has_ws {
            if let Some(end) = self.ellipsis_separator(ws_end) {
                return Some(end);
            }
        }
        // Sentence end, quote, dash: `Go!" - Then`
        if self.before_is(i, 1, is_terminal) && has_ws {
            if let Some(end) = self.quote_dash_separator(ws_end) {
                return Some(end);
            }
        }
        // Right after a paragraph marker
        if self.paragraph_ends_at(i) {
            return Some(i);
        }
        // Before a paragraph marker that follows a colon
        if self.before_is(i, 1, |c| c == ':') && self.paragraph_at(ws_end) {
            return Some(ws_end);
        }
        // Tilde separator
        if self.before_is(i, 1, |c| !c.is_whitespace()) && self.is(ws_end, |c| c == '~') {
            let next = self.skip_whitespace(ws_end + 1);
            if self.is(next, |c| !c.is_whitespace()) {
                return Some(next);
            }
        }
        // Colon introducing a directive
        if self.before_is(i, 1, |c| c == ':')
            && has_ws
            && (self.is(ws_end, |c| c == '{')
                || (self.is(ws_end, is_opening_quote) && self.is(ws_end + 1, |c| c == '{')))
        {
            return Some(ws_end);
        }
        // Sentence end, then a parenthesised sentence
        if self.before_is(i, 1, is_terminal) && has_ws && self.is(ws_end, |c| c == '(') {
            let inner = self.skip_whitespace(ws_end + 1);
            if self.capital_at(inner) {
                return Some(ws_end);
            }
        }
        // Closing parenthesis, then a capital or a new parenthesised sentence
        if self.after_paren(i) && has_ws {
            if self.is(ws_end, char::is_uppercase) {
                return Some(ws_end);
            }
            if self.is(ws_end, |c| c == '(') {
                let inner = self.skip_whitespace(ws_end + 1);
                if self.is(inner, char::is_uppercase) {
                    return Some(inner);
                }
            }
        }
        // Quoted parenthetical followed by another: `"Yes.") (Then`
        if self.before_is(i, 1, |c| matches!(c, '”' | '"' | '\'')) && self.is(i, |c| c == ')') {
            let open = self.skip_whitespace(i + 1);
            if open > i + 1 && self.is(open, |c| c == '(') {
                let inner = self.skip_whitespace(open + 1);
                if self.is(inner, char::is_uppercase) {
                    return Some(inner);
                }
            }
        }
        // Period before a signed number: `Done. +2 STR`
        if self.before_is(i, 1, |c| c == '.')
            && has_ws
            && self.is(ws_end, |c| c == '+' || c == '-')
            && self.is(ws_end + 1, |c| c.is_ascii_digit())
        {
            return Some(ws_end);
        }
        None
    }

    /// Lookbehind `,\s*["“]`.
    fn after_comma_quote(&self, i: usize) -> bool {
        if !self.before_is(i, 1, |c| matches!(c, '"' | '“')) {
            return false;
        }
        let mut k = i - 1;
        while k > 0 && self.is(k - 1, char::is_whitespace) {
            k -= 1;
        }
        self.before_is(k, 1, |c| c == ',')
    }

    /// `["“']?...\s*` before a capital, starting at `i`.
    fn ellipsis_separator(&self, i: usize) -> Option<usize> {
        let starts = [i, i + 1];
        let candidates = if self.is(i, is_opening_quote) { &starts[..] } else { &starts[..1] };
        candidates.iter().find_map(|&start| {
            let dots = (0..3).all(|k| self.is(start + k, |c| c == '.'));
            if !dots {
                return None;
            }
            let next = self.skip_whitespace(start + 3);
            self.is(next, char::is_uppercase).then_some(next)
        })
    }

    /// `["“”]\s*-\s+` before a capital, starting at `i`.
    fn quote_dash_separator(&self, i: usize) -> Option<usize> {
        if !self.is(i, |c| matches!(c, '"' | '“' | '”')) {
            return None;
        }
        let dash = self.skip_whitespace(i + 1);
        if !self.is(dash, |c| c == '-') {
            return None;
        }
        let next = self.skip_whitespace(dash + 1);
        (next > dash + 1 && self.is(next, char::is_uppercase)).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn split(text: &str) -> Vec<String> {
        split_sentences(text)
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    #[rstest]
    #[case("The door is locked. Find the key.", &["The door is locked.", "Find the key."])]
    #[case("Stop! \"Who goes there?\"", &["Stop!", "\"Who goes there?\""])]
    #[case("He left.\" and then", &["He left.\"", "and then"])]
    #[case("\"Run\" Now", &["\"Run\"", "Now"])]
    #[case("Note: Beware the dark.", &["Note:", "Beware the dark."])]
    #[case("He said, \"Go home.\"", &["He said, \"", "Go home.\""])]
    #[case("\"Yes.\", Then silence.", &["\"Yes.\"", "Then silence."])]
    #[case("\"Wait,\" she said.", &["\"Wait,\"", "she said."])]
    #[case("I see. ... The end.", &["I see.", "The end."])]
    #[case("Go! \" - Now run.", &["Go!", "Now run."])]
    #[case("Title:|PAR|Body text.", &["Title:", "|PAR|", "Body text."])]
    #[case("Left ~ Right", &["Left", "Right"])]
    #[case("Choose: {getName}", &["Choose:", "{getName}"])]
    #[case("Done. (Then rest.)", &["Done.", "(Then rest.)"])]
    #[case("(Quietly) Move on.", &["(Quietly)", "Move on."])]
    #[case("(Aside) (Another)", &["(Aside)", "Another)"])]
    #[case("Level up. +2 to all.", &["Level up.", "+2 to all."])]
    fn test_boundary_rules(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(split(text), expected);
    }

    #[rstest]
    #[case("the end. and more")]
    #[case("Buy 3.5 Potions")]
    #[case("Hello, traveler, welcome")]
    #[case("Mr Smith arrived")]
    fn test_no_boundary(#[case] text: &str) {
        assert_eq!(split(text), vec![text]);
    }

    #[test]
    fn test_paragraph_marker_splits() {
        assert_eq!(
            split("First paragraph.|PAR|Second paragraph."),
            vec!["First paragraph.|PAR|", "Second paragraph."]
        );
    }

    #[test]
    fn test_masked_abbreviation_is_not_a_boundary() {
        let masked = "Raise \u{E000}STR.\u{E000} Then rest.";
        assert_eq!(split(masked), vec![masked]);
    }
}
