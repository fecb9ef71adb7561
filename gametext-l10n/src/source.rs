//! Dictionary source rows
//!
//! Translation files are delimiter-separated text with two or more columns:
//!
//! ```text
//! # Tavern dialogue
//! Original;Translate;Comment
//! Hello, traveler!;Salut, voyageur!;greeting
//! "Say ""hi""";"Dis ""salut""";
//! Two lines;Zwei\nZeilen
//! ```
//!
//! # Algorithm Overview
//!
//! 1. **Sniff** the delimiter when asked to (`Delimiter::Auto`)
//! 2. **Read records** with a single character loop: `#` comment lines,
//!    RFC 4180 quoting (`""` escapes, delimiters and newlines inside quotes)
//! 3. **Filter rows**: blank rows, the worksheet header, rows with fewer than
//!    two columns and rows with an empty key or translation are skipped
//! 4. **Unescape** literal `\n` in the translation into a real newline
//!
//! The first occurrence of a key wins.

use crate::error::{L10nError, L10nResult};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Column separator of a dictionary source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    Comma,
    Semicolon,
    /// Decide from the first record
    #[default]
    Auto,
}

impl Delimiter {
    /// The concrete separator to use for `text`.
    pub fn resolve(self, text: &str) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Auto => sniff_delimiter(text),
        }
    }
}

impl FromStr for Delimiter {
    type Err = L10nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            "auto" => Ok(Delimiter::Auto),
            _ => Err(L10nError::UnknownDelimiter(s.to_string())),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Delimiter::Comma => "comma",
            Delimiter::Semicolon => "semicolon",
            Delimiter::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Parse a dictionary source into `(original, translation)` pairs.
///
/// # Arguments
/// * `text` - Full contents of one dictionary file
/// * `delimiter` - Column separator, or `Delimiter::Auto` to sniff it
///
/// # Returns
/// The usable rows in file order, or `UnterminatedQuote` when a quoted field
/// is still open at end of input
pub fn parse_dictionary_source(
    text: &str,
    delimiter: Delimiter,
) -> L10nResult<Vec<(String, String)>> {
    let separator = delimiter.resolve(text);
    let records = read_records(text, separator)?;

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for mut fields in records {
        if fields.len() < 2 || is_header(&fields) {
            continue;
        }
        let translation = fields.swap_remove(1).replace("\\n", "\n");
        let original = fields.swap_remove(0);
        if original.is_empty() || translation.is_empty() {
            continue;
        }
        if seen.insert(original.clone()) {
            rows.push((original, translation));
        }
    }

    debug!(rows = rows.len(), %separator, "Parsed dictionary source");
    Ok(rows)
}

fn is_header(fields: &[String]) -> bool {
    fields[0] == "Original" && fields[1] == "Translate"
}

/// Split `text` into records of fields.
fn read_records(text: &str, separator: char) -> L10nResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut at_record_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if at_record_start {
            at_record_start = false;
            if c == '#' {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
                line += 1;
                at_record_start = true;
                continue;
            }
        }

        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            c if c == separator => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut fields));
                at_record_start = true;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(L10nError::UnterminatedQuote { line: quote_line });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, fields);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, fields: Vec<String>) {
    if fields.iter().any(|field| !field.trim().is_empty()) {
        records.push(fields);
    }
}

/// `;` when the first record is the worksheet header or holds an unquoted
/// semicolon and no unquoted comma; `,` otherwise.
fn sniff_delimiter(text: &str) -> char {
    let Some(first) = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
    else {
        return ',';
    };
    if first.starts_with("Original;") {
        return ';';
    }

    let mut in_quotes = false;
    let (mut commas, mut semicolons) = (0, 0);
    for c in first.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => commas += 1,
            ';' if !in_quotes => semicolons += 1,
            _ => {}
        }
    }
    if semicolons > 0 && commas == 0 { ';' } else { ',' }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pairs(rows: &[(String, String)]) -> Vec<(&str, &str)> {
        rows.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    // ========== Record Tests ==========

    #[test]
    fn test_comma_rows() -> L10nResult<()> {
        let text = "Open Door,Öffne Tür\nSword,Schwert,weapon\n";
        let rows = parse_dictionary_source(text, Delimiter::Comma)?;
        assert_eq!(pairs(&rows), vec![("Open Door", "Öffne Tür"), ("Sword", "Schwert")]);
        Ok(())
    }

    #[test]
    fn test_comments_blank_lines_and_header() -> L10nResult<()> {
        let text = "# greetings\n\nOriginal;Translate;Comment\r\nHello;Hallo;\r\n\r\n# end\n";
        let rows = parse_dictionary_source(text, Delimiter::Semicolon)?;
        assert_eq!(pairs(&rows), vec![("Hello", "Hallo")]);
        Ok(())
    }

    #[test]
    fn test_quoted_fields() -> L10nResult<()> {
        let text = concat!(
            "\"Hello, traveler!\",\"Salut, voyageur!\"\n",
            "\"Say \"\"hi\"\"\",\"Dis \"\"salut\"\"\"\n",
            "\"Two\nlines\",Zwei Zeilen",
        );
        let rows = parse_dictionary_source(text, Delimiter::Comma)?;
        assert_eq!(
            pairs(&rows),
            vec![
                ("Hello, traveler!", "Salut, voyageur!"),
                ("Say \"hi\"", "Dis \"salut\""),
                ("Two\nlines", "Zwei Zeilen"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_escaped_newline_in_translation() -> L10nResult<()> {
        let rows = parse_dictionary_source("Two lines,Zwei\\nZeilen", Delimiter::Comma)?;
        assert_eq!(pairs(&rows), vec![("Two lines", "Zwei\nZeilen")]);
        Ok(())
    }

    #[test]
    fn test_short_and_empty_rows_are_skipped() -> L10nResult<()> {
        let text = "lonely\n,orphan\nUntranslated,\nSword,Schwert";
        let rows = parse_dictionary_source(text, Delimiter::Comma)?;
        assert_eq!(pairs(&rows), vec![("Sword", "Schwert")]);
        Ok(())
    }

    #[test]
    fn test_first_key_wins() -> L10nResult<()> {
        let rows = parse_dictionary_source("Sword,Schwert\nSword,Degen", Delimiter::Comma)?;
        assert_eq!(pairs(&rows), vec![("Sword", "Schwert")]);
        Ok(())
    }

    #[test]
    fn test_unterminated_quote() {
        let result = parse_dictionary_source("Sword,Schwert\nShield,\"Schild\n", Delimiter::Comma);
        assert!(matches!(result, Err(L10nError::UnterminatedQuote { line: 2 })));
    }

    // ========== Delimiter Tests ==========

    #[rstest]
    #[case("Original;Translate;Comment\nA,b;c;", ';')]
    #[case("# note\nHello;Hallo", ';')]
    #[case("Hello,Hallo", ',')]
    #[case("Hello, you;Hallo", ',')]
    #[case("\"a;b\",c", ',')]
    #[case("", ',')]
    fn test_sniff_delimiter(#[case] text: &str, #[case] expected: char) {
        assert_eq!(Delimiter::Auto.resolve(text), expected);
    }

    #[test]
    fn test_auto_parses_semicolon_file() -> L10nResult<()> {
        let rows = parse_dictionary_source("Open Door;Öffne Tür", Delimiter::Auto)?;
        assert_eq!(pairs(&rows), vec![("Open Door", "Öffne Tür")]);
        Ok(())
    }

    #[test]
    fn test_delimiter_from_str() {
        assert_eq!("semicolon".parse::<Delimiter>().ok(), Some(Delimiter::Semicolon));
        assert_eq!("Comma".parse::<Delimiter>().ok(), Some(Delimiter::Comma));
        assert_eq!("auto".parse::<Delimiter>().ok(), Some(Delimiter::Auto));
        assert!(matches!(
            "tab".parse::<Delimiter>(),
            Err(L10nError::UnknownDelimiter(name)) if name == "tab"
        ));
    }
}
