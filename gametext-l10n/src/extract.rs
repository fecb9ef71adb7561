//! Translator worksheet export
//!
//! Collects the translatable units of many game texts into one
//! semicolon-separated sheet that translators fill in and ship back as a
//! dictionary source:
//!
//! ```text
//! Original;Translate;Comment
//! Hello, traveler!;;tavern.greeting
//! Who are you?;;tavern.greeting
//! ```

use crate::segment;
use std::collections::HashSet;

/// Header row of every worksheet
pub const WORKSHEET_HEADER: &str = "Original;Translate;Comment";

/// Units gathered for translation, de-duplicated across all added texts
#[derive(Debug, Default)]
pub struct Worksheet {
    rows: Vec<(String, String)>,
    seen: HashSet<String>,
}

impl Worksheet {
    pub fn new() -> Self {
        Worksheet::default()
    }

    /// Segment `text` and add every unit not already on the sheet.
    ///
    /// # Returns
    /// Number of new rows
    pub fn add_text(&mut self, text: &str, comment: &str) -> usize {
        let before = self.rows.len();
        for unit in segment::parse(text) {
            if self.seen.insert(unit.clone()) {
                self.rows.push((unit, comment.to_string()));
            }
        }
        self.rows.len() - before
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header plus one `original;;comment` line per unit, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::from(WORKSHEET_HEADER);
        out.push('\n');
        for (original, comment) in &self.rows {
            out.push_str(&escape_field(original));
            out.push_str(";;");
            out.push_str(&escape_field(comment));
            out.push('\n');
        }
        out
    }
}

fn escape_field(value: &str) -> String {
    let flat = value.replace("\r\n", " ").replace(['\n', '\r'], " ");
    if flat.contains(['"', ';']) {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::L10nResult;
    use crate::source::{Delimiter, parse_dictionary_source};

    #[test]
    fn test_empty_worksheet_has_header() {
        let sheet = Worksheet::new();
        assert!(sheet.is_empty());
        assert_eq!(sheet.render(), "Original;Translate;Comment\n");
    }

    #[test]
    fn test_units_are_deduplicated_first_comment_wins() {
        let mut sheet = Worksheet::new();
        assert_eq!(sheet.add_text("Hello, traveler! Who are you?", "tavern"), 2);
        assert_eq!(sheet.add_text("Who are you? Go away.", "gate"), 1);
        assert_eq!(sheet.len(), 3);
        assert_eq!(
            sheet.render(),
            "Original;Translate;Comment\n\
             Hello, traveler!;;tavern\n\
             Who are you?;;tavern\n\
             Go away.;;gate\n"
        );
    }

    #[test]
    fn test_both_branches_are_extracted() {
        let mut sheet = Worksheet::new();
        sheet.add_text("#IF(x)#THEN(Welcome home.)#ELSE(Who are you?)#END", "");
        assert_eq!(
            sheet.render(),
            "Original;Translate;Comment\nWelcome home.;;\nWho are you?;;\n"
        );
    }

    #[test]
    fn test_field_escaping() {
        assert_eq!(escape_field("plain, text"), "plain, text");
        assert_eq!(escape_field("a;b"), "\"a;b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "two lines");
    }

    #[test]
    fn test_filled_worksheet_loads_as_dictionary() -> L10nResult<()> {
        let mut sheet = Worksheet::new();
        sheet.add_text("Hello, traveler! Who are you?", "tavern");
        let filled = sheet
            .render()
            .replace("Hello, traveler!;;", "Hello, traveler!;Salut, voyageur!;")
            .replace("Who are you?;;", "Who are you?;Qui es-tu?;");
        let rows = parse_dictionary_source(&filled, Delimiter::Auto)?;
        assert_eq!(
            rows,
            vec![
                ("Hello, traveler!".to_string(), "Salut, voyageur!".to_string()),
                ("Who are you?".to_string(), "Qui es-tu?".to_string()),
            ]
        );
        Ok(())
    }
}
