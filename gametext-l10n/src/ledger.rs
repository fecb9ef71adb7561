//! Needs-translation ledger line format.
//!
//! Hosts that persist missing keys write one line per key: the key as a CSV
//! field followed by an empty translation column, ready to be filled in and
//! loaded back as a dictionary source.

/// Quote a CSV field when it contains a quote, comma or line break, doubling
/// any embedded quotes; other values are returned unchanged.
pub fn escape_csv_value(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One ledger line for `key`, without the trailing newline.
pub fn ledger_line(key: &str) -> String {
    format!("{},", escape_csv_value(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Delimiter, parse_dictionary_source};

    #[test]
    fn test_plain_value_is_unchanged() {
        assert_eq!(escape_csv_value("Open Door"), "Open Door");
        assert_eq!(ledger_line("Open Door"), "Open Door,");
    }

    #[test]
    fn test_special_values_are_quoted() {
        assert_eq!(escape_csv_value("Hello, traveler!"), "\"Hello, traveler!\"");
        assert_eq!(escape_csv_value("Say \"hi\""), "\"Say \"\"hi\"\"\"");
        assert_eq!(escape_csv_value("a\nb"), "\"a\nb\"");
        assert_eq!(ledger_line("Hello, traveler!"), "\"Hello, traveler!\",");
    }

    #[test]
    fn test_ledger_lines_read_back_as_keys() -> crate::error::L10nResult<()> {
        let keys = ["Hello, traveler!", "Say \"hi\"", "Two\nlines"];
        let mut ledger: String = keys.iter().map(|k| ledger_line(k) + "Filled\n").collect();
        ledger.push('\n');
        let rows = parse_dictionary_source(&ledger, Delimiter::Comma)?;
        let read_keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(read_keys, keys);
        Ok(())
    }
}
