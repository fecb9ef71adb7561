//! Translation dictionary: exact entries plus `{ITEM}` pattern rules.

use crate::error::{L10nError, L10nResult};
use regex::Regex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

/// Placeholder standing for an arbitrary item name in dictionary keys
pub const ITEM_TOKEN: &str = "{ITEM}";

/// A dictionary key containing `{ITEM}` compiled into a full-string matcher
#[derive(Debug, Clone)]
pub struct PatternRule {
    key: String,
    regex: Regex,
    template: String,
}

impl PatternRule {
    /// Compile `key` into an anchored matcher where every `{ITEM}` captures a
    /// lazy run of characters.
    ///
    /// The translation must contain exactly as many `{ITEM}` slots as the
    /// key, otherwise the captures could not be put back in order.
    pub fn compile(key: &str, template: &str) -> L10nResult<Self> {
        let expected = key.matches(ITEM_TOKEN).count();
        let found = template.matches(ITEM_TOKEN).count();
        if expected != found {
            return Err(L10nError::ItemCountMismatch {
                key: key.to_string(),
                expected,
                found,
            });
        }

        let body = key
            .split(ITEM_TOKEN)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("(.+?)");
        let regex = Regex::new(&format!("^{body}$")).map_err(|source| L10nError::PatternRule {
            key: key.to_string(),
            source,
        })?;

        Ok(PatternRule {
            key: key.to_string(),
            regex,
            template: template.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Captured item texts when the whole `text` matches this rule.
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(text)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Fill the translated template's `{ITEM}` slots, in order, with `items`.
    pub fn fill<S: AsRef<str>>(&self, items: &[S]) -> String {
        let mut out = self.template.clone();
        for item in items {
            if let Some(pos) = out.find(ITEM_TOKEN) {
                out.replace_range(pos..pos + ITEM_TOKEN.len(), item.as_ref());
            }
        }
        out
    }
}

/// Exact translations keyed by source text, with the pattern rules derived
/// from keys that contain `{ITEM}`.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, String>,
    /// In first-seen key order, which is also match precedence
    rules: Vec<PatternRule>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary::default()
    }

    /// Add an entry. The first translation seen for a key wins; later ones
    /// are ignored and `false` is returned.
    pub fn insert(&mut self, key: impl Into<String>, translation: impl Into<String>) -> bool {
        let key = key.into();
        let translation = translation.into();
        let Entry::Vacant(slot) = self.entries.entry(key) else {
            return false;
        };
        if slot.key().contains(ITEM_TOKEN) {
            match PatternRule::compile(slot.key(), &translation) {
                Ok(rule) => self.rules.push(rule),
                Err(err) => warn!(error = %err, "Skipping pattern rule"),
            }
        }
        slot.insert(translation);
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a dictionary from `(key, translation)` pairs; the first occurrence
/// of a key wins.
///
/// # Example
/// ```ignore
/// let dict = load_dictionary([("You found {ITEM}.", "Du hast {ITEM} gefunden.")]);
/// assert_eq!(dict.rules().len(), 1);
/// ```
pub fn load_dictionary<I, K, V>(entries: I) -> Dictionary
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut dictionary = Dictionary::new();
    for (key, translation) in entries {
        dictionary.insert(key, translation);
    }
    dictionary
}
