//! Positional templates
//!
//! After segmentation, the original text is turned into a template where each
//! unit's first occurrence is replaced by `{index}`. Applying the template to
//! the translated units puts them back in place, which preserves every
//! character that was not part of a unit (quotes, markup, line breaks, the
//! conditional skeleton).
//!
//! # Example
//!
//! ```ignore
//! let units = vec!["Hello, traveler!".to_string(), "Welcome home.".to_string()];
//! let template = Template::build("Hello, traveler! Welcome home.", &units);
//! assert_eq!(template.as_str(), "{0} {1}");
//! assert_eq!(
//!     template.apply(&["Salut, voyageur!", "Bienvenue chez toi."]),
//!     "Salut, voyageur! Bienvenue chez toi."
//! );
//! ```

use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static SLOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("slot regex"));

/// Original text with unit occurrences replaced by `{index}` slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    /// Unit indices that actually received a slot
    slots: BTreeSet<usize>,
}

impl Template {
    /// Build a template from the original text and its units.
    ///
    /// Units are placed longest first (ties keep source order) so that a short
    /// unit cannot claim text inside a longer one. A unit whose text can no
    /// longer be found, because an earlier replacement consumed it, is skipped
    /// and its slot never appears.
    ///
    /// # Arguments
    /// * `original` - The text the units were segmented from
    /// * `units` - Units in source order; their positions become slot indices
    pub fn build<S: AsRef<str>>(original: &str, units: &[S]) -> Self {
        let mut order: Vec<(usize, &str)> = units
            .iter()
            .map(AsRef::as_ref)
            .enumerate()
            .filter(|(_, unit)| !unit.is_empty())
            .collect();
        // stable sort keeps source order between equal lengths
        order.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()));

        let mut text = original.to_string();
        let mut slots = BTreeSet::new();
        for (index, unit) in order {
            if let Some(pos) = text.find(unit) {
                text.replace_range(pos..pos + unit.len(), &slot(index));
                slots.insert(index);
            }
        }
        Template { text, slots }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Substitute each slot with the unit at the same index.
    ///
    /// Braced numbers that are not slots of this template are left as they
    /// are, and so is anything inside the substituted units.
    pub fn apply<S: AsRef<str>>(&self, units: &[S]) -> String {
        SLOT.replace_all(&self.text, |caps: &Captures| {
            let unit: Option<&str> = caps[1]
                .parse::<usize>()
                .ok()
                .filter(|index| self.slots.contains(index))
                .and_then(|index| units.get(index))
                .map(AsRef::as_ref);
            unit.unwrap_or(&caps[0]).to_string()
        })
        .into_owned()
    }
}

fn slot(index: usize) -> String {
    format!("{{{index}}}")
}
