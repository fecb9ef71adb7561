//! Per-unit translation resolution
//!
//! A unit is looked up through an ordered chain of strategies; the first hit
//! wins. Every hit then has its gendered directives resolved against the
//! player's gender.
//!
//! 1. **Exact** - the unit is a dictionary key
//! 2. **Apostrophe** - `’` normalized to `'`, then exact
//! 3. **Shout case** - an all-caps unit is title-cased, looked up, and the
//!    translation uppercased
//! 4. **Player name** - the player's name is swapped for `{PLAYER}` for the
//!    lookup and swapped back afterwards
//! 5. **Item pattern** - the unit matches a `{ITEM}` rule; each captured item
//!    is translated on its own
//! 6. **Item list** - a comma-separated list where at least one item
//!    translates
//!
//! A unit that misses every step is reported by the caller.

use crate::casing::{is_shout_case, to_title_case};
use crate::dictionary::Dictionary;
use crate::host::{GameHost, PlayerGender};
use crate::segment::directives::PLAYER_TOKEN;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

static GENDERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{IFHE\s+([^|]+?)\s*\|\s*([^}]+?)\s*\}").expect("gendered directive regex")
});
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("list separator regex"));

/// Which step of the chain produced a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Exact,
    Apostrophe,
    ShoutCase,
    PlayerName,
    ItemPattern,
    ItemList,
}

/// A successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub tier: Tier,
}

/// Resolves units against one dictionary on behalf of one host
pub struct Resolver<'a> {
    dictionary: &'a Dictionary,
    host: &'a dyn GameHost,
}

impl<'a> Resolver<'a> {
    pub fn new(dictionary: &'a Dictionary, host: &'a dyn GameHost) -> Self {
        Resolver { dictionary, host }
    }

    /// Run the fallback chain for one unit.
    ///
    /// # Returns
    /// * `Some(Resolution)` - the translation and the step that found it
    /// * `None` - every step missed
    pub fn resolve(&self, unit: &str) -> Option<Resolution> {
        let hit = |text: String, tier: Tier| Some(Resolution { text, tier });

        if let Some(text) = self.exact(unit) {
            return hit(text, Tier::Exact);
        }

        if unit.contains('’') {
            let normalized = unit.replace('’', "'");
            if let Some(text) = self.exact(&normalized) {
                debug!(unit, "Resolved after apostrophe normalization");
                return hit(text, Tier::Apostrophe);
            }
        }

        if is_shout_case(unit) {
            if let Some(text) = self.exact(&to_title_case(unit)) {
                debug!(unit, "Resolved through title case");
                return hit(text.to_uppercase(), Tier::ShoutCase);
            }
        }

        if let Some(text) = self.with_player_name(unit) {
            debug!(unit, "Resolved with player name placeholder");
            return hit(text, Tier::PlayerName);
        }

        if let Some(text) = self.match_pattern(unit) {
            debug!(unit, "Resolved through item pattern");
            return hit(text, Tier::ItemPattern);
        }
        if is_shout_case(unit) {
            if let Some(text) = self.match_pattern(&to_title_case(unit)) {
                debug!(unit, "Resolved through title-cased item pattern");
                return hit(text.to_uppercase(), Tier::ItemPattern);
            }
        }

        if let Some(text) = self.translate_list(unit) {
            debug!(unit, "Resolved as item list");
            return hit(text, Tier::ItemList);
        }

        None
    }

    /// Replace every `{IFHE male|female}` directive with the branch matching
    /// the player's gender.
    pub fn apply_gender(&self, text: &str) -> String {
        if !GENDERED.is_match(text) {
            return text.to_string();
        }
        let gender = self.host.player_gender().unwrap_or_else(|| {
            debug!("Player gender unknown, using male branch");
            PlayerGender::Male
        });
        let branch = match gender {
            PlayerGender::Male => 1,
            PlayerGender::Female => 2,
        };
        GENDERED
            .replace_all(text, |caps: &Captures| caps[branch].trim().to_string())
            .into_owned()
    }

    fn exact(&self, key: &str) -> Option<String> {
        self.dictionary.get(key).map(|text| self.apply_gender(text))
    }

    fn with_player_name(&self, unit: &str) -> Option<String> {
        let name = self.host.player_name().filter(|name| !name.is_empty())?;
        if !unit.contains(&name) {
            return None;
        }
        let key = unit.replace(&name, PLAYER_TOKEN);
        let text = self.dictionary.get(&key)?.replace(PLAYER_TOKEN, &name);
        Some(self.apply_gender(&text))
    }

    /// First pattern rule (in dictionary order) matching the whole text.
    fn match_pattern(&self, text: &str) -> Option<String> {
        self.dictionary.rules().iter().find_map(|rule| {
            let items = rule.captures(text)?;
            let translated: Vec<String> =
                items.iter().map(|item| self.translate_item(item)).collect();
            Some(self.apply_gender(&rule.fill(&translated)))
        })
    }

    /// Translate a single item name: exact, then shout case, else unchanged.
    fn translate_item(&self, item: &str) -> String {
        if let Some(text) = self.exact(item) {
            return text;
        }
        if is_shout_case(item) {
            if let Some(text) = self.exact(&to_title_case(item)) {
                return text.to_uppercase();
            }
        }
        item.to_string()
    }

    fn translate_list(&self, text: &str) -> Option<String> {
        let mut items = Vec::new();
        let mut separators = Vec::new();
        let mut last = 0;
        for sep in LIST_SEPARATOR.find_iter(text) {
            items.push(&text[last..sep.start()]);
            separators.push(sep.as_str());
            last = sep.end();
        }
        items.push(&text[last..]);

        let filled = items.iter().filter(|item| !item.trim().is_empty()).count();
        if separators.is_empty() || filled < 2 {
            return None;
        }

        let mut translated_any = false;
        let mut out = String::with_capacity(text.len());
        for (i, item) in items.iter().enumerate() {
            if item.trim().is_empty() {
                out.push_str(item);
            } else {
                let translated = self.translate_item(item);
                translated_any |= translated != *item;
                out.push_str(&translated);
            }
            if let Some(sep) = separators.get(i) {
                out.push_str(sep);
            }
        }
        translated_any.then(|| self.apply_gender(&out))
    }
}
