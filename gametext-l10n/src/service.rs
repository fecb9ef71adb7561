//! Translation service: the single entry point the game calls for every
//! piece of text it is about to display.
//!
//! # Algorithm Overview
//!
//! 1. **Pass through** empty input, or any input while no language is active
//! 2. **Cache** - return the memoized output for this exact input
//! 3. **Verse** - a four-line stanza is translated line by line
//! 4. **Segment** the input into units and build a positional template
//! 5. **Resolve** every unit through the fallback chain, reporting misses
//! 6. **Reassemble** the translations through the template, falling back to
//!    the bare translations when the template could not capture the units
//!
//! The active language (pack, cache, missing keys) is one immutable snapshot
//! behind an [`ArcSwap`]. Switching language publishes a fresh snapshot, so
//! a call that already started finishes against the language it began with.

use crate::cache::{MissingKeySet, TranslationCache};
use crate::host::GameHost;
use crate::pack::LanguagePack;
use crate::resolver::Resolver;
use crate::segment;
use crate::template::Template;
use arc_swap::ArcSwap;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Number of lines that makes a text a verse
const VERSE_LINES: usize = 4;

/// Everything tied to the active language
#[derive(Debug, Default)]
struct LanguageState {
    pack: Option<LanguagePack>,
    cache: TranslationCache,
    missing: MissingKeySet,
}

impl LanguageState {
    fn with_pack(pack: LanguagePack) -> Self {
        LanguageState {
            pack: Some(pack),
            ..LanguageState::default()
        }
    }
}

/// Thread-safe translation entry point
pub struct TranslationService {
    host: Arc<dyn GameHost>,
    state: ArcSwap<LanguageState>,
}

impl TranslationService {
    /// Create a service with no active language; every input passes through.
    pub fn new(host: Arc<dyn GameHost>) -> Self {
        TranslationService {
            host,
            state: ArcSwap::from_pointee(LanguageState::default()),
        }
    }

    /// Make `pack` the active language, dropping the previous cache and
    /// missing-key set. A pack for the source language deactivates
    /// translation instead.
    pub fn activate(&self, pack: LanguagePack) {
        if pack.info().is_source_language() {
            self.deactivate();
            return;
        }
        info!(
            language = pack.code(),
            entries = pack.dictionary().len(),
            rules = pack.dictionary().rules().len(),
            "Activating language pack"
        );
        self.state.store(Arc::new(LanguageState::with_pack(pack)));
    }

    /// Stop translating; subsequent inputs pass through unchanged.
    pub fn deactivate(&self) {
        info!("Translation deactivated");
        self.state.store(Arc::new(LanguageState::default()));
    }

    /// Code of the active language, if any
    pub fn active_language(&self) -> Option<String> {
        self.state
            .load()
            .pack
            .as_ref()
            .map(|pack| pack.code().to_string())
    }

    /// Keys reported missing for the active language, sorted
    pub fn missing_keys(&self) -> Vec<String> {
        self.state.load().missing.snapshot()
    }

    /// Number of memoized inputs for the active language
    pub fn cached_len(&self) -> usize {
        self.state.load().cache.len()
    }

    /// Translate one piece of game text.
    ///
    /// Never fails: if anything goes wrong inside the pipeline the input is
    /// logged, cached as its own translation and returned unchanged.
    ///
    /// # Arguments
    /// * `input` - Raw game text as the engine is about to display it
    ///
    /// # Returns
    /// The translated text, or `input` when no language is active
    pub fn process(&self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }
        let state = self.state.load_full();
        let Some(pack) = state.pack.as_ref() else {
            return input.to_string();
        };
        if let Some(cached) = state.cache.get(input) {
            return cached;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.translate(&state, pack, input)));
        let output = outcome.unwrap_or_else(|payload| {
            error!(
                input,
                reason = %panic_message(payload.as_ref()),
                "Translation failed, keeping source text"
            );
            input.to_string()
        });
        state.cache.publish(input, output)
    }

    fn translate(&self, state: &LanguageState, pack: &LanguagePack, input: &str) -> String {
        let resolver = Resolver::new(pack.dictionary(), self.host.as_ref());

        if let Some(verse) = translate_verse(&resolver, pack, input) {
            debug!(input, "Translated as verse");
            return verse;
        }

        let units = segment::parse(input);
        let template = Template::build(input, &units);
        let translated: Vec<String> = units
            .iter()
            .map(|unit| self.translate_unit(state, &resolver, unit))
            .collect();

        let output = template.apply(&translated);
        let changed = units.iter().zip(&translated).any(|(unit, text)| unit != text);
        if output == input && changed {
            debug!(input, "Template kept no unit, using bare translations");
            return match translated.as_slice() {
                [single] => single.clone(),
                _ => translated.join("\n"),
            };
        }
        output
    }

    fn translate_unit(&self, state: &LanguageState, resolver: &Resolver<'_>, unit: &str) -> String {
        if let Some(resolution) = resolver.resolve(unit) {
            debug!(unit, tier = ?resolution.tier, "Resolved unit");
            return resolution.text;
        }
        if state.missing.record(unit) {
            warn!(key = unit, "Missing translation");
            self.host.report_missing_key(unit);
        }
        unit.to_string()
    }
}

/// Translate a four-line stanza line by line through exact lookups.
///
/// Returns `None` unless the text has exactly four lines with letters and at
/// least one of them is in the dictionary.
fn translate_verse(resolver: &Resolver<'_>, pack: &LanguagePack, input: &str) -> Option<String> {
    if !input.contains('\n') {
        return None;
    }
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().any(char::is_alphabetic))
        .collect();
    if lines.len() != VERSE_LINES {
        return None;
    }

    let mut hit = false;
    let translated: Vec<String> = lines
        .iter()
        .map(|line| match pack.dictionary().get(line) {
            Some(text) => {
                hit = true;
                resolver.apply_gender(text)
            }
            None => line.to_string(),
        })
        .collect();
    hit.then(|| translated.join("\n"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::load_dictionary;
    use crate::mock::{MockHost, MockMode};
    use crate::pack::PackInfo;
    use std::thread;

    fn german_pack() -> LanguagePack {
        LanguagePack::new(
            PackInfo::new("de", "Deutsch"),
            load_dictionary([
                ("Open Door", "Öffne Tür"),
                ("Line one Line two", "Zeile eins Zeile zwei"),
                ("Hello {PLAYER}.", "Hallo {PLAYER}."),
                ("Bye {PLAYER}.", "Tschüss {PLAYER}."),
                ("Roses are red,", "Rosen sind rot,"),
                ("Sugar is sweet,", "Zucker ist süß,"),
            ]),
        )
    }

    fn service_with(host: Arc<MockHost>) -> TranslationService {
        let service = TranslationService::new(host);
        service.activate(german_pack());
        service
    }

    // ========== Activation Tests ==========

    #[test]
    fn test_no_language_passes_through() {
        let host = Arc::new(MockHost::new());
        let service = TranslationService::new(host.clone());
        assert_eq!(service.active_language(), None);
        assert_eq!(service.process("Open Door"), "Open Door");
        assert_eq!(service.process("Unknown line."), "Unknown line.");
        assert_eq!(service.cached_len(), 0);
        assert!(host.reported_keys().is_empty());
    }

    #[test]
    fn test_source_language_pack_deactivates() {
        let service = service_with(Arc::new(MockHost::new()));
        assert_eq!(service.active_language().as_deref(), Some("de"));
        service.activate(LanguagePack::new(
            PackInfo::new("en", "English"),
            load_dictionary([("Open Door", "Open the door")]),
        ));
        assert_eq!(service.active_language(), None);
        assert_eq!(service.process("Open Door"), "Open Door");
    }

    #[test]
    fn test_switching_language_clears_state() {
        let service = service_with(Arc::new(MockHost::new()));
        assert_eq!(service.process("Open Door"), "Öffne Tür");
        service.process("Unknown line.");
        assert_eq!(service.missing_keys(), vec!["Unknown line."]);

        service.activate(LanguagePack::new(
            PackInfo::new("fr", "Français"),
            load_dictionary([("Open Door", "Ouvrir la porte")]),
        ));
        assert_eq!(service.cached_len(), 0);
        assert!(service.missing_keys().is_empty());
        assert_eq!(service.process("Open Door"), "Ouvrir la porte");
    }

    // ========== Pipeline Tests ==========

    #[test]
    fn test_empty_input() {
        let service = service_with(Arc::new(MockHost::new()));
        assert_eq!(service.process(""), "");
        assert_eq!(service.cached_len(), 0);
    }

    #[test]
    fn test_result_is_cached() {
        let service = service_with(Arc::new(MockHost::new()));
        assert_eq!(service.process("Open Door"), "Öffne Tür");
        assert_eq!(service.cached_len(), 1);
        assert_eq!(service.process("Open Door"), "Öffne Tür");
        assert_eq!(service.cached_len(), 1);
    }

    #[test]
    fn test_single_unit_template_fallback() {
        let service = service_with(Arc::new(MockHost::new()));
        assert_eq!(service.process("Line one\nLine two"), "Zeile eins Zeile zwei");
    }

    #[test]
    fn test_multi_unit_template_fallback_joins_lines() {
        let service = service_with(Arc::new(MockHost::new()));
        assert_eq!(
            service.process("Hello {getName}. Bye {getName}."),
            "Hallo {PLAYER}.\nTschüss {PLAYER}."
        );
    }

    #[test]
    fn test_verse_translates_line_by_line() {
        let host = Arc::new(MockHost::new());
        let service = service_with(host.clone());
        let verse = "Roses are red,\nViolets are blue,\nSugar is sweet,\nAnd so are you.";
        assert_eq!(
            service.process(verse),
            "Rosen sind rot,\nViolets are blue,\nZucker ist süß,\nAnd so are you."
        );
        assert!(host.reported_keys().is_empty());
    }

    #[test]
    fn test_verse_without_hits_runs_full_pipeline() {
        let host = Arc::new(MockHost::new());
        let service = service_with(host.clone());
        let text = "Roses are blue.\nGrass is red.\nWater is dry.\nGo now. Open Door";
        let expected = "Roses are blue.\nGrass is red.\nWater is dry.\nGo now. Öffne Tür";
        assert_eq!(service.process(text), expected);
        service.process(text);
        assert_eq!(
            host.reported_keys(),
            vec!["Roses are blue.", "Grass is red.", "Water is dry.", "Go now."]
        );
    }

    #[test]
    fn test_five_lines_are_not_a_verse() {
        let host = Arc::new(MockHost::new());
        let service = service_with(host.clone());
        let text = "Roses are red,\nViolets are blue,\nSugar is sweet,\nAnd so are you,\nThe end.";
        assert_eq!(service.process(text), text);
        assert_eq!(
            host.reported_keys(),
            vec!["Roses are red, Violets are blue, Sugar is sweet, And so are you, The end."]
        );
    }

    #[test]
    fn test_missing_key_reported_once() {
        let host = Arc::new(MockHost::new());
        let service = service_with(host.clone());
        assert_eq!(service.process("Unknown line."), "Unknown line.");
        assert_eq!(service.process("Unknown line. Open Door"), "Unknown line. Öffne Tür");
        assert_eq!(host.reported_keys(), vec!["Unknown line."]);
        assert_eq!(service.missing_keys(), vec!["Unknown line."]);
    }

    // ========== Failure Tests ==========

    #[test]
    fn test_fault_returns_and_caches_input() {
        let host = Arc::new(MockHost::with_mode(MockMode::Faulty));
        let service = service_with(host.clone());
        assert_eq!(service.process("Unknown line."), "Unknown line.");
        assert_eq!(service.cached_len(), 1);
        assert_eq!(service.process("Unknown line."), "Unknown line.");
        assert!(host.reported_keys().is_empty());
    }

    #[test]
    fn test_exact_hits_never_query_the_host() {
        let host = Arc::new(MockHost::with_mode(MockMode::Faulty));
        let service = service_with(host);
        assert_eq!(service.process("Open Door"), "Öffne Tür");
    }

    // ========== Concurrency Tests ==========

    #[test]
    fn test_concurrent_calls_report_once() {
        let host = Arc::new(MockHost::new());
        let service = Arc::new(service_with(host.clone()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                thread::spawn(move || service.process("Unknown line."))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread panicked"), "Unknown line.");
        }
        assert_eq!(host.reported_keys(), vec!["Unknown line."]);
    }
}
