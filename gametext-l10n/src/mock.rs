//! Mock game host for testing
//!
//! A deterministic, engine-free host: fixed player details, an in-memory list
//! of reported missing keys, and an optional fault mode for exercising the
//! service's failure handling.
//!
//! # Example
//!
//! ```ignore
//! use gametext_l10n::{MockHost, PlayerGender};
//!
//! let host = MockHost::new()
//!     .with_player_name("Björn")
//!     .with_gender(PlayerGender::Female);
//! host.report_missing_key("Unknown line.");
//! assert_eq!(host.reported_keys(), vec!["Unknown line."]);
//! ```

use crate::host::{GameHost, PlayerGender};
use std::sync::{Mutex, PoisonError};

/// How the mock behaves when queried about the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockMode {
    /// Answer with the configured player details
    #[default]
    Normal,

    /// Panic on every player query, simulating a broken engine binding
    Faulty,
}

/// Mock host that records every missing-key report
#[derive(Debug, Default)]
pub struct MockHost {
    mode: MockMode,
    player_name: Option<String>,
    gender: Option<PlayerGender>,
    reported: Mutex<Vec<String>>,
}

impl MockHost {
    /// Host with no player name, unknown gender and normal behaviour
    pub fn new() -> Self {
        MockHost::default()
    }

    pub fn with_mode(mode: MockMode) -> Self {
        MockHost {
            mode,
            ..MockHost::default()
        }
    }

    pub fn with_player_name(mut self, name: &str) -> Self {
        self.player_name = Some(name.to_string());
        self
    }

    pub fn with_gender(mut self, gender: PlayerGender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Keys reported so far, in report order
    pub fn reported_keys(&self) -> Vec<String> {
        self.reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_fault(&self) {
        if self.mode == MockMode::Faulty {
            panic!("mock host fault");
        }
    }
}

impl GameHost for MockHost {
    fn player_name(&self) -> Option<String> {
        self.check_fault();
        self.player_name.clone()
    }

    fn player_gender(&self) -> Option<PlayerGender> {
        self.check_fault();
        self.gender
    }

    fn report_missing_key(&self, key: &str) {
        self.reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let host = MockHost::new();
        assert_eq!(host.player_name(), None);
        assert_eq!(host.player_gender(), None);
        assert!(host.reported_keys().is_empty());
    }

    #[test]
    fn test_builder() {
        let host = MockHost::new()
            .with_player_name("Björn")
            .with_gender(PlayerGender::Female);
        assert_eq!(host.player_name().as_deref(), Some("Björn"));
        assert_eq!(host.player_gender(), Some(PlayerGender::Female));
    }

    #[test]
    fn test_reports_are_recorded_in_order() {
        let host = MockHost::new();
        host.report_missing_key("b");
        host.report_missing_key("a");
        assert_eq!(host.reported_keys(), vec!["b", "a"]);
    }

    #[test]
    #[should_panic(expected = "mock host fault")]
    fn test_faulty_mode_panics() {
        let host = MockHost::with_mode(MockMode::Faulty);
        host.player_name();
    }
}
