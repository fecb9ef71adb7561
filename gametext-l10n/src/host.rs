//! Game host collaborator
//!
//! This module defines the `GameHost` trait through which the translation
//! core asks the running game about the player and hands back keys it could
//! not translate, without coupling the library to any particular engine.
//!
//! # Example
//!
//! ```ignore
//! use gametext_l10n::{GameHost, PlayerGender, TranslationService};
//!
//! struct Engine;
//!
//! impl GameHost for Engine {
//!     fn player_name(&self) -> Option<String> {
//!         Some("Björn".to_string())
//!     }
//!     fn player_gender(&self) -> Option<PlayerGender> {
//!         Some(PlayerGender::Male)
//!     }
//!     fn report_missing_key(&self, key: &str) {
//!         eprintln!("untranslated: {key}");
//!     }
//! }
//!
//! let service = TranslationService::new(Arc::new(Engine));
//! ```

use crate::error::{L10nError, L10nResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player gender as far as gendered text directives are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerGender {
    Male,
    Female,
}

impl fmt::Display for PlayerGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerGender::Male => write!(f, "male"),
            PlayerGender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for PlayerGender {
    type Err = L10nError;

    fn from_str(s: &str) -> L10nResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(PlayerGender::Male),
            "female" | "f" => Ok(PlayerGender::Female),
            _ => Err(L10nError::UnknownGender(s.to_string())),
        }
    }
}

/// Queries and notifications the translation core needs from the game
///
/// Implementations must be cheap to call: `player_name` and `player_gender`
/// are consulted during resolution, possibly from several threads at once.
pub trait GameHost: Send + Sync {
    /// Current player name, if a player exists yet
    fn player_name(&self) -> Option<String>;

    /// Current player gender; `None` selects the male branch of gendered text
    fn player_gender(&self) -> Option<PlayerGender>;

    /// Called once per untranslated key per active language
    ///
    /// Persisting the key (for example to a needs-translation ledger) is the
    /// host's business; failures must not propagate back into translation.
    fn report_missing_key(&self, key: &str);
}

/// Host with no player and nowhere to report missing keys
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl GameHost for DetachedHost {
    fn player_name(&self) -> Option<String> {
        None
    }

    fn player_gender(&self) -> Option<PlayerGender> {
        None
    }

    fn report_missing_key(&self, _key: &str) {}
}
