//! Runtime localization for game text.
//!
//! Game strings arrive raw: conditional `#IF` blocks, engine directives,
//! HTML-like tags, stat abbreviations and the player's name all mixed into
//! prose. This crate segments such a string into independently translatable
//! units, resolves every unit against a language pack through a chain of
//! fallbacks, and puts the translations back where the units were.
//!
//! # Example
//!
//! ```ignore
//! use gametext_l10n::{DetachedHost, LanguagePack, PackInfo, TranslationService, load_dictionary};
//! use std::sync::Arc;
//!
//! let service = TranslationService::new(Arc::new(DetachedHost));
//! service.activate(LanguagePack::new(
//!     PackInfo::new("fr", "Français"),
//!     load_dictionary([
//!         ("Hello, traveler!", "Salut, voyageur!"),
//!         ("Welcome home.", "Bienvenue chez toi."),
//!     ]),
//! ));
//! assert_eq!(
//!     service.process("Hello, traveler! Welcome home."),
//!     "Salut, voyageur! Bienvenue chez toi."
//! );
//! ```

pub mod cache;
pub mod casing;
pub mod conditional;
pub mod dictionary;
pub mod error;
pub mod extract;
pub mod host;
pub mod ledger;
pub mod mock;
pub mod pack;
pub mod resolver;
pub mod segment;
pub mod service;
pub mod source;
pub mod template;


pub use conditional::expand;
pub use dictionary::{Dictionary, PatternRule, load_dictionary};
pub use error::{L10nError, L10nResult};
pub use extract::Worksheet;
pub use host::{DetachedHost, GameHost, PlayerGender};
pub use ledger::{escape_csv_value, ledger_line};
pub use mock::{MockHost, MockMode};
pub use pack::{LanguagePack, PackInfo};
pub use resolver::{Resolution, Resolver, Tier};
pub use segment::parse;
pub use service::TranslationService;
pub use source::{Delimiter, parse_dictionary_source};
pub use template::Template;
