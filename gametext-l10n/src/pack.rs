//! Language packs: a dictionary plus the metadata describing its language.

use crate::dictionary::Dictionary;
use crate::error::L10nResult;
use serde::{Deserialize, Serialize};

/// Code of the language game text is authored in; a pack for it translates nothing
pub const SOURCE_LANGUAGE: &str = "en";

/// Language pack metadata as shipped next to the dictionary files
///
/// ```json
/// { "LanguageCode": "de", "Name": "Deutsch", "Description": "German", "Version": "1.0" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackInfo {
    pub language_code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackInfo {
    pub fn new(language_code: &str, name: &str) -> Self {
        PackInfo {
            language_code: language_code.to_string(),
            name: name.to_string(),
            description: None,
            version: None,
        }
    }

    pub fn from_json(json: &str) -> L10nResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// True for the authoring language, which needs no translation.
    pub fn is_source_language(&self) -> bool {
        self.language_code.eq_ignore_ascii_case(SOURCE_LANGUAGE)
    }
}

/// A loaded, immutable language pack
#[derive(Debug, Clone)]
pub struct LanguagePack {
    info: PackInfo,
    dictionary: Dictionary,
}

impl LanguagePack {
    pub fn new(info: PackInfo, dictionary: Dictionary) -> Self {
        LanguagePack { info, dictionary }
    }

    pub fn info(&self) -> &PackInfo {
        &self.info
    }

    pub fn code(&self) -> &str {
        &self.info.language_code
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }
}
