//! Language pack loading from dictionary files on disk

use gametext_l10n::{Delimiter, LanguagePack, PackInfo, load_dictionary, parse_dictionary_source};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read language pack metadata from a JSON file
pub fn load_pack_info(path: &Path) -> Result<PackInfo, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read pack info '{}': {}", path.display(), e))?;
    let info = PackInfo::from_json(&content)
        .map_err(|e| format!("Failed to parse pack info '{}': {}", path.display(), e))?;
    Ok(info)
}

/// Load every dictionary file into one language pack
///
/// Files are read in sorted path order so that, for a key present in more
/// than one file, the winner does not depend on the order given on the
/// command line.
///
/// # Arguments
/// * `info` - Metadata of the pack being built
/// * `paths` - Dictionary source files
/// * `delimiter` - Column separator, or `Delimiter::Auto` per file
///
/// # Errors
/// - File read errors
/// - Unterminated quoted fields
pub fn load_pack(
    info: PackInfo,
    paths: &[PathBuf],
    delimiter: Delimiter,
) -> Result<LanguagePack, Box<dyn Error>> {
    let mut sorted = paths.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut rows = Vec::new();
    for path in &sorted {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read dictionary '{}': {}", path.display(), e))?;
        let parsed = parse_dictionary_source(&content, delimiter)
            .map_err(|e| format!("Failed to parse dictionary '{}': {}", path.display(), e))?;
        debug!(path = %path.display(), rows = parsed.len(), "Loaded dictionary file");
        rows.extend(parsed);
    }

    let dictionary = load_dictionary(rows);
    info!(
        language = %info.language_code,
        files = sorted.len(),
        entries = dictionary.len(),
        "Loaded language pack"
    );
    Ok(LanguagePack::new(info, dictionary))
}
