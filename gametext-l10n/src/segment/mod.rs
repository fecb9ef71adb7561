//! Sentence segmentation for game text
//!
//! Turns one raw game string into the ordered list of translatable units.
//!
//! # Pipeline
//!
//! 1. **Normalize** - drop `;;` annotations, repair malformed conditional
//!    keywords, turn blank lines into paragraph markers
//! 2. **Expand** - produce every conditional branch variant
//!    (see [`crate::conditional`])
//! 3. **Split** - flatten line breaks, mask stat abbreviations and split at
//!    sentence boundaries
//! 4. **Refine** - clean each piece, split out HTML-like tags, `{...}`
//!    directives, `[...]` actions and title-like lists, then clean again
//!
//! # Example
//!
//! ```ignore
//! let units = segment::parse("<b>Warning</b> The gate is closed. [Leave]");
//! assert_eq!(units, vec!["Warning", "The gate is closed.", "Leave"]);
//! ```

pub mod boundary;
pub mod cleanup;
pub mod directives;
pub mod normalize;

use crate::conditional;
use cleanup::{clean_fragment, split_title_list};
use directives::{split_actions, split_directives, split_html};

/// Segment raw game text into translatable units.
///
/// Units come out in source order, variant by variant. Duplicates are kept
/// because the template builder needs one unit per occurrence.
pub fn parse(text: &str) -> Vec<String> {
    let text = normalize::strip_annotations(text);
    let text = normalize::pre_normalize(&text);
    conditional::expand(&text)
        .iter()
        .flat_map(|variant| split_into_units(variant))
        .collect()
}

/// Segment a single conditional-free variant.
pub fn split_into_units(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let flat = normalize::flatten_lines(text);
    let masked = normalize::mask_abbreviations(&flat);

    let mut units = Vec::new();
    for piece in boundary::split_sentences(&masked) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let cleaned = clean_fragment(piece);
        for tagless in split_html(&cleaned) {
            for resolved in split_directives(&tagless) {
                for part in split_actions(&resolved) {
                    for item in split_title_list(&clean_fragment(&part)) {
                        let unit = clean_fragment(&item);
                        if !unit.is_empty() {
                            units.push(unit);
                        }
                    }
                }
            }
        }
    }
    units
}
