//! Conditional block expansion
//!
//! Game text embeds branches of the form
//! `#IF(condition)#THEN(then text)#ELSE(else text)#END`. The condition is an
//! opaque game expression that cannot be evaluated here, so every branch is
//! produced as its own literal variant.
//!
//! # Algorithm Overview
//!
//! 1. **Find** the leftmost well-formed block (keywords are case-insensitive)
//! 2. **Substitute** the THEN body, and the ELSE body when it is non-empty,
//!    into the surrounding text
//! 3. **Recurse** on each substituted string until no block remains
//!
//! Branch bodies come in two shapes. A parenthesised body is matched with
//! balanced parentheses, which lets blocks nest. A raw body runs up to the
//! next `#ELSE`/`#END` at the same nesting depth.
//!
//! # Example
//!
//! ```ignore
//! // Input: "Hello, traveler! #IF(x)#THEN(Welcome home.)#ELSE(Who are you?)#END"
//! // Output:
//! // [
//! //   "Hello, traveler! Welcome home.",
//! //   "Hello, traveler! Who are you?",
//! // ]
//! ```

use tracing::debug;

const IF: &str = "#IF";
const THEN: &str = "#THEN";
const ELSE: &str = "#ELSE";
const END: &str = "#END";

/// Quote pairs that may wrap an entire branch body
const QUOTE_PAIRS: [(char, char); 3] = [('"', '"'), ('“', '”'), ('«', '»')];

/// A located conditional block, borrowed from the text it was found in
#[derive(Debug, Clone, PartialEq)]
struct Block<'a> {
    /// Byte offset of `#IF`
    start: usize,
    /// Byte offset just past `#END`
    end: usize,
    then_branch: &'a str,
    else_branch: Option<&'a str>,
}

/// Expand every conditional block into the list of literal variants.
///
/// Variants come out depth-first with THEN before ELSE, so two sequential
/// blocks yield their cross-product. Each variant is trimmed. Text without a
/// well-formed block is returned as its single variant.
///
/// # Arguments
/// * `text` - Raw game text, possibly containing `#IF ... #END` blocks
///
/// # Returns
/// All branch combinations as plain strings
pub fn expand(text: &str) -> Vec<String> {
    let mut variants = Vec::new();
    expand_into(text, &mut variants);
    variants
}

fn expand_into(text: &str, variants: &mut Vec<String>) {
    let Some(block) = find_block(text) else {
        variants.push(text.trim().to_string());
        return;
    };

    let prefix = &text[..block.start];
    let suffix = &text[block.end..];
    expand_into(&format!("{prefix}{}{suffix}", block.then_branch), variants);
    if let Some(else_branch) = block.else_branch.filter(|body| !body.trim().is_empty()) {
        expand_into(&format!("{prefix}{else_branch}{suffix}"), variants);
    }
}

/// Find the leftmost `#IF` that starts a well-formed block.
fn find_block(text: &str) -> Option<Block<'_>> {
    // ASCII uppercasing keeps byte offsets identical to `text`
    let upper = text.to_ascii_uppercase();
    let mut from = 0;
    while let Some(offset) = upper[from..].find(IF) {
        let start = from + offset;
        if let Some(block) = parse_block(text, &upper, start) {
            return Some(block);
        }
        debug!(offset = start, "Ignoring malformed conditional block");
        from = start + IF.len();
    }
    None
}

fn parse_block<'a>(text: &'a str, upper: &str, start: usize) -> Option<Block<'a>> {
    let mut i = skip_whitespace(text, start + IF.len());
    if !text[i..].starts_with('(') {
        return None;
    }
    let condition_end = matching_paren(text, i)?;

    i = skip_whitespace(text, condition_end + 1);
    if !upper[i..].starts_with(THEN) {
        return None;
    }
    i = skip_whitespace(text, i + THEN.len());
    let (then_branch, next) = parse_branch(text, upper, i, true)?;

    i = skip_whitespace(text, next);
    let else_branch = if upper[i..].starts_with(ELSE) {
        let body_start = skip_whitespace(text, i + ELSE.len());
        let (body, next) = parse_branch(text, upper, body_start, false)?;
        i = skip_whitespace(text, next);
        Some(strip_outer_quotes(body))
    } else {
        None
    };

    if !upper[i..].starts_with(END) {
        return None;
    }

    Some(Block {
        start,
        end: i + END.len(),
        then_branch: strip_outer_quotes(then_branch),
        else_branch,
    })
}

/// Parse one branch body starting at `i`, returning the body and the offset
/// just past it.
fn parse_branch<'a>(
    text: &'a str,
    upper: &str,
    i: usize,
    stop_at_else: bool,
) -> Option<(&'a str, usize)> {
    if text[i..].starts_with('(') {
        // Unbalanced parentheses mean this is not a block at all
        let close = matching_paren(text, i)?;
        let after = skip_whitespace(text, close + 1);
        let closes_branch = upper[after..].starts_with(END)
            || (stop_at_else && upper[after..].starts_with(ELSE));
        if closes_branch {
            return Some((&text[i + 1..close], close + 1));
        }
    }
    let stop = raw_branch_end(upper, i, stop_at_else)?;
    let body = text[i..stop].trim_end();
    if body.is_empty() {
        return None;
    }
    Some((body, stop))
}

/// Offset of the `#ELSE`/`#END` that terminates a raw branch body, skipping
/// over nested blocks.
fn raw_branch_end(upper: &str, from: usize, stop_at_else: bool) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;
    while let Some(offset) = upper[i..].find('#') {
        let at = i + offset;
        let rest = &upper[at..];
        if rest.starts_with(IF) {
            depth += 1;
            i = at + IF.len();
        } else if rest.starts_with(END) {
            if depth == 0 {
                return Some(at);
            }
            depth -= 1;
            i = at + END.len();
        } else if rest.starts_with(ELSE) && depth == 0 && stop_at_else {
            return Some(at);
        } else {
            i = at + 1;
        }
    }
    None
}

/// Index of the `)` closing the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in text.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(text.len(), |(offset, _)| from + offset)
}

/// Remove one pair of quotes wrapping the whole body, provided neither quote
/// character appears inside it.
fn strip_outer_quotes(body: &str) -> &str {
    let mut chars = body.trim().chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return body;
    };
    let Some(&(open, close)) = QUOTE_PAIRS.iter().find(|(open, _)| *open == first) else {
        return body;
    };
    let inner = chars.as_str();
    if last != close || inner.contains(open) || inner.contains(close) {
        return body;
    }
    inner.trim()
}
