//! Numbered question lists, e.g. the output of question generation:
//!
//! ```text
//! Here are your questions:
//! 1. Tell me about a system you scaled.
//!    Follow-up: what broke first?
//! 2. How do you review code?
//! ```

use regex::Regex;

use crate::extraction::models::NumberedBlock;

lazy_static::lazy_static! {
    static ref ORDINAL_MARKER_RE: Regex = Regex::new(r"([0-9]+)\. ").unwrap();
}

/// Splits `raw` into blocks that each start at a `<digits>. ` marker and run up
/// to the next marker or the end of input. Text before the first marker is
/// dropped. Blocks keep source order; labels are not sorted or deduplicated.
///
/// Any `<digits>. ` inside a sentence ("joined in 2019. Then...") also starts a
/// new block.
pub fn extract_numbered_blocks(raw: &str) -> Vec<NumberedBlock> {
    let markers: Vec<(usize, Option<u64>)> = ORDINAL_MARKER_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), caps[1].parse::<u64>().ok()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, &(start, ordinal))| {
            let end = markers.get(i + 1).map(|&(next, _)| next).unwrap_or(raw.len());
            NumberedBlock {
                ordinal,
                text: raw[start..end].trim().to_string(),
            }
        })
        .collect()
}
