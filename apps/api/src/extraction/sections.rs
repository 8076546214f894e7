//! Section parsing for match-score analysis text.
//!
//! The generator loosely follows this shape:
//!
//! ```text
//! Match Score: 75%
//!
//! ### Skill Match:
//! - Rust
//! - Distributed systems
//!
//! ### Gaps or Missing Elements:
//! Little cloud experience. No on-call history.
//! ```
//!
//! Nothing here returns an error. Missing structure yields an empty result.

use regex::Regex;

use crate::extraction::models::{
    BreakdownSection, ExtractedSection, MatchAnalysis, MatchPercentage,
};

pub const SKILL_MATCH_HEADER: &str = "Skill Match:";
pub const GAPS_HEADER: &str = "Gaps or Missing Elements:";
/// Headers pulled into `MatchAnalysis::sections` when the caller names none.
pub const DEFAULT_SECTION_HEADERS: &[&str] = &[SKILL_MATCH_HEADER, GAPS_HEADER];

/// Header given to the text that precedes the first `###` section.
pub const PREAMBLE_HEADER: &str = "Match Score:";

const SECTION_MARKER: &str = "###";
const BREAKDOWN_DELIMITER: &str = "\n\n### ";
const BULLET_PREFIX: &str = "- ";
const SENTENCE_DELIMITER: &str = ". ";

lazy_static::lazy_static! {
    static ref MATCH_SCORE_RE: Regex = Regex::new(r"Match Score:\s*([0-9]+)%").unwrap();
}

/// Returns the percentage from the first `Match Score: NN%` line, or 0.
pub fn extract_match_score(raw: &str) -> MatchPercentage {
    MATCH_SCORE_RE
        .captures(raw)
        .map(|caps| caps[1].parse::<u64>().unwrap_or(u64::MAX))
        .map(|score| score.min(100) as MatchPercentage)
        .unwrap_or(0)
}

/// Returns the `- ` bullets under `### {header_label}`, up to the next `###`.
pub fn extract_section(raw: &str, header_label: &str) -> Vec<String> {
    let marker = format!("{SECTION_MARKER} {header_label}");
    let Some((_, after)) = raw.split_once(marker.as_str()) else {
        return Vec::new();
    };

    let body = match after.find(SECTION_MARKER) {
        Some(end) => &after[..end],
        None => after,
    };

    strip_bullets(body)
}

/// Splits prose into sentence-like items on `". "`.
///
/// Decimals and abbreviations followed by a space ("approx. 3 years") are split
/// as well. That matches what the UI has always shown, so it stays.
pub fn segment_freeform(section_body: &str) -> Vec<String> {
    section_body
        .split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with('.') {
                s.to_string()
            } else {
                format!("{s}.")
            }
        })
        .collect()
}

/// Splits analysis text into display sections in source order.
///
/// The text before the first section becomes a `Match Score:` section holding
/// its first line. Section bodies that start with `- ` are read as bullets,
/// anything else as prose.
pub fn render_detailed_breakdown(raw: &str) -> Vec<BreakdownSection> {
    let mut chunks = raw.split(BREAKDOWN_DELIMITER);
    let mut sections = Vec::new();

    if let Some(preamble) = chunks.next() {
        let first_line = preamble.lines().next().unwrap_or("").trim();
        sections.push(BreakdownSection {
            header: PREAMBLE_HEADER.to_string(),
            bullets: if first_line.is_empty() {
                Vec::new()
            } else {
                vec![first_line.to_string()]
            },
        });
    }

    for chunk in chunks {
        let (header_line, body) = chunk.split_once('\n').unwrap_or((chunk, ""));
        let header = header_line
            .strip_prefix("### ")
            .unwrap_or(header_line)
            .trim()
            .to_string();

        sections.push(BreakdownSection {
            header,
            bullets: body_items(body),
        });
    }

    sections
}

/// Full match-score view: score, the requested sections and the breakdown.
pub fn analyze_match(raw: &str, headers: &[&str]) -> MatchAnalysis {
    MatchAnalysis {
        match_score: extract_match_score(raw),
        sections: headers
            .iter()
            .map(|header| ExtractedSection {
                header: header.to_string(),
                items: extract_section(raw, header),
            })
            .collect(),
        breakdown: render_detailed_breakdown(raw),
    }
}

/// Bullet-strips or sentence-segments a section body.
pub(crate) fn body_items(body: &str) -> Vec<String> {
    let body = body.trim();
    if body.starts_with(BULLET_PREFIX) {
        strip_bullets(body)
    } else {
        segment_freeform(body)
    }
}

fn strip_bullets(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.trim().strip_prefix(BULLET_PREFIX))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ANALYSIS: &str = "Match Score: 75%\n\n\
        ### Skill Match:\n\
        - Rust\n\
        -   Tokio  \n\
        - PostgreSQL\n\n\
        ### Gaps or Missing Elements:\n\
        - Kubernetes\n\
        - On-call experience\n";

    const PROSE_ANALYSIS: &str = "Match Score: 60%\nSolid overall.\n\n\
        ### Gaps or Missing Elements:\n\
        Little cloud exposure. No formal leadership experience. Has 3.5 years of Go.";

    #[test]
    fn test_match_score_found() {
        assert_eq!(extract_match_score("Match Score: 75%\n..."), 75);
    }

    #[test]
    fn test_match_score_absent() {
        assert_eq!(extract_match_score("no score here"), 0);
    }

    #[test]
    fn test_match_score_no_whitespace_and_mid_text() {
        assert_eq!(extract_match_score("Overall -> Match Score:88% (good)"), 88);
    }

    #[test]
    fn test_match_score_is_case_sensitive() {
        assert_eq!(extract_match_score("match score: 75%"), 0);
    }

    #[test]
    fn test_match_score_requires_percent_sign() {
        assert_eq!(extract_match_score("Match Score: 75"), 0);
    }

    #[test]
    fn test_match_score_clamped_to_hundred() {
        assert_eq!(extract_match_score("Match Score: 140%"), 100);
        assert_eq!(extract_match_score("Match Score: 99999999999999999999999%"), 100);
    }

    #[test]
    fn test_match_score_ignores_non_ascii_digits() {
        assert_eq!(extract_match_score("Match Score: \u{0663}%\nMatch Score: 75%"), 75);
        assert_eq!(extract_match_score("Match Score: \u{0667}\u{0665}%"), 0);
    }

    #[test]
    fn test_extract_section_three_bullets_in_order() {
        let items = extract_section(FULL_ANALYSIS, SKILL_MATCH_HEADER);
        assert_eq!(items, vec!["Rust", "Tokio", "PostgreSQL"]);
    }

    #[test]
    fn test_extract_section_stops_at_next_header() {
        let items = extract_section(FULL_ANALYSIS, GAPS_HEADER);
        assert_eq!(items, vec!["Kubernetes", "On-call experience"]);
    }

    #[test]
    fn test_extract_section_missing_header_is_empty() {
        assert!(extract_section(FULL_ANALYSIS, "Experience Match:").is_empty());
        assert!(extract_section("", SKILL_MATCH_HEADER).is_empty());
    }

    #[test]
    fn test_extract_section_header_without_bullets_is_empty() {
        let raw = "### Skill Match:\nNothing relevant was found.\n### Other:\n- x";
        assert!(extract_section(raw, SKILL_MATCH_HEADER).is_empty());
    }

    #[test]
    fn test_extract_section_skips_blank_bullets() {
        let raw = "### Skill Match:\n- \n-    \n- Go\n-nospace\n";
        assert_eq!(extract_section(raw, SKILL_MATCH_HEADER), vec!["Go"]);
    }

    #[test]
    fn test_extract_section_uses_first_occurrence() {
        let raw = "### Skill Match:\n- first\n### Skill Match:\n- second\n";
        assert_eq!(extract_section(raw, SKILL_MATCH_HEADER), vec!["first"]);
    }

    #[test]
    fn test_segment_freeform_appends_periods() {
        let items = segment_freeform("Strong Rust skills. Limited cloud work. Good communicator");
        assert_eq!(
            items,
            vec![
                "Strong Rust skills.",
                "Limited cloud work.",
                "Good communicator."
            ]
        );
    }

    #[test]
    fn test_segment_freeform_drops_empty_entries() {
        assert_eq!(segment_freeform("One. .  . Two."), vec!["One.", "Two."]);
        assert!(segment_freeform("   ").is_empty());
    }

    #[test]
    fn test_segment_freeform_splits_abbreviations() {
        let items = segment_freeform("Worked approx. 3 years at Acme.");
        assert_eq!(items, vec!["Worked approx.", "3 years at Acme."]);
    }

    #[test]
    fn test_segment_freeform_keeps_decimals_without_space() {
        assert_eq!(segment_freeform("Has 3.5 years of Go."), vec!["Has 3.5 years of Go."]);
    }

    #[test]
    fn test_breakdown_sections_in_source_order() {
        let sections = render_detailed_breakdown(FULL_ANALYSIS);
        let headers: Vec<&str> = sections.iter().map(|s| s.header.as_str()).collect();
        assert_eq!(headers, vec![PREAMBLE_HEADER, SKILL_MATCH_HEADER, GAPS_HEADER]);
        assert_eq!(sections[0].bullets, vec!["Match Score: 75%"]);
        assert_eq!(sections[1].bullets, vec!["Rust", "Tokio", "PostgreSQL"]);
    }

    #[test]
    fn test_breakdown_preamble_keeps_first_line_only() {
        let sections = render_detailed_breakdown(PROSE_ANALYSIS);
        assert_eq!(sections[0].bullets, vec!["Match Score: 60%"]);
    }

    #[test]
    fn test_breakdown_prose_body_is_segmented() {
        let sections = render_detailed_breakdown(PROSE_ANALYSIS);
        assert_eq!(sections[1].header, GAPS_HEADER);
        assert_eq!(
            sections[1].bullets,
            vec![
                "Little cloud exposure.",
                "No formal leadership experience.",
                "Has 3.5 years of Go."
            ]
        );
    }

    #[test]
    fn test_breakdown_empty_input_has_empty_preamble() {
        let sections = render_detailed_breakdown("");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].bullets.is_empty());
    }

    #[test]
    fn test_breakdown_header_with_no_body() {
        let sections = render_detailed_breakdown("Match Score: 10%\n\n### Skill Match:");
        assert_eq!(sections[1].header, SKILL_MATCH_HEADER);
        assert!(sections[1].bullets.is_empty());
    }

    #[test]
    fn test_breakdown_counts_match_section_extraction() {
        for section in render_detailed_breakdown(FULL_ANALYSIS).iter().skip(1) {
            let direct = extract_section(FULL_ANALYSIS, &section.header);
            assert_eq!(section.bullets.len(), direct.len(), "{}", section.header);
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(
            analyze_match(FULL_ANALYSIS, DEFAULT_SECTION_HEADERS),
            analyze_match(FULL_ANALYSIS, DEFAULT_SECTION_HEADERS)
        );
        assert_eq!(
            render_detailed_breakdown(PROSE_ANALYSIS),
            render_detailed_breakdown(PROSE_ANALYSIS)
        );
    }

    #[test]
    fn test_analyze_match_composes_all_parts() {
        let analysis = analyze_match(FULL_ANALYSIS, DEFAULT_SECTION_HEADERS);
        assert_eq!(analysis.match_score, 75);
        assert_eq!(analysis.sections.len(), 2);
        assert_eq!(analysis.sections[1].header, GAPS_HEADER);
        assert_eq!(analysis.sections[1].items.len(), 2);
        assert_eq!(analysis.breakdown.len(), 3);
    }
}
