//! Response sanitizer.
//!
//! Assistant replies arrive with an inline citation wrapped in
//! `[REF]...[/REF]` markers plus whatever citation artifacts the
//! provider's file-search tooling injects. This module splits a raw
//! reply into displayable text and an optional structured reference.

use once_cell::sync::Lazy;
use regex::Regex;

pub const REF_OPEN: &str = "[REF]";
pub const REF_CLOSE: &str = "[/REF]";

/// Provider citation glyphs, e.g. `【4:0†source】`.
static BRACKETED_CITATION: Lazy<Regex> = Lazy::new(|| Regex::new("【[^】]*】").unwrap());

/// Provider file citations, e.g. `[12:3†contract.pdf]`.
static FILE_CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+:\d+†[^\]]*\]").unwrap());

/// An assistant reply split into displayable text and its citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedResponse {
    pub content: String,
    pub reference: Option<String>,
}

/// Extract the first `[REF]...[/REF]` annotation and strip provider
/// citation artifacts from the remaining text.
///
/// Total on every input: text with no markers passes through trimmed,
/// and unmatched markers are left in place as ordinary content.
pub fn sanitize(raw: &str) -> SanitizedResponse {
    let (without_reference, reference) = extract_reference(raw);
    let content = strip_citation_artifacts(&without_reference)
        .trim()
        .to_string();
    SanitizedResponse { content, reference }
}

fn extract_reference(raw: &str) -> (String, Option<String>) {
    let Some(open) = raw.find(REF_OPEN) else {
        return (raw.to_string(), None);
    };
    let interior_start = open + REF_OPEN.len();
    let Some(close_offset) = raw[interior_start..].find(REF_CLOSE) else {
        // Unpaired marker stays in the content untouched.
        return (raw.to_string(), None);
    };
    let close = interior_start + close_offset;

    let reference = raw[interior_start..close].trim();
    let mut remainder = String::with_capacity(raw.len());
    remainder.push_str(&raw[..open]);
    remainder.push_str(&raw[close + REF_CLOSE.len()..]);

    let reference = (!reference.is_empty()).then(|| reference.to_string());
    (remainder, reference)
}

fn strip_citation_artifacts(text: &str) -> String {
    let text = BRACKETED_CITATION.replace_all(text, "");
    FILE_CITATION.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_extraction() {
        let out = sanitize("A [REF]Section 3.1, Page 4: quoted text[/REF] B");
        assert_eq!(out.content, "A  B");
        assert_eq!(
            out.reference.as_deref(),
            Some("Section 3.1, Page 4: quoted text")
        );
    }

    #[test]
    fn test_plain_text_round_trips_trimmed() {
        let out = sanitize("  Reserve guarantees are covered in Section 25.\n");
        assert_eq!(out.content, "Reserve guarantees are covered in Section 25.");
        assert_eq!(out.reference, None);
    }

    #[test]
    fn test_unpaired_marker_is_kept_as_content() {
        let out = sanitize("See [REF]Section 9 for details");
        assert_eq!(out.content, "See [REF]Section 9 for details");
        assert_eq!(out.reference, None);
    }

    #[test]
    fn test_empty_annotation_yields_no_reference() {
        let out = sanitize("Answer text [REF]  [/REF] continues");
        assert_eq!(out.content, "Answer text  continues");
        assert_eq!(out.reference, None);
    }

    #[test]
    fn test_only_first_annotation_is_extracted() {
        let out = sanitize("[REF]first[/REF] middle [REF]second[/REF]");
        assert_eq!(out.reference.as_deref(), Some("first"));
        assert_eq!(out.content, "middle [REF]second[/REF]");
    }

    #[test]
    fn test_provider_citation_glyphs_are_stripped() {
        let out = sanitize("Overtime rates are in Section 12.4【4:0†source】.");
        assert_eq!(out.content, "Overtime rates are in Section 12.4.");
    }

    #[test]
    fn test_file_citations_are_stripped() {
        let out = sanitize("Vacation accrual is 3.5 hours[12:3†contract.pdf] per trip.");
        assert_eq!(out.content, "Vacation accrual is 3.5 hours per trip.");
        // Plain bracketed text that is not a file citation survives.
        let kept = sanitize("Bid [priority] rules apply.");
        assert_eq!(kept.content, "Bid [priority] rules apply.");
    }

    #[test]
    fn test_artifacts_inside_and_around_reference() {
        let out = sanitize(
            "Per diem is $2.65/hour【7:1†source】. [REF]Section 4.2, Page 18: Per diem rate[/REF]",
        );
        assert_eq!(out.content, "Per diem is $2.65/hour.");
        assert_eq!(out.reference.as_deref(), Some("Section 4.2, Page 18: Per diem rate"));
    }

    #[test]
    fn test_empty_input() {
        let out = sanitize("");
        assert_eq!(out.content, "");
        assert_eq!(out.reference, None);
    }
}
