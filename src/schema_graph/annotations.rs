//! Parsing of the annotation convention used in database comments.
//!
//! OMOP deployments store two free-text annotations inside a single
//! table/column comment: a general description, optionally prefixed with
//! `OMOP Comment : `, followed by a site-specific annotation introduced by
//! the marker `- APHP Annotation :`. This module recovers the two halves.

use serde::{Deserialize, Serialize};

/// Marker separating the general comment from the site annotation.
const APHP_MARKER: &str = "- APHP Annotation :";

/// Prefix stripped from the start of the general comment when present.
const OMOP_PREFIX: &str = "OMOP Comment : ";

/// The two annotation halves recovered from one raw comment.
///
/// Flattened into the serialized table/column records, so the wire names
/// are fixed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAnnotations {
    pub comment_omop: String,
    pub comment_aphp: String,
}

/// Split a raw database comment into its OMOP/APHP annotation halves.
///
/// Total over any input: a missing or empty comment yields two empty
/// strings. The APHP half is only populated when the marker occurs exactly
/// once; a comment containing the marker twice drops the annotation, which
/// existing datasets rely on.
pub fn split_comment(raw: Option<&str>) -> CommentAnnotations {
    let Some(raw) = raw.filter(|c| !c.is_empty()) else {
        return CommentAnnotations::default();
    };

    let parts: Vec<&str> = raw.split(APHP_MARKER).collect();
    let omop = parts[0].strip_prefix(OMOP_PREFIX).unwrap_or(parts[0]);
    let aphp = if parts.len() == 2 { parts[1] } else { "" };

    CommentAnnotations {
        comment_omop: omop.to_string(),
        comment_aphp: aphp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, "", "" ; "absent comment")]
    #[test_case(Some(""), "", "" ; "empty comment")]
    #[test_case(Some("plain text"), "plain text", "" ; "no prefix no marker")]
    #[test_case(Some("OMOP Comment : foo"), "foo", "" ; "prefix stripped")]
    #[test_case(
        Some("OMOP Comment : foo- APHP Annotation :bar"),
        "foo",
        "bar" ;
        "prefix and single marker"
    )]
    #[test_case(
        Some("x- APHP Annotation :bar- APHP Annotation :baz"),
        "x",
        "" ;
        "double marker drops annotation"
    )]
    #[test_case(
        Some("mid OMOP Comment : text"),
        "mid OMOP Comment : text",
        "" ;
        "prefix only stripped at start"
    )]
    #[test_case(
        Some("- APHP Annotation : padded "),
        "",
        " padded " ;
        "annotation kept verbatim untrimmed"
    )]
    fn split_comment_cases(raw: Option<&str>, omop: &str, aphp: &str) {
        let parsed = split_comment(raw);
        assert_eq!(parsed.comment_omop, omop);
        assert_eq!(parsed.comment_aphp, aphp);
    }

    #[test]
    fn omop_half_never_contains_marker() {
        let inputs = [
            "a- APHP Annotation :b",
            "- APHP Annotation :- APHP Annotation :",
            "OMOP Comment : a- APHP Annotation :b- APHP Annotation :c",
            "no marker at all",
        ];
        for raw in inputs {
            let parsed = split_comment(Some(raw));
            assert!(
                !parsed.comment_omop.contains("- APHP Annotation :"),
                "marker leaked into omop half for input: {}",
                raw
            );
        }
    }

    #[test]
    fn prefix_stripped_only_once() {
        let parsed = split_comment(Some("OMOP Comment : OMOP Comment : twice"));
        assert_eq!(parsed.comment_omop, "OMOP Comment : twice");
    }
}
