//! Tagged technique/response extraction.
//!
//! Persuasion-mode replies are expected to look like
//! `<technique>...</technique><response>...</response>`. Models do not always
//! comply, so extraction is best effort and never fails. First match wins for
//! each tag, and tags must open and close on the same line.

use std::sync::LazyLock;

use regex::Regex;

static TECHNIQUE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<technique>(.*?)</technique>").unwrap());
static RESPONSE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<response>(.*?)</response>").unwrap());

/// Result of scanning a raw model reply for tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedResponse {
    pub technique: Option<String>,
    pub response: String,
}

/// Split a raw reply into technique and response.
///
/// | technique tag | response tag | technique | response |
/// |---------------|--------------|-----------|----------|
/// | yes | yes | captured | captured |
/// | no  | yes | `None`   | captured |
/// | yes | no  | captured | whole raw text |
/// | no  | no  | `None`   | whole raw text |
///
/// The third row keeps the tags in the response text.
pub fn extract_tagged_response(raw: &str) -> TaggedResponse {
    let technique = TECHNIQUE_TAG
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let response = RESPONSE_TAG
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    match (technique, response) {
        (technique, Some(response)) => TaggedResponse {
            technique,
            response,
        },
        (technique, None) => TaggedResponse {
            technique,
            response: raw.to_string(),
        },
    }
}
