//! Persuasion technique catalog.
//!
//! The catalog is a static, process-wide table loaded once at startup from
//! line-delimited JSON. Techniques are addressed only by their index, and a
//! [`TechniqueSelector`] is how configuration points into the table.

mod selector;

pub use selector::TechniqueSelector;

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named persuasion technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    /// Display name, e.g. "Evidence-based Persuasion"
    pub technique: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: String,
    /// Any additional descriptive fields carried by the resource
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Technique {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            technique: name.into(),
            definition: definition.into(),
            example: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.technique
    }
}

/// Immutable, index-addressed table of techniques.
#[derive(Debug, Clone, PartialEq)]
pub struct TechniqueCatalog {
    techniques: Vec<Technique>,
}

impl TechniqueCatalog {
    pub fn new(techniques: Vec<Technique>) -> Result<Self, DomainError> {
        if techniques.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }
        Ok(Self { techniques })
    }

    /// Parse line-delimited JSON records.
    ///
    /// Keys prefixed with `ss_` (as in the published taxonomy files) have the
    /// prefix stripped. Blank lines are skipped. Line numbers in errors are
    /// 1-based.
    pub fn from_jsonl(source: &str) -> Result<Self, DomainError> {
        let mut techniques = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line)
                .map_err(|e| DomainError::CatalogParse {
                    line: idx + 1,
                    message: e.to_string(),
                })?;
            let stripped: serde_json::Map<String, serde_json::Value> = raw
                .into_iter()
                .map(|(k, v)| match k.strip_prefix("ss_") {
                    Some(rest) => (rest.to_string(), v),
                    None => (k, v),
                })
                .collect();
            let technique: Technique =
                serde_json::from_value(serde_json::Value::Object(stripped)).map_err(|e| {
                    DomainError::CatalogParse {
                        line: idx + 1,
                        message: e.to_string(),
                    }
                })?;
            techniques.push(technique);
        }
        Self::new(techniques)
    }

    pub fn get(&self, index: usize) -> Option<&Technique> {
        self.techniques.get(index)
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.iter()
    }

    /// Render the catalog as a numbered list for inclusion in a prompt.
    pub fn render_options(&self) -> String {
        self.techniques
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if t.definition.is_empty() {
                    format!("{}. {}", i + 1, t.technique)
                } else {
                    format!("{}. {}: {}", i + 1, t.technique, t.definition)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_catalog() -> TechniqueCatalog {
        TechniqueCatalog::from_jsonl(
            r#"{"ss_technique": "Evidence-based Persuasion", "ss_definition": "Using empirical data.", "ss_example": "Studies show..."}
{"ss_technique": "Logical Appeal", "ss_definition": "Using logic and reasoning."}
{"ss_technique": "Reciprocity", "ss_definition": "Adapt to the individual's arguments."}
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_strips_prefix() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0).unwrap().name(), "Evidence-based Persuasion");
        assert_eq!(catalog.get(0).unwrap().example, "Studies show...");
        assert_eq!(catalog.get(2).unwrap().name(), "Reciprocity");
    }

    #[test]
    fn test_parse_keeps_unknown_fields() {
        let catalog =
            TechniqueCatalog::from_jsonl(r#"{"technique": "Priming", "category": "affect"}"#)
                .unwrap();
        let t = catalog.get(0).unwrap();
        assert_eq!(t.definition, "");
        assert_eq!(t.extra.get("category"), Some(&serde_json::json!("affect")));
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = TechniqueCatalog::from_jsonl("{\"technique\": \"A\"}\n\nnot json\n").unwrap_err();
        assert!(matches!(err, DomainError::CatalogParse { line: 3, .. }));
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let err = TechniqueCatalog::from_jsonl(r#"{"definition": "no name"}"#).unwrap_err();
        assert!(matches!(err, DomainError::CatalogParse { line: 1, .. }));
    }

    #[test]
    fn test_empty_source_is_rejected() {
        assert_eq!(
            TechniqueCatalog::from_jsonl("\n\n").unwrap_err(),
            DomainError::EmptyCatalog
        );
    }

    #[test]
    fn test_render_options_is_numbered() {
        let rendered = sample_catalog().render_options();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2. Logical Appeal: Using logic and reasoning.");
    }
}
