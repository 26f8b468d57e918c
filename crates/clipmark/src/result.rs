// ABOUTME: Output types for a completed clip: the structured ClipResult and the storable Note.

use serde::{Deserialize, Serialize};

use crate::properties::ClipProperties;

/// Everything produced by clipping one URL, before storage concerns apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipResult {
    /// Pattern name of the rule that handled the URL, e.g. "blog/naver".
    pub pattern: String,
    /// Extracted (and possibly enriched) properties.
    pub properties: ClipProperties,
    /// Rendered front-matter block; empty when no property had a value.
    pub frontmatter: String,
    /// Markdown body with all hooks applied.
    pub body: String,
}

impl ClipResult {
    /// The complete Markdown document: front matter, a blank line, then the
    /// body. With no front matter the body stands alone.
    pub fn markdown(&self) -> String {
        if self.frontmatter.is_empty() {
            self.body.clone()
        } else {
            format!("{}\n{}", self.frontmatter, self.body)
        }
    }
}

/// A note ready to be written to a document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Filename without extension, already sanitized.
    pub filename: String,
    /// Full file content.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_separates_frontmatter_with_blank_line() {
        let result = ClipResult {
            pattern: "web/default".into(),
            properties: ClipProperties::default(),
            frontmatter: "---\ntitle: \"A\"\n---\n".into(),
            body: "Body".into(),
        };
        assert_eq!(result.markdown(), "---\ntitle: \"A\"\n---\n\nBody");
    }

    #[test]
    fn markdown_without_frontmatter_is_just_the_body() {
        let result = ClipResult {
            pattern: "web/default".into(),
            properties: ClipProperties::default(),
            frontmatter: String::new(),
            body: "Body".into(),
        };
        assert_eq!(result.markdown(), "Body");
    }
}
