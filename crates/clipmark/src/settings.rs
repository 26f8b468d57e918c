// ABOUTME: Clipper settings: output folder, note templates, and the optional summary webhook.
// ABOUTME: Templates substitute {{key}} tokens from properties and {{content}} for the body.

//! Settings and note templates.
//!
//! A template is a Markdown file whose `{{key}}` tokens are replaced with
//! property values and whose `{{content}}` token receives the clipped body.
//! Templates live in a folder alongside the notes; files whose names start
//! with `_` are treated as disabled and skipped.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enrich::SummaryWebhook;
use crate::properties::{ClipProperties, PropertyValue};

/// Persistent clipper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipperSettings {
    /// Subfolder notes are written into, relative to the store root.
    pub clip_folder: String,
    /// Template name to template content.
    pub templates: HashMap<String, String>,
    /// Template used when no template matches the rule pattern.
    pub default_template: String,
    /// Folder template files are loaded from.
    pub template_folder: String,
    /// Optional summarization webhook for the enrichment hook.
    pub summary_webhook: Option<SummaryWebhook>,
}

impl Default for ClipperSettings {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert("web-default".to_string(), "{{content}}".to_string());
        templates.insert("youtube-video".to_string(), "{{content}}".to_string());
        Self {
            clip_folder: "Clippings".to_string(),
            templates,
            default_template: "web-default".to_string(),
            template_folder: "templates/clipmark".to_string(),
            summary_webhook: None,
        }
    }
}

impl ClipperSettings {
    /// Template content for a rule pattern. Pattern slashes map to hyphens
    /// in template names ("youtube/video" looks up "youtube-video"); an
    /// unknown pattern falls back to the default template, and a missing
    /// default degrades to a bare `{{content}}` passthrough.
    pub fn template_for(&self, pattern: &str) -> &str {
        let name = pattern.replace('/', "-");
        self.templates
            .get(&name)
            .or_else(|| self.templates.get(&self.default_template))
            .map(|s| s.as_str())
            .unwrap_or("{{content}}")
    }

    /// Load `*.md` template files from a folder into the template map,
    /// keeping built-in defaults for names not on disk. Files starting with
    /// `_` are skipped.
    pub fn load_templates_from(&mut self, dir: &Path) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('_') {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            debug!(template = stem, "template loaded");
            self.templates.insert(stem.to_string(), content);
        }
        Ok(())
    }
}

/// Substitute `{{key}}` tokens with property values, then `{{content}}`
/// with the Markdown body. List values join with ", ".
pub fn apply_template(template: &str, props: &ClipProperties, content: &str) -> String {
    let mut result = template.to_string();
    for (key, value) in props.iter() {
        let token = format!("{{{{{}}}}}", key);
        let replacement = match value {
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::List(items) => items.join(", "),
        };
        result = result.replace(&token, &replacement);
    }
    result.replace("{{content}}", content)
}
