// ABOUTME: Property extraction engine: applies a rule's per-field directives to a parsed document.
// ABOUTME: Directive precedence is literal value, then selector (all matches), then bare callback.

//! Structured property extraction.
//!
//! For each field the rule declares, directives apply in a fixed order:
//!
//! 1. A literal `value` is assigned first. For list fields it acts as a
//!    default that later selector results are appended to.
//! 2. A `selector` queries all matching nodes and reads text or an attribute
//!    from each. When the field's current value is not list-typed, the
//!    multi-node result collapses to the first match. A named callback then
//!    transforms the result; its output replaces scalar fields and is
//!    concatenated onto list fields.
//! 3. A bare `callback` with no selector runs against an empty input (used
//!    for computed fields like the clip date).
//!
//! Extraction must run against the document before any strip-selectors are
//! applied: several directives target script nodes that stripping removes.

use dom_query::Document;
use tracing::trace;

use crate::properties::{ClipProperties, PropertyValue};
use crate::rules::{PropertyRule, Rule, ATTR_TEXT};
use crate::selectors::select_cached;

/// Extract the rule's declared properties from a parsed document.
///
/// Always returns at least the default field set; fields whose selectors
/// match nothing keep their defaults.
pub fn extract_properties(doc: &Document, rule: &Rule, url: &str) -> ClipProperties {
    let mut props = ClipProperties::with_defaults(url);

    for (name, directive) in &rule.properties {
        apply_directive(&mut props, doc, name, directive);
    }

    trace!(rule = %rule.pattern, fields = props.len(), "properties extracted");
    props
}

fn apply_directive(
    props: &mut ClipProperties,
    doc: &Document,
    name: &str,
    directive: &PropertyRule,
) {
    if let Some(literal) = &directive.value {
        props.set(name, literal.clone());
    }

    match (&directive.selector, directive.callback) {
        (Some(selector), callback) => {
            let matched = select_values(doc, selector, directive.attribute.as_deref());
            if matched.is_empty() {
                // Keep the default (or literal) value when nothing matches.
                return;
            }

            // The field's current shape decides whether a multi-node match
            // collapses: scalar fields take the first hit only.
            let list_shaped = matches!(props.get(name), Some(PropertyValue::List(_)));
            let extracted = if list_shaped {
                PropertyValue::List(matched)
            } else {
                PropertyValue::Text(matched.into_iter().next().unwrap_or_default())
            };

            let result = match callback {
                Some(cb) => cb.apply(extracted, doc),
                None => extracted,
            };

            if list_shaped {
                let items = match result {
                    PropertyValue::List(items) => items,
                    PropertyValue::Text(s) if !s.is_empty() => vec![s],
                    PropertyValue::Text(_) => vec![],
                };
                props.extend_list(name, items);
            } else {
                props.set(name, result);
            }
        }
        (None, Some(callback)) => {
            let result = callback.apply(PropertyValue::Text(String::new()), doc);
            props.set(name, result);
        }
        (None, None) => {}
    }
}

/// Query all nodes matching the selector and read text content or an
/// attribute from each. Empty values are skipped.
fn select_values(doc: &Document, selector: &str, attribute: Option<&str>) -> Vec<String> {
    let Some(selection) = select_cached(doc, selector) else {
        return vec![];
    };

    selection
        .iter()
        .filter_map(|el| {
            let raw = match attribute {
                None => normalize_whitespace(&el.text()),
                Some(attr) if attr == ATTR_TEXT => normalize_whitespace(&el.text()),
                Some(attr) => el.attr(attr).map(|v| v.trim().to_string())?,
            };
            if raw.is_empty() {
                None
            } else {
                Some(raw)
            }
        })
        .collect()
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::PropertyCallback;
    use crate::rules::sites;
    use pretty_assertions::assert_eq;

    const BLOG_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta property="og:title" content="My [great] post">
  <meta property="og:description" content="A post about things">
  <meta name="author" content="Alice">
  <meta property="article:published_time" content="2024-05-01T10:00:00+09:00">
</head>
<body><article><p>Body text</p></article></body>
</html>"#;

    #[test]
    fn defaults_survive_an_empty_document() {
        let doc = Document::from("<html><body></body></html>");
        let rule = sites::fallback_rule();
        let props = extract_properties(&doc, &rule, "https://example.com/x");
        assert_eq!(props.title(), "Untitled");
        assert_eq!(props.url(), "https://example.com/x");
        assert_eq!(
            props.get("tags").unwrap().as_list().unwrap(),
            &["clipping/web/default"]
        );
    }

    #[test]
    fn fallback_rule_reads_standard_meta_tags() {
        let doc = Document::from(BLOG_HTML);
        let rule = sites::fallback_rule();
        let props = extract_properties(&doc, &rule, "https://example.com/x");
        // sanitize_name swaps the brackets for parentheses
        assert_eq!(props.title(), "My (great) post");
        assert_eq!(props.text("author"), "Alice");
        assert_eq!(props.text("published"), "2024-05-01");
        assert_eq!(props.text("description"), "A post about things");
        assert_eq!(props.text("clipped").len(), 10);
    }

    #[test]
    fn literal_list_default_is_extended_by_callback_results() {
        let html = r#"<html><body>
<script>var ytInitialPlayerResponse = {"videoDetails":{"shortDescription":"launch #News #Tech"}};</script>
<div id="player"></div>
</body></html>"#;
        let doc = Document::from(html);
        let rule = sites::site_rules()
            .into_iter()
            .find(|r| r.pattern == "youtube/video")
            .unwrap();
        let props = extract_properties(&doc, &rule, "https://www.youtube.com/watch?v=a");
        assert_eq!(
            props.get("tags").unwrap().as_list().unwrap(),
            &["clipping/youtube/video", "news", "tech"]
        );
    }

    #[test]
    fn scalar_fields_collapse_to_first_match() {
        let html = r#"<html><head>
<meta name="author" content="First">
<meta name="author" content="Second">
</head><body></body></html>"#;
        let doc = Document::from(html);
        let rule = sites::fallback_rule();
        let props = extract_properties(&doc, &rule, "https://example.com");
        assert_eq!(props.text("author"), "First");
    }

    // The collapse decision reads the field's value type at the moment the
    // directive runs, so declaration order changes the outcome for fields
    // that flip between scalar and list. Pinned here so a new rule that
    // trips over it fails loudly instead of silently dropping matches.
    #[test]
    fn multi_match_collapse_depends_on_existing_value_shape() {
        let html = r#"<html><body><span class="k">one</span><span class="k">two</span></body></html>"#;
        let doc = Document::from(html);

        let mut rule = sites::fallback_rule();
        rule.properties = vec![(
            "keywords".into(),
            PropertyRule::text("span.k"),
        )];
        let props = extract_properties(&doc, &rule, "https://example.com");
        // Absent field starts scalar-shaped, so only the first span survives.
        assert_eq!(props.text("keywords"), "one");

        rule.properties = vec![(
            "keywords".into(),
            PropertyRule::text("span.k").with_value(Vec::<String>::new()),
        )];
        let props = extract_properties(&doc, &rule, "https://example.com");
        // A list-typed literal first makes the same selector keep all matches.
        assert_eq!(
            props.get("keywords").unwrap().as_list().unwrap(),
            &["one", "two"]
        );
    }

    #[test]
    fn bare_callback_assigns_computed_value() {
        let doc = Document::from("<html><body></body></html>");
        let mut rule = sites::fallback_rule();
        rule.properties = vec![(
            "clipped".into(),
            PropertyRule::callback_only(PropertyCallback::Today),
        )];
        let props = extract_properties(&doc, &rule, "https://example.com");
        assert_eq!(props.text("clipped").len(), 10);
        assert!(props.text("clipped").contains('-'));
    }

    #[test]
    fn directives_read_the_unstripped_document() {
        // Script content must be reachable here even though the rule also
        // lists script in its strip selectors (stripping happens later).
        let html = r#"<html><body>
<script>var ytInitialPlayerResponse = {"videoDetails":{"shortDescription":"hello world"}};</script>
<div id="player"></div>
</body></html>"#;
        let doc = Document::from(html);
        let rule = sites::site_rules()
            .into_iter()
            .find(|r| r.pattern == "youtube/video")
            .unwrap();
        let props = extract_properties(&doc, &rule, "https://youtu.be/a");
        assert_eq!(props.text("description"), "hello world");
    }
}
