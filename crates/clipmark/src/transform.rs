// ABOUTME: Content transformation: strips noise nodes in place, extracts the root content fragment.
// ABOUTME: Runs after property extraction because stripping mutates the document.

//! Content extraction and HTML cleanup.
//!
//! Stripping mutates the parsed document in place, which is safe because
//! each clip exclusively owns its Document. Properties must already be
//! extracted by the time this runs: strip selectors commonly remove the
//! script nodes that property directives read.

use dom_query::Document;
use tracing::debug;

use crate::error::ClipError;
use crate::rules::Rule;
use crate::selectors::select_cached;

/// Remove the rule's strip-selector matches and return the inner markup of
/// the root content node, with the rule's HTML rewrite hook applied.
///
/// A root selector that matches nothing is fatal: there is no content to clip.
pub fn transform_content(doc: &Document, rule: &Rule, url: &str) -> Result<String, ClipError> {
    strip_nodes(doc, rule);

    let root = select_cached(doc, &rule.content_selector).ok_or_else(|| {
        ClipError::content_not_found(url, "Transform", &rule.content_selector)
    })?;
    if !root.exists() {
        return Err(ClipError::content_not_found(
            url,
            "Transform",
            &rule.content_selector,
        ));
    }

    let mut html = root.inner_html().to_string();
    if let Some(hook) = rule.post_html {
        html = hook.apply(&html);
    }
    Ok(html)
}

/// Remove every node matching any of the rule's strip selectors.
fn strip_nodes(doc: &Document, rule: &Rule) {
    let mut stripped = 0usize;
    for selector in &rule.strip_selectors {
        if let Some(selection) = select_cached(doc, selector) {
            stripped += selection.length();
            selection.remove();
        }
    }
    if stripped > 0 {
        debug!(rule = %rule.pattern, stripped, "noise nodes removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::PostHtmlHook;
    use crate::rules::sites;

    #[test]
    fn extracts_inner_markup_of_content_root() {
        let doc = Document::from(
            "<html><body><article><p>Hello</p></article></body></html>",
        );
        let mut rule = sites::fallback_rule();
        rule.content_selector = "article".into();
        let html = transform_content(&doc, &rule, "https://example.com").unwrap();
        assert!(html.contains("<p>Hello</p>"));
        assert!(!html.contains("<article>"));
    }

    #[test]
    fn strips_noise_before_extraction() {
        let doc = Document::from(
            "<html><body><script>var x=1;</script><style>p{}</style><p>Keep me</p></body></html>",
        );
        let rule = sites::fallback_rule();
        let html = transform_content(&doc, &rule, "https://example.com").unwrap();
        assert!(html.contains("Keep me"));
        assert!(!html.contains("var x=1"));
        assert!(!html.contains("p{}"));
    }

    #[test]
    fn missing_content_root_is_fatal() {
        let doc = Document::from("<html><body><p>text</p></body></html>");
        let mut rule = sites::fallback_rule();
        rule.content_selector = "#post-body".into();
        let err = transform_content(&doc, &rule, "https://example.com/x").unwrap_err();
        assert!(err.is_content_not_found());
        assert!(err.to_string().contains("#post-body"));
    }

    #[test]
    fn post_html_hook_rewrites_fragment() {
        let doc = Document::from(
            r#"<html><body><div id="c"><img src="https://p.example/i.png?type=w80_blur"></div></body></html>"#,
        );
        let mut rule = sites::fallback_rule();
        rule.content_selector = "#c".into();
        rule.post_html = Some(PostHtmlHook::NaverImageUpscale);
        let html = transform_content(&doc, &rule, "https://example.com").unwrap();
        assert!(html.contains("?type=w966"));
    }

    #[test]
    fn strip_selectors_scope_to_whole_document() {
        let doc = Document::from(
            r#"<html><body>
<div id="postListBody"><p>Post</p><div class="na_ad">buy things</div></div>
<div class="revenue_unit_wrap">ads</div>
</body></html>"#,
        );
        let rule = sites::site_rules()
            .into_iter()
            .find(|r| r.pattern == "blog/naver")
            .unwrap();
        let html = transform_content(&doc, &rule, "https://blog.naver.com/a/1").unwrap();
        assert!(html.contains("Post"));
        assert!(!html.contains("buy things"));
    }
}
