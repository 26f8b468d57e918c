// ABOUTME: Rule data model and URL router: FetchKind, PropertyRule, Rule, RuleSet.
// ABOUTME: Rules are static configuration; the router picks the first rule whose pattern is a substring of the URL.

//! The rule table that drives clipping.
//!
//! A [`Rule`] describes everything site-specific about a clip: how to fetch
//! the page, which properties to pull out of it and how, where the main
//! content lives, and which hooks run along the way. The [`RuleSet`] routes
//! a URL to the first matching rule, falling back to a wildcard rule.

use serde::{Deserialize, Serialize};

use crate::callbacks::{
    PostHtmlHook, PostMarkdownHook, PreFrontmatterHook, PropertyCallback, RedirectResolver,
};
use crate::properties::PropertyValue;
use crate::selectors::precompile_selectors;

pub mod sites;

/// The attribute sentinel meaning "read node text content".
pub const ATTR_TEXT: &str = "text";

/// Which fetch strategy a rule uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Single GET of the given URL.
    Direct,
    /// Direct fetch, then a resolver inspects the page for a canonical URL
    /// to re-fetch.
    WithRedirect,
    /// Headless-browser rendering. Declared but not wired up; selecting it
    /// fails with NotImplemented.
    Browser,
}

/// Per-field extraction directive within a [`Rule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRule {
    /// CSS selector; may match zero, one, or many nodes.
    pub selector: Option<String>,
    /// Attribute to read from matched nodes; `"text"` (or None) means the
    /// node's trimmed text content.
    pub attribute: Option<String>,
    /// Post-processing callback for the extracted value.
    pub callback: Option<PropertyCallback>,
    /// Literal default, assigned before any selector runs. For list fields
    /// the selector/callback result is appended rather than replacing it.
    pub value: Option<PropertyValue>,
}

impl PropertyRule {
    /// Directive reading an attribute from matched nodes.
    pub fn attr(selector: &str, attribute: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            attribute: Some(attribute.to_string()),
            ..Default::default()
        }
    }

    /// Directive reading text content from matched nodes.
    pub fn text(selector: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            attribute: Some(ATTR_TEXT.to_string()),
            ..Default::default()
        }
    }

    /// Directive assigning a literal value.
    pub fn literal(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Directive that only invokes a callback (e.g. current date).
    pub fn callback_only(callback: PropertyCallback) -> Self {
        Self {
            callback: Some(callback),
            ..Default::default()
        }
    }

    /// Attach a post-processing callback.
    pub fn with_callback(mut self, callback: PropertyCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Attach a literal default value.
    pub fn with_value(mut self, value: impl Into<PropertyValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A site-specific clipping rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Identifier for this rule, e.g. "blog/naver".
    pub pattern: String,
    /// Ordered URL-substring matchers; `"*"` matches every URL.
    pub url_patterns: Vec<String>,
    /// Fetch strategy.
    pub fetch: FetchKind,
    /// Redirect resolver, required when `fetch` is [`FetchKind::WithRedirect`].
    pub resolver: Option<RedirectResolver>,
    /// Ordered property directives, applied in declaration order.
    pub properties: Vec<(String, PropertyRule)>,
    /// Selector for the single root content node.
    pub content_selector: String,
    /// Selectors for nodes removed before content extraction.
    pub strip_selectors: Vec<String>,
    /// HTML rewrite applied to the extracted fragment.
    pub post_html: Option<PostHtmlHook>,
    /// Enrichment hook run before front-matter generation.
    pub pre_frontmatter: Option<PreFrontmatterHook>,
    /// Body rewrite run after Markdown generation.
    pub post_markdown: Option<PostMarkdownHook>,
}

impl Rule {
    /// True when one of the rule's URL patterns matches the URL.
    ///
    /// Patterns match as substrings of the full URL string, so a pattern may
    /// span host and path (e.g. "youtube.com/watch"). `"*"` matches anything.
    pub fn matches(&self, url: &str) -> bool {
        self.url_patterns
            .iter()
            .any(|p| p == "*" || url.contains(p.as_str()))
    }

    /// Every CSS selector this rule references.
    fn selectors(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter_map(|(_, pr)| pr.selector.as_deref())
            .chain(std::iter::once(self.content_selector.as_str()))
            .chain(self.strip_selectors.iter().map(|s| s.as_str()))
    }
}

/// An ordered rule table with a guaranteed fallback.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    fallback: Rule,
}

impl RuleSet {
    /// Build a rule set. The fallback handles URLs no listed rule matches.
    pub fn new(rules: Vec<Rule>, fallback: Rule) -> Self {
        Self { rules, fallback }
    }

    /// The built-in site rules with the generic web fallback.
    pub fn builtin() -> Self {
        Self::new(sites::site_rules(), sites::fallback_rule())
    }

    /// Route a URL to the first rule whose pattern matches, in declaration
    /// order. Always succeeds because of the fallback.
    pub fn route(&self, url: &str) -> &Rule {
        self.rules
            .iter()
            .find(|rule| rule.matches(url))
            .unwrap_or(&self.fallback)
    }

    /// Warm the selector cache with every selector the table references.
    pub fn precompile(&self) {
        let selectors: Vec<&str> = self
            .rules
            .iter()
            .chain(std::iter::once(&self.fallback))
            .flat_map(|rule| rule.selectors())
            .collect();
        precompile_selectors(selectors);
    }

    /// Iterate the site rules (excluding the fallback).
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The fallback rule.
    pub fn fallback(&self) -> &Rule {
        &self.fallback
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
