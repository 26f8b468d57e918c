// ABOUTME: The built-in site rule table: video host, two blog platforms, and the generic web fallback.
// ABOUTME: Each rule declares fetch strategy, property directives, content root, strips, and hooks.

//! Built-in clipping rules.

use crate::callbacks::{
    PostHtmlHook, PostMarkdownHook, PreFrontmatterHook, PropertyCallback, RedirectResolver,
};
use crate::properties::PropertyValue;

use super::{FetchKind, PropertyRule, Rule};

fn tag_default(tag: &str) -> PropertyValue {
    PropertyValue::List(vec![tag.to_string()])
}

/// Rule for video watch pages.
///
/// Description and tags live in an inline-script JSON blob rather than meta
/// tags, so those directives select `script` and hand the document to the
/// blob-scanning callbacks. The player node itself converts to almost nothing,
/// so the post-markdown hook supplies the body.
fn youtube_video() -> Rule {
    Rule {
        pattern: "youtube/video".into(),
        url_patterns: vec!["youtube.com/watch".into(), "youtu.be".into()],
        fetch: FetchKind::Direct,
        resolver: None,
        properties: vec![
            (
                "title".into(),
                PropertyRule::attr("meta[property='og:title']", "content")
                    .with_callback(PropertyCallback::SanitizeName),
            ),
            (
                "author".into(),
                PropertyRule::attr("link[itemprop='name']", "content"),
            ),
            (
                "published".into(),
                PropertyRule::attr("meta[itemprop='datePublished']", "content")
                    .with_callback(PropertyCallback::FormatDate),
            ),
            (
                "clipped".into(),
                PropertyRule::callback_only(PropertyCallback::Today),
            ),
            (
                "description".into(),
                PropertyRule::text("script")
                    .with_callback(PropertyCallback::YoutubeDescription),
            ),
            (
                "tags".into(),
                PropertyRule::text("script")
                    .with_callback(PropertyCallback::YoutubeTags)
                    .with_value(tag_default("clipping/youtube/video")),
            ),
        ],
        content_selector: "#player".into(),
        strip_selectors: vec![
            "script".into(),
            "style".into(),
            "#secondary".into(),
            "#comments".into(),
            "#related".into(),
        ],
        post_html: None,
        pre_frontmatter: Some(PreFrontmatterHook::YoutubeSummary),
        post_markdown: Some(PostMarkdownHook::SourceImageLink),
    }
}

/// Rule for a hosted blog platform with conventional meta tags.
fn blog_tistory() -> Rule {
    Rule {
        pattern: "blog/tistory".into(),
        url_patterns: vec!["tistory.com".into()],
        fetch: FetchKind::Direct,
        resolver: None,
        properties: vec![
            (
                "title".into(),
                PropertyRule::attr("meta[property='og:title']", "content")
                    .with_callback(PropertyCallback::SanitizeName),
            ),
            ("author".into(), PropertyRule::attr("meta[name='by']", "content")),
            (
                "published".into(),
                PropertyRule::attr("meta[property='article:published_time']", "content")
                    .with_callback(PropertyCallback::FormatDate),
            ),
            (
                "clipped".into(),
                PropertyRule::callback_only(PropertyCallback::Today),
            ),
            (
                "description".into(),
                PropertyRule::attr("meta[property='og:description']", "content"),
            ),
            ("tags".into(), PropertyRule::literal(tag_default("clipping/blog/tistory"))),
        ],
        content_selector: ".tt_article_useless_p_margin".into(),
        strip_selectors: vec!["script".into(), "style".into()],
        post_html: None,
        pre_frontmatter: None,
        post_markdown: None,
    }
}

/// Rule for a blog platform that embeds posts in an iframe.
///
/// The landing page is a shell; the resolver reads the iframe src and the
/// clip re-fetches the canonical post-view URL. Ad containers are stripped
/// and blurred thumbnails are upscaled before conversion.
fn blog_naver() -> Rule {
    Rule {
        pattern: "blog/naver".into(),
        url_patterns: vec!["blog.naver.com".into()],
        fetch: FetchKind::WithRedirect,
        resolver: Some(RedirectResolver::NaverBlogIframe),
        properties: vec![
            (
                "title".into(),
                PropertyRule::attr("meta[property='og:title']", "content")
                    .with_callback(PropertyCallback::SanitizeName),
            ),
            (
                "author".into(),
                PropertyRule::attr("meta[property='naverblog:nickname']", "content"),
            ),
            ("published".into(), PropertyRule::text(".date")),
            (
                "clipped".into(),
                PropertyRule::callback_only(PropertyCallback::Today),
            ),
            (
                "description".into(),
                PropertyRule::attr("meta[property='og:description']", "content")
                    .with_callback(PropertyCallback::DecodeEntities),
            ),
            ("tags".into(), PropertyRule::literal(tag_default("clipping/blog/naver"))),
        ],
        content_selector: "#postListBody".into(),
        strip_selectors: vec![
            "script".into(),
            "style".into(),
            ".revenue_unit_wrap".into(),
            ".na_ad".into(),
        ],
        post_html: Some(PostHtmlHook::NaverImageUpscale),
        pre_frontmatter: None,
        post_markdown: None,
    }
}

/// The site rules, in routing order.
pub fn site_rules() -> Vec<Rule> {
    vec![youtube_video(), blog_tistory(), blog_naver()]
}

/// The wildcard fallback for any other web page.
pub fn fallback_rule() -> Rule {
    Rule {
        pattern: "web/default".into(),
        url_patterns: vec!["*".into()],
        fetch: FetchKind::Direct,
        resolver: None,
        properties: vec![
            (
                "title".into(),
                PropertyRule::attr("meta[property='og:title']", "content")
                    .with_callback(PropertyCallback::SanitizeName),
            ),
            ("author".into(), PropertyRule::attr("meta[name='author']", "content")),
            (
                "published".into(),
                PropertyRule::attr("meta[property='article:published_time']", "content")
                    .with_callback(PropertyCallback::FormatDate),
            ),
            (
                "clipped".into(),
                PropertyRule::callback_only(PropertyCallback::Today),
            ),
            (
                "description".into(),
                PropertyRule::attr("meta[property='og:description']", "content"),
            ),
            ("tags".into(), PropertyRule::literal(tag_default("clipping/web/default"))),
        ],
        content_selector: "body".into(),
        strip_selectors: vec!["script".into(), "style".into()],
        post_html: None,
        pre_frontmatter: None,
        post_markdown: None,
    }
}
