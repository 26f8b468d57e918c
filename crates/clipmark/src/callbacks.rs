// ABOUTME: Named callback table for property post-processing, redirect resolution, and HTML hooks.
// ABOUTME: Callbacks are an explicit enum so a rule cannot reference an unregistered name.

//! Callback dispatch for rule-driven extraction.
//!
//! The rule table references behavior by identifier rather than by function
//! pointer. Identifiers are closed enums mapped to functions here, so a typo
//! in a rule definition is a compile error instead of a runtime surprise.

use chrono::Local;
use dom_query::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::properties::PropertyValue;
use crate::selectors::select_cached;

/// Post-processing applied to an extracted property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCallback {
    /// Strip filesystem-unsafe characters and collapse whitespace.
    SanitizeName,
    /// Replace hyphens with spaces.
    ReplaceHyphen,
    /// Current local date as YYYY-MM-DD; ignores its input.
    Today,
    /// Truncate an ISO timestamp to its date part.
    FormatDate,
    /// Reformat a "YYYY. M. D." date to YYYY-MM-DD.
    FormatYoutubeDate,
    /// Decode common HTML entities.
    DecodeEntities,
    /// Extract `#word` tokens from free text, lowercased without the marker.
    ExtractHashtags,
    /// Pull the canonical description from the embedded player-response blob.
    YoutubeDescription,
    /// Pull hashtags from the embedded player-response description.
    YoutubeTags,
}

impl fmt::Display for PropertyCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyCallback::SanitizeName => "sanitize_name",
            PropertyCallback::ReplaceHyphen => "replace_hyphen",
            PropertyCallback::Today => "today",
            PropertyCallback::FormatDate => "format_date",
            PropertyCallback::FormatYoutubeDate => "format_youtube_date",
            PropertyCallback::DecodeEntities => "decode_entities",
            PropertyCallback::ExtractHashtags => "extract_hashtags",
            PropertyCallback::YoutubeDescription => "youtube_description",
            PropertyCallback::YoutubeTags => "youtube_tags",
        };
        write!(f, "{}", s)
    }
}

impl PropertyCallback {
    /// Apply the callback to an extracted value.
    ///
    /// Scalar transformers map each list item when handed a list. The
    /// document-scanning callbacks ignore their input entirely and read the
    /// page, so they work even when the selector matched nothing useful.
    pub fn apply(&self, input: PropertyValue, doc: &Document) -> PropertyValue {
        match self {
            PropertyCallback::SanitizeName => map_text(input, sanitize_name),
            PropertyCallback::ReplaceHyphen => map_text(input, replace_hyphen),
            PropertyCallback::Today => PropertyValue::Text(today()),
            PropertyCallback::FormatDate => map_text(input, format_date),
            PropertyCallback::FormatYoutubeDate => map_text(input, format_youtube_date),
            PropertyCallback::DecodeEntities => map_text(input, decode_html_entities),
            PropertyCallback::ExtractHashtags => {
                let text = match input {
                    PropertyValue::Text(s) => s,
                    PropertyValue::List(items) => items.join(" "),
                };
                PropertyValue::List(extract_hashtags(&text))
            }
            PropertyCallback::YoutubeDescription => {
                PropertyValue::Text(youtube_description(doc))
            }
            PropertyCallback::YoutubeTags => PropertyValue::List(youtube_tags(doc)),
        }
    }
}

fn map_text(value: PropertyValue, f: impl Fn(&str) -> String) -> PropertyValue {
    match value {
        PropertyValue::Text(s) => PropertyValue::Text(f(&s)),
        PropertyValue::List(items) => {
            PropertyValue::List(items.iter().map(|s| f(s)).collect())
        }
    }
}

/// Strip filesystem-unsafe characters from a name and collapse whitespace.
///
/// Square brackets become parentheses so wiki-link syntax cannot leak into
/// a filename.
pub fn sanitize_name(name: &str) -> String {
    static UNSAFE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"[\\/:*?"<>|#^\[\]]"#).unwrap());

    let bracketed = name.replace('[', "(").replace(']', ")");
    let cleaned = UNSAFE_RE.replace_all(&bracketed, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace hyphens with spaces.
pub fn replace_hyphen(value: &str) -> String {
    value.replace('-', " ")
}

/// Today's local date formatted YYYY-MM-DD.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Truncate an ISO-8601 timestamp to its date-only part.
pub fn format_date(value: &str) -> String {
    value.split('T').next().unwrap_or(value).to_string()
}

/// Reformat a "YYYY. M. D." style date (as rendered by the video site's
/// locale) into YYYY-MM-DD. Unrecognized input passes through unchanged.
pub fn format_youtube_date(value: &str) -> String {
    static DATE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})").unwrap());

    match DATE_RE.captures(value) {
        Some(caps) => format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]),
        None => value.to_string(),
    }
}

/// Decode the HTML entities that show up in og:description content.
pub fn decode_html_entities(value: &str) -> String {
    static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#(x?)([0-9a-fA-F]+);").unwrap());

    let decoded = NUMERIC_RE.replace_all(value, |caps: &regex::Captures| {
        let radix = if caps[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
}

/// Extract `#word` tokens from free text: marker stripped, lowercased.
/// Tokens are kept in order of appearance and not deduplicated.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[\w가-힣]+").unwrap());

    HASHTAG_RE
        .find_iter(text)
        .map(|m| m.as_str()[1..].to_lowercase())
        .collect()
}

/// Regex that captures the player-response object literal out of inline script.
static PLAYER_RESPONSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)ytInitialPlayerResponse\s*=\s*(\{.+?\});").unwrap());

/// Locate and parse the embedded player-response JSON blob.
///
/// The video site does not expose its description or tags via meta tags;
/// they live in a global-variable assignment inside an inline script. Scans
/// every script node for the known assignment and parses the object literal.
fn youtube_player_response(doc: &Document) -> Option<serde_json::Value> {
    let scripts = select_cached(doc, "script")?;
    for script in scripts.iter() {
        let content = script.text();
        if !content.contains("ytInitialPlayerResponse") {
            continue;
        }
        if let Some(caps) = PLAYER_RESPONSE_RE.captures(&content) {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&caps[1]) {
                return Some(value);
            }
        }
    }
    None
}

/// The short description from the embedded video metadata blob.
///
/// Double quotes become single quotes and newlines become literal "\n" so the
/// value stays on one front-matter line. Empty string when the blob is absent.
pub fn youtube_description(doc: &Document) -> String {
    youtube_player_response(doc)
        .as_ref()
        .and_then(|v| v["videoDetails"]["shortDescription"].as_str())
        .map(|desc| desc.replace('"', "'").replace('\n', "\\n").trim().to_string())
        .unwrap_or_default()
}

/// Hashtags pulled from the embedded video description. Empty when the blob
/// is absent or carries no hashtags.
pub fn youtube_tags(doc: &Document) -> Vec<String> {
    youtube_player_response(doc)
        .as_ref()
        .and_then(|v| v["videoDetails"]["shortDescription"].as_str())
        .map(extract_hashtags)
        .unwrap_or_default()
}

/// Site-specific logic that inspects a fetched page to compute a secondary
/// URL to re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectResolver {
    /// The blog platform embeds the post in an iframe; resolve its canonical
    /// post-view URL.
    NaverBlogIframe,
}

impl fmt::Display for RedirectResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectResolver::NaverBlogIframe => write!(f, "naver_blog_iframe"),
        }
    }
}

impl RedirectResolver {
    /// Inspect the fetched document and return the URL to re-fetch, or None
    /// to keep the original document.
    pub fn resolve(&self, doc: &Document) -> Option<String> {
        match self {
            RedirectResolver::NaverBlogIframe => resolve_naver_iframe(doc),
        }
    }
}

const NAVER_BLOG_ORIGIN: &str = "https://blog.naver.com";

/// Resolve the canonical post URL from the platform's `#mainFrame` iframe.
///
/// When the iframe src carries both a blogId and a logNo query parameter, a
/// canonical post-view URL is constructed from them. Otherwise the iframe URL
/// is normalized onto the platform origin. URL-parse failure falls back to
/// manual prefix rules so a best-effort absolute URL is still produced.
fn resolve_naver_iframe(doc: &Document) -> Option<String> {
    let frames = select_cached(doc, "#mainFrame")?;
    let frame = frames.iter().next()?;
    let src = frame.attr("src")?.trim().to_string();
    if src.is_empty() {
        return None;
    }

    let absolute = if src.starts_with("//") {
        format!("https:{}", src)
    } else {
        src.clone()
    };

    match url::Url::parse(&absolute) {
        Ok(parsed) => {
            let blog_id = parsed
                .query_pairs()
                .find(|(k, _)| k == "blogId")
                .map(|(_, v)| v.into_owned());
            let log_no = parsed
                .query_pairs()
                .find(|(k, _)| k == "logNo")
                .map(|(_, v)| v.into_owned());

            if let (Some(blog_id), Some(log_no)) = (blog_id, log_no) {
                return Some(format!(
                    "{}/PostView.naver?blogId={}&logNo={}&redirect=Dlog&widgetTypeCall=true&directAccess=false",
                    NAVER_BLOG_ORIGIN, blog_id, log_no
                ));
            }

            if !parsed.as_str().starts_with(NAVER_BLOG_ORIGIN) {
                let path = match parsed.query() {
                    Some(q) => format!("{}?{}", parsed.path(), q),
                    None => parsed.path().to_string(),
                };
                return Some(format!("{}{}", NAVER_BLOG_ORIGIN, path));
            }

            Some(parsed.into())
        }
        Err(_) => {
            // Best-effort absolute URL from string prefixes.
            if src.starts_with("//") {
                Some(format!("https:{}", src))
            } else if src.starts_with('/') {
                Some(format!("{}{}", NAVER_BLOG_ORIGIN, src))
            } else if !src.starts_with("http") {
                Some(format!("{}/{}", NAVER_BLOG_ORIGIN, src))
            } else {
                Some(src)
            }
        }
    }
}

/// HTML rewrite applied to the extracted fragment before Markdown conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostHtmlHook {
    /// Swap the platform's blurred-thumbnail query parameter for the
    /// full-resolution variant.
    NaverImageUpscale,
}

impl PostHtmlHook {
    pub fn apply(&self, html: &str) -> String {
        match self {
            PostHtmlHook::NaverImageUpscale => {
                static BLUR_RE: Lazy<Regex> =
                    Lazy::new(|| Regex::new(r"\?type=w\d+_blur").unwrap());
                BLUR_RE.replace_all(html, "?type=w966").to_string()
            }
        }
    }
}

/// Enrichment run after extraction but before front-matter generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreFrontmatterHook {
    /// Ask the summarization webhook for extra tags and an appendix section.
    YoutubeSummary,
}

/// Rewrite applied to the assembled body after Markdown generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostMarkdownHook {
    /// Prepend an image-style link to the source URL, then append the
    /// enrichment appendix.
    SourceImageLink,
}

impl PostMarkdownHook {
    pub fn apply(&self, props: &crate::properties::ClipProperties, body: &str, appendix: &str) -> String {
        match self {
            PostMarkdownHook::SourceImageLink => {
                let mut out = format!("![{}]({})", props.title(), props.url());
                if !body.is_empty() {
                    out.push_str("\n\n");
                    out.push_str(body);
                }
                if !appendix.is_empty() {
                    out.push_str("\n\n");
                    out.push_str(appendix);
                }
                out
            }
        }
    }
}
