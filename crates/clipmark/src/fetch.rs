// ABOUTME: HTTP fetching and document acquisition: direct, redirect-resolving, and browser strategies.
// ABOUTME: Handles charset decoding from content-type or detection, content-length limits, and status checks.

//! Page fetching.
//!
//! Three strategies keyed by [`FetchKind`]: a plain GET, a GET followed by a
//! resolver-driven second GET for iframe-shell pages, and a declared-but-
//! unimplemented browser-rendered strategy that fails explicitly.

use bytes::Bytes;
use dom_query::Document;
use tracing::debug;

use crate::error::ClipError;
use crate::rules::{FetchKind, Rule};

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Browser-like user agent sent with every request. Several of the rule
/// table's sites serve stripped-down markup to unknown agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Raw result of one successful GET.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body to a String using the content-type charset, falling
    /// back to detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Validate that the input is an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<url::Url, ClipError> {
    if url.is_empty() {
        return Err(ClipError::invalid_url(url, "Fetch", None));
    }
    let parsed = url::Url::parse(url)
        .map_err(|e| ClipError::invalid_url(url, "Fetch", Some(anyhow::anyhow!(e))))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ClipError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    Ok(parsed)
}

/// GET a single URL, enforcing a 200 status and the content-length limit.
pub async fn fetch_one(client: &reqwest::Client, url: &str) -> Result<FetchResult, ClipError> {
    validate_url(url)?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ClipError::fetch(url, "Fetch", Some(anyhow::anyhow!(e))))?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(ClipError::http(status, url, "Fetch"));
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ClipError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large: {} bytes", len)),
            ));
        }
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let body = response
        .bytes()
        .await
        .map_err(|e| ClipError::fetch(url, "Fetch", Some(anyhow::anyhow!(e))))?;
    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ClipError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large: {} bytes", body.len())),
        ));
    }

    Ok(FetchResult {
        status,
        final_url,
        content_type,
        body,
    })
}

/// GET a URL and parse it into a Document.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Document, ClipError> {
    let result = fetch_one(client, url).await?;
    Ok(Document::from(result.text()))
}

/// Fetch a page using the rule's declared strategy.
///
/// For [`FetchKind::WithRedirect`] the resolver inspects the first document;
/// `None` keeps it, a URL triggers one more direct fetch. A redirect rule
/// without a resolver is a configuration bug surfaced as CallbackNotFound.
pub async fn fetch_for_rule(
    client: &reqwest::Client,
    url: &str,
    rule: &Rule,
) -> Result<Document, ClipError> {
    match rule.fetch {
        FetchKind::Direct => fetch_document(client, url).await,
        FetchKind::WithRedirect => {
            let resolver = rule
                .resolver
                .ok_or_else(|| ClipError::callback_not_found(url, "Fetch", &rule.pattern))?;
            let doc = fetch_document(client, url).await?;
            match resolver.resolve(&doc) {
                Some(resolved) => {
                    debug!(%url, %resolved, "redirect resolved");
                    fetch_document(client, &resolved).await
                }
                None => Ok(doc),
            }
        }
        FetchKind::Browser => Err(ClipError::not_implemented(url, "Fetch")),
    }
}
