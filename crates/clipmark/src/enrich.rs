// ABOUTME: Best-effort enrichment hooks run before front-matter generation.
// ABOUTME: Webhook failures degrade to an empty appendix instead of aborting the clip.

//! Pre-frontmatter enrichment.
//!
//! The video rule asks an external summarization webhook for extra tags and
//! a Markdown appendix. Enrichment is strictly best-effort: an unconfigured
//! webhook, an unparseable URL, or any transport failure logs a warning and
//! leaves the clip unchanged.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::callbacks::PreFrontmatterHook;
use crate::properties::ClipProperties;

/// Summarization webhook endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryWebhook {
    pub url: String,
    /// Sent as an `x-api-key` header when present.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    video_id: &'a str,
    url: &'a str,
    title: &'a str,
}

/// Parse the webhook's delimited response: a comma-separated tag line,
/// a `---` divider, then a Markdown appendix. A response without the divider
/// is treated as appendix-only.
pub fn parse_summary_response(body: &str) -> (Vec<String>, String) {
    match body.split_once("\n---\n") {
        Some((tag_line, appendix)) => {
            let tags = tag_line
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            (tags, appendix.trim().to_string())
        }
        None => (Vec::new(), body.trim().to_string()),
    }
}

/// Pull a video identifier out of a watch-page URL: the `v` query parameter,
/// or the first path segment on short-link hosts.
pub fn video_id_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| k == "v") {
        return Some(v.into_owned());
    }
    if parsed.host_str() == Some("youtu.be") {
        let id = parsed.path_segments()?.next()?.to_string();
        if !id.is_empty() {
            return Some(id);
        }
    }
    None
}

/// Run an enrichment hook. Returns the appendix text (possibly empty) and
/// merges any webhook-supplied tags into the property set.
pub async fn run_pre_frontmatter(
    hook: PreFrontmatterHook,
    client: &reqwest::Client,
    webhook: Option<&SummaryWebhook>,
    props: &mut ClipProperties,
) -> String {
    match hook {
        PreFrontmatterHook::YoutubeSummary => {
            summarize_video(client, webhook, props).await.unwrap_or_else(|e| {
                warn!(url = props.url(), error = %e, "summarization skipped");
                String::new()
            })
        }
    }
}

async fn summarize_video(
    client: &reqwest::Client,
    webhook: Option<&SummaryWebhook>,
    props: &mut ClipProperties,
) -> Result<String, anyhow::Error> {
    let webhook = webhook.ok_or_else(|| anyhow::anyhow!("no summary webhook configured"))?;
    let url = props.url().to_string();
    let video_id = video_id_from_url(&url)
        .ok_or_else(|| anyhow::anyhow!("no video id in url"))?;

    let mut request = client.post(&webhook.url).json(&SummaryRequest {
        video_id: &video_id,
        url: &url,
        title: props.title(),
    });
    if let Some(key) = &webhook.api_key {
        request = request.header("x-api-key", key);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("webhook returned status {}", status.as_u16());
    }

    let body = response.text().await?;
    let (tags, appendix) = parse_summary_response(&body);
    if !tags.is_empty() {
        props.extend_list("tags", tags);
    }
    Ok(appendix)
}
