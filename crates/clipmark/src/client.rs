// ABOUTME: The main Client struct wiring the clip pipeline: route, fetch, extract, transform, render.
// ABOUTME: Provides async clip() for structured results and clip_note() for store-ready notes.

//! The clipping client.
//!
//! One clip runs start to finish with no parallelism: route the URL to a
//! rule, fetch per the rule's strategy, extract properties from the
//! unstripped document, strip and extract content, run enrichment, then
//! render front matter and Markdown. Each stage's failure aborts the clip
//! except enrichment, which is best-effort.

use tracing::info;

use crate::callbacks::sanitize_name;
use crate::enrich::run_pre_frontmatter;
use crate::error::ClipError;
use crate::extract::extract_properties;
use crate::fetch::{fetch_for_rule, validate_url};
use crate::markdown::{clean_escapes, frontmatter, markdown_body};
use crate::options::{ClientBuilder, Options};
use crate::result::{ClipResult, Note};
use crate::rules::RuleSet;
use crate::settings::apply_template;
use crate::transform::transform_content;

/// The clipping client. Holds the HTTP client, the rule table, and settings;
/// cheap to clone is not a goal, build once and reuse.
#[derive(Debug)]
pub struct Client {
    opts: Options,
    http: reqwest::Client,
    rules: RuleSet,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http = opts.http_client.clone().unwrap_or_else(|| {
            let mut builder = reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true);
            if let Some(timeout) = opts.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build().expect("failed to build HTTP client")
        });

        let rules = opts.rules.clone().unwrap_or_default();
        rules.precompile();

        Self { opts, http, rules }
    }

    /// The rule table this client routes with.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The clipper settings this client was built with.
    pub fn settings(&self) -> &crate::settings::ClipperSettings {
        &self.opts.settings
    }

    /// Clip a URL into structured properties, front matter, and a Markdown
    /// body.
    pub async fn clip(&self, url: &str) -> Result<ClipResult, ClipError> {
        validate_url(url)?;

        let rule = self.rules.route(url);
        info!(%url, rule = %rule.pattern, "clipping");

        let doc = fetch_for_rule(&self.http, url, rule).await?;

        // Properties read the unstripped document; transform mutates it.
        let mut properties = extract_properties(&doc, rule, url);
        let html = transform_content(&doc, rule, url)?;
        drop(doc);

        let appendix = match rule.pre_frontmatter {
            Some(hook) => {
                run_pre_frontmatter(
                    hook,
                    &self.http,
                    self.opts.settings.summary_webhook.as_ref(),
                    &mut properties,
                )
                .await
            }
            None => String::new(),
        };

        let frontmatter = frontmatter(&properties);
        let mut body = markdown_body(&html);
        if let Some(hook) = rule.post_markdown {
            body = hook.apply(&properties, &body, &appendix);
        } else if !appendix.is_empty() {
            body = format!("{}\n\n{}", body, appendix);
        }

        Ok(ClipResult {
            pattern: rule.pattern.clone(),
            properties,
            frontmatter,
            body,
        })
    }

    /// Clip a URL and render it into a store-ready note: the body is run
    /// through the pattern's template and the filename derives from the
    /// sanitized title.
    pub async fn clip_note(&self, url: &str) -> Result<Note, ClipError> {
        let result = self.clip(url).await?;

        let template = self.opts.settings.template_for(&result.pattern);
        let body = apply_template(template, &result.properties, &clean_escapes(&result.body));
        let content = if result.frontmatter.is_empty() {
            body
        } else {
            format!("{}\n{}", result.frontmatter, body)
        };

        Ok(Note {
            filename: sanitize_name(result.properties.title()),
            content,
        })
    }
}
