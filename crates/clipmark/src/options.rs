// ABOUTME: Configuration options for the clipmark client and the fluent ClientBuilder.

use std::time::Duration;

use crate::client::Client;
use crate::fetch::USER_AGENT;
use crate::rules::RuleSet;
use crate::settings::ClipperSettings;

/// Configuration options for the clipmark client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub settings: ClipperSettings,
    pub http_client: Option<reqwest::Client>,
    pub rules: Option<RuleSet>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            // No timeout by default: slow hosts fail via status or transport
            // errors, never via a local deadline.
            timeout: None,
            user_agent: USER_AGENT.to_string(),
            settings: ClipperSettings::default(),
            http_client: None,
            rules: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a request timeout. Off by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use specific clipper settings.
    pub fn settings(mut self, settings: ClipperSettings) -> Self {
        self.opts.settings = settings;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Use a custom rule table instead of the built-in one.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.opts.rules = Some(rules);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}
