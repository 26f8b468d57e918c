// ABOUTME: Error types for the clipmark pipeline including ErrorCode enum and ClipError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of clip failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The input could not be parsed as an absolute http(s) URL.
    InvalidUrl,
    /// A fetch returned a non-200 status.
    Http(u16),
    /// A rule names a redirect or post-processing hook that is not wired up.
    CallbackNotFound,
    /// The rule's root content selector matched nothing.
    ContentNotFound,
    /// The requested fetch strategy is a declared but unfulfilled extension point.
    NotImplemented,
    /// Transport-level fetch failure (connect, decode, body read).
    Fetch,
    /// Document store failure (target exists, I/O error).
    Store,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidUrl => write!(f, "invalid URL"),
            ErrorCode::Http(status) => write!(f, "HTTP status {}", status),
            ErrorCode::CallbackNotFound => write!(f, "callback not found"),
            ErrorCode::ContentNotFound => write!(f, "content not found"),
            ErrorCode::NotImplemented => write!(f, "not implemented"),
            ErrorCode::Fetch => write!(f, "fetch error"),
            ErrorCode::Store => write!(f, "store error"),
        }
    }
}

/// The main error type for clip operations.
#[derive(Debug, thiserror::Error)]
pub struct ClipError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clipmark: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ClipError {
    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Http error carrying the response status.
    pub fn http(status: u16, url: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Http(status),
            url: url.into(),
            op: op.into(),
            source: None,
        }
    }

    /// Create a CallbackNotFound error. Indicates a configuration bug in a Rule.
    pub fn callback_not_found(
        url: impl Into<String>,
        op: impl Into<String>,
        name: impl fmt::Display,
    ) -> Self {
        Self {
            code: ErrorCode::CallbackNotFound,
            url: url.into(),
            op: op.into(),
            source: Some(anyhow::anyhow!("no callback registered for {}", name)),
        }
    }

    /// Create a ContentNotFound error for the given root selector.
    pub fn content_not_found(
        url: impl Into<String>,
        op: impl Into<String>,
        selector: impl fmt::Display,
    ) -> Self {
        Self {
            code: ErrorCode::ContentNotFound,
            url: url.into(),
            op: op.into(),
            source: Some(anyhow::anyhow!("no element matches selector {}", selector)),
        }
    }

    /// Create a NotImplemented error.
    pub fn not_implemented(url: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NotImplemented,
            url: url.into(),
            op: op.into(),
            source: Some(anyhow::anyhow!("not implemented yet")),
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Fetch,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Store error.
    pub fn store(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Store,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is an Http error.
    pub fn is_http(&self) -> bool {
        matches!(self.code, ErrorCode::Http(_))
    }

    /// Returns the HTTP status if this is an Http error.
    pub fn http_status(&self) -> Option<u16> {
        match self.code {
            ErrorCode::Http(status) => Some(status),
            _ => None,
        }
    }

    /// Returns true if this is a CallbackNotFound error.
    pub fn is_callback_not_found(&self) -> bool {
        self.code == ErrorCode::CallbackNotFound
    }

    /// Returns true if this is a ContentNotFound error.
    pub fn is_content_not_found(&self) -> bool {
        self.code == ErrorCode::ContentNotFound
    }

    /// Returns true if this is a NotImplemented error.
    pub fn is_not_implemented(&self) -> bool {
        self.code == ErrorCode::NotImplemented
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Store error.
    pub fn is_store(&self) -> bool {
        self.code == ErrorCode::Store
    }
}
