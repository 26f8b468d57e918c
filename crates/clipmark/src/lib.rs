// ABOUTME: Main library entry point for the clipmark web clipper.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ClipResult, Note, ClipError, rules and settings types.

//! clipmark - a rule-driven web clipper.
//!
//! Given a URL, clipmark routes it to a site rule, fetches the page,
//! extracts structured properties and the main content via the rule's
//! selector directives, converts the content to Markdown with a front-matter
//! block, and renders a note ready to write into a document store.
//!
//! # Example
//!
//! ```no_run
//! use clipmark::{Client, ClipError};
//! use clipmark::store::{save_note, DocumentStore, FsStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClipError> {
//!     let client = Client::builder().build();
//!     let note = client.clip_note("https://example.com/article").await?;
//!     let store = FsStore::new("./vault");
//!     save_note(&store, &note, "Clippings")?;
//!     Ok(())
//! }
//! ```

pub mod callbacks;
pub mod client;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod markdown;
pub mod options;
pub mod properties;
pub mod result;
pub mod rules;
pub mod selectors;
pub mod settings;
pub mod store;
pub mod transform;

pub use crate::callbacks::{
    PostHtmlHook, PostMarkdownHook, PreFrontmatterHook, PropertyCallback, RedirectResolver,
};
pub use crate::client::Client;
pub use crate::enrich::SummaryWebhook;
pub use crate::error::{ClipError, ErrorCode};
pub use crate::options::{ClientBuilder, Options};
pub use crate::properties::{ClipProperties, PropertyValue};
pub use crate::result::{ClipResult, Note};
pub use crate::rules::{FetchKind, PropertyRule, Rule, RuleSet};
pub use crate::settings::ClipperSettings;
pub use crate::store::{DocumentStore, FsStore};
