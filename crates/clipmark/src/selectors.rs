// ABOUTME: Pre-compiled CSS selector cache for O(1) selector lookup.
// ABOUTME: Eliminates repeated parsing of CSS selectors across clips.

//! Selector caching for efficient repeated DOM queries.
//!
//! CSS selector parsing is expensive relative to the actual DOM matching,
//! and the rule table reuses the same handful of selectors on every clip.
//! This module compiles each selector once and reuses it thereafter.

use std::collections::HashMap;
use std::sync::RwLock;

use dom_query::{Document, Matcher, Selection};
use once_cell::sync::Lazy;

/// Thread-safe cache of compiled CSS selectors.
///
/// Uses a RwLock for read-heavy workloads: most accesses are cache hits
/// (reads), with occasional cache misses requiring writes.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Matcher>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Matcher)` if the selector is valid, `None` if invalid.
/// Invalid selectors are cached too so they fail fast on repeat.
pub fn get_or_compile(css: &str) -> Option<Matcher> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Matcher::new(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Double-check after acquiring write lock (another thread may have inserted)
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Select against a document through the cache.
///
/// Returns `None` when the selector fails to compile; an empty Selection
/// when it compiles but matches nothing.
pub fn select_cached<'a>(doc: &'a Document, css: &str) -> Option<Selection<'a>> {
    let matcher = get_or_compile(css)?;
    Some(doc.select_matcher(&matcher))
}

/// Precompiles a batch of selectors into the cache.
///
/// Call during initialization (after building the rule table) to warm the
/// cache and avoid lock contention during clips.
pub fn precompile_selectors<I, S>(selectors: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cache = SELECTOR_CACHE.write().unwrap();
    for css in selectors {
        let css = css.as_ref();
        if !cache.contains_key(css) {
            let compiled = Matcher::new(css).ok();
            cache.insert(css.to_string(), compiled);
        }
    }
}
