// ABOUTME: Property value model for clipped pages: scalar/list values and an ordered field map.
// ABOUTME: ClipProperties preserves insertion order so front matter output is deterministic.

use serde::{Deserialize, Serialize};

/// A single extracted property value: a scalar string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Returns the scalar text, or None for list values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::List(_) => None,
        }
    }

    /// Returns the list items, or None for scalar values.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            PropertyValue::Text(_) => None,
        }
    }

    /// True for empty strings and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Text(s) => s.trim().is_empty(),
            PropertyValue::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(items: Vec<String>) -> Self {
        PropertyValue::List(items)
    }
}

/// The structured property set for one clip.
///
/// Always contains the mandatory fields (title, url, author, published,
/// clipped, description, tags); rules may add arbitrary extra fields which
/// pass through to the front matter unchanged. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipProperties {
    fields: Vec<(String, PropertyValue)>,
}

impl ClipProperties {
    /// Seed the mandatory field set: title defaults to "Untitled", tags to an
    /// empty list, everything else to the empty string. `url` is set from the
    /// input URL.
    pub fn with_defaults(url: &str) -> Self {
        let mut props = Self::default();
        props.set("title", PropertyValue::Text("Untitled".to_string()));
        props.set("url", PropertyValue::Text(url.to_string()));
        props.set("author", PropertyValue::Text(String::new()));
        props.set("published", PropertyValue::Text(String::new()));
        props.set("clipped", PropertyValue::Text(String::new()));
        props.set("description", PropertyValue::Text(String::new()));
        props.set("tags", PropertyValue::List(Vec::new()));
        props
    }

    /// Get a field value by name.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Set a field, replacing any existing value but keeping its position.
    pub fn set(&mut self, key: &str, value: PropertyValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key.to_string(), value));
        }
    }

    /// Append items to a list-valued field, creating it if absent. A scalar
    /// value at the key is replaced by the list.
    pub fn extend_list(&mut self, key: &str, items: Vec<String>) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, PropertyValue::List(existing))) => existing.extend(items),
            Some(slot) => slot.1 = PropertyValue::List(items),
            None => self.fields.push((key.to_string(), PropertyValue::List(items))),
        }
    }

    /// The scalar text of a field, empty string if absent or list-valued.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(|v| v.as_text()).unwrap_or("")
    }

    /// The title field, guaranteed present after `with_defaults`.
    pub fn title(&self) -> &str {
        self.text("title")
    }

    /// The url field.
    pub fn url(&self) -> &str {
        self.text("url")
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_contain_mandatory_fields() {
        let props = ClipProperties::with_defaults("https://example.com/a");
        for key in ["title", "url", "author", "published", "clipped", "description", "tags"] {
            assert!(props.get(key).is_some(), "missing default field {}", key);
        }
        assert_eq!(props.title(), "Untitled");
        assert_eq!(props.url(), "https://example.com/a");
        assert_eq!(props.get("tags"), Some(&PropertyValue::List(vec![])));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut props = ClipProperties::with_defaults("https://example.com");
        props.set("title", PropertyValue::Text("Hello".into()));
        assert_eq!(props.title(), "Hello");
        // Position unchanged: title is still first
        assert_eq!(props.iter().next().unwrap().0, "title");
    }

    #[test]
    fn extend_list_appends_to_existing() {
        let mut props = ClipProperties::with_defaults("https://example.com");
        props.set("tags", PropertyValue::List(vec!["clipping/youtube/video".into()]));
        props.extend_list("tags", vec!["news".into(), "tech".into()]);
        assert_eq!(
            props.get("tags").unwrap().as_list().unwrap(),
            &["clipping/youtube/video", "news", "tech"]
        );
    }

    #[test]
    fn extra_fields_preserve_insertion_order() {
        let mut props = ClipProperties::with_defaults("https://example.com");
        props.set("rating", PropertyValue::Text("5".into()));
        props.set("source", PropertyValue::Text("feed".into()));
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(&keys[keys.len() - 2..], &["rating", "source"]);
    }
}
