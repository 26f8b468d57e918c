// ABOUTME: Markdown generation: HTML fragment to Markdown body plus YAML-like front matter.
// ABOUTME: Custom element handlers cover figures, embedded players, highlights, and strikethrough.

//! Markdown output.
//!
//! The converter is configured for ATX headings, dashed rules, dash bullets
//! and fenced code blocks. Element handlers add behavior the generic
//! conversion lacks: figures keep their captions, embedded video players
//! become watch-page links, `<mark>` becomes `==highlight==` syntax, and
//! strikethrough tags become `~~text~~`.

use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, HrStyle, Options};
use htmd::{Element, HtmlToMarkdown};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::properties::{ClipProperties, PropertyValue};

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

static YOUTUBE_SRC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:youtube\.com|youtu\.be)/(?:embed/|watch\?v=)?([a-zA-Z0-9_-]+)",
    )
    .unwrap()
});

/// Excess blank lines left behind by removed elements.
static EXCESS_BLANK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Links with empty text that are not images. Rust regex has no lookbehind,
/// so the preceding character (or line start) is captured and restored.
static EMPTY_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[^!])\[\]\([^)]+\)").unwrap());

fn attr_value(el: &Element, name: &str) -> Option<String> {
    el.attrs
        .iter()
        .find(|a| a.name.local.as_ref() == name)
        .map(|a| a.value.to_string())
}

fn converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            hr_style: HrStyle::Dashes,
            bullet_list_marker: BulletListMarker::Dash,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        })
        .skip_tags(vec!["script", "style", "button"])
        .add_handler(vec!["figure"], |el: Element| {
            // Keep the image and demote everything else to a caption line.
            let content = el.content.trim();
            match IMAGE_RE.find(content) {
                Some(m) => {
                    let image = m.as_str();
                    let caption = format!("{}{}", &content[..m.start()], &content[m.end()..]);
                    let caption = caption.trim();
                    if caption.is_empty() {
                        Some(format!("\n\n{}\n\n", image))
                    } else {
                        Some(format!("\n\n{}\n\n{}\n\n", image, caption))
                    }
                }
                None => Some(format!("\n\n{}\n\n", content)),
            }
        })
        .add_handler(vec!["iframe"], |el: Element| {
            let src = attr_value(&el, "src")?;
            match YOUTUBE_SRC_RE.captures(&src) {
                Some(caps) => Some(format!(
                    "![](https://www.youtube.com/watch?v={})",
                    &caps[1]
                )),
                // Non-video embeds survive as raw HTML.
                None => Some(format!("<iframe src=\"{}\"></iframe>", src)),
            }
        })
        .add_handler(vec!["video", "audio"], |el: Element| {
            let src = attr_value(&el, "src")?;
            Some(format!("<{tag} src=\"{src}\"></{tag}>", tag = el.tag))
        })
        .add_handler(vec!["mark"], |el: Element| {
            Some(format!("=={}==", el.content))
        })
        .add_handler(vec!["del", "s", "strike"], |el: Element| {
            Some(format!("~~{}~~", el.content))
        })
        .build()
}

/// Convert an HTML fragment to a Markdown body.
///
/// After conversion, runs of three or more newlines collapse to a blank line
/// and links with no visible text are dropped entirely.
pub fn markdown_body(html: &str) -> String {
    let md = converter().convert(html).unwrap_or_else(|_| html.to_string());
    let md = EXCESS_BLANK_RE.replace_all(&md, "\n\n");
    let md = EMPTY_LINK_RE.replace_all(&md, "$1");
    md.trim().to_string()
}

/// Undo converter escaping that reads badly in a note: backslashes before
/// brackets, hyphens and dots, plus a stray leading backslash.
pub fn clean_escapes(text: &str) -> String {
    let text = text.strip_prefix('\\').unwrap_or(text);
    text.replace("\\[", "[")
        .replace("\\]", "]")
        .replace("\\-", "-")
        .replace("\\.", ".")
}

/// Escape double quotes for a quoted front-matter string.
pub fn escape_double_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn render_scalar(out: &mut String, key: &str, value: &str) {
    if value.is_empty() {
        out.push_str(&format!("{}:\n", key));
    } else if value.parse::<f64>().is_ok() || value == "true" || value == "false" {
        out.push_str(&format!("{}: {}\n", key, value));
    } else {
        out.push_str(&format!("{}: \"{}\"\n", key, escape_double_quotes(value)));
    }
}

/// Render a `---`-delimited front-matter block from the property set.
///
/// List fields render as indented quoted items; numeric-looking and boolean
/// scalars render unquoted; other non-empty strings are quoted and escaped;
/// empty values emit a bare key line. A property set with no non-empty value
/// yields the empty string instead of a degenerate block.
pub fn frontmatter(props: &ClipProperties) -> String {
    let all_empty = props.iter().all(|(_, v)| v.is_empty());
    if all_empty {
        return String::new();
    }

    let mut out = String::from("---\n");
    for (key, value) in props.iter() {
        match value {
            PropertyValue::Text(s) => render_scalar(&mut out, key, s.trim()),
            PropertyValue::List(items) => {
                out.push_str(&format!("{}:\n", key));
                for item in items {
                    out.push_str(&format!("  - \"{}\"\n", escape_double_quotes(item)));
                }
            }
        }
    }
    out.push_str("---\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn converts_basic_structure() {
        let md = markdown_body("<h2>Section</h2><p>Some <strong>bold</strong> text</p>");
        assert!(md.contains("## Section"));
        assert!(md.contains("**bold**"));
    }

    #[test]
    fn skips_scripts_and_buttons() {
        let md = markdown_body("<p>keep</p><script>var x;</script><button>Share</button>");
        assert!(md.contains("keep"));
        assert!(!md.contains("var x"));
        assert!(!md.contains("Share"));
    }

    #[test]
    fn unordered_lists_use_dashes() {
        let md = markdown_body("<ul><li>one</li><li>two</li></ul>");
        assert!(md.contains("- one"));
        assert!(md.contains("- two"));
    }

    #[test]
    fn figure_keeps_image_and_caption() {
        let md = markdown_body(
            r#"<figure><img src="/a.png" alt="chart"><figcaption>Q3 revenue</figcaption></figure>"#,
        );
        assert!(md.contains("![chart](/a.png)"));
        assert!(md.contains("Q3 revenue"));
    }

    #[test]
    fn youtube_iframe_becomes_watch_link() {
        let md = markdown_body(
            r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>"#,
        );
        assert_eq!(md, "![](https://www.youtube.com/watch?v=dQw4w9WgXcQ)");
    }

    #[test]
    fn non_video_iframe_survives_as_html() {
        let md = markdown_body(r#"<iframe src="https://maps.example.com/embed"></iframe>"#);
        assert!(md.contains("<iframe src=\"https://maps.example.com/embed\">"));
    }

    #[test]
    fn mark_and_strikethrough_get_extended_syntax() {
        let md = markdown_body("<p><mark>hot</mark> and <del>cold</del> and <s>gone</s></p>");
        assert!(md.contains("==hot=="));
        assert!(md.contains("~~cold~~"));
        assert!(md.contains("~~gone~~"));
    }

    #[test]
    fn empty_links_are_removed_but_images_kept() {
        let md = markdown_body(
            r#"<p>text <a href="https://x.example"></a> more</p><p><img src="/i.png"></p>"#,
        );
        assert!(!md.contains("](https://x.example)"));
        assert!(md.contains("![](/i.png)"));
    }

    #[test]
    fn excess_blank_lines_collapse() {
        let md = markdown_body("<p>a</p><div></div><div></div><div></div><p>b</p>");
        assert!(!md.contains("\n\n\n"));
    }

    #[test]
    fn clean_escapes_unescapes_brackets_and_rules() {
        assert_eq!(clean_escapes("\\- item \\[x\\]"), "- item [x]");
        assert_eq!(clean_escapes("\\---"), "---");
        assert_eq!(clean_escapes("1\\. first"), "1. first");
    }

    #[test]
    fn frontmatter_quotes_and_escapes_strings() {
        let mut props = ClipProperties::default();
        props.set("title", PropertyValue::Text("He said \"hi\"".into()));
        let fm = frontmatter(&props);
        assert_eq!(fm, "---\ntitle: \"He said \\\"hi\\\"\"\n---\n");
    }

    #[test]
    fn frontmatter_renders_lists_as_indented_items() {
        let mut props = ClipProperties::default();
        props.set(
            "tags",
            PropertyValue::List(vec!["clipping/web/default".into(), "news".into()]),
        );
        let fm = frontmatter(&props);
        assert!(fm.contains("tags:\n  - \"clipping/web/default\"\n  - \"news\"\n"));
    }

    #[test]
    fn frontmatter_leaves_numbers_and_booleans_unquoted() {
        let mut props = ClipProperties::default();
        props.set("rating", PropertyValue::Text("4.5".into()));
        props.set("starred", PropertyValue::Text("true".into()));
        let fm = frontmatter(&props);
        assert!(fm.contains("rating: 4.5\n"));
        assert!(fm.contains("starred: true\n"));
    }

    #[test]
    fn frontmatter_emits_bare_key_for_empty_values() {
        let mut props = ClipProperties::default();
        props.set("title", PropertyValue::Text("A".into()));
        props.set("author", PropertyValue::Text(String::new()));
        let fm = frontmatter(&props);
        assert!(fm.contains("author:\n"));
    }

    #[test]
    fn all_empty_properties_yield_empty_string() {
        let mut props = ClipProperties::default();
        props.set("author", PropertyValue::Text(String::new()));
        props.set("tags", PropertyValue::List(vec![]));
        assert_eq!(frontmatter(&props), "");
    }
}
