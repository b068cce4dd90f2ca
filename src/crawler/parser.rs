//! HTML and script extraction for the broadcast pages
//!
//! This module pulls three things out of fetched markup:
//! - The fallback audio path assigned in the page script
//! - The notes text (temperature readings and the italic remark)
//! - Special broadcasts embedded as `<audio>` elements
//!
//! Nothing here can fail. Markup that lacks what is looked for yields `None`,
//! an empty string or an empty list.

use crate::config::NotesConfig;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

static FALLBACK_ASSIGNMENT: OnceLock<Option<Regex>> = OnceLock::new();

fn fallback_pattern() -> Option<&'static Regex> {
    FALLBACK_ASSIGNMENT
        .get_or_init(|| Regex::new(r#"var\s+fallback\s*=\s*"([^"]+)""#).ok())
        .as_ref()
}

/// A special broadcast found on the specials page, before title parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpecial {
    /// Text preceding the audio element, may contain a parenthesized date
    pub raw_title: String,

    /// Absolute audio URL
    pub source: String,
}

/// Extracts the relative path assigned to `var fallback = "..."`
///
/// # Example
///
/// ```
/// use meer_weer::crawler::extract_fallback_path;
///
/// let html = r#"<script>var fallback = "/alert/Alert_0703.mp3";</script>"#;
/// assert_eq!(extract_fallback_path(html), Some("/alert/Alert_0703.mp3".to_string()));
/// ```
pub fn extract_fallback_path(html: &str) -> Option<String> {
    fallback_pattern()?
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Builds the notes text of the daily episode
///
/// The first paragraph is the text of the first anchor whose `href` contains
/// the configured fragment, followed by the two nearest following elements of
/// the configured tag, joined by the separator. The second paragraph is the
/// first italic block of the page. Paragraphs are separated by a blank line;
/// whichever part is missing is left out.
pub fn extract_notes(html: &str, config: &NotesConfig) -> String {
    let document = Html::parse_document(html);

    [
        readings_paragraph(&document, config),
        italic_paragraph(&document),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Anchor text plus the paired readings that follow it
fn readings_paragraph(document: &Html, config: &NotesConfig) -> Option<String> {
    let anchor_selector = Selector::parse("a[href]").ok()?;
    let anchor = document.select(&anchor_selector).find(|a| {
        a.value()
            .attr("href")
            .is_some_and(|href| href.contains(config.anchor_fragment.as_str()))
    })?;
    let anchor_id = anchor.id();

    let readings: Vec<String> = document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != anchor_id)
        .skip(1)
        .filter(|node| !node.ancestors().any(|a| a.id() == anchor_id))
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name().eq_ignore_ascii_case(&config.value_tag))
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .take(2)
        .collect();

    let parts: Vec<String> = [element_text(&anchor), readings.join(config.separator.as_str())]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Text of the first `<i>` or `<em>` block
fn italic_paragraph(document: &Html) -> Option<String> {
    let selector = Selector::parse("i, em").ok()?;
    document
        .select(&selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

/// Finds every embedded special broadcast
///
/// Each `<audio>` element contributes its `src` (or that of its first
/// `<source>` child) resolved against `page_url`, paired with the nearest
/// non-empty text before it. `<br>` markers carry no text and are passed
/// over. Elements missing either half are dropped.
pub fn extract_special_episodes(html: &str, page_url: &Url) -> Vec<RawSpecial> {
    let document = Html::parse_document(html);
    let Ok(source_selector) = Selector::parse("source[src]") else {
        return Vec::new();
    };

    let nodes: Vec<_> = document.tree.root().descendants().collect();
    let mut specials = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        let Some(audio) = ElementRef::wrap(*node) else {
            continue;
        };
        if audio.value().name() != "audio" {
            continue;
        }

        let src = audio
            .value()
            .attr("src")
            .or_else(|| {
                audio
                    .select(&source_selector)
                    .next()
                    .and_then(|source| source.value().attr("src"))
            })
            .map(str::trim)
            .filter(|src| !src.is_empty());

        let raw_title = nodes[..index].iter().rev().find_map(|candidate| {
            let text = candidate.value().as_text()?.trim();
            let in_non_prose = candidate
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|el| matches!(el.value().name(), "audio" | "script" | "style"));
            if text.is_empty() || in_non_prose {
                return None;
            }
            Some(collapse_whitespace(text))
        });

        match (raw_title, src.and_then(|src| page_url.join(src).ok())) {
            (Some(raw_title), Some(source)) => specials.push(RawSpecial {
                raw_title,
                source: source.to_string(),
            }),
            (title, _) => {
                tracing::debug!("Skipping audio element without title or source ({:?})", title);
            }
        }
    }

    specials
}

/// Whitespace-normalized text content of an element
fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
