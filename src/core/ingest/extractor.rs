//! Markup-to-text extraction.
//!
//! Extractors never fail: bytes are decoded lossily and anything the
//! parser does not recognise as markup is passed through as text.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Turns raw file bytes into visible text
pub trait TextExtractor: Send + Sync {
    /// Extract the visible text, discarding markup
    fn extract_text(&self, raw: &[u8]) -> String;
}

/// Which extractor the pipeline uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// CommonMark, with embedded HTML reduced to text
    #[default]
    Markdown,
    /// HTML documents
    Html,
}

impl ExtractorKind {
    /// Instantiate the extractor for this kind
    pub fn build(&self) -> Box<dyn TextExtractor> {
        match self {
            ExtractorKind::Markdown => Box::new(MarkdownExtractor),
            ExtractorKind::Html => Box::new(HtmlExtractor),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractorKind::Markdown => f.write_str("markdown"),
            ExtractorKind::Html => f.write_str("html"),
        }
    }
}

/// Elements whose text content is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts text from Markdown (CommonMark + tables/strikethrough)
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract_text(&self, raw: &[u8]) -> String {
        let source = String::from_utf8_lossy(raw);
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;

        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut html = String::new();
        let mut in_html_block = false;

        for event in Parser::new_ext(&source, options) {
            match event {
                Event::Start(Tag::HtmlBlock) => in_html_block = true,
                Event::End(TagEnd::HtmlBlock) => {
                    in_html_block = false;
                    push_html_text(&html, &mut pieces);
                    html.clear();
                }
                Event::Html(fragment) => {
                    if in_html_block {
                        html.push_str(&fragment);
                    } else {
                        push_html_text(&fragment, &mut pieces);
                    }
                }
                // Inline tags are dropped; the text around them survives
                Event::InlineHtml(_) => {}
                Event::Text(text) | Event::Code(text) => current.push_str(&text),
                Event::SoftBreak | Event::HardBreak => current.push(' '),
                Event::End(
                    TagEnd::Paragraph
                    | TagEnd::Heading(_)
                    | TagEnd::Item
                    | TagEnd::CodeBlock
                    | TagEnd::TableCell,
                ) => flush(&mut current, &mut pieces),
                _ => {}
            }
        }
        flush(&mut current, &mut pieces);

        pieces.join(" ")
    }
}

/// Extracts the visible text nodes of an HTML document
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl TextExtractor for HtmlExtractor {
    fn extract_text(&self, raw: &[u8]) -> String {
        let source = String::from_utf8_lossy(raw);
        let mut pieces = Vec::new();
        push_html_text(&source, &mut pieces);
        pieces.join(" ")
    }
}

/// Parse `html` and push its trimmed visible text nodes onto `pieces`
fn push_html_text(html: &str, pieces: &mut Vec<String>) {
    let document = Html::parse_document(html);

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| {
                parent
                    .value()
                    .as_element()
                    .map(|e| HIDDEN_ELEMENTS.contains(&e.name()))
            })
            .unwrap_or(false);
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(normalize_whitespace(trimmed));
        }
    }
}

fn flush(current: &mut String, pieces: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        pieces.push(normalize_whitespace(trimmed));
    }
    current.clear();
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
