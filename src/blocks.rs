//! Maps a [`FeatureAnalysis`] onto the ordered list of content blocks that
//! make up one documentation page.
//!
//! Block payloads are built as `serde_json::Value` in the document service's
//! wire shape, so the publisher can send them straight through. The page
//! layout is fixed: a title heading, then five (heading, divider, content)
//! section groups, then the flowchart section with an externally rendered
//! image and a collapsible raw-source code block.

use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};

use crate::parse::FeatureAnalysis;

/// Unauthenticated rendering service: the diagram source is base64-encoded
/// into the URL path and rendered when a client later opens the page.
pub const DIAGRAM_RENDER_URL: &str = "https://mermaid.ink/img/";

/// Splits multi-paragraph text on blank lines; each non-empty segment
/// becomes one paragraph.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Splits bulleted text on single newlines, dropping blank lines and
/// stripping a leading bullet glyph or hyphen from each entry.
pub fn split_bullets(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.trim_start_matches(['•', '-'])
                .trim_start()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// URL of the externally rendered diagram image for the given source text.
pub fn flowchart_image_url(source: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(source.as_bytes());
    format!("{DIAGRAM_RENDER_URL}{encoded}")
}

fn text_segment(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

fn heading_1(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "heading_1",
        "heading_1": { "rich_text": [text_segment(text)] },
    })
}

fn heading_2(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "heading_2",
        "heading_2": { "rich_text": [text_segment(text)] },
    })
}

fn divider() -> Value {
    json!({ "object": "block", "type": "divider", "divider": {} })
}

fn callout(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "callout",
        "callout": {
            "rich_text": [text_segment(text)],
            "icon": { "type": "emoji", "emoji": "💡" },
        },
    })
}

fn paragraph(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": [text_segment(text)] },
    })
}

fn bulleted_item(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "bulleted_list_item",
        "bulleted_list_item": { "rich_text": [text_segment(text)] },
    })
}

/// Error entries render the exact error text visually distinguished, then a
/// separator, then the explanation.
fn error_item(error_message: &str, explanation: &str) -> Value {
    json!({
        "object": "block",
        "type": "bulleted_list_item",
        "bulleted_list_item": {
            "rich_text": [
                {
                    "type": "text",
                    "text": { "content": error_message },
                    "annotations": { "bold": true, "code": true },
                },
                text_segment(" — "),
                text_segment(explanation),
            ],
        },
    })
}

fn external_image(url: &str) -> Value {
    json!({
        "object": "block",
        "type": "image",
        "image": { "type": "external", "external": { "url": url } },
    })
}

fn toggle_with_code(label: &str, code: &str, language: &str) -> Value {
    json!({
        "object": "block",
        "type": "toggle",
        "toggle": {
            "rich_text": [text_segment(label)],
            "children": [{
                "object": "block",
                "type": "code",
                "code": {
                    "rich_text": [text_segment(code)],
                    "language": language,
                },
            }],
        },
    })
}

fn section(title: &str, content: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut blocks = vec![heading_2(title), divider()];
    blocks.extend(content);
    blocks
}

/// Builds the full ordered block list for one feature page.
pub fn build_page_blocks(analysis: &FeatureAnalysis) -> Vec<Value> {
    let mut blocks = vec![heading_1(&format!("📘 {}", analysis.feature_name))];

    blocks.extend(section(
        "What Is This?",
        [callout(&analysis.plain_english)],
    ));

    blocks.extend(section(
        "Description",
        split_paragraphs(&analysis.description)
            .into_iter()
            .map(paragraph),
    ));

    blocks.extend(section(
        "How It Works",
        split_paragraphs(&analysis.how_it_works)
            .into_iter()
            .map(paragraph),
    ));

    blocks.extend(section(
        "Technical Details",
        split_bullets(&analysis.technical_details)
            .into_iter()
            .map(bulleted_item),
    ));

    blocks.extend(section(
        "Error Handling",
        analysis
            .error_handling
            .iter()
            .map(|entry| error_item(&entry.error_message, &entry.explanation)),
    ));

    blocks.extend(section(
        "Flowchart",
        [
            external_image(&flowchart_image_url(&analysis.flowchart)),
            toggle_with_code("View flowchart source", &analysis.flowchart, "mermaid"),
        ],
    ));

    blocks
}
