//! Flattening of route pages into text and extraction of the stop list.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Node};

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tbody", "tfoot", "thead", "tr", "ul",
];

const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Renders an HTML document as plain text, one block per line.
///
/// Table cells are separated by a space and link text is wrapped in brackets,
/// so a timetable row comes out as `1 [北京南] 08:00 ...`.
pub fn render_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    render_element(document.root_element(), false, &mut out);

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_element(element: ElementRef, preformatted: bool, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    let preformatted = preformatted || name == "pre";

    if block {
        out.push('\n');
    }
    match name {
        "a" => out.push('['),
        "td" | "th" => push_space(out),
        _ => {}
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(text, preformatted, out),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    render_element(child, preformatted, out);
                }
            }
            _ => {}
        }
    }

    if name == "a" {
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push(']');
    }
    if block {
        out.push('\n');
    }
}

fn push_text(text: &str, preformatted: bool, out: &mut String) {
    if preformatted {
        out.push_str(text);
        return;
    }

    for c in text.chars() {
        if c.is_whitespace() {
            push_space(out);
        } else {
            out.push(c);
        }
    }
}

fn push_space(out: &mut String) {
    if !(out.is_empty() || out.ends_with([' ', '\n', '['])) {
        out.push(' ');
    }
}

/// Extracts the ordered station names from the rendered text of a route page.
///
/// The stop list starts at the first line beginning with `1`; from there a
/// stop line starts with a digit and carries the station name in brackets.
pub fn extract_stations(text: &str) -> Result<Vec<String>> {
    let start = if text.starts_with('1') {
        0
    } else {
        text.find("\n1")
            .map(|i| i + 1)
            .ok_or_else(|| Error::Parse("Stop list not found".to_string()))?
    };

    let mut stations = Vec::new();
    for line in text[start..].split('\n') {
        if !line.contains('[') || !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        stations.push(bracketed_name(line)?.to_string());
    }

    if stations.is_empty() {
        return Err(Error::Parse("No stop lines found".to_string()));
    }

    Ok(stations)
}

fn bracketed_name(line: &str) -> Result<&str> {
    let open = line
        .find('[')
        .ok_or_else(|| Error::Parse(format!("Missing '[' in stop line: {line}")))?;
    let rest = &line[open + 1..];
    let close = rest
        .find(']')
        .ok_or_else(|| Error::Parse(format!("Unclosed station name in stop line: {line}")))?;

    Ok(rest[..close].trim())
}

/// Renders the page and pulls the stop list out of it.
pub fn parse_route_page(html: &str) -> Result<Vec<String>> {
    extract_stations(&render_text(html))
}
