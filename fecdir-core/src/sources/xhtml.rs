//! Layout XHTML Parser
//!
//! Reads the positioned XHTML written by PDF layout extractors:
//! - Page divs (`<div class="page">`)
//! - Paragraphs of spans carrying `data-bbox="x,y,w,h"` and `data-line`
//! - Plain `<p>` text when no spans are present
//! - `<table><tr><td>` grids, which become table rows
//!
//! Spans sharing a paragraph and a `data-line` form one text line. Lines are
//! sorted top to bottom, then left to right.

use super::PageSource;
use crate::error::ExtractionError;
use crate::types::{Page, TableRow};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<div class="page"[^>]*>(.*?)</div>"#).unwrap());

static PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<p[^>]*>(.*?)</p>").unwrap());

static SPAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<span([^>]*)>(.*?)</span>").unwrap());

static BBOX_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-bbox="([^"]*)""#).unwrap());

static LINE_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-line="([^"]*)""#).unwrap());

static TABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<table[^>]*>(.*?)</table>").unwrap());

static ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").unwrap());

static CELL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<t[dh][^>]*>(.*?)</t[dh]>").unwrap());

static BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br\s*/?>").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|nbsp);").unwrap());

pub struct XhtmlSource {
    path: PathBuf,
}

impl XhtmlSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl PageSource for XhtmlSource {
    fn pages(&self) -> Result<Vec<Page>, ExtractionError> {
        let markup = std::fs::read_to_string(&self.path)
            .map_err(|e| ExtractionError::io(&self.path, e))?;
        let pages = parse_xhtml(&markup);
        tracing::debug!("{}: {} pages", self.path.display(), pages.len());
        Ok(pages)
    }

    fn name(&self) -> &str {
        "XhtmlSource"
    }
}

/// Parse layout XHTML into pages. A document without page divs is one page.
pub fn parse_xhtml(markup: &str) -> Vec<Page> {
    let page_bodies: Vec<&str> = PAGE_REGEX
        .captures_iter(markup)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect();

    if page_bodies.is_empty() {
        return vec![parse_page(1, markup)];
    }

    page_bodies
        .into_iter()
        .enumerate()
        .map(|(index, body)| parse_page(index as u32 + 1, body))
        .collect()
}

/// A text line with the position of its leftmost span
struct PositionedLine {
    x: f32,
    y: f32,
    text: String,
}

fn parse_page(number: u32, page_html: &str) -> Page {
    let rows = extract_rows(page_html);
    let without_tables = TABLE_REGEX.replace_all(page_html, "");

    let mut positioned = Vec::new();
    for p_cap in PARAGRAPH_REGEX.captures_iter(&without_tables) {
        if let Some(p_content) = p_cap.get(1) {
            extract_paragraph_lines(p_content.as_str(), &mut positioned);
        }
    }

    // Stable sort: unpositioned lines stay after the line they followed
    positioned.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x)));

    let mut lines: Vec<String> = positioned.into_iter().map(|line| line.text).collect();
    // Table rows take part in state detection like any other page text
    lines.extend(rows.iter().filter_map(|row| {
        let cells: Vec<&str> = row.iter().flatten().map(String::as_str).collect();
        if cells.is_empty() {
            None
        } else {
            Some(cells.join(" | "))
        }
    }));

    Page::new(number, lines).with_rows(rows)
}

fn extract_paragraph_lines(paragraph_html: &str, lines: &mut Vec<PositionedLine>) {
    let (inherited_x, inherited_y) = lines.last().map(|l| (l.x, l.y)).unwrap_or((0.0, 0.0));

    // line number -> (x, y, text) fragments
    let mut grouped: BTreeMap<u32, Vec<(f32, f32, String)>> = BTreeMap::new();
    for cap in SPAN_REGEX.captures_iter(paragraph_html) {
        let (Some(attrs), Some(content)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        let text = clean_text(content.as_str());
        if text.is_empty() {
            continue;
        }

        let (x, y) = BBOX_ATTR_REGEX
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .and_then(|bbox| parse_bbox(bbox.as_str()))
            .unwrap_or((inherited_x, inherited_y));
        let line_number = LINE_ATTR_REGEX
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .and_then(|line| line.as_str().parse::<u32>().ok())
            .unwrap_or(0);

        grouped.entry(line_number).or_default().push((x, y, text));
    }

    if grouped.is_empty() {
        let with_breaks = BREAK_REGEX.replace_all(paragraph_html, "\n");
        for raw in with_breaks.lines() {
            let text = clean_text(raw);
            if !text.is_empty() {
                lines.push(PositionedLine {
                    x: inherited_x,
                    y: inherited_y,
                    text,
                });
            }
        }
        return;
    }

    for (_, mut fragments) in grouped {
        fragments.sort_by(|a, b| a.0.total_cmp(&b.0));
        let x = fragments[0].0;
        let y = fragments
            .iter()
            .map(|f| f.1)
            .fold(f32::INFINITY, f32::min);
        let text = fragments
            .into_iter()
            .map(|f| f.2)
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(PositionedLine { x, y, text });
    }
}

/// Parse bounding box: "x,y,width,height"
fn parse_bbox(bbox: &str) -> Option<(f32, f32)> {
    let parts: Vec<&str> = bbox.split(',').collect();
    if parts.len() != 4 {
        return None;
    }
    let x = parts[0].trim().parse::<f32>().ok()?;
    let y = parts[1].trim().parse::<f32>().ok()?;
    Some((x, y))
}

fn extract_rows(page_html: &str) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for table in TABLE_REGEX.captures_iter(page_html) {
        let Some(table_html) = table.get(1) else {
            continue;
        };
        for row in ROW_REGEX.captures_iter(table_html.as_str()) {
            let Some(row_html) = row.get(1) else {
                continue;
            };
            let cells: TableRow = CELL_REGEX
                .captures_iter(row_html.as_str())
                .map(|cell| {
                    let text = cell.get(1).map(|m| clean_text(m.as_str())).unwrap_or_default();
                    if text.is_empty() {
                        None
                    } else {
                        Some(text)
                    }
                })
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
    }
    rows
}

/// Strip tags, decode entities and collapse whitespace
fn clean_text(html: &str) -> String {
    let stripped = TAG_REGEX.replace_all(html, " ");
    let decoded = unescape(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            match entity {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                "nbsp" => " ".to_string(),
                _ => {
                    let code = if let Some(hex) = entity
                        .strip_prefix("#x")
                        .or_else(|| entity.strip_prefix("#X"))
                    {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity[1..].parse::<u32>().ok()
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_default()
                }
            }
        })
        .into_owned()
}
