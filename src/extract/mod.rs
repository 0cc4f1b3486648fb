//! Isolates a single HTML document from free-form model output.
//!
//! Strategies, in order of confidence:
//!
//! 1. A fenced code block tagged `html` (or an untagged fence holding markup) that
//!    contains a complete document.
//! 2. The first `<html ...>` tag through the first following `</html>`.
//! 3. A document that is opened but never closed is rejected as truncated.
//! 4. The first markup fence, else the whole trimmed input, flagged as unverified.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FENCE: &str = "```";

static HTML_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<html(?:\s[^>]*)?>").expect("html open tag regex must compile")
});

static HTML_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</html\s*>").expect("html close tag regex must compile"));

/// A doctype declaration followed only by whitespace up to the end of the haystack.
static DOCTYPE_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!doctype[^>]*>\s*\z").expect("doctype tail regex must compile")
});

static DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype\s+html").expect("doctype regex must compile"));

static DOCUMENT_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A(?:<!doctype[^>]*>\s*)?<html(?:\s[^>]*)?>")
        .expect("document start regex must compile")
});

static DOCUMENT_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</html\s*>\z").expect("document end regex must compile")
});

/// How the document was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Fenced,
    Tagged,
    /// No complete document markers were found; the text is used as-is.
    Unverified,
}

/// A document isolated from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub document: String,
    /// Prose surrounding the document, empty when there was none.
    pub explanation: String,
    pub confidence: Confidence,
}

impl Extraction {
    pub fn is_verified(&self) -> bool {
        self.confidence != Confidence::Unverified
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("response is empty")]
    Empty,

    /// An HTML document was opened but never closed, typically a response cut off
    /// at the token limit.
    #[error("response ends inside an unfinished HTML document")]
    Truncated,
}

/// Extract a single HTML document from raw model output.
pub fn extract(raw: &str) -> Result<Extraction, ExtractionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::Empty);
    }

    let candidates = markup_fences(raw);
    for fence in &candidates {
        let body = fence_body(raw, fence);
        let document = if is_complete_document(body) {
            Some(body)
        } else {
            find_document_span(body).map(|span| &body[span])
        };
        if let Some(document) = document {
            return Ok(Extraction {
                document: document.to_string(),
                explanation: surrounding_prose(raw, fence.outer.clone()),
                confidence: Confidence::Fenced,
            });
        }
    }

    if let Some(span) = find_document_span(raw) {
        return Ok(Extraction {
            document: raw[span.clone()].to_string(),
            explanation: surrounding_prose(raw, span),
            confidence: Confidence::Tagged,
        });
    }

    if has_unclosed_document(raw) {
        return Err(ExtractionError::Truncated);
    }

    // Markup without document markers: prefer the fenced fragment over the whole reply.
    if let Some(fence) = candidates.iter().find(|f| !fence_body(raw, f).is_empty()) {
        return Ok(Extraction {
            document: fence_body(raw, fence).to_string(),
            explanation: surrounding_prose(raw, fence.outer.clone()),
            confidence: Confidence::Unverified,
        });
    }

    Ok(Extraction {
        document: trimmed.to_string(),
        explanation: String::new(),
        confidence: Confidence::Unverified,
    })
}

/// Whether `text` (already trimmed) starts with a doctype or `<html` and ends with `</html>`.
pub fn is_complete_document(text: &str) -> bool {
    DOCUMENT_START_RE.is_match(text) && DOCUMENT_END_RE.is_match(text)
}

#[derive(Debug)]
struct Fence {
    info: String,
    body: Range<usize>,
    outer: Range<usize>,
}

impl Fence {
    fn language(&self) -> Option<String> {
        self.info
            .split_whitespace()
            .next()
            .map(|tag| tag.to_ascii_lowercase())
    }
}

/// Split `raw` into fenced blocks. A block closes at the first fence after its opening
/// line; an unterminated block runs to the end of the input.
fn fences(raw: &str) -> Vec<Fence> {
    let mut out = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = raw[cursor..].find(FENCE) {
        let open = cursor + rel;
        let after_marker = open + FENCE.len();
        let Some(newline) = raw[after_marker..].find('\n') else {
            break;
        };
        let info = raw[after_marker..after_marker + newline].trim().to_string();
        let body_start = after_marker + newline + 1;

        match raw[body_start..].find(FENCE) {
            Some(rel_close) => {
                let close = body_start + rel_close;
                out.push(Fence {
                    info,
                    body: body_start..close,
                    outer: open..close + FENCE.len(),
                });
                cursor = close + FENCE.len();
            }
            None => {
                out.push(Fence {
                    info,
                    body: body_start..raw.len(),
                    outer: open..raw.len(),
                });
                break;
            }
        }
    }

    out
}

/// Fences that may hold the document: `html`-tagged ones first, then untagged ones
/// holding markup, each group in input order.
fn markup_fences(raw: &str) -> Vec<Fence> {
    let (tagged, rest): (Vec<_>, Vec<_>) = fences(raw)
        .into_iter()
        .partition(|f| f.language().as_deref() == Some("html"));
    let untagged = rest.into_iter().filter(|f| {
        let body = raw[f.body.clone()].trim_start();
        f.info.is_empty() && (DOCTYPE_RE.is_match(body) || HTML_OPEN_RE.is_match(body))
    });
    tagged.into_iter().chain(untagged).collect()
}

fn fence_body<'a>(raw: &'a str, fence: &Fence) -> &'a str {
    raw[fence.body.clone()].trim()
}

/// Whether a doctype or `<html>` tag opens a document that no `</html>` closes.
fn has_unclosed_document(text: &str) -> bool {
    let open = [DOCTYPE_RE.find(text), HTML_OPEN_RE.find(text)]
        .into_iter()
        .flatten()
        .min_by_key(|m| m.start());
    match open {
        Some(open) => !HTML_CLOSE_RE.is_match(&text[open.end()..]),
        None => false,
    }
}

/// Byte range of the first `<html ...>` through the following `</html>`, widened to
/// include a doctype that directly precedes the opening tag.
fn find_document_span(text: &str) -> Option<Range<usize>> {
    let open = HTML_OPEN_RE.find(text)?;
    let close = HTML_CLOSE_RE.find_at(text, open.end())?;
    let start = DOCTYPE_TAIL_RE
        .find(&text[..open.start()])
        .map(|m| m.start())
        .unwrap_or(open.start());
    Some(start..close.end())
}

fn surrounding_prose(raw: &str, region: Range<usize>) -> String {
    [raw[..region.start].trim(), raw[region.end..].trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
