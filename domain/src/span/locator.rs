//! Literal span location and sentence-window expansion.
//!
//! All offsets are character offsets (not bytes), so `头痛` in `头痛。身热。`
//! occupies `[0, 2)`.

use serde::{Deserialize, Serialize};

/// Sentence boundary characters
const BOUNDARIES: [char; 9] = ['。', '！', '？', '；', '.', '!', '?', ';', '\n'];

/// Highlight markers wrapped around the subject inside a context window
pub const HIGHLIGHT_OPEN: char = '【';
pub const HIGHLIGHT_CLOSE: char = '】';

fn is_boundary(c: char) -> bool {
    BOUNDARIES.contains(&c)
}

fn is_boundary_or_space(c: char) -> bool {
    is_boundary(c) || c.is_whitespace()
}

/// Half-open character range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Review-friendly context around a located subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    /// Character offset where the window starts
    pub start: usize,
    /// Character offset where the window ends (exclusive)
    pub end: usize,
    /// Window text, trimmed
    pub text: String,
    /// Window text with the first occurrence of the subject bracketed
    pub highlighted: String,
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// First occurrence of `needle` in `document`.
///
/// Returns `None` when the needle is empty or absent. Absence is a normal
/// runtime condition: a source may emit a normalized string that does not
/// occur verbatim.
pub fn locate(document: &str, needle: &str) -> Option<Span> {
    let haystack: Vec<char> = document.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    find_from(&haystack, &needle, 0).map(|start| Span::new(start, start + needle.len()))
}

/// Every occurrence of `needle`, advancing one character past each hit
/// (so overlapping occurrences are all reported).
pub fn locate_all(document: &str, needle: &str) -> Vec<Span> {
    let haystack: Vec<char> = document.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(start) = find_from(&haystack, &needle, from) {
        spans.push(Span::new(start, start + needle.len()));
        from = start + 1;
    }
    spans
}

/// Start of the sentence containing position `pos`
fn sentence_start(chars: &[char], pos: usize) -> usize {
    let mut start = pos;
    while start > 0 && !is_boundary(chars[start - 1]) {
        start -= 1;
    }
    start
}

/// End of the sentence containing position `pos`, including its terminator
fn sentence_end(chars: &[char], pos: usize) -> usize {
    let mut end = pos;
    while end < chars.len() {
        if is_boundary(chars[end]) {
            return end + 1;
        }
        end += 1;
    }
    end
}

/// Expand `span` to its sentence plus one neighbouring sentence on each side.
pub fn sentence_window(document: &str, span: Span, needle: &str) -> ContextWindow {
    let chars: Vec<char> = document.chars().collect();
    let span_start = span.start.min(chars.len());
    let span_end = span.end.clamp(span_start, chars.len());

    let current_start = sentence_start(&chars, span_start);
    let current_end = sentence_end(&chars, span_end);

    let mut start = current_start;
    if current_start > 0 {
        let mut cursor = current_start - 1;
        while cursor > 0 && is_boundary_or_space(chars[cursor]) {
            cursor -= 1;
        }
        start = sentence_start(&chars, cursor);
    }

    let mut end = current_end;
    if current_end < chars.len() {
        let mut cursor = current_end;
        while cursor < chars.len() && is_boundary_or_space(chars[cursor]) {
            cursor += 1;
        }
        end = sentence_end(&chars, cursor);
    }

    let text: String = chars[start..end].iter().collect::<String>().trim().to_string();
    let highlighted = highlight_first(&text, needle);

    ContextWindow {
        start,
        end,
        text,
        highlighted,
    }
}

/// Context window around the first occurrence of `needle`, if any
pub fn context_for(document: &str, needle: &str) -> Option<ContextWindow> {
    locate(document, needle).map(|span| sentence_window(document, span, needle))
}

/// The single sentence holding the first occurrence of `needle`.
///
/// Falls back to the needle itself when it does not occur.
pub fn full_sentence(document: &str, needle: &str) -> String {
    let Some(span) = locate(document, needle) else {
        return needle.to_string();
    };
    let chars: Vec<char> = document.chars().collect();
    let start = sentence_start(&chars, span.start);
    let end = sentence_end(&chars, span.end);
    chars[start..end].iter().collect::<String>().trim().to_string()
}

/// Wrap only the first occurrence of `needle` in highlight markers
pub fn highlight_first(text: &str, needle: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }
    match text.find(needle) {
        Some(at) => {
            let mut out = String::with_capacity(text.len() + 6);
            out.push_str(&text[..at]);
            out.push(HIGHLIGHT_OPEN);
            out.push_str(needle);
            out.push(HIGHLIGHT_CLOSE);
            out.push_str(&text[at + needle.len()..]);
            out
        }
        None => text.to_string(),
    }
}
