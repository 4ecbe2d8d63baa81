/*!
 * Structural classification of paragraph text.
 *
 * A paragraph is tagged by the structural marker it starts with:
 * - a hierarchical step number such as `1.`, `1.2` or `1.2.3.4`
 * - a label followed by a colon with nothing after it (`注意：`)
 * - a label followed by a colon and content (`步驟： 請先開機`)
 * - nothing at all
 *
 * The classifier returns the text that should be sent for translation with
 * the marker removed, plus what is needed to put the marker back.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Step-number patterns, most specific first
static STEP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(\d+\.\d+\.\d+\.\d+)",
        r"^(\d+\.\d+\.\d+)",
        r"^(\d+\.\d+)",
        r"^(\d+\.)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid step marker regex"))
    .collect()
});

/// Characters skipped between a step marker and its payload
const MARKER_SEPARATORS: &[char] = &['.', ':', '：', '\u{3000}', '\t', ' '];

const FULL_WIDTH_COLON: char = '：';
const HALF_WIDTH_COLON: char = ':';

/// Formatting pattern of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTag {
    /// Plain text
    NoMarker,
    /// `label：` with nothing after the colon
    ColonEmpty,
    /// `label：content`
    ColonWithContent,
    /// Starts with a hierarchical step number
    Numbered,
}

/// Outcome of classifying one paragraph's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub tag: MarkerTag,

    /// Step number without its trailing dot (`"1.2"`), or the colon label
    pub marker_text: Option<String>,

    /// Text to translate
    pub payload: String,

    /// Literal leading whitespace of the original text
    pub indent: String,

    /// Indentation width: spaces count 1, tabs count 4
    pub indent_width: usize,

    /// Colon character found, when the tag is colon-based
    pub colon: Option<char>,
}

/// Leading indentation scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentScan {
    pub has_indent: bool,
    pub width: usize,
}

/// Count leading spaces (+1) and tabs (+4).
pub fn scan_indent(text: &str) -> IndentScan {
    let width = text
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();

    IndentScan {
        has_indent: width > 0,
        width,
    }
}

/// The full leading whitespace run of `text`.
pub fn leading_whitespace(text: &str) -> &str {
    let rest = text.trim_start();
    &text[..text.len() - rest.len()]
}

/// Hierarchical step number at the start of `text`, trailing dot removed.
pub fn step_marker(text: &str) -> Option<String> {
    let trimmed = text.trim_start();
    STEP_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(trimmed)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim_end_matches('.').to_string())
    })
}

/// Trimmed text with any leading step marker and its separators removed.
pub fn strip_step_marker(text: &str) -> String {
    let trimmed = text.trim();
    let matched = STEP_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(trimmed));

    match matched {
        Some(m) => trimmed[m.end()..]
            .trim_start_matches(MARKER_SEPARATORS)
            .trim_end()
            .to_string(),
        None => trimmed.to_string(),
    }
}

/// Split trimmed text at its first colon of either width.
///
/// Returns `(before, after, colon)` with both sides trimmed, or `None` when
/// there is no colon or nothing before it.
pub fn colon_split(text: &str) -> Option<(String, String, char)> {
    let trimmed = text.trim();
    let (position, colon) = trimmed
        .char_indices()
        .find(|(_, c)| *c == FULL_WIDTH_COLON || *c == HALF_WIDTH_COLON)?;

    let before = trimmed[..position].trim();
    if before.is_empty() {
        return None;
    }
    let after = trimmed[position + colon.len_utf8()..].trim();

    Some((before.to_string(), after.to_string(), colon))
}

/// Classify a paragraph's text. Total and deterministic.
pub fn classify(text: &str) -> ClassificationResult {
    let indent = leading_whitespace(text).to_string();
    let indent_width = scan_indent(text).width;

    if let Some(marker) = step_marker(text) {
        return ClassificationResult {
            tag: MarkerTag::Numbered,
            marker_text: Some(marker),
            payload: strip_step_marker(text),
            indent,
            indent_width,
            colon: None,
        };
    }

    if let Some((before, after, colon)) = colon_split(text) {
        let (tag, payload) = if after.is_empty() {
            (MarkerTag::ColonEmpty, before.clone())
        } else {
            (MarkerTag::ColonWithContent, strip_step_marker(&after))
        };
        return ClassificationResult {
            tag,
            marker_text: Some(before),
            payload,
            indent,
            indent_width,
            colon: Some(colon),
        };
    }

    ClassificationResult {
        tag: MarkerTag::NoMarker,
        marker_text: None,
        payload: text.trim().to_string(),
        indent,
        indent_width,
        colon: None,
    }
}

/// Rewrite a colon label with its translation: `label(translation)：`.
pub fn render_colon_label(indent: &str, label: &str, translation: &str, colon: char) -> String {
    format!("{}{}({}){}", indent, label, translation, colon)
}
