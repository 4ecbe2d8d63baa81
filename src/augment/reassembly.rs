/*!
 * Writing translations back into the document tree.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::augment::classifier::render_colon_label;
use crate::document::{Alignment, NodeId, Paragraph, Run, RunFont, Story};
use crate::errors::DocumentError;

/// Sentence-terminal punctuation of either width
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?。！？]").expect("Invalid sentence end regex"));

/// How an inserted translation paragraph is formatted
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionFormat {
    /// Font placed in both the latin and east-asian slots
    pub font: String,
    /// Fixed size in half-points; `None` inherits the source's first run
    pub size: Option<u32>,
    /// Fixed alignment; `None` inherits the source paragraph
    pub alignment: Option<Alignment>,
    /// Size used when neither a fixed nor an inherited size exists
    pub fallback_size: u32,
}

impl InsertionFormat {
    pub fn inherited(font: impl Into<String>, fallback_size: u32) -> Self {
        Self {
            font: font.into(),
            size: None,
            alignment: None,
            fallback_size,
        }
    }

    pub fn with_size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// Build the paragraph holding `text` below `source`.
pub fn build_translation_paragraph(source: &Paragraph, text: &str, format: &InsertionFormat) -> Paragraph {
    let alignment = format
        .alignment
        .or(source.alignment)
        .unwrap_or(Alignment::Left);

    let size = format
        .size
        .or_else(|| source.first_run_size())
        .unwrap_or(format.fallback_size);

    let font = RunFont {
        name: Some(format.font.clone()),
        east_asia: Some(format.font.clone()),
        size: Some(size),
        ..Default::default()
    };

    Paragraph::new()
        .with_alignment(alignment)
        .with_run(Run::new(text).with_font(font))
}

/// Insert a translation paragraph right after paragraph `after` of `story`.
pub fn insert_translation_below(
    story: &mut Story,
    after: NodeId,
    text: &str,
    format: &InsertionFormat,
) -> Result<NodeId, DocumentError> {
    let source = story
        .paragraph(after)
        .ok_or(DocumentError::DetachedNode(after))?;
    let paragraph = build_translation_paragraph(source, text, format);
    story.insert_paragraph_after(after, paragraph)
}

/// Rewrite `label：` in place as `label(translation)：`, keeping images.
pub fn rewrite_colon_label(paragraph: &mut Paragraph, indent: &str, label: &str, translation: &str, colon: char) {
    paragraph.rewrite_text(render_colon_label(indent, label, translation, colon));
}

/// Set every non-blank run to `half_points` and drop the paragraph's style binding.
pub fn force_paragraph_size(paragraph: &mut Paragraph, half_points: u32) {
    paragraph.style = None;
    for run in paragraph.runs.iter_mut().filter(|run| !run.is_blank()) {
        run.font.size = Some(half_points);
    }
}

/// Split translated text into sentences on terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pair translated sentences with the step markers of a cell's paragraphs.
///
/// Part `i` goes to slot `i`, prefixed with `"{marker}. "` when the slot has
/// a marker. Distribution stops at the first slot without a part; parts
/// beyond the number of slots are appended as they are.
pub fn distribute_parts(markers: &[Option<String>], parts: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(parts.len());

    for (marker, part) in markers.iter().zip(parts) {
        match marker {
            Some(marker) => lines.push(format!("{}. {}", marker, part)),
            None => lines.push(part.clone()),
        }
    }

    if parts.len() > markers.len() {
        lines.extend(parts[markers.len()..].iter().cloned());
    }

    lines
}
