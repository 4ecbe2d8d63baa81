/*!
 * Post-pass font and size normalization.
 *
 * A normalization pass is idempotent: table shrinking remembers the size it
 * started from, so running the pass again produces the same sizes.
 */

use log::debug;

use crate::app_config::FormattingConfig;
use crate::document::{Document, Paragraph, Run};
use crate::language_utils::contains_source_script;

/// Settings for one normalization pass
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeSettings {
    pub target_font: String,
    pub table_shrink_ratio: f64,
    pub table_min_half_points: u32,
    pub table_default_half_points: u32,
}

impl From<&FormattingConfig> for NormalizeSettings {
    fn from(config: &FormattingConfig) -> Self {
        Self {
            target_font: config.target_font.clone(),
            table_shrink_ratio: config.table_shrink_ratio,
            table_min_half_points: config.table_min_half_points,
            table_default_half_points: config.table_default_half_points,
        }
    }
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self::from(&FormattingConfig::default())
    }
}

/// Counts of what a pass touched
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeReport {
    pub table_runs_scaled: usize,
    pub runs_refonted: usize,
    pub paragraphs_removed: usize,
}

/// Shrunk size of a table run, computed from its original size.
pub fn shrunk_size(run: &Run, settings: &NormalizeSettings) -> (u32, u32) {
    let base = run
        .font
        .scaled_from
        .or(run.font.size)
        .unwrap_or(settings.table_default_half_points);
    let scaled = (f64::from(base) * settings.table_shrink_ratio).floor() as u32;
    (base, scaled.max(settings.table_min_half_points))
}

fn shrink_table_paragraph(paragraph: &mut Paragraph, settings: &NormalizeSettings, report: &mut NormalizeReport) {
    if contains_source_script(&paragraph.text()) {
        return;
    }
    for run in paragraph.runs.iter_mut().filter(|run| !run.is_blank()) {
        let (base, size) = shrunk_size(run, settings);
        run.font.scaled_from = Some(base);
        run.font.size = Some(size);
        report.table_runs_scaled += 1;
    }
}

fn apply_target_font(paragraph: &mut Paragraph, font: &str, report: &mut NormalizeReport) {
    for run in paragraph.runs.iter_mut() {
        if run.is_blank() || contains_source_script(&run.text) {
            continue;
        }
        if run.font.name.as_deref() != Some(font) {
            run.font.name = Some(font.to_string());
            report.runs_refonted += 1;
        }
    }
}

/// Normalize fonts and sizes across `document` and drop empty body paragraphs.
pub fn normalize(document: &mut Document, settings: &NormalizeSettings) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    document
        .body
        .visit_table_paragraphs_mut(&mut |p: &mut Paragraph| shrink_table_paragraph(p, settings, &mut report));
    for header_footer in document.header_footers_mut() {
        header_footer
            .content
            .visit_table_paragraphs_mut(&mut |p: &mut Paragraph| shrink_table_paragraph(p, settings, &mut report));
    }

    let font = settings.target_font.as_str();
    document.visit_paragraphs_mut(&mut |p: &mut Paragraph| apply_target_font(p, font, &mut report));

    report.paragraphs_removed = document
        .body
        .remove_paragraphs_where(|p| p.text().trim().is_empty() && !p.has_image());

    debug!(
        "Normalized: {} table runs scaled, {} runs refonted, {} empty paragraphs removed",
        report.table_runs_scaled, report.runs_refonted, report.paragraphs_removed
    );
    report
}
