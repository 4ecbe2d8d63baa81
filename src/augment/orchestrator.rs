/*!
 * Augmentation orchestrator.
 *
 * Walks a document and inserts translations next to the source text:
 * 1. grouping of indented continuation paragraphs (read only)
 * 2. body paragraphs
 * 3. body tables, nested tables included
 * 4. headers and footers
 * 5. diagram text boxes
 *
 * All state of a run lives in a `RunContext` created by `translate_document`.
 * Translation failures leave the source text in place; nodes that cannot be
 * located are counted and skipped.
 */

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::app_config::{pt_to_half_points, FormattingConfig};
use crate::augment::classifier::{classify, leading_whitespace, step_marker, strip_step_marker, MarkerTag};
use crate::augment::grouper::{build_groups, LogicalUnit};
use crate::augment::reassembly::{
    distribute_parts, force_paragraph_size, insert_translation_below, rewrite_colon_label,
    split_sentences, InsertionFormat,
};
use crate::document::{Alignment, Document, LineSpacing, NodeId, Story, Table, TextBox};
use crate::errors::DocumentError;
use crate::language_utils::contains_source_script;
use crate::translation::{DispatchStats, Dispatcher, Translator};

/// Phases of a run, reported to progress observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugmentPhase {
    Grouping,
    Paragraphs,
    Tables,
    HeadersFooters,
    Diagrams,
}

impl fmt::Display for AugmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Grouping => "Grouping indented paragraphs",
            Self::Paragraphs => "Translating paragraphs",
            Self::Tables => "Translating tables",
            Self::HeadersFooters => "Translating headers and footers",
            Self::Diagrams => "Translating diagram text",
        };
        write!(f, "{}", label)
    }
}

/// What a run did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AugmentReport {
    /// Logical units found by grouping
    pub groups: usize,
    /// Logical units merged and translated
    pub groups_merged: usize,
    /// Translation paragraphs inserted
    pub translations_inserted: usize,
    /// Colon labels rewritten in place
    pub labels_rewritten: usize,
    /// Table cells whose numbered paragraphs were translated together
    pub cells_merged: usize,
    /// Diagram runs overwritten with their translation
    pub text_box_runs: usize,
    /// Nodes that could not be located for insertion
    pub detached_nodes: usize,
    /// Dispatcher counters at the end of the run
    pub dispatch: DispatchStats,
}

/// Grouping state of one `translate_document` invocation
#[derive(Debug, Default)]
pub struct RunContext {
    groups: Vec<LogicalUnit>,
    /// node -> (group position, is anchor)
    membership: HashMap<NodeId, (usize, bool)>,
    /// `LogicalUnit::group_id` of every consumed group
    consumed: HashSet<usize>,
}

impl RunContext {
    /// Group the top-level paragraphs of `story`.
    pub fn from_story(story: &Story) -> Self {
        let groups = build_groups(story.paragraphs().map(|p| (p.id(), p.text())));
        Self::from_groups(groups)
    }

    pub fn from_groups(groups: Vec<LogicalUnit>) -> Self {
        let mut membership = HashMap::new();
        for (position, unit) in groups.iter().enumerate() {
            for (i, member) in unit.members.iter().enumerate() {
                membership.insert(member.node, (position, i == 0));
            }
        }

        Self {
            groups,
            membership,
            consumed: HashSet::new(),
        }
    }

    pub fn groups(&self) -> &[LogicalUnit] {
        &self.groups
    }

    /// Whether the group with this `group_id` was already translated
    pub fn is_consumed(&self, group_id: usize) -> bool {
        self.consumed.contains(&group_id)
    }

    fn membership(&self, node: NodeId) -> Option<(usize, bool)> {
        self.membership.get(&node).copied()
    }

    fn is_consumed_at(&self, position: usize) -> bool {
        self.groups
            .get(position)
            .is_some_and(|unit| self.is_consumed(unit.group_id))
    }

    /// Returns false when the group at `position` was already consumed
    fn mark_consumed(&mut self, position: usize) -> bool {
        match self.groups.get(position) {
            Some(unit) => self.consumed.insert(unit.group_id),
            None => false,
        }
    }
}

/// Sizes and fonts used while inserting translations
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentStyle {
    pub target_font: String,
    pub default_half_points: u32,
    pub header_source_half_points: u32,
    pub header_translation_half_points: u32,
    pub header_table_translation_half_points: u32,
    pub diagram_half_points: u32,
    pub diagram_line_twips: u32,
}

impl From<&FormattingConfig> for AugmentStyle {
    fn from(config: &FormattingConfig) -> Self {
        Self {
            target_font: config.target_font.clone(),
            default_half_points: pt_to_half_points(config.default_size_pt),
            header_source_half_points: pt_to_half_points(config.header_source_size_pt),
            header_translation_half_points: pt_to_half_points(config.header_translation_size_pt),
            header_table_translation_half_points: pt_to_half_points(config.header_table_translation_size_pt),
            diagram_half_points: config.diagram_half_points,
            diagram_line_twips: config.diagram_line_twips,
        }
    }
}

impl Default for AugmentStyle {
    fn default() -> Self {
        Self::from(&FormattingConfig::default())
    }
}

impl AugmentStyle {
    fn body_format(&self) -> InsertionFormat {
        InsertionFormat::inherited(self.target_font.clone(), self.default_half_points)
    }

    fn header_format(&self, half_points: u32) -> InsertionFormat {
        self.body_format()
            .with_size(half_points)
            .with_alignment(Alignment::Center)
    }
}

/// Bilingual augmentation engine
pub struct Augmenter<T: Translator> {
    dispatcher: Dispatcher<T>,
    style: AugmentStyle,
}

impl<T: Translator> Augmenter<T> {
    pub fn new(dispatcher: Dispatcher<T>, style: AugmentStyle) -> Self {
        Self { dispatcher, style }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Insert translations throughout `document`.
    pub async fn translate_document(&self, document: &mut Document) -> AugmentReport {
        self.translate_document_with_progress(document, |_| {}).await
    }

    /// Same as [`translate_document`](Self::translate_document), calling
    /// `on_phase` as each phase starts.
    pub async fn translate_document_with_progress<F>(&self, document: &mut Document, on_phase: F) -> AugmentReport
    where
        F: Fn(AugmentPhase) + Send + Sync,
    {
        let mut report = AugmentReport::default();

        on_phase(AugmentPhase::Grouping);
        let mut context = RunContext::from_story(&document.body);
        report.groups = context.groups().len();
        info!("Found {} indented paragraph groups", report.groups);

        on_phase(AugmentPhase::Paragraphs);
        self.paragraph_pass(&mut document.body, &mut context, &mut report).await;

        on_phase(AugmentPhase::Tables);
        for table in document.body.tables_mut() {
            self.translate_table(table, &mut report).await;
        }

        on_phase(AugmentPhase::HeadersFooters);
        self.header_footer_pass(document, &mut report).await;

        on_phase(AugmentPhase::Diagrams);
        for text_box in &mut document.text_boxes {
            self.translate_text_box(text_box, &mut report).await;
        }

        report.dispatch = self.dispatcher.stats();
        report
    }

    /// Translate the top-level paragraphs of `story` using the groups of `context`.
    pub async fn paragraph_pass(&self, story: &mut Story, context: &mut RunContext, report: &mut AugmentReport) {
        let snapshot: Vec<(NodeId, String)> = story.paragraphs().map(|p| (p.id(), p.text())).collect();

        for (node, text) in snapshot {
            if text.trim().is_empty() || !contains_source_script(&text) {
                continue;
            }

            match context.membership(node) {
                Some((group, _)) if context.is_consumed_at(group) => continue,
                Some((_, false)) => continue,
                Some((group, true)) => {
                    self.translate_group(story, context, group, &text, report).await;
                }
                None => self.translate_plain(story, node, &text, report).await,
            }
        }
    }

    async fn translate_group(
        &self,
        story: &mut Story,
        context: &mut RunContext,
        group: usize,
        anchor_text: &str,
        report: &mut AugmentReport,
    ) {
        if !context.mark_consumed(group) {
            return;
        }
        let unit = context.groups[group].clone();
        let anchor = unit.anchor().node;
        let indent = leading_whitespace(anchor_text).to_string();

        match story.paragraph_mut(anchor) {
            Some(paragraph) => paragraph.rewrite_text(format!("{}{}", indent, unit.merged_text)),
            None => {
                self.record_detached(report, DocumentError::DetachedNode(anchor));
                return;
            }
        }

        let payload = strip_step_marker(&unit.merged_text);
        let translation = self.dispatcher.resolve(&payload).await;
        if is_translated(&payload, &translation) {
            let text = format!("{}{}", indent, translation.trim());
            self.insert_below(story, anchor, &text, &self.style.body_format(), report);
        }

        for member in &unit.members[1..] {
            match story.paragraph_mut(member.node) {
                Some(paragraph) => paragraph.clear_text_keep_images(),
                None => self.record_detached(report, DocumentError::DetachedNode(member.node)),
            }
        }

        report.groups_merged += 1;
        debug!("Merged group {} ({} paragraphs)", unit.group_id, unit.members.len());
    }

    /// Ungrouped paragraph rules, shared by the body and table cells
    async fn translate_plain(&self, story: &mut Story, node: NodeId, text: &str, report: &mut AugmentReport) {
        let classification = classify(text);

        if classification.tag == MarkerTag::ColonEmpty {
            let label = classification.payload.as_str();
            let translation = self.dispatcher.resolve(label).await;
            if !is_translated(label, &translation) {
                return;
            }
            let colon = classification.colon.unwrap_or('：');

            match story.paragraph_mut(node) {
                Some(paragraph) => {
                    rewrite_colon_label(paragraph, &classification.indent, label, translation.trim(), colon);
                    report.labels_rewritten += 1;
                }
                None => self.record_detached(report, DocumentError::DetachedNode(node)),
            }
            return;
        }

        let translation = self.dispatcher.resolve(&classification.payload).await;
        if !is_translated(&classification.payload, &translation) {
            return;
        }
        let text = format!("{}{}", classification.indent, translation.trim());
        self.insert_below(story, node, &text, &self.style.body_format(), report);
    }

    fn translate_table<'a>(
        &'a self,
        table: &'a mut Table,
        report: &'a mut AugmentReport,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            for cell in table.cells_mut() {
                self.translate_cell(&mut cell.content, report).await;

                for nested in cell.content.tables_mut() {
                    self.translate_table(nested, report).await;
                }
            }
        })
    }

    async fn translate_cell(&self, content: &mut Story, report: &mut AugmentReport) {
        let sources: Vec<(NodeId, String)> = content
            .paragraphs()
            .map(|p| (p.id(), p.text()))
            .filter(|(_, text)| !text.trim().is_empty() && contains_source_script(text))
            .collect();

        if sources.is_empty() {
            return;
        }

        let markers: Vec<Option<String>> = sources.iter().map(|(_, text)| step_marker(text)).collect();
        let numbered = markers.iter().filter(|marker| marker.is_some()).count();

        if numbered <= 1 {
            for (node, text) in &sources {
                self.translate_plain(content, *node, text, report).await;
            }
            return;
        }

        let merged = sources
            .iter()
            .map(|(_, text)| strip_step_marker(text))
            .collect::<Vec<_>>()
            .join(" ");
        let translation = self.dispatcher.resolve(&merged).await;
        if !is_translated(&merged, &translation) {
            return;
        }
        let lines = distribute_parts(&markers, &split_sentences(&translation));

        if let Some((last, _)) = sources.last() {
            self.insert_below(content, *last, &lines.join("\n"), &self.style.body_format(), report);
            report.cells_merged += 1;
        }
    }

    async fn header_footer_pass(&self, document: &mut Document, report: &mut AugmentReport) {
        let style = &self.style;

        for header_footer in document.header_footers_mut() {
            if header_footer.linked_to_previous {
                continue;
            }
            let content = &mut header_footer.content;

            for node in content.paragraph_ids() {
                let Some(text) = source_text(content, node) else {
                    continue;
                };
                if let Some(paragraph) = content.paragraph_mut(node) {
                    force_paragraph_size(paragraph, style.header_source_half_points);
                }

                let translation = self.dispatcher.resolve(&text).await;
                if is_translated(&text, &translation) {
                    let format = style.header_format(style.header_translation_half_points);
                    self.insert_below(content, node, translation.trim(), &format, report);
                }
            }

            for table in content.tables_mut() {
                let mut processed: HashSet<String> = HashSet::new();

                for cell in table.cells_mut() {
                    let cell_story = &mut cell.content;
                    for node in cell_story.paragraph_ids() {
                        let Some(text) = source_text(cell_story, node) else {
                            continue;
                        };
                        if let Some(paragraph) = cell_story.paragraph_mut(node) {
                            force_paragraph_size(paragraph, style.header_source_half_points);
                        }

                        let key = text.trim().to_string();
                        if processed.contains(&key) {
                            continue;
                        }

                        let translation = self.dispatcher.resolve(&text).await;
                        if is_translated(&text, &translation) {
                            let format = style.header_format(style.header_table_translation_half_points);
                            self.insert_below(cell_story, node, translation.trim(), &format, report);
                            processed.insert(key);
                        }
                    }
                }
            }
        }
    }

    async fn translate_text_box(&self, text_box: &mut TextBox, report: &mut AugmentReport) {
        let mut had_source_text = false;

        for paragraph in &mut text_box.paragraphs {
            for run in &mut paragraph.runs {
                if run.is_blank() {
                    continue;
                }
                if contains_source_script(&run.text) {
                    had_source_text = true;
                }

                let translated = self.dispatcher.resolve(&run.text).await;
                if is_translated(&run.text, &translated) {
                    run.text = translated;
                    report.text_box_runs += 1;
                }
            }
        }

        if had_source_text {
            for run in text_box.runs_mut() {
                run.font.size = Some(self.style.diagram_half_points);
            }
            for paragraph in &mut text_box.paragraphs {
                paragraph.line_spacing = Some(LineSpacing::exact(self.style.diagram_line_twips));
                paragraph.alignment = Some(Alignment::Center);
            }
        }
    }

    fn insert_below(
        &self,
        story: &mut Story,
        after: NodeId,
        text: &str,
        format: &InsertionFormat,
        report: &mut AugmentReport,
    ) {
        match insert_translation_below(story, after, text, format) {
            Ok(_) => report.translations_inserted += 1,
            Err(e) => self.record_detached(report, e),
        }
    }

    fn record_detached(&self, report: &mut AugmentReport, error: DocumentError) {
        warn!("Skipping insertion: {}", error);
        report.detached_nodes += 1;
    }
}

/// Whether dispatch produced new text. Untranslated text comes back unchanged.
fn is_translated(source: &str, translation: &str) -> bool {
    let translation = translation.trim();
    !translation.is_empty() && translation != source.trim()
}

/// Text of paragraph `node` when it holds source-script text
fn source_text(story: &Story, node: NodeId) -> Option<String> {
    story
        .paragraph(node)
        .map(|paragraph| paragraph.text())
        .filter(|text| !text.trim().is_empty() && contains_source_script(text))
}
