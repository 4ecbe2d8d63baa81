/*!
 * Core document model types.
 *
 * These types provide a JSON-serializable representation of a structured
 * document: a body story, sections with headers/footers, and diagram text
 * boxes. Paragraphs carry a process-unique node id so that positions can be
 * tracked while the tree is being mutated.
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::DocumentError;
use crate::file_utils::FileManager;

/// Stable identifier of a paragraph node
pub type NodeId = u64;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Complete document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Main body flow
    #[serde(default)]
    pub body: Story,

    /// Sections with their header/footer variants
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,

    /// Free-floating diagram text boxes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text_boxes: Vec<TextBox>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let content =
            FileManager::read_to_string(&path).map_err(|e| DocumentError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Save the document as a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let json = self.to_json_string()?;
        FileManager::write_to_file(&path, &json).map_err(|e| DocumentError::Io(e.to_string()))
    }

    /// Add a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Add a diagram text box.
    pub fn with_text_box(mut self, text_box: TextBox) -> Self {
        self.text_boxes.push(text_box);
        self
    }

    /// All header/footer parts of all sections, in section order.
    pub fn header_footers_mut(&mut self) -> impl Iterator<Item = &mut HeaderFooter> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.header_footers.iter_mut())
    }

    /// Visit every paragraph of the document: body, tables (nested included),
    /// headers/footers and text boxes.
    pub fn visit_paragraphs_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        self.body.visit_paragraphs_mut(f);
        for header_footer in self.header_footers_mut() {
            header_footer.content.visit_paragraphs_mut(f);
        }
        for text_box in &mut self.text_boxes {
            for paragraph in &mut text_box.paragraphs {
                f(paragraph);
            }
        }
    }

    /// Concatenated text of every body paragraph, one per line.
    pub fn body_text(&self) -> String {
        self.body
            .paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A flow of paragraphs and tables (body, table cell, header or footer).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Block-level content of a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Story {
    /// Create an empty story.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a paragraph.
    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.push_paragraph(paragraph);
        self
    }

    /// Builder: append a table.
    pub fn with_table(mut self, table: Table) -> Self {
        self.blocks.push(Block::Table(table));
        self
    }

    /// Append a paragraph and return its node id.
    pub fn push_paragraph(&mut self, paragraph: Paragraph) -> NodeId {
        let id = paragraph.id();
        self.blocks.push(Block::Paragraph(paragraph));
        id
    }

    /// Top-level paragraphs in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Table(_) => None,
        })
    }

    /// Top-level paragraphs in document order, mutably.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Table(_) => None,
        })
    }

    /// Snapshot of the top-level paragraph ids in document order.
    pub fn paragraph_ids(&self) -> Vec<NodeId> {
        self.paragraphs().map(Paragraph::id).collect()
    }

    /// Top-level tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
    }

    /// Top-level tables in document order, mutably.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
    }

    /// Look up a top-level paragraph by id.
    pub fn paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        self.paragraphs().find(|paragraph| paragraph.id() == id)
    }

    /// Look up a top-level paragraph by id, mutably.
    pub fn paragraph_mut(&mut self, id: NodeId) -> Option<&mut Paragraph> {
        self.paragraphs_mut().find(|paragraph| paragraph.id() == id)
    }

    fn position_of(&self, id: NodeId) -> Option<usize> {
        self.blocks.iter().position(|block| match block {
            Block::Paragraph(paragraph) => paragraph.id() == id,
            Block::Table(_) => false,
        })
    }

    /// Insert a paragraph immediately after the paragraph `after`.
    ///
    /// Fails with [`DocumentError::DetachedNode`] when `after` is not a
    /// top-level paragraph of this story.
    pub fn insert_paragraph_after(
        &mut self,
        after: NodeId,
        paragraph: Paragraph,
    ) -> Result<NodeId, DocumentError> {
        let position = self
            .position_of(after)
            .ok_or(DocumentError::DetachedNode(after))?;
        let id = paragraph.id();
        self.blocks.insert(position + 1, Block::Paragraph(paragraph));
        Ok(id)
    }

    /// Remove top-level paragraphs matching the predicate; returns how many were removed.
    pub fn remove_paragraphs_where(&mut self, mut predicate: impl FnMut(&Paragraph) -> bool) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|block| match block {
            Block::Paragraph(paragraph) => !predicate(paragraph),
            Block::Table(_) => true,
        });
        before - self.blocks.len()
    }

    /// Visit every paragraph of the story, including those inside tables.
    pub fn visit_paragraphs_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        for block in &mut self.blocks {
            match block {
                Block::Paragraph(paragraph) => f(paragraph),
                Block::Table(table) => table.visit_paragraphs_mut(f),
            }
        }
    }

    /// Visit only the paragraphs that live inside tables of this story.
    pub fn visit_table_paragraphs_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        for table in self.tables_mut() {
            table.visit_paragraphs_mut(f);
        }
    }
}

/// A table made of rows of cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    /// All cells in row-major order, mutably.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.rows.iter_mut().flat_map(|row| row.cells.iter_mut())
    }

    /// Visit every paragraph of every cell, nested tables included.
    pub fn visit_paragraphs_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        for cell in self.cells_mut() {
            cell.content.visit_paragraphs_mut(f);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub content: Story,
}

impl Cell {
    /// Create a cell holding the given paragraphs.
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        let mut content = Story::new();
        for paragraph in paragraphs {
            content.push_paragraph(paragraph);
        }
        Self { content }
    }
}

/// Header/footer variants of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFooterKind {
    Header,
    FirstPageHeader,
    EvenPageHeader,
    Footer,
    FirstPageFooter,
    EvenPageFooter,
}

/// One header or footer part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderFooter {
    pub kind: HeaderFooterKind,

    /// Linked parts reuse the previous section's content and are not processed
    #[serde(default, skip_serializing_if = "is_false")]
    pub linked_to_previous: bool,

    #[serde(default)]
    pub content: Story,
}

impl HeaderFooter {
    pub fn new(kind: HeaderFooterKind, content: Story) -> Self {
        Self {
            kind,
            linked_to_previous: false,
            content,
        }
    }

    /// Builder: mark this part as linked to the previous section.
    pub fn linked(mut self) -> Self {
        self.linked_to_previous = true;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub header_footers: Vec<HeaderFooter>,
}

impl Section {
    pub fn new(header_footers: Vec<HeaderFooter>) -> Self {
        Self { header_footers }
    }
}

/// A diagram container holding free-floating text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBox {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl TextBox {
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Every run of the text box.
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.paragraphs
            .iter_mut()
            .flat_map(|paragraph| paragraph.runs.iter_mut())
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// How a line spacing value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRule {
    Auto,
    Exact,
    AtLeast,
}

/// Paragraph line spacing in twentieths of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpacing {
    pub twips: u32,
    pub rule: LineRule,
}

impl LineSpacing {
    pub fn exact(twips: u32) -> Self {
        Self {
            twips,
            rule: LineRule::Exact,
        }
    }
}

/// A paragraph: an ordered list of runs plus paragraph properties.
///
/// A clone is a new node and gets its own id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(skip, default = "next_node_id")]
    id: NodeId,

    #[serde(default)]
    pub runs: Vec<Run>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    /// Named style binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<LineSpacing>,
}

impl Clone for Paragraph {
    fn clone(&self) -> Self {
        Self {
            id: next_node_id(),
            runs: self.runs.clone(),
            alignment: self.alignment,
            style: self.style.clone(),
            line_spacing: self.line_spacing,
        }
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self {
            id: next_node_id(),
            runs: Vec::new(),
            alignment: None,
            style: None,
            line_spacing: None,
        }
    }
}

impl Paragraph {
    /// Create an empty paragraph with a fresh node id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single plain text run.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new().with_run(Run::new(text))
    }

    /// Builder: append a run.
    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    /// Builder: set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Builder: bind a named style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Visible text: all runs concatenated.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Whether any run embeds an image.
    pub fn has_image(&self) -> bool {
        self.runs.iter().any(Run::has_image)
    }

    /// Clear the text of every run that holds no image.
    pub fn clear_text_keep_images(&mut self) {
        for run in self.runs.iter_mut().filter(|run| !run.has_image()) {
            run.text.clear();
        }
    }

    /// Font of the first text-bearing run, used when rewriting the paragraph.
    pub fn text_font(&self) -> RunFont {
        self.runs
            .iter()
            .find(|run| !run.has_image())
            .map(|run| run.font.clone())
            .unwrap_or_default()
    }

    /// Size of the first run in half-points, if set.
    pub fn first_run_size(&self) -> Option<u32> {
        self.runs.first().and_then(|run| run.font.size)
    }

    /// Replace the visible text, keeping image runs in place.
    ///
    /// Text-only runs are emptied and a single run with `text` is appended,
    /// inheriting the font of the first text run.
    pub fn rewrite_text(&mut self, text: impl Into<String>) {
        let font = self.text_font();
        self.clear_text_keep_images();
        self.runs.push(Run::new(text).with_font(font));
    }

    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }
}

/// A run of text with uniform formatting, optionally embedding an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub text: String,

    /// Reference to an embedded image or drawing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub font: RunFont,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A run holding only an embedded image.
    pub fn image(reference: impl Into<String>) -> Self {
        Self {
            image: Some(reference.into()),
            ..Default::default()
        }
    }

    pub fn with_font(mut self, font: RunFont) -> Self {
        self.font = font;
        self
    }

    /// Builder: set the size in half-points.
    pub fn with_size(mut self, half_points: u32) -> Self {
        self.font.size = Some(half_points);
        self
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Whether the run carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Run-level font attributes. Sizes are in half-points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFont {
    /// Latin/complex-script font family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// East-Asian font family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub east_asia: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Size before table scaling was applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaled_from: Option<u32>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
}

impl RunFont {
    /// Size in points, if set.
    pub fn size_pt(&self) -> Option<f32> {
        self.size.map(|half_points| half_points as f32 / 2.0)
    }
}
