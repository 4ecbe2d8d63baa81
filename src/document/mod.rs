/*!
 * Document tree for bilingual augmentation.
 *
 * This module provides the structured document the augmentation engine works on:
 * - Stories (body, table cells, headers/footers) holding paragraphs and tables
 * - Runs carrying text, embedded images and font attributes
 * - Sections with their header/footer variants
 * - Free-floating diagram text boxes
 *
 * The tree is JSON-serializable so it can be persisted between tools.
 */

pub mod model;

pub use model::{
    Alignment, Block, Cell, Document, HeaderFooter, HeaderFooterKind, LineRule, LineSpacing, NodeId,
    Paragraph, Row, Run, RunFont, Section, Story, Table, TextBox,
};
