/*!
 * Tests for the document tree model
 */

use anyhow::Result;
use dualdoc::document::{Alignment, Block, Document, HeaderFooter, HeaderFooterKind, Paragraph, Run, Section, Story};
use dualdoc::errors::DocumentError;

use crate::common;

/// Test that insertion lands right after the target paragraph
#[test]
fn test_insertParagraphAfter_withAttachedNode_shouldKeepOrder() -> Result<()> {
    let first = Paragraph::from_text("一");
    let second = Paragraph::from_text("二");
    let first_id = first.id();
    let mut story = Story::new().with_paragraph(first).with_paragraph(second);

    let inserted = story.insert_paragraph_after(first_id, Paragraph::from_text("One"))?;

    let texts: Vec<String> = story.paragraphs().map(Paragraph::text).collect();
    assert_eq!(texts, vec!["一", "One", "二"]);
    assert!(story.paragraph(inserted).is_some());
    Ok(())
}

/// Test that inserting after an unknown node reports a detached node
#[test]
fn test_insertParagraphAfter_withUnknownNode_shouldFail() {
    let mut story = Story::new().with_paragraph(Paragraph::from_text("一"));
    let stranger = Paragraph::new().id();

    let result = story.insert_paragraph_after(stranger, Paragraph::from_text("One"));

    assert!(matches!(result, Err(DocumentError::DetachedNode(id)) if id == stranger));
}

/// Test that node ids are unique across paragraphs
#[test]
fn test_paragraphIds_shouldBeUnique() {
    let ids: Vec<u64> = (0..50).map(|_| Paragraph::new().id()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}

/// Test that rewriting text keeps images in place
#[test]
fn test_rewriteText_withImageRun_shouldKeepImage() {
    let mut paragraph = Paragraph::new()
        .with_run(Run::new("圖示").with_size(30))
        .with_run(Run::image("rId3"));

    paragraph.rewrite_text("圖示(Icon)");

    assert!(paragraph.has_image());
    assert_eq!(paragraph.text(), "圖示(Icon)");
    let last = paragraph.runs.last().map(|run| run.font.size);
    assert_eq!(last, Some(Some(30)));
}

/// Test that a saved document loads back with the same content
#[test]
fn test_saveAndLoad_withTempFile_shouldPreserveStructure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("doc.json");
    let document = Document::new().with_section(Section::new(vec![HeaderFooter::new(
        HeaderFooterKind::FirstPageHeader,
        Story::new().with_paragraph(Paragraph::from_text("封面")),
    )]));
    let mut document = document;
    document.body = Story::new().with_paragraph(Paragraph::from_text("內文").with_alignment(Alignment::Justify));

    document.save(&path)?;
    let loaded = Document::load(&path)?;

    assert_eq!(loaded.body_text(), "內文");
    assert_eq!(loaded.sections[0].header_footers[0].kind, HeaderFooterKind::FirstPageHeader);
    assert!(matches!(&loaded.body.blocks[0], Block::Paragraph(p) if p.alignment == Some(Alignment::Justify)));
    Ok(())
}

/// Test that the JSON format is tagged by block type
#[test]
fn test_fromJsonStr_withTaggedBlocks_shouldParse() -> Result<()> {
    let json = r#"{
        "body": {
            "blocks": [
                {"type": "paragraph", "runs": [{"text": "標題", "font": {"size": 32}}]},
                {"type": "table", "rows": [{"cells": [{"content": {"blocks": []}}]}]}
            ]
        }
    }"#;

    let document = Document::from_json_str(json)?;

    assert_eq!(document.body.paragraphs().count(), 1);
    assert_eq!(document.body.tables().count(), 1);
    assert_eq!(document.body.paragraphs().next().and_then(Paragraph::first_run_size), Some(32));
    Ok(())
}

/// Test that malformed JSON is a parse error
#[test]
fn test_fromJsonStr_withInvalidJson_shouldReturnParseError() {
    assert!(matches!(Document::from_json_str("{"), Err(DocumentError::Parse(_))));
}
