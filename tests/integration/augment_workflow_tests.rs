/*!
 * End-to-end tests of the augmentation passes over in-memory documents
 */

use dualdoc::augment::{normalize, AugmentPhase, NormalizeSettings, RunContext};
use dualdoc::document::{
    Alignment, Cell, Document, HeaderFooter, HeaderFooterKind, LineRule, Paragraph, Row, Run, Section, Story, Table,
    TextBox,
};
use dualdoc::providers::mock::MockProvider;
use dualdoc::translation::FixedTranslationTable;
use parking_lot::Mutex;

use crate::common;

const DICTIONARY: &[(&str, &str)] = &[
    ("請先開機", "Please turn on first"),
    ("開始設定參數", "Start setting parameters"),
    ("開機 登入", "Turn on. Log in."),
    ("型號", "Model"),
    ("公司名稱", "Company name"),
    ("機密", "Confidential"),
    ("開始", "Start"),
    ("內層", "Inner"),
];

fn body_texts(document: &Document) -> Vec<String> {
    document.body.paragraphs().map(Paragraph::text).collect()
}

fn with_body(story: Story) -> Document {
    let mut document = Document::new();
    document.body = story;
    document
}

/// Test that a colon label with content keeps the source and gains a translation below
#[tokio::test]
async fn test_translateDocument_withColonContent_shouldInsertPayloadTranslation() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let mut document = with_body(Story::new().with_paragraph(Paragraph::from_text("  步驟： 請先開機")));

    let report = augmenter.translate_document(&mut document).await;

    assert_eq!(body_texts(&document), vec!["  步驟： 請先開機", "  Please turn on first"]);
    assert_eq!(report.translations_inserted, 1);
    assert_eq!(augmenter.dispatcher().translator().requested_texts(), vec!["請先開機"]);
}

/// Test that a bare label is rewritten in place with the fixed translation
#[tokio::test]
async fn test_translateDocument_withEmptyColonLabel_shouldRewriteInPlace() {
    let table = FixedTranslationTable::from_entries([("注意", "Caution")]);
    let augmenter = common::augmenter_with(MockProvider::working(), table);
    let mut document = with_body(Story::new().with_paragraph(Paragraph::from_text("注意：")));

    let report = augmenter.translate_document(&mut document).await;

    assert_eq!(body_texts(&document), vec!["注意(Caution)："]);
    assert_eq!(report.labels_rewritten, 1);
    assert_eq!(augmenter.dispatcher().translator().request_count(), 0);
}

/// Test that an indented step and its continuation are translated once as a unit
#[tokio::test]
async fn test_translateDocument_withIndentedGroup_shouldMergeAndInsertOnce() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let mut document = with_body(
        Story::new()
            .with_paragraph(Paragraph::from_text("  1.2 開始"))
            .with_paragraph(Paragraph::new().with_run(Run::new("     設定參數")).with_run(Run::image("rId9")))
            .with_paragraph(Paragraph::from_text("說明結束 end")),
    );

    let report = augmenter.translate_document(&mut document).await;

    let texts = body_texts(&document);
    assert_eq!(texts[0], "  1.2 開始設定參數");
    assert_eq!(texts[1], "  Start setting parameters");
    assert_eq!(texts[2], "");
    assert!(document.body.paragraphs().nth(2).is_some_and(Paragraph::has_image));
    assert_eq!(report.groups, 1);
    assert_eq!(report.groups_merged, 1);
}

/// Test that rerunning the paragraph pass with a consumed context changes nothing
#[tokio::test]
async fn test_paragraphPass_withConsumedGroups_shouldBeNoOp() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let mut story = Story::new()
        .with_paragraph(Paragraph::from_text("  1.2 開始"))
        .with_paragraph(Paragraph::from_text("     設定參數"));
    let mut context = RunContext::from_story(&story);
    let mut report = Default::default();

    augmenter.paragraph_pass(&mut story, &mut context, &mut report).await;
    let first: Vec<String> = story.paragraphs().map(Paragraph::text).collect();
    augmenter.paragraph_pass(&mut story, &mut context, &mut report).await;
    let second: Vec<String> = story.paragraphs().map(Paragraph::text).collect();

    assert_eq!(first, second);
    let group_id = context.groups()[0].group_id;
    assert!(context.is_consumed(group_id));
    assert_eq!(augmenter.dispatcher().translator().request_count(), 1);
}

/// Test that a cell with several numbered paragraphs is translated as one text
#[tokio::test]
async fn test_translateDocument_withNumberedCell_shouldDistributeSentences() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let mut document = with_body(Story::new().with_table(common::single_cell_table(&["1. 開機", "2. 登入"])));

    let report = augmenter.translate_document(&mut document).await;

    let table = document.body.tables().next().expect("table should remain");
    assert_eq!(common::first_cell_texts(table), vec!["1. 開機", "2. 登入", "1. Turn on\n2. Log in"]);
    assert_eq!(report.cells_merged, 1);
}

/// Test that plain cells and nested tables get a translation below each paragraph
#[tokio::test]
async fn test_translateDocument_withNestedTable_shouldTranslateInnerCells() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let inner = common::single_cell_table(&["內層"]);
    let outer = Table::from_rows(vec![Row::new(vec![Cell {
        content: Story::new().with_paragraph(Paragraph::from_text("型號")).with_table(inner),
    }])]);
    let mut document = with_body(Story::new().with_table(outer));

    augmenter.translate_document(&mut document).await;

    let outer = document.body.tables().next().expect("outer table");
    assert_eq!(common::first_cell_texts(outer), vec!["型號", "Model"]);
    let cell = outer.cells().next().expect("outer cell");
    let inner = cell.content.tables().next().expect("inner table");
    assert_eq!(common::first_cell_texts(inner), vec!["內層", "Inner"]);
}

/// Test header sizes, centered translations and linked parts
#[tokio::test]
async fn test_translateDocument_withHeaders_shouldResizeAndCenter() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let header = HeaderFooter::new(
        HeaderFooterKind::Header,
        Story::new()
            .with_paragraph(Paragraph::new().with_style("HeaderStyle").with_run(Run::new("公司名稱").with_size(28)))
            .with_table(Table::from_rows(vec![Row::new(vec![
                Cell::from_paragraphs(vec![Paragraph::from_text("機密")]),
                Cell::from_paragraphs(vec![Paragraph::from_text("機密")]),
            ])])),
    );
    let linked_footer = HeaderFooter::new(
        HeaderFooterKind::EvenPageFooter,
        Story::new().with_paragraph(Paragraph::from_text("機密")),
    )
    .linked();
    let mut document = Document::new().with_section(Section::new(vec![header, linked_footer]));

    augmenter.translate_document(&mut document).await;

    let header = &document.sections[0].header_footers[0].content;
    let paragraphs: Vec<&Paragraph> = header.paragraphs().collect();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].style, None);
    assert_eq!(paragraphs[0].runs[0].font.size, Some(20));
    assert_eq!(paragraphs[1].text(), "Company name");
    assert_eq!(paragraphs[1].alignment, Some(Alignment::Center));
    assert_eq!(paragraphs[1].runs[0].font.size, Some(12));

    let table = header.tables().next().expect("header table");
    let cells: Vec<Vec<String>> = table
        .cells()
        .map(|cell| cell.content.paragraphs().map(Paragraph::text).collect())
        .collect();
    assert_eq!(cells, vec![vec!["機密".to_string(), "Confidential".to_string()], vec!["機密".to_string()]]);
    let translation_size = table
        .cells()
        .next()
        .and_then(|cell| cell.content.paragraphs().nth(1))
        .map(|paragraph| paragraph.runs[0].font.size);
    assert_eq!(translation_size, Some(Some(16)));

    let footer = &document.sections[0].header_footers[1].content;
    assert_eq!(footer.paragraphs().count(), 1);
}

/// Test that diagram text is overwritten and laid out compactly
#[tokio::test]
async fn test_translateDocument_withTextBoxes_shouldOverwriteRuns() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let mut document = Document::new()
        .with_text_box(TextBox::from_paragraphs(vec![Paragraph::new()
            .with_run(Run::new("開始").with_size(20))
            .with_run(Run::new(" "))]))
        .with_text_box(TextBox::from_paragraphs(vec![Paragraph::from_text("End")]));

    let report = augmenter.translate_document(&mut document).await;

    let translated = &document.text_boxes[0].paragraphs[0];
    assert_eq!(translated.runs[0].text, "Start");
    assert!(translated.runs.iter().all(|run| run.font.size == Some(11)));
    assert_eq!(translated.alignment, Some(Alignment::Center));
    let spacing = translated.line_spacing.expect("line spacing should be set");
    assert_eq!((spacing.twips, spacing.rule), (130, LineRule::Exact));

    let untouched = &document.text_boxes[1].paragraphs[0];
    assert_eq!(untouched.runs[0].font.size, None);
    assert_eq!(untouched.line_spacing, None);
    assert_eq!(report.text_box_runs, 1);
}

/// Test that a failing translator leaves the document text alone
#[tokio::test]
async fn test_translateDocument_withFailingProvider_shouldKeepSourceText() {
    let augmenter = common::augmenter_with(MockProvider::failing(), FixedTranslationTable::new());
    let mut document = with_body(
        Story::new()
            .with_paragraph(Paragraph::from_text("請先開機"))
            .with_paragraph(Paragraph::from_text("備註：")),
    );

    let report = augmenter.translate_document(&mut document).await;

    assert_eq!(body_texts(&document), vec!["請先開機", "備註："]);
    assert_eq!(report.translations_inserted, 0);
    assert_eq!(report.dispatch.failures, 2);
}

/// Test that phases are reported in traversal order
#[tokio::test]
async fn test_translateDocumentWithProgress_shouldReportPhasesInOrder() {
    let augmenter = common::augmenter_with(common::counting_provider(), FixedTranslationTable::new());
    let mut document = with_body(Story::new().with_paragraph(Paragraph::from_text("內容")));
    let phases = Mutex::new(Vec::new());

    augmenter
        .translate_document_with_progress(&mut document, |phase| phases.lock().push(phase))
        .await;

    assert_eq!(
        phases.into_inner(),
        vec![
            AugmentPhase::Grouping,
            AugmentPhase::Paragraphs,
            AugmentPhase::Tables,
            AugmentPhase::HeadersFooters,
            AugmentPhase::Diagrams,
        ]
    );
}

/// Test that augmentation followed by normalization produces the expected body
#[tokio::test]
async fn test_augmentThenNormalize_shouldDropClearedContinuations() {
    let augmenter = common::augmenter_with(common::dictionary_provider(DICTIONARY), FixedTranslationTable::new());
    let mut document = with_body(
        Story::new()
            .with_paragraph(Paragraph::from_text("  1.2 開始"))
            .with_paragraph(Paragraph::from_text("     設定參數")),
    );

    augmenter.translate_document(&mut document).await;
    normalize(&mut document, &NormalizeSettings::default());

    assert_eq!(body_texts(&document), vec!["  1.2 開始設定參數", "  Start setting parameters"]);
    let translation_font = document
        .body
        .paragraphs()
        .nth(1)
        .and_then(|paragraph| paragraph.runs[0].font.name.clone());
    assert_eq!(translation_font.as_deref(), Some("Times New Roman"));
}
