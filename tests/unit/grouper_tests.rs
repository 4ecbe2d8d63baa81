/*!
 * Tests for indentation grouping
 */

use dualdoc::augment::grouper::{build_groups, merge_members, GroupMember, Grouper};
use dualdoc::document::NodeId;

fn member(index: usize, text: &str, indent_width: usize) -> GroupMember {
    GroupMember {
        index,
        node: index as NodeId + 1,
        text: text.to_string(),
        indent_width,
    }
}

fn groups_of(texts: &[&str]) -> Vec<Vec<usize>> {
    build_groups(texts.iter().enumerate().map(|(i, t)| (i as NodeId, *t)))
        .iter()
        .map(|unit| unit.member_indices())
        .collect()
}

/// Test that a numbered group is concatenated without separators
#[test]
fn test_mergeMembers_withStepGroup_shouldConcatenate() {
    let members = vec![member(0, "1.2 開始", 0), member(1, "   設定參數", 3)];
    assert_eq!(merge_members(&members), "1.2 開始設定參數");
}

/// Test that groups never overlap and keep document order
#[test]
fn test_buildGroups_withSeveralSteps_shouldProduceDisjointOrderedGroups() {
    let texts = [
        "  1. 準備工具",
        "     螺絲起子",
        "     扳手",
        "沒有縮排的段落",
        "  2. 拆下外殼",
        "     小心排線",
        "  3. 完成",
    ];
    let units = build_groups(texts.iter().enumerate().map(|(i, t)| (i as NodeId, *t)));

    assert_eq!(units.len(), 3);
    let ids: Vec<usize> = units.iter().map(|unit| unit.group_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let mut seen = Vec::new();
    for unit in &units {
        let indices = unit.member_indices();
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        for index in indices {
            assert!(!seen.contains(&index));
            seen.push(index);
        }
    }
    assert_eq!(units[0].merged_text, "1. 準備工具螺絲起子扳手");
    assert_eq!(units[2].members.len(), 1);
}

/// Test that paragraphs without source text neither extend nor close a group
#[test]
fn test_buildGroups_withBlankAndForeignParagraphs_shouldIgnoreThem() {
    assert_eq!(
        groups_of(&["  1. 準備", "", "    see figure 3", "    材料"]),
        vec![vec![0, 3]]
    );
}

/// Test that an indented paragraph before any marker stays ungrouped
#[test]
fn test_buildGroups_withLeadingContinuation_shouldSkipIt() {
    assert_eq!(groups_of(&["    前言", "  1. 第一步", "     細節"]), vec![vec![1, 2]]);
}

/// Test that the grouper closes its open group when finished
#[test]
fn test_grouper_finish_shouldCloseOpenGroup() {
    let mut grouper = Grouper::new();
    grouper.observe(0, 10, "  1.1 安裝");
    grouper.observe(1, 11, "      軟體");

    let units = grouper.finish();
    assert_eq!(units.len(), 1);
    assert!(units[0].contains_node(11));
    assert_eq!(units[0].anchor().node, 10);
    assert_eq!(units[0].leading_indent, 2);
}
