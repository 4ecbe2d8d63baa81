/*!
 * Indentation grouping of physically split paragraphs.
 *
 * Authors often continue a numbered step on the next lines by indenting
 * them instead of using a soft line break. The grouper finds these runs
 * of paragraphs in one forward scan so they can be translated as one
 * logical unit.
 */

use crate::augment::classifier::{scan_indent, step_marker};
use crate::document::NodeId;
use crate::language_utils::contains_source_script;

/// One paragraph of a logical unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    /// Position of the paragraph in the scanned sequence
    pub index: usize,
    pub node: NodeId,
    /// Trimmed paragraph text
    pub text: String,
    pub indent_width: usize,
}

/// Consecutive paragraphs treated as one item. The first member is the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalUnit {
    /// 1-based, strictly increasing in document order
    pub group_id: usize,
    pub members: Vec<GroupMember>,
    /// Indent width of the anchor
    pub leading_indent: usize,
    /// Step number carried by the anchor
    pub step_marker: Option<String>,
    pub merged_text: String,
}

impl LogicalUnit {
    pub fn anchor(&self) -> &GroupMember {
        // a unit is only ever created with its anchor
        &self.members[0]
    }

    pub fn member_indices(&self) -> Vec<usize> {
        self.members.iter().map(|member| member.index).collect()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.members.iter().any(|member| member.node == node)
    }
}

/// Join member texts into the unit's text.
///
/// Step groups are concatenated with each member's leading whitespace
/// removed and no separator; other groups are joined with a single space.
pub fn merge_members(members: &[GroupMember]) -> String {
    let is_step_group = members
        .iter()
        .any(|member| step_marker(&member.text).is_some());

    if is_step_group {
        members
            .iter()
            .map(|member| member.text.trim_start())
            .collect()
    } else {
        members
            .iter()
            .map(|member| member.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Single-pass grouping state with at most one open group.
#[derive(Debug, Default)]
pub struct Grouper {
    open: Option<Vec<GroupMember>>,
    closed: Vec<LogicalUnit>,
}

impl Grouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next paragraph in document order.
    pub fn observe(&mut self, index: usize, node: NodeId, text: &str) {
        if text.trim().is_empty() || !contains_source_script(text) {
            return;
        }

        let indent = scan_indent(text);
        if !indent.has_indent {
            return;
        }

        let member = GroupMember {
            index,
            node,
            text: text.trim().to_string(),
            indent_width: indent.width,
        };

        if step_marker(text).is_some() {
            self.close_open_group();
            self.open = Some(vec![member]);
        } else if let Some(open) = self.open.as_mut() {
            open.push(member);
        }
        // an indented paragraph with no open group stays ungrouped
    }

    fn close_open_group(&mut self) {
        if let Some(members) = self.open.take() {
            let anchor = &members[0];
            let unit = LogicalUnit {
                group_id: self.closed.len() + 1,
                leading_indent: anchor.indent_width,
                step_marker: step_marker(&anchor.text),
                merged_text: merge_members(&members),
                members,
            };
            self.closed.push(unit);
        }
    }

    /// Close the open group and return all units in document order.
    pub fn finish(mut self) -> Vec<LogicalUnit> {
        self.close_open_group();
        self.closed
    }
}

/// Group an ordered sequence of `(node, text)` paragraphs.
pub fn build_groups<I, S>(paragraphs: I) -> Vec<LogicalUnit>
where
    I: IntoIterator<Item = (NodeId, S)>,
    S: AsRef<str>,
{
    let mut grouper = Grouper::new();
    for (index, (node, text)) in paragraphs.into_iter().enumerate() {
        grouper.observe(index, node, text.as_ref());
    }
    grouper.finish()
}
