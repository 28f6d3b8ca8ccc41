use anyhow::Result;
use tree_sitter::{Node, Query, QueryCursor, Range, StreamingIterator, Tree};

use super::FOLDS_QUERY;

/// A foldable region: a block, a list, or the argument list of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoldRange {
    pub kind: &'static str,
    pub range: Range,
}

/// Regions captured by `folds.scm` that span more than one line, in document
/// order.
pub fn fold_ranges(tree: &Tree, src: &[u8]) -> Result<Vec<FoldRange>> {
    let query = Query::new(&tree.language(), FOLDS_QUERY)?;
    let mut out = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), src);
    while let Some(m) = matches.next() {
        for cap in m.captures {
            let node = cap.node;
            if let Some(range) = fold_range(node)
                && range.end_point.row > range.start_point.row
            {
                out.push(FoldRange {
                    kind: node.kind(),
                    range,
                });
            }
        }
    }
    out.sort_by_key(|f| (f.range.start_byte, std::cmp::Reverse(f.range.end_byte)));
    out.dedup();
    Ok(out)
}

/// A call folds between its parentheses so a trailing block folds on its own.
fn fold_range(node: Node) -> Option<Range> {
    if node.is_missing() {
        return None;
    }
    if node.kind() != "call_expression" {
        return Some(node.range());
    }
    let mut cursor = node.walk();
    let mut children = node.children(&mut cursor);
    let open = children.find(|c| c.kind() == "(")?;
    let close = children.find(|c| c.kind() == ")" && !c.is_missing())?;
    Some(Range {
        start_byte: open.start_byte(),
        end_byte: close.end_byte(),
        start_point: open.start_position(),
        end_point: close.end_position(),
    })
}
