use std::fmt::Write;

use tree_sitter::Node;

/// Return true if the byte offset is inside a string or comment node.
#[must_use]
pub fn in_string_or_comment(root: Node, byte: usize) -> bool {
    let mut cur = root.descendant_for_byte_range(byte, byte + 1);
    while let Some(n) = cur {
        match n.kind() {
            "string" | "comment" => return true,
            _ => cur = n.parent(),
        }
    }
    false
}

/// Descendants of `root` (itself included) whose `kind()` is `kind`, in
/// document order.
pub fn descendants_of_kind<'a>(
    root: Node<'a>,
    kind: &str,
) -> impl Iterator<Item = Node<'a>> + use<'a> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    'walk: loop {
        let node = cursor.node();
        if node.kind() == kind {
            out.push(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }
    out.into_iter()
}

/// Error and missing nodes under `root`, outermost first. Descendants of an
/// `ERROR` node are not reported separately.
#[must_use]
pub fn syntax_errors(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        if !n.has_error() {
            continue;
        }
        if n.is_error() || n.is_missing() {
            out.push(n);
            continue;
        }
        let mut children: Vec<_> = n.children(&mut cursor).collect();
        children.reverse();
        stack.extend(children);
    }
    out
}

/// The S-expression of `root`: named nodes with their field labels, missing
/// nodes as `(MISSING x)` and unlexable text as `(UNEXPECTED 'c')`.
///
/// Walks with a cursor, so arbitrarily deep trees print in constant stack.
#[must_use]
pub fn to_sexp(root: Node<'_>, src: &[u8]) -> String {
    let mut out = String::new();
    let mut cursor = root.walk();
    // whether each node on the cursor's path opened a paren
    let mut open: Vec<bool> = Vec::new();
    loop {
        let node = cursor.node();
        let is_root = open.is_empty();
        let shown = node.is_named() || node.is_missing() || is_root;
        if shown {
            if !is_root {
                out.push(' ');
                if let Some(field) = cursor.field_name() {
                    let _ = write!(out, "{field}: ");
                }
            }
            write_head(&mut out, node, src);
        }
        open.push(shown);
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if open.pop() == Some(true) {
                out.push(')');
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}

fn write_head(out: &mut String, node: Node, src: &[u8]) {
    if node.is_error() && node.child_count() == 0 && node.end_byte() > node.start_byte() {
        let text = src.get(node.start_byte()..node.end_byte()).unwrap_or_default();
        let first = String::from_utf8_lossy(text).chars().next();
        let _ = write!(out, "(UNEXPECTED {}", describe_char(first));
    } else if node.is_missing() {
        if node.is_named() {
            let _ = write!(out, "(MISSING {}", node.kind());
        } else {
            let _ = write!(out, "(MISSING \"{}\"", node.kind());
        }
    } else if node.is_named() {
        let _ = write!(out, "({}", node.kind());
    } else {
        let _ = write!(out, "(\"{}\"", node.kind());
    }
}

fn describe_char(c: Option<char>) -> String {
    match c {
        None => "INVALID".to_string(),
        Some('\0') => "'\\0'".to_string(),
        Some('\n') => "'\\n'".to_string(),
        Some('\t') => "'\\t'".to_string(),
        Some('\r') => "'\\r'".to_string(),
        Some(c) if c == ' ' || c.is_ascii_graphic() => format!("'{c}'"),
        Some(c) => u32::from(c).to_string(),
    }
}
