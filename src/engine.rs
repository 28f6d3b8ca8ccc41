use anyhow::{Context, Result};
use ropey::Rope;
use std::fmt;
use tracing::debug;
use tree_sitter::{InputEdit, Language, Parser, Point, Range, Tree};

use crate::error::EditError;

pub mod ast;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub start_byte: usize,
    pub end_byte: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
        }
    }
}

/// A GN source text together with its current syntax tree.
pub struct Document {
    rope: Rope,
    parser: Parser,
    pub tree: Tree,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl Document {
    pub fn new(src: String, lang: &Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(lang).context("set_language failed")?;
        let tree = parser.parse(src.as_str(), None).context("parse failed")?;
        Ok(Self {
            rope: Rope::from_str(&src),
            parser,
            tree,
        })
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.rope.to_string().into_bytes()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn slice_bytes(&self, start: usize, end: usize) -> String {
        self.rope.byte_slice(start..end).to_string()
    }

    /// Row and byte column of `byte`.
    pub fn point(&self, byte: usize) -> Point {
        let row = self.rope.byte_to_line(byte);
        Point::new(row, byte - self.rope.line_to_byte(row))
    }

    /// Apply non-overlapping byte edits, reparse incrementally, and return the
    /// ranges whose syntactic structure changed.
    pub fn apply_edits(&mut self, mut edits: Vec<TextEdit>) -> Result<Vec<Range>> {
        if edits.is_empty() {
            return Ok(Vec::new());
        }
        edits.sort_by_key(|e| e.start_byte);
        self.check_edits(&edits)?;

        let mut old_tree = self.tree.clone();
        for e in edits.iter().rev() {
            let start_position = self.point(e.start_byte);
            let old_end_position = self.point(e.end_byte);
            let start_char = self.rope.byte_to_char(e.start_byte);
            let end_char = self.rope.byte_to_char(e.end_byte);
            self.rope.remove(start_char..end_char);
            if !e.replacement.is_empty() {
                self.rope.insert(start_char, &e.replacement);
            }
            old_tree.edit(&InputEdit {
                start_byte: e.start_byte,
                old_end_byte: e.end_byte,
                new_end_byte: e.start_byte + e.replacement.len(),
                start_position,
                old_end_position,
                new_end_position: advance(start_position, &e.replacement),
            });
        }

        let rope = &self.rope;
        let tree = self
            .parser
            .parse_with_options(&mut |byte, _| rope_chunk(rope, byte), Some(&old_tree), None)
            .context("reparse failed")?;
        let changed: Vec<Range> = old_tree.changed_ranges(&tree).collect();
        debug!(
            edits = edits.len(),
            changed = changed.len(),
            "document reparsed"
        );
        #[cfg(feature = "debug-tree")]
        tracing::trace!(
            tree = %ast::to_sexp(tree.root_node(), self.bytes().as_slice()),
            "reparsed tree"
        );
        self.tree = tree;
        Ok(changed)
    }

    fn check_edits(&self, edits: &[TextEdit]) -> Result<(), EditError> {
        let len = self.rope.len_bytes();
        for e in edits {
            if e.start_byte > e.end_byte {
                return Err(EditError::Reversed {
                    start: e.start_byte,
                    end: e.end_byte,
                });
            }
            if e.end_byte > len {
                return Err(EditError::OutOfBounds {
                    start: e.start_byte,
                    end: e.end_byte,
                    len,
                });
            }
            for b in [e.start_byte, e.end_byte] {
                if self.rope.char_to_byte(self.rope.byte_to_char(b)) != b {
                    return Err(EditError::CharBoundary(b));
                }
            }
        }
        for pair in edits.windows(2) {
            if pair[1].start_byte < pair[0].end_byte {
                return Err(EditError::Overlap(
                    pair[0].start_byte..pair[0].end_byte,
                    pair[1].start_byte..pair[1].end_byte,
                ));
            }
        }
        Ok(())
    }
}

/// The rest of the rope chunk holding `byte`; empty at the end of the text.
fn rope_chunk(rope: &Rope, byte: usize) -> &[u8] {
    if byte >= rope.len_bytes() {
        return &[];
    }
    let (chunk, chunk_start, _, _) = rope.chunk_at_byte(byte);
    &chunk.as_bytes()[byte - chunk_start..]
}

/// The position reached after writing `text` at `start`.
fn advance(start: Point, text: &str) -> Point {
    match text.rfind('\n') {
        Some(i) => Point::new(
            start.row + text.matches('\n').count(),
            text.len() - i - 1,
        ),
        None => Point::new(start.row, start.column + text.len()),
    }
}
