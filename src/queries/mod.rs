//! Editor queries over a parsed GN tree: syntax highlighting and folding.
//!
//! The `.scm` sources under `queries/` are shipped for editors that run
//! tree-sitter queries themselves; [`highlight`] and [`fold_ranges`] run the
//! same queries with a [`tree_sitter::QueryCursor`].

mod folds;
mod highlight;

pub use folds::{FoldRange, fold_ranges};
pub use highlight::{Capture, HighlightSpan, Theme, highlight, render_ansi};

pub const HIGHLIGHTS_QUERY: &str = include_str!("../../queries/highlights.scm");
pub const FOLDS_QUERY: &str = include_str!("../../queries/folds.scm");
