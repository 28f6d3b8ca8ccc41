use thiserror::Error;

/// A text edit that does not fit the document it is applied to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("edit {start}..{end} is out of bounds for a document of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit {start}..{end} is reversed")]
    Reversed { start: usize, end: usize },

    #[error("edit boundary {0} is not on a character boundary")]
    CharBoundary(usize),

    #[error("edits {0:?} and {1:?} overlap")]
    Overlap(std::ops::Range<usize>, std::ops::Range<usize>),
}
