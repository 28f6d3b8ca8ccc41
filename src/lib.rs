#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]

pub mod engine;
pub mod error;
pub mod grammar;
pub mod queries;

use anyhow::{Context, Result};
use tree_sitter::{Parser, Tree};

pub use error::EditError;
pub use grammar::{NODE_TYPES, language};

/// Parse `src` with the GN language.
pub fn parse(src: impl AsRef<[u8]>) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .context("set_language failed")?;
    parser.parse(src, None).context("parse failed")
}
