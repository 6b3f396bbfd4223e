//! Error types for the comment rewriter and lowering pass.
//!
//! Host-facing code wraps these in `anyhow::Error`; callers that need to
//! tell a reconciliation failure apart from a parse failure can
//! `downcast_ref::<RewriteError>()`.

use std::ops::Range;

use thiserror::Error;

/// Errors raised while transforming a single file.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A callable's existing `@param` tags cannot be lined up with its
    /// signature.
    #[error(
        "mismatch params and comments: `{name}` (line {line}) has {params} parameter(s) but {tags} @param tag(s)"
    )]
    TagMismatch {
        name: String,
        line: usize,
        params: usize,
        tags: usize,
    },

    /// The source could not be parsed.
    #[error("failed to parse source: {0}")]
    Parse(String),

    /// Two edits touch the same bytes.
    #[error("overlapping edits at {first:?} and {second:?}")]
    OverlappingEdits {
        first: Range<usize>,
        second: Range<usize>,
    },

    /// swc rejected the module while lowering it.
    #[error("failed to transpile: {0}")]
    Transpile(String),
}

pub type Result<T> = std::result::Result<T, RewriteError>;
