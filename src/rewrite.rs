//! Comment rewriting: enrich every eligible declaration's doc comment.
//!
//! 1. Parse the source and collect declarations
//! 2. Order them rightmost-first
//! 3. Per declaration: parse its old comment, synthesize tags, build a new
//!    comment replacing the old one (or inserted before the declaration)
//! 4. Apply all edits in one pass

use crate::collect;
use crate::comment;
use crate::edit::{self, TextEdit};
use crate::error::Result;
use crate::model::Declaration;
use crate::syntax::{self, Dialect};
use crate::tags;

/// Rewrite the documentation comments of `source`.
pub fn rewrite_comments(source: &str, dialect: Dialect) -> Result<String> {
    let tree = syntax::parse(source, dialect)?;
    let mut decls = collect::declarations(&tree, source);
    decls.sort_by(|a, b| b.start.cmp(&a.start));

    let edits = decls
        .iter()
        .map(|decl| comment_edit(decl, source))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(declarations = decls.len(), "rewrote documentation comments");
    edit::apply(source, edits)
}

/// The edit that puts `decl`'s synthesized comment in place.
fn comment_edit(decl: &Declaration, source: &str) -> Result<TextEdit> {
    let mut tags = match &decl.doc {
        Some(span) => comment::parse(&source[span.clone()]),
        None => Vec::new(),
    };
    tags::synthesize(decl, &mut tags)?;

    let block = comment::build(&tags, &decl.indent);
    let text = match (&decl.doc, decl.inline) {
        (Some(_), _) => block,
        (None, false) => format!("{}\n{}", block, decl.indent),
        // Shares a line with preceding code: give the block its own lines
        (None, true) => format!("\n{}{}\n{}", decl.indent, block, decl.indent),
    };
    Ok(TextEdit::replace(decl.comment_span(), text))
}
