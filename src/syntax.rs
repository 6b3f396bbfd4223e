//! tree-sitter front end: parse TypeScript source into a syntax tree.

use crate::error::{Result, RewriteError};
use tree_sitter::{Node, Parser, Tree};

/// Grammar used to parse a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    TypeScript,
    /// TypeScript with JSX elements
    Tsx,
}

impl Dialect {
    /// Pick the dialect for a parse that must keep JSX intact.
    pub fn for_jsx(jsx: bool) -> Self {
        if jsx {
            Dialect::Tsx
        } else {
            Dialect::TypeScript
        }
    }
}

/// Parse `source` with the grammar for `dialect`.
///
/// Trees with error nodes are returned as-is; only a missing tree is an error.
pub fn parse(source: &str, dialect: Dialect) -> Result<Tree> {
    let language = match dialect {
        Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
        Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX,
    };

    let mut parser = Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| RewriteError::Parse(format!("failed to load grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| RewriteError::Parse("parser returned no tree".to_string()))?;

    if tree.root_node().has_error() {
        tracing::warn!("source contains syntax errors; continuing best-effort");
    }
    Ok(tree)
}

/// Source text covered by `node`.
pub fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// 1-indexed line of byte offset `at`: one plus the newlines before it.
pub fn line_of(source: &str, at: usize) -> usize {
    source.as_bytes()[..at].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Leading whitespace of the line holding `at`.
pub fn line_indent(source: &str, at: usize) -> &str {
    let line_start = source[..at].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..at];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// True when only whitespace precedes `at` on its line.
pub fn starts_line(source: &str, at: usize) -> bool {
    let line_start = source[..at].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..at].chars().all(|c| c == ' ' || c == '\t')
}

/// True for a `/** ... */` documentation comment node.
pub fn is_doc_comment(node: Node<'_>, source: &str) -> bool {
    if node.kind() != "comment" {
        return false;
    }
    let text = text(node, source);
    text.starts_with("/**") && text != "/**/"
}

/// Anonymous keyword child of `node` with the given kind (`get`, `readonly`, ...).
pub fn keyword<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| !child.is_named() && child.kind() == kind);
    found
}
