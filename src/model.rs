//! Data model for one file's transformation: built per file, dropped after.

use std::fmt;
use std::ops::Range;

/// Canonical type name inferred from a type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeToken {
    Number,
    String,
    Boolean,
    /// Base identifier of a type reference (`Foo` for `ns.Foo<T>`)
    Named(String),
    /// No annotation, or a shape that is not inferred (unions, arrays, ...)
    Undefined,
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeToken::Number => f.write_str("number"),
            TypeToken::String => f.write_str("string"),
            TypeToken::Boolean => f.write_str("boolean"),
            TypeToken::Named(name) => f.write_str(name),
            TypeToken::Undefined => f.write_str("undefined"),
        }
    }
}

/// A single `@name value` entry of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name including the leading `@`
    pub name: String,
    /// Free text, optionally starting with `{type}`
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// True when the value already carries a brace-delimited type.
    pub fn has_type_prefix(&self) -> bool {
        self.value.starts_with('{')
    }

    /// Prepend `{ty} ` to the value, keeping any descriptive text.
    pub fn prefix_type(&mut self, ty: &TypeToken) {
        self.value = if self.value.is_empty() {
            format!("{{{}}}", ty)
        } else {
            format!("{{{}}} {}", ty, self.value)
        };
    }
}

/// A callable parameter as written in the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeToken,
}

/// Parameter list and return annotation of a method or function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Param>,
    /// `None` when no return type is written
    pub returns: Option<TypeToken>,
}

/// The six declaration kinds that receive synthesized tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    TypeDefinition,
    Method(Signature),
    Field { ty: Option<TypeToken> },
    Getter { ty: Option<TypeToken> },
    Setter { params: Vec<Param> },
    Function(Signature),
}

/// An eligible declaration located in the source.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    /// 1-indexed line of the name token
    pub line: usize,
    /// Byte offset where the declaration (including decorators) begins
    pub start: usize,
    /// Leading whitespace of the line holding `start`
    pub indent: String,
    /// Other text precedes `start` on its line
    pub inline: bool,
    /// Span of the documentation comment attached to it
    pub doc: Option<Range<usize>>,
}

impl Declaration {
    /// Span replaced when the comment is rewritten: the old comment, or an
    /// empty range at the declaration start.
    pub fn comment_span(&self) -> Range<usize> {
        match &self.doc {
            Some(doc) => doc.clone(),
            None => self.start..self.start,
        }
    }
}
