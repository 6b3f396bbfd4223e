//! Type extraction: map a type annotation node to a canonical type name.

use crate::model::TypeToken;
use crate::syntax;
use tree_sitter::Node;

/// Infer the type written in `annotation`.
///
/// Accepts a `type_annotation` (`: T`) or a bare type node. Only primitive
/// keywords and named references are inferred; every other shape, and a
/// missing annotation, gives [`TypeToken::Undefined`].
pub fn extract(annotation: Option<Node<'_>>, source: &str) -> TypeToken {
    let Some(node) = annotation else {
        return TypeToken::Undefined;
    };

    let ty = if node.kind() == "type_annotation" {
        match node.named_child(0) {
            Some(inner) => inner,
            None => return TypeToken::Undefined,
        }
    } else {
        node
    };

    match ty.kind() {
        "predefined_type" => match syntax::text(ty, source) {
            "number" => TypeToken::Number,
            "string" => TypeToken::String,
            "boolean" => TypeToken::Boolean,
            _ => TypeToken::Undefined,
        },
        "type_identifier" => TypeToken::Named(syntax::text(ty, source).to_string()),
        "nested_type_identifier" | "generic_type" => ty
            .child_by_field_name("name")
            .map_or(TypeToken::Undefined, |name| extract(Some(name), source)),
        _ => TypeToken::Undefined,
    }
}
