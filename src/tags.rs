//! Tag synthesis: merge inferred types into a declaration's tag set.
//!
//! | Kind | Rule |
//! |------|------|
//! | type definition | line number only |
//! | method / function | `@param` per parameter, then `@return` |
//! | field / getter | `@type` from the annotation |
//! | setter | `@type` from the first parameter, unless any `@type` exists |
//!
//! Existing `{type}` prefixes are never replaced.

use crate::error::{Result, RewriteError};
use crate::model::*;

/// Update `tags` in place for `decl`.
///
/// Any stale `@lineNumber` is replaced by a fresh one before the
/// kind-specific rules run.
pub fn synthesize(decl: &Declaration, tags: &mut Vec<Tag>) -> Result<()> {
    apply_line_number(decl, tags);

    match &decl.kind {
        DeclKind::TypeDefinition => {}
        DeclKind::Method(sig) | DeclKind::Function(sig) => {
            apply_params(decl, &sig.params, tags)?;
            apply_return(sig.returns.as_ref(), tags);
        }
        DeclKind::Field { ty } | DeclKind::Getter { ty } => apply_type(ty.as_ref(), tags),
        DeclKind::Setter { params } => apply_setter(params, tags),
    }
    Ok(())
}

fn apply_line_number(decl: &Declaration, tags: &mut Vec<Tag>) {
    tags.retain(|t| t.name != "@lineNumber");
    tags.push(Tag::new("@lineNumber", decl.line.to_string()));
}

fn apply_params(decl: &Declaration, params: &[Param], tags: &mut Vec<Tag>) -> Result<()> {
    let existing = tags.iter().filter(|t| t.name == "@param").count();

    // No @param yet: one per parameter
    if existing == 0 {
        tags.extend(
            params
                .iter()
                .map(|p| Tag::new("@param", format!("{{{}}} {}", p.ty, p.name))),
        );
        return Ok(());
    }

    if existing != params.len() {
        return Err(RewriteError::TagMismatch {
            name: decl.name.clone(),
            line: decl.line,
            params: params.len(),
            tags: existing,
        });
    }

    // Positional pairing with the written @param tags
    let param_tags = tags.iter_mut().filter(|t| t.name == "@param");
    for (tag, param) in param_tags.zip(params) {
        if !tag.has_type_prefix() {
            tag.prefix_type(&param.ty);
        }
    }
    Ok(())
}

fn apply_return(returns: Option<&TypeToken>, tags: &mut Vec<Tag>) {
    let Some(ty) = returns else {
        return;
    };

    match tags
        .iter()
        .position(|t| t.name == "@return" || t.name == "@returns")
    {
        Some(i) if tags[i].has_type_prefix() => {}
        Some(i) => tags[i].prefix_type(ty),
        None => tags.push(Tag::new("@return", format!("{{{}}}", ty))),
    }
}

fn apply_type(ty: Option<&TypeToken>, tags: &mut Vec<Tag>) {
    let Some(ty) = ty else {
        return;
    };

    match tags.iter().position(|t| t.name == "@type") {
        Some(i) if tags[i].has_type_prefix() => {}
        Some(i) => tags[i].prefix_type(ty),
        None => tags.push(Tag::new("@type", format!("{{{}}}", ty))),
    }
}

fn apply_setter(params: &[Param], tags: &mut Vec<Tag>) {
    let Some(first) = params.first() else {
        return;
    };
    if tags.iter().any(|t| t.name == "@type") {
        return;
    }
    tags.push(Tag::new("@type", format!("{{{}}}", first.ty)));
}
