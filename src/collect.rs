//! Declaration collection: pre-order walk over the whole tree.
//!
//! Every node is visited; the six eligible kinds are recorded with their
//! inferred types, the line of their name and the documentation comment
//! that precedes them.

use crate::model::*;
use crate::syntax;
use crate::types;
use tree_sitter::{Node, Tree};

const UNDEFINED_NAME: &str = "undefined";

/// Collect eligible declarations in document order.
pub fn declarations(tree: &Tree, source: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    let mut cursor = tree.walk();

    loop {
        if let Some(decl) = classify(cursor.node(), source) {
            out.push(decl);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}

fn classify(node: Node<'_>, source: &str) -> Option<Declaration> {
    if is_constructor(node, source) {
        return None;
    }

    let kind = match node.kind() {
        "class_declaration" | "abstract_class_declaration" => DeclKind::TypeDefinition,
        "method_definition" | "abstract_method_signature" => member_kind(node, source),
        "method_signature" if node.parent().is_some_and(|p| p.kind() == "class_body") => {
            member_kind(node, source)
        }
        "public_field_definition" => DeclKind::Field {
            ty: annotation(node, "type", source),
        },
        "function_declaration" | "generator_function_declaration" | "function_signature" => {
            DeclKind::Function(signature(node, source))
        }
        _ => return None,
    };

    let name_node = node.child_by_field_name("name");
    let name = name_node.map_or("(anonymous)", |n| syntax::text(n, source));
    let line = syntax::line_of(source, name_node.map_or(node.start_byte(), |n| n.end_byte()));

    let (start, doc) = locate(node, source);

    Some(Declaration {
        name: name.to_string(),
        kind,
        line,
        start,
        indent: syntax::line_indent(source, start).to_string(),
        inline: !syntax::starts_line(source, start),
        doc,
    })
}

/// Constructors, including overload signatures, keep their comment as written.
fn is_constructor(node: Node<'_>, source: &str) -> bool {
    matches!(
        node.kind(),
        "method_definition" | "method_signature" | "abstract_method_signature"
    ) && node
        .child_by_field_name("name")
        .is_some_and(|n| syntax::text(n, source) == "constructor")
}

/// Methods split into getter, setter or plain method by their keyword.
fn member_kind(node: Node<'_>, source: &str) -> DeclKind {
    if syntax::keyword(node, "get").is_some() {
        DeclKind::Getter {
            ty: annotation(node, "return_type", source),
        }
    } else if syntax::keyword(node, "set").is_some() {
        DeclKind::Setter {
            params: params(node, source),
        }
    } else {
        DeclKind::Method(signature(node, source))
    }
}

fn annotation(node: Node<'_>, field: &str, source: &str) -> Option<TypeToken> {
    node.child_by_field_name(field)
        .map(|ty| types::extract(Some(ty), source))
}

fn signature(node: Node<'_>, source: &str) -> Signature {
    Signature {
        params: params(node, source),
        returns: annotation(node, "return_type", source),
    }
}

/// Runtime parameters in order; `this` pseudo-parameters are skipped.
fn params(node: Node<'_>, source: &str) -> Vec<Param> {
    let Some(list) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut cursor = list.walk();
    let mut out = Vec::new();
    for child in list.named_children(&mut cursor) {
        if !matches!(child.kind(), "required_parameter" | "optional_parameter") {
            continue;
        }
        let Some(pattern) = child.child_by_field_name("pattern") else {
            continue;
        };
        if pattern.kind() == "this" {
            continue;
        }
        out.push(Param {
            name: param_name(pattern, source),
            ty: types::extract(child.child_by_field_name("type"), source),
        });
    }
    out
}

fn param_name(pattern: Node<'_>, source: &str) -> String {
    let ident = match pattern.kind() {
        "identifier" => Some(pattern),
        "rest_pattern" => pattern.named_child(0).filter(|n| n.kind() == "identifier"),
        _ => None,
    };
    ident.map_or(UNDEFINED_NAME, |n| syntax::text(n, source)).to_string()
}

/// Start offset of a declaration (through export/declare wrappers and
/// sibling decorators) and the documentation comment just before it.
fn locate(node: Node<'_>, source: &str) -> (usize, Option<std::ops::Range<usize>>) {
    let mut anchor = node;
    while let Some(parent) = anchor.parent() {
        if matches!(parent.kind(), "export_statement" | "ambient_declaration") {
            anchor = parent;
        } else {
            break;
        }
    }

    let mut start = anchor.start_byte();
    let mut prev = anchor.prev_sibling();
    while let Some(p) = prev.filter(|p| p.kind() == "decorator") {
        start = p.start_byte();
        prev = p.prev_sibling();
    }

    // Plain comments between the doc block and the declaration are skipped
    while let Some(p) = prev.filter(|p| p.kind() == "comment" && !syntax::is_doc_comment(*p, source)) {
        prev = p.prev_sibling();
    }

    let doc = prev
        .filter(|p| syntax::is_doc_comment(*p, source))
        .filter(|p| syntax::starts_line(source, p.start_byte()))
        .map(|p| p.byte_range());
    (start, doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse, Dialect};

    fn collect(src: &str) -> Vec<Declaration> {
        let tree = parse(src, Dialect::TypeScript).unwrap();
        declarations(&tree, src)
    }

    #[test]
    fn finds_all_six_kinds() {
        let src = r#"
class Point {
    x: number;
    constructor(x: number) { this.x = x; }
    scale(k: number): Point { return this; }
    get len(): number { return 0; }
    set len(v: number) {}
}
function origin(): Point { return new Point(0); }
"#;
        let decls = collect(src);
        let kinds: Vec<&str> = decls
            .iter()
            .map(|d| match d.kind {
                DeclKind::TypeDefinition => "class",
                DeclKind::Field { .. } => "field",
                DeclKind::Method(_) => "method",
                DeclKind::Getter { .. } => "getter",
                DeclKind::Setter { .. } => "setter",
                DeclKind::Function(_) => "function",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["class", "field", "method", "getter", "setter", "function"]
        );
    }

    #[test]
    fn constructors_are_not_collected() {
        let src = "class A {\n  /**\n   * @param {Object} opts\n   * @param {number} opts.a\n   */\n  constructor(opts: Opts) {}\n  constructor(a: string);\n}";
        let decls = collect(src);
        assert_eq!(decls.len(), 1, "got: {decls:?}");
        assert!(matches!(decls[0].kind, DeclKind::TypeDefinition));
    }

    #[test]
    fn interface_members_are_not_collected() {
        let decls = collect("interface Shape { area(): number; name: string; }");
        assert!(decls.is_empty(), "got: {decls:?}");
    }

    #[test]
    fn signature_types() {
        let decls = collect("function f(a: number, b?: string, ...rest: Item[]): boolean { return true; }");
        let DeclKind::Function(sig) = &decls[0].kind else {
            panic!("expected function");
        };
        assert_eq!(
            sig.params,
            vec![
                Param { name: "a".into(), ty: TypeToken::Number },
                Param { name: "b".into(), ty: TypeToken::String },
                Param { name: "rest".into(), ty: TypeToken::Undefined },
            ]
        );
        assert_eq!(sig.returns, Some(TypeToken::Boolean));
    }

    #[test]
    fn this_parameter_skipped() {
        let decls = collect("function f(this: Window, a) {}");
        let DeclKind::Function(sig) = &decls[0].kind else {
            panic!("expected function");
        };
        assert_eq!(sig.params.len(), 1);
        assert_eq!(sig.params[0].ty, TypeToken::Undefined);
    }

    #[test]
    fn destructured_parameter_name() {
        let decls = collect("function f({ a, b }: Options) {}");
        let DeclKind::Function(sig) = &decls[0].kind else {
            panic!("expected function");
        };
        assert_eq!(sig.params[0].name, "undefined");
        assert_eq!(sig.params[0].ty, TypeToken::Named("Options".into()));
    }

    #[test]
    fn line_of_name_token() {
        let src = "\n\n/** doc */\nexport function\nlate() {}";
        let decls = collect(src);
        assert_eq!(decls[0].line, 5);
    }

    #[test]
    fn doc_comment_through_export() {
        let src = "/** Adds. */\nexport function add() {}";
        let decls = collect(src);
        assert_eq!(decls[0].doc, Some(0..12));
        assert_eq!(decls[0].start, src.find("export").unwrap());
    }

    #[test]
    fn doc_comment_before_member_decorators() {
        let src = "class A {\n  /** Run. */\n  @log\n  run() {}\n}";
        let decls = collect(src);
        let run = &decls[1];
        assert_eq!(run.start, src.find("@log").unwrap());
        assert_eq!(run.indent, "  ");
        let doc = run.doc.clone().unwrap();
        assert_eq!(&src[doc], "/** Run. */");
    }

    #[test]
    fn doc_comment_found_across_line_comments() {
        let src = "/** Doc. */\n// note\n/* more */\nfunction f(a: number) {}";
        let decls = collect(src);
        let doc = decls[0].doc.clone().unwrap();
        assert_eq!(&src[doc], "/** Doc. */");
    }

    #[test]
    fn member_sharing_a_line_is_inline() {
        let src = "class C { x: number; }";
        let decls = collect(src);
        assert!(!decls[0].inline);
        assert!(decls[1].inline);
        assert_eq!(decls[1].indent, "");
    }

    #[test]
    fn plain_comment_is_not_doc() {
        let decls = collect("/* not doc */\nfunction f() {}");
        assert!(decls[0].doc.is_none());
    }

    #[test]
    fn trailing_comment_is_not_doc() {
        let decls = collect("let a = 1; /** about a */\nfunction f() {}");
        assert!(decls[0].doc.is_none());
    }

    #[test]
    fn nested_function_collected() {
        let decls = collect("function outer() { function inner(x: number) {} }");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].name, "inner");
    }
}
