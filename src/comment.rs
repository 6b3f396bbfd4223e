//! Documentation comment parsing and building.
//!
//! Reads `/** ... */` blocks into ordered [`Tag`]s the way ESDoc's comment
//! parser does, and writes tags back into a block ESDoc reads identically.
//!
//! - Leading description text becomes a `@desc` tag.
//! - `@name value` starts a tag; following lines continue its value.
//! - Lines inside ``` fences never start a tag.

use crate::model::Tag;
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(@\w+)(?:[\t ](.*))?$").unwrap());

static RE_LINE_HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\t ]*\*?[\t ]?").unwrap());

const DESC: &str = "@desc";

/// Parse a full comment (`/** ... */`) into its tags.
///
/// A comment with no text yields no tags.
pub fn parse(comment: &str) -> Vec<Tag> {
    let body = comment.strip_prefix("/**").unwrap_or(comment);
    let body = body.strip_suffix("*/").unwrap_or(body);
    let body = body.replace("\r\n", "\n");

    let mut tags: Vec<Tag> = Vec::new();
    let mut current = Tag::new(DESC, "");
    let mut value_lines: Vec<String> = Vec::new();
    let mut in_fence = false;

    for raw in body.lines() {
        let line = RE_LINE_HEAD.replace(raw, "");
        let line = line.trim_end();

        if !in_fence {
            if let Some(caps) = RE_TAG_LINE.captures(line) {
                flush(&mut tags, &mut current, &mut value_lines);
                current = Tag::new(&caps[1], "");
                value_lines.push(caps.get(2).map_or("", |m| m.as_str()).to_string());
                continue;
            }
        }
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        value_lines.push(line.to_string());
    }
    flush(&mut tags, &mut current, &mut value_lines);

    tags
}

/// Close the tag being accumulated. The value is trimmed; an empty
/// description is dropped.
fn flush(tags: &mut Vec<Tag>, current: &mut Tag, lines: &mut Vec<String>) {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let value = match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].join("\n").trim().to_string(),
        _ => String::new(),
    };
    lines.clear();

    if current.name == DESC && value.is_empty() && tags.is_empty() {
        return;
    }
    current.value = value;
    tags.push(std::mem::replace(current, Tag::new(DESC, "")));
}

/// Build a comment block from `tags`, indenting every line after the first.
pub fn build(tags: &[Tag], indent: &str) -> String {
    if tags.is_empty() {
        return "/** */".to_string();
    }

    let mut out = String::from("/**\n");
    for (i, tag) in tags.iter().enumerate() {
        let mut lines = tag.value.split('\n');
        let first = lines.next().unwrap_or("");

        let head = if i == 0 && tag.name == DESC {
            first.to_string()
        } else if first.is_empty() {
            tag.name.clone()
        } else {
            format!("{} {}", tag.name, first)
        };
        push_line(&mut out, indent, &head);
        for line in lines {
            push_line(&mut out, indent, line);
        }
    }
    out.push_str(indent);
    out.push_str(" */");
    out
}

fn push_line(out: &mut String, indent: &str, text: &str) {
    out.push_str(indent);
    if text.is_empty() {
        out.push_str(" *\n");
    } else {
        out.push_str(" * ");
        out.push_str(text);
        out.push('\n');
    }
}
