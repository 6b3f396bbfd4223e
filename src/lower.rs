//! Syntax lowering: hand the comment-rewritten source to swc (through
//! `deno_ast`) and emit a plain ECMAScript module.
//!
//! | Option | TypeScript compiler setting | Effect |
//! |--------|-----------------------------|--------|
//! | `decorators: true` | decorators left to the host | decorator syntax kept |
//! | `decorators: false` | `experimentalDecorators` | decorators lowered to helper calls |
//! | `jsx: true` | `jsx: preserve` | parsed as TSX, JSX kept verbatim |
//!
//! Comments survive emission, so the documentation blocks written by
//! [`crate::rewrite`] reach the host parser.

use crate::error::{Result, RewriteError};
use deno_ast::{
    EmitOptions, MediaType, ModuleSpecifier, ParseParams, SourceMapOption, TranspileModuleOptions,
    TranspileOptions,
};

/// Options forwarded from the host parser configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowerOptions {
    /// Host parser accepts decorator syntax
    pub decorators: bool,
    /// Parse JSX and keep it verbatim
    pub jsx: bool,
}

impl LowerOptions {
    fn media_type(&self) -> MediaType {
        if self.jsx {
            MediaType::Tsx
        } else {
            MediaType::TypeScript
        }
    }

    fn transpile_options(&self) -> TranspileOptions {
        TranspileOptions {
            use_ts_decorators: !self.decorators,
            transform_jsx: !self.jsx,
            ..Default::default()
        }
    }
}

/// Lower `source` to plain ECMAScript.
pub fn lower(source: &str, options: &LowerOptions) -> Result<String> {
    let media_type = options.media_type();
    let specifier = ModuleSpecifier::parse(&format!("file:///module{}", media_type.as_ts_extension()))
        .map_err(|e| RewriteError::Parse(e.to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.into(),
        media_type,
        capture_tokens: false,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| RewriteError::Parse(e.to_string()))?;

    let emit = EmitOptions {
        source_map: SourceMapOption::None,
        ..Default::default()
    };
    let transpiled = parsed
        .transpile(
            &options.transpile_options(),
            &TranspileModuleOptions::default(),
            &emit,
        )
        .map_err(|e| RewriteError::Transpile(e.to_string()))?;

    let text = transpiled.into_source().text;
    tracing::debug!(bytes = text.len(), "lowered to javascript");
    Ok(text)
}
