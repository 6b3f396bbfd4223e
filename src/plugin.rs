//! Parser adapter: the three host lifecycle hooks.
//!
//! - **start**: read the `enable` option; the plugin is built from it
//! - **config**: widen `includes` so `.ts` files are picked up
//! - **code parser**: wrap the host parser so `.ts` sources are rewritten
//!   and lowered before the host sees them

use crate::lower::{self, LowerOptions};
use crate::rewrite;
use crate::syntax::Dialect;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Name of this plugin's entry in the host's `plugins` list.
pub const PLUGIN_NAME: &str = "esdoc-typescript-plugin";

/// Extension of files that are rewritten before parsing.
pub const TYPESCRIPT_EXTENSION: &str = "ts";

/// Include patterns added by the config hook.
pub const INCLUDE_PATTERNS: [&str; 2] = [r"\.ts$", r"\.js$"];

/// Host parser contract: source text in, host AST out.
pub trait CodeParser<O> {
    fn parse(&self, code: &str) -> Result<O>;
}

impl<O, F> CodeParser<O> for F
where
    F: Fn(&str) -> Result<O>,
{
    fn parse(&self, code: &str) -> Result<O> {
        self(code)
    }
}

/// Options recognized by the startup hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluginOptions {
    #[serde(default = "default_enable")]
    pub enable: bool,
}

fn default_enable() -> bool {
    true
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self { enable: true }
    }
}

/// Payload of the startup hook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartEvent {
    pub option: Option<Value>,
}

/// Host configuration as seen by the config hook. Keys other than
/// `includes` and `plugins` are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginEntry>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One entry of the host's `plugins` list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<Value>,
}

/// Payload of the config hook.
#[derive(Debug, Clone, Default)]
pub struct HandleConfigEvent {
    pub config: Config,
}

/// Host parser options forwarded to lowering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParserOption {
    #[serde(default)]
    pub decorators: bool,
    #[serde(default)]
    pub jsx: bool,
}

impl From<ParserOption> for LowerOptions {
    fn from(opt: ParserOption) -> Self {
        LowerOptions {
            decorators: opt.decorators,
            jsx: opt.jsx,
        }
    }
}

/// Payload of the code-parser hook. The hook swaps `parser` for a wrapper.
pub struct CodeParserEvent<O> {
    pub parser: Rc<dyn CodeParser<O>>,
    pub parser_option: ParserOption,
    pub file_path: PathBuf,
}

/// TypeScript support for the host documentation generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypescriptPlugin {
    enabled: bool,
}

impl TypescriptPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            enabled: options.enable,
        }
    }

    /// Startup hook: build the plugin from the event's option object.
    pub fn on_start(ev: &StartEvent) -> Result<Self> {
        let options = match &ev.option {
            Some(value) => PluginOptions::deserialize(value)
                .context("invalid typescript plugin option")?,
            None => PluginOptions::default(),
        };
        Ok(Self::new(options))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Config hook: accept `.ts` and `.js` sources.
    pub fn on_handle_config(&self, ev: &mut HandleConfigEvent) {
        if !self.enabled {
            return;
        }
        ev.config
            .includes
            .extend(INCLUDE_PATTERNS.iter().map(|p| p.to_string()));
    }

    /// Code-parser hook: wrap the host parser.
    pub fn on_handle_code_parser<O: 'static>(&self, ev: &mut CodeParserEvent<O>) {
        if !self.enabled {
            return;
        }
        let wrapper = TypescriptParser {
            inner: Rc::clone(&ev.parser),
            option: ev.parser_option,
            file_path: ev.file_path.clone(),
        };
        ev.parser = Rc::new(wrapper);
    }
}

/// Host parser wrapper installed by the code-parser hook.
pub struct TypescriptParser<O> {
    inner: Rc<dyn CodeParser<O>>,
    option: ParserOption,
    file_path: PathBuf,
}

impl<O> CodeParser<O> for TypescriptParser<O> {
    fn parse(&self, code: &str) -> Result<O> {
        if !is_typescript(&self.file_path) {
            tracing::debug!(path = %self.file_path.display(), "not typescript, passing through");
            return self.inner.parse(code);
        }

        let lowered = transpile(code, self.option)
            .with_context(|| format!("failed to transform {}", self.file_path.display()))?;
        self.inner.parse(&lowered)
    }
}

/// Rewrite doc comments, then lower to plain ECMAScript.
pub fn transpile(code: &str, option: ParserOption) -> Result<String> {
    let rewritten = rewrite::rewrite_comments(code, Dialect::for_jsx(option.jsx))?;
    let lowered = lower::lower(&rewritten, &option.into())?;
    Ok(lowered)
}

pub fn is_typescript(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TYPESCRIPT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewriteError;
    use serde_json::json;
    use std::cell::RefCell;

    /// Host parser stand-in that records what it was given.
    fn recording_parser() -> (Rc<dyn CodeParser<usize>>, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let parser = move |code: &str| -> Result<usize> {
            log.borrow_mut().push(code.to_string());
            Ok(code.len())
        };
        (Rc::new(parser) as Rc<dyn CodeParser<usize>>, seen)
    }

    fn event(path: &str, parser: Rc<dyn CodeParser<usize>>) -> CodeParserEvent<usize> {
        CodeParserEvent {
            parser,
            parser_option: ParserOption::default(),
            file_path: PathBuf::from(path),
        }
    }

    #[test]
    fn start_defaults_to_enabled() {
        let plugin = TypescriptPlugin::on_start(&StartEvent::default()).unwrap();
        assert!(plugin.is_enabled());
        let plugin = TypescriptPlugin::on_start(&StartEvent {
            option: Some(json!({})),
        })
        .unwrap();
        assert!(plugin.is_enabled());
    }

    #[test]
    fn start_reads_enable() {
        let plugin = TypescriptPlugin::on_start(&StartEvent {
            option: Some(json!({ "enable": false })),
        })
        .unwrap();
        assert!(!plugin.is_enabled());
    }

    #[test]
    fn start_rejects_bad_option() {
        let result = TypescriptPlugin::on_start(&StartEvent {
            option: Some(json!({ "enable": "yes" })),
        });
        assert!(result.is_err());
    }

    #[test]
    fn config_adds_includes_even_if_present() {
        let plugin = TypescriptPlugin::new(PluginOptions::default());
        let mut ev = HandleConfigEvent {
            config: Config {
                includes: vec![r"\.js$".to_string()],
                ..Default::default()
            },
        };
        plugin.on_handle_config(&mut ev);
        assert_eq!(ev.config.includes, vec![r"\.js$", r"\.ts$", r"\.js$"]);
    }

    #[test]
    fn disabled_plugin_leaves_config() {
        let plugin = TypescriptPlugin::new(PluginOptions { enable: false });
        let mut ev = HandleConfigEvent::default();
        plugin.on_handle_config(&mut ev);
        assert!(ev.config.includes.is_empty());
    }

    #[test]
    fn config_keeps_unknown_keys() {
        let config: Config =
            serde_json::from_value(json!({ "source": "./src", "destination": "./docs" })).unwrap();
        assert!(config.includes.is_empty());
        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["source"], "./src");
        assert_eq!(back["destination"], "./docs");
    }

    #[test]
    fn non_typescript_passes_through_verbatim() {
        let plugin = TypescriptPlugin::new(PluginOptions::default());
        let (parser, seen) = recording_parser();
        let mut ev = event("src/app.js", parser);
        plugin.on_handle_code_parser(&mut ev);

        let code = "/** @param a */\nfunction f(a, b) {}";
        assert_eq!(ev.parser.parse(code).unwrap(), code.len());
        assert_eq!(seen.borrow().as_slice(), [code.to_string()]);
    }

    #[test]
    fn typescript_is_rewritten_and_lowered() {
        let plugin = TypescriptPlugin::new(PluginOptions::default());
        let (parser, seen) = recording_parser();
        let mut ev = event("src/math.ts", parser);
        plugin.on_handle_code_parser(&mut ev);

        ev.parser
            .parse("export function inc(n: number): number { return n + 1; }\n")
            .unwrap();
        let seen = seen.borrow();
        let out = &seen[0];
        assert!(out.contains(" * @param {number} n\n"), "got: {out}");
        assert!(out.contains(" * @return {number}\n"), "got: {out}");
        assert!(out.contains("export function inc(n)"), "got: {out}");
        assert!(!out.contains(": number"), "got: {out}");
    }

    #[test]
    fn disabled_plugin_keeps_parser() {
        let plugin = TypescriptPlugin::new(PluginOptions { enable: false });
        let (parser, seen) = recording_parser();
        let mut ev = event("src/math.ts", parser);
        plugin.on_handle_code_parser(&mut ev);

        ev.parser.parse("let x: number = 1;").unwrap();
        assert_eq!(seen.borrow()[0], "let x: number = 1;");
    }

    #[test]
    fn mismatch_surfaces_to_host() {
        let plugin = TypescriptPlugin::new(PluginOptions::default());
        let (parser, seen) = recording_parser();
        let mut ev = event("bad.ts", parser);
        plugin.on_handle_code_parser(&mut ev);

        let err = ev
            .parser
            .parse("/**\n * @param a\n */\nfunction f(a: number, b: number) {}")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RewriteError>(),
            Some(RewriteError::TagMismatch { .. })
        ));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn extension_check() {
        assert!(is_typescript(Path::new("a/b.ts")));
        assert!(is_typescript(Path::new("types.d.ts")));
        assert!(!is_typescript(Path::new("a/b.tsx")));
        assert!(!is_typescript(Path::new("a/b.js")));
    }
}
