//! esdoc-ts: run the TypeScript plugin hooks over source files.
//!
//! Stands in for the documentation host. Supports two modes:
//!
//! - **stdin mode**: `esdoc-ts < shapes.ts` prints the transformed source
//! - **file mode**: `esdoc-ts -o out -c .esdoc.json src/*.ts` writes one
//!   output per input
//!
//! | `--emit` | output name  | content                              |
//! |----------|--------------|--------------------------------------|
//! | `js`     | `<stem>.js`  | rewritten comments, lowered to JS    |
//! | `ts`     | `<name>`     | rewritten comments, TypeScript kept  |

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use esdoc_ts::plugin::{is_typescript, PLUGIN_NAME};
use esdoc_ts::{
    CodeParser, CodeParserEvent, Config, Dialect, HandleConfigEvent, ParserOption, PluginOptions,
    StartEvent, TypescriptPlugin,
};
use regex::Regex;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "esdoc-ts",
    about = "Infer ESDoc comment types from TypeScript annotations"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// ESDoc JSON config supplying `includes` and the plugin option
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// What to write for each input
    #[arg(long, value_enum, default_value_t = Emit::Js)]
    emit: Emit,

    /// Keep decorators in the lowered output
    #[arg(long)]
    decorators: bool,

    /// Parse sources as TSX
    #[arg(long)]
    jsx: bool,

    /// Disable the plugin (sources pass through untouched)
    #[arg(long)]
    disable: bool,

    /// Debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Js,
    Ts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let plugin = start_plugin(&cli, &config)?;

    if cli.files.is_empty() {
        return stdin_mode(&cli, &plugin);
    }

    file_mode(&cli, &plugin, config)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
}

/// Run the start hook with the option from the config's plugin entry.
fn start_plugin(cli: &Cli, config: &Config) -> Result<TypescriptPlugin> {
    let option = config
        .plugins
        .iter()
        .find(|p| p.name == PLUGIN_NAME)
        .and_then(|p| p.option.clone());
    if cli.disable {
        return Ok(TypescriptPlugin::new(PluginOptions { enable: false }));
    }
    TypescriptPlugin::on_start(&StartEvent { option })
}

/// stdin mode: treat input as a `.ts` file, write the result to stdout.
fn stdin_mode(cli: &Cli, plugin: &TypescriptPlugin) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let output = process(cli, plugin, Path::new("stdin.ts"), &input)?;
    print!("{}", output);
    Ok(())
}

/// file mode: process every input that passes the include filter.
fn file_mode(cli: &Cli, plugin: &TypescriptPlugin, config: Config) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let mut ev = HandleConfigEvent { config };
    plugin.on_handle_config(&mut ev);
    let includes = compile_includes(&ev.config.includes)?;

    let input_files = expand_globs(&cli.files)?;
    let mut written = 0;
    for path in &input_files {
        let shown = path.to_string_lossy();
        if !includes.is_empty() && !includes.iter().any(|re| re.is_match(&shown)) {
            tracing::debug!(path = %shown, "not included");
            continue;
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let output = match process(cli, plugin, path, &content) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
                continue;
            }
        };

        let out_path = output_dir.join(derive_output_name(&shown, cli.emit));
        fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        written += 1;
    }

    tracing::debug!(written, total = input_files.len(), "done");
    Ok(())
}

fn compile_includes(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid include pattern: {}", p)))
        .collect()
}

/// Transform one source the way the host would see it.
fn process(cli: &Cli, plugin: &TypescriptPlugin, path: &Path, content: &str) -> Result<String> {
    let option = ParserOption {
        decorators: cli.decorators,
        jsx: cli.jsx,
    };

    match cli.emit {
        Emit::Js => {
            let identity = |code: &str| -> Result<String> { Ok(code.to_string()) };
            let mut ev = CodeParserEvent {
                parser: Rc::new(identity) as Rc<dyn CodeParser<String>>,
                parser_option: option,
                file_path: path.to_path_buf(),
            };
            plugin.on_handle_code_parser(&mut ev);
            ev.parser.parse(content)
        }
        Emit::Ts if plugin.is_enabled() && is_typescript(path) => {
            let rewritten = esdoc_ts::rewrite_comments(content, Dialect::for_jsx(option.jsx))?;
            Ok(rewritten)
        }
        Emit::Ts => Ok(content.to_string()),
    }
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "js"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let supported = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
                if p.is_file() && supported {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Output file name for a source path.
/// "src/shape.ts" → "shape.js" with `--emit js`, "shape.ts" with `--emit ts`.
fn derive_output_name(source: &str, emit: Emit) -> String {
    let filename = source.rsplit(['/', '\\']).next().unwrap_or(source);
    match emit {
        Emit::Ts => filename.to_string(),
        Emit::Js => {
            let stem = filename
                .strip_suffix(".ts")
                .or_else(|| filename.strip_suffix(".js"))
                .unwrap_or(filename);
            format!("{}.js", stem)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_for_js() {
        assert_eq!(derive_output_name("src/shape.ts", Emit::Js), "shape.js");
        assert_eq!(derive_output_name("util.js", Emit::Js), "util.js");
        assert_eq!(derive_output_name("types.d.ts", Emit::Js), "types.d.js");
    }

    #[test]
    fn output_name_for_ts() {
        assert_eq!(derive_output_name("src/shape.ts", Emit::Ts), "shape.ts");
    }

    #[test]
    fn output_name_no_extension() {
        assert_eq!(derive_output_name("Makefile", Emit::Js), "Makefile.js");
    }

    #[test]
    fn bad_include_pattern() {
        let err = compile_includes(&["(".to_string()]).unwrap_err();
        assert!(err.to_string().contains("invalid include pattern"));
    }
}
