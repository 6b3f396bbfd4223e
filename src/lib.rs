//! TypeScript support for the ESDoc documentation generator.
//!
//! Two passes run over every `.ts` source before the host parser sees it:
//!
//! 1. [`rewrite_comments`]: each class, method, field, accessor and function
//!    gets a documentation comment whose `@param`, `@return` and `@type`
//!    tags carry the types taken from the declaration's annotations
//! 2. [`lower`]: swc strips type-only syntax so the result is plain
//!    ECMAScript
//!
//! [`TypescriptPlugin`] wires both into the host's start, config and
//! code-parser hooks.

pub mod collect;
pub mod comment;
pub mod edit;
pub mod error;
pub mod lower;
pub mod model;
pub mod plugin;
pub mod rewrite;
pub mod syntax;
pub mod tags;
pub mod types;

pub use error::RewriteError;
pub use lower::{lower, LowerOptions};
pub use plugin::{
    CodeParser, CodeParserEvent, Config, HandleConfigEvent, ParserOption, PluginEntry,
    PluginOptions, StartEvent, TypescriptParser, TypescriptPlugin,
};
pub use rewrite::rewrite_comments;
pub use syntax::Dialect;
