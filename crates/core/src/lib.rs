//! ssd-core: parser and AST for the ssd interface definition language.
//!
//! A document is a sequence of `import`, `data`, `enum` and `service`
//! declarations, each optionally decorated with `#[...]` attributes. Parsing
//! is a single recursive-descent pass over a character cursor and stops at
//! the first error.
//!
//! # Public API
//!
//! - [`parse()`] / [`parse_with_options()`] / [`parse_cursor()`] -- build an [`Ast`]
//! - [`ParseError`] -- message plus 1-based line and column
//! - [`ParseOptions`] -- token and message length limits
//! - AST types: [`Node`], [`NodeKind`], [`Attribute`], [`Property`],
//!   [`EnumVariant`], [`Handler`], [`Event`], [`Dependency`], [`Type`], and
//!   [`Entry`] for walking sibling lists

pub mod ast;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{
    Argument, Ast, Attribute, AttributeParameter, Dependency, Entry, EnumVariant, Event, Handler,
    Node, NodeKind, NodeType, Property, Type,
};
pub use error::ParseError;
pub use lexer::{Cursor, CursorState};
pub use options::ParseOptions;
pub use parser::{parse, parse_cursor, parse_with_options};
