//! Core of the TComplete bit-oriented scripting language.
//!
//! The pipeline is a single pass, leaves first:
//!
//!   source
//!     -> lexer       (classified tokens with line/column)
//!     -> parser      (Program: ordered statements)
//!     -> interpreter (symbol table + program output)
//!
//! There is no code-generation stage: the interpreter walks the tree
//! directly. The CLI (and anything else embedding the language) should
//! go through [`runner`] rather than wiring the phases by hand.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod ast;
pub mod parser;

// ---------------------------------------------------------------------
// Values and evaluation
// ---------------------------------------------------------------------

pub mod bits;
pub mod symbols;
pub mod arith;
pub mod interpreter;

// ---------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------

pub mod runner;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::CoreError;
pub use runner::{DEFAULT_MAX_ERRORS, RunOptions, run_file, run_source};
pub use symbols::{Symbol, SymbolTable};

/// Name printed by `--help`.
pub const INTERPRETER_NAME: &str = "TComplete";

/// Language version printed by `--version`.
pub const LANGUAGE_VERSION: &str = "1.0.0";
