//! Syntax tree produced by the parser.
//!
//! Every node owns its children outright; nothing points back up.

use crate::bits::Bitset;
use crate::span::Span;

/// Marker standing in for one substituted value inside an expression
/// template.
pub const PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// A statement plus the position of the token that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `<<`: bit text for variables, characters for arrays.
    Raw,
    /// `<<@`: two's-complement decimal.
    SignedInteger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    VariableDeclaration {
        name: String,
        bits: Bitset,
    },
    ArrayDeclaration {
        name: String,
        element_names: Vec<String>,
    },
    Output {
        name: String,
        mode: OutputMode,
    },
    Loop {
        counter_name: String,
        body: Vec<Statement>,
    },
    /// `template` holds one [`PLACEHOLDER`] per entry of
    /// `referenced_names`, in the same order.
    ExpressionAssignment {
        template: String,
        referenced_names: Vec<String>,
        target_name: String,
    },
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Statement { kind, span }
    }

    pub fn is_loop(&self) -> bool {
        matches!(self.kind, StatementKind::Loop { .. })
    }
}
