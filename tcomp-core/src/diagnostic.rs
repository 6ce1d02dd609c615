//! Structured diagnostics and the sink that reports them.
//!
//! Both the parser and the interpreter accumulate [`Diagnostic`]s and
//! keep going; nothing here aborts a phase. Only [`Diagnostics::report`]
//! decides whether the run halts.

use core::fmt;
use std::io::Write;

use crate::error::CoreError;
use crate::span::Span;

/// Classification of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Grammar-rule mismatch while parsing.
    Syntax,
    /// Symbol-table, shape or width problem found while interpreting.
    Semantic,
    /// Execution-time failure not otherwise classified.
    Runtime,
    /// Reserved.
    Parser,
}

impl DiagnosticKind {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Syntax => "Syntax",
            DiagnosticKind::Semantic => "Semantic",
            DiagnosticKind::Runtime => "Runtime",
            DiagnosticKind::Parser => "Parser",
        }
    }
}

/// A single recorded problem. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub filepath: String,
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        filepath: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Diagnostic {
            filepath: filepath.into(),
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn syntax(filepath: &str, message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, filepath, message, span)
    }

    pub fn semantic(filepath: &str, message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Semantic, filepath, message, span)
    }

    pub fn runtime(filepath: &str, message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Runtime, filepath, message, span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Error Occurred At {}:{}, in file {}",
            self.kind.label(),
            self.span.line,
            self.span.column,
            self.filepath
        )
    }
}

/// Ordered collection of diagnostics for one phase.
///
/// Merging is plain concatenation: emission order is kept and
/// duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Print every diagnostic to `sink`.
    ///
    /// An empty set reports nothing and lets the caller continue. A
    /// non-empty set is printed in full and then turned into
    /// [`CoreError::Aborted`], so no partial result escapes.
    pub fn report<W: Write + ?Sized>(&self, sink: &mut W) -> Result<(), CoreError> {
        if self.entries.is_empty() {
            return Ok(());
        }
        for diagnostic in &self.entries {
            writeln!(sink, "{diagnostic}").map_err(CoreError::OutputIo)?;
            writeln!(sink, "    tip: {}", diagnostic.message).map_err(CoreError::OutputIo)?;
        }
        sink.flush().map_err(CoreError::OutputIo)?;
        Err(CoreError::Aborted {
            count: self.entries.len(),
        })
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
