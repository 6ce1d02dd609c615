//! Tree-walking interpreter.
//!
//! Semantic analysis and execution are the same pass: each statement
//! is checked against the current [`SymbolTable`] and run immediately.
//! Problems become diagnostics and execution moves on to the next
//! statement. An unresolved loop counter is the one fatal case.

use std::io::Write;

use crate::arith;
use crate::ast::{OutputMode, PLACEHOLDER, Program, Statement, StatementKind};
use crate::bits::Bitset;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::CoreError;
use crate::span::Span;
use crate::symbols::{Symbol, SymbolTable};

/// Final scope state and the diagnostics gathered while producing it.
#[derive(Debug)]
pub struct Analysis {
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
}

/// A fatal error together with the diagnostics recorded before it.
#[derive(Debug)]
pub struct Halted {
    pub error: CoreError,
    pub diagnostics: Diagnostics,
}

/// Run `program` against `symbols`, writing one line to `out` per
/// executed output statement.
pub fn analyze<W: Write + ?Sized>(
    program: &Program,
    symbols: SymbolTable,
    filename: &str,
    out: &mut W,
) -> Result<Analysis, Halted> {
    let analysis = analyze_statements(&program.statements, symbols, filename, out)?;
    log::debug!(
        "interpreted {} statements, {} symbols bound, {} diagnostics",
        program.statements.len(),
        analysis.symbols.len(),
        analysis.diagnostics.len()
    );
    Ok(analysis)
}

fn analyze_statements<W: Write + ?Sized>(
    statements: &[Statement],
    symbols: SymbolTable,
    filename: &str,
    out: &mut W,
) -> Result<Analysis, Halted> {
    let mut interpreter = Interpreter {
        symbols,
        filename,
        out,
        diagnostics: Diagnostics::new(),
    };
    for statement in statements {
        if let Err(error) = interpreter.execute(statement) {
            return Err(Halted {
                error,
                diagnostics: interpreter.diagnostics,
            });
        }
    }
    Ok(Analysis {
        symbols: interpreter.symbols,
        diagnostics: interpreter.diagnostics,
    })
}

struct Interpreter<'a, W: Write + ?Sized> {
    symbols: SymbolTable,
    filename: &'a str,
    out: &'a mut W,
    diagnostics: Diagnostics,
}

impl<W: Write + ?Sized> Interpreter<'_, W> {
    fn execute(&mut self, statement: &Statement) -> Result<(), CoreError> {
        log::trace!("executing statement at {}", statement.span);
        let span = statement.span;
        match &statement.kind {
            StatementKind::VariableDeclaration { name, bits } => {
                self.symbols
                    .insert(name.clone(), Symbol::Variable(bits.clone()));
            }
            StatementKind::Output { name, mode } => self.output(name, *mode, span)?,
            StatementKind::ArrayDeclaration {
                name,
                element_names,
            } => self.declare_array(name, element_names, span),
            StatementKind::Loop { counter_name, body } => {
                self.run_loop(counter_name, body, span)?
            }
            StatementKind::ExpressionAssignment {
                template,
                referenced_names,
                target_name,
            } => self.assign_expression(template, referenced_names, target_name, span),
        }
        Ok(())
    }

    fn output(&mut self, name: &str, mode: OutputMode, span: Span) -> Result<(), CoreError> {
        let line = match (self.symbols.get(name), mode) {
            (Some(Symbol::Variable(bits)), OutputMode::Raw) => bits.to_string(),
            (Some(Symbol::Variable(bits)), OutputMode::SignedInteger) => {
                bits.decode_signed().to_string()
            }
            (Some(Symbol::Array(elements)), OutputMode::Raw) => {
                let mut text = String::new();
                for (index, element) in elements.iter().enumerate() {
                    match element.decode_byte() {
                        Some(ch) => text.push(ch),
                        None => {
                            let width = element.len();
                            self.diagnostics.push(Diagnostic::semantic(
                                self.filename,
                                format!(
                                    "Array variable is not 8 bits: \
                                     element {index} of '{name}' has {width} bits"
                                ),
                                span,
                            ));
                        }
                    }
                }
                text
            }
            (Some(Symbol::Array(elements)), OutputMode::SignedInteger) => elements
                .iter()
                .map(|element| element.decode_signed().to_string())
                .collect::<Vec<_>>()
                .join(" "),
            (Some(Symbol::Collection), _) | (None, _) => {
                log::trace!("'{name}' has no printable binding, nothing written");
                return Ok(());
            }
        };
        writeln!(self.out, "{line}").map_err(CoreError::OutputIo)
    }

    /// Builds a fresh array from the listed variables and binds it,
    /// replacing any previous binding of `name`.
    fn declare_array(&mut self, name: &str, element_names: &[String], span: Span) {
        let mut elements = Vec::with_capacity(element_names.len());
        for element in element_names {
            match self.symbols.variable(element) {
                Some(bits) => elements.push(bits.clone()),
                None => self.diagnostics.push(Diagnostic::semantic(
                    self.filename,
                    format!("array element '{element}' is not a declared variable"),
                    span,
                )),
            }
        }
        self.symbols.insert(name, Symbol::Array(elements));
    }

    /// Runs `body` once per unit of the counter's unsigned value. Each
    /// iteration sees a copy of the previous iteration's scope; the
    /// last copy becomes the enclosing scope afterwards.
    fn run_loop(
        &mut self,
        counter_name: &str,
        body: &[Statement],
        span: Span,
    ) -> Result<(), CoreError> {
        let counter = self
            .symbols
            .variable(counter_name)
            .ok_or_else(|| CoreError::UnresolvedLoopCounter {
                name: counter_name.to_string(),
                line: span.line,
                column: span.column,
            })?;

        let count = counter.decode_unsigned() as i64;
        if count < 0 {
            self.diagnostics.push(Diagnostic::semantic(
                self.filename,
                "iteration count cannot be negative",
                span,
            ));
        }

        let mut scope = self.symbols.clone();
        for iteration in 0..count.max(0) {
            log::trace!("loop at {span}: iteration {} of {count}", iteration + 1);
            let nested = match analyze_statements(body, scope, self.filename, &mut *self.out) {
                Ok(nested) => nested,
                Err(halted) => {
                    self.diagnostics.merge(halted.diagnostics);
                    return Err(halted.error);
                }
            };
            scope = nested.symbols;
            self.diagnostics.merge(nested.diagnostics);
        }
        self.symbols = scope;
        Ok(())
    }

    fn assign_expression(
        &mut self,
        template: &str,
        referenced_names: &[String],
        target_name: &str,
        span: Span,
    ) {
        let mut values = Vec::with_capacity(referenced_names.len());
        for name in referenced_names {
            match self.symbols.variable(name) {
                Some(bits) => values.push(Some(format!("({})", bits.decode_signed()))),
                None => {
                    self.diagnostics.push(Diagnostic::semantic(
                        self.filename,
                        format!("'{name}' is not a declared variable"),
                        span,
                    ));
                    values.push(None);
                }
            }
        }

        let text = substitute(template, &values);
        match arith::evaluate(&text) {
            Ok(result) => {
                // `as` truncates toward zero and saturates at the i64 bounds.
                let value = result.trunc() as i64;
                log::trace!("'{text}' = {result}, binding {target_name} to {value}");
                self.symbols
                    .insert(target_name, Symbol::Variable(Bitset::encode_signed(value)));
            }
            Err(err) => self.diagnostics.push(Diagnostic::runtime(
                self.filename,
                format!("could not evaluate '{text}': {err}"),
                span,
            )),
        }
    }
}

/// Fill placeholders left to right. A `None` value, or a placeholder
/// with no value at all, keeps its marker.
fn substitute(template: &str, values: &[Option<String>]) -> String {
    let mut pieces = template.split(PLACEHOLDER);
    let mut text = pieces.next().unwrap_or_default().to_string();
    for (index, piece) in pieces.enumerate() {
        match values.get(index) {
            Some(Some(value)) => text.push_str(value),
            _ => text.push_str(PLACEHOLDER),
        }
        text.push_str(piece);
    }
    text
}
