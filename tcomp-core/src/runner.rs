//! Source-to-output pipeline: lex, parse, report, interpret, report.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::CoreError;
use crate::interpreter::{Halted, analyze};
use crate::lexer::lex;
use crate::parser::parse;
use crate::symbols::SymbolTable;

/// Diagnostic count past which parsing stops.
pub const DEFAULT_MAX_ERRORS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub max_errors: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

/// Run `source` to completion.
///
/// Program output goes to `out`, diagnostics to `diag`. Parser
/// diagnostics are reported before anything executes, so a program
/// that failed to parse never produces output. Any reported
/// diagnostic ends the run with [`CoreError::Aborted`]. A fatal
/// interpreter error is returned as is, after the diagnostics recorded
/// before it have been reported.
pub fn run_source<O, D>(
    source: &str,
    filename: &str,
    options: RunOptions,
    out: &mut O,
    diag: &mut D,
) -> Result<SymbolTable, CoreError>
where
    O: Write + ?Sized,
    D: Write + ?Sized,
{
    let tokens = lex(source);
    let parsed = parse(&tokens, filename, options.max_errors);
    parsed.diagnostics.report(diag)?;

    let analysis = analyze(&parsed.program, SymbolTable::new(), filename, out);
    out.flush().map_err(CoreError::OutputIo)?;
    match analysis {
        Ok(analysis) => {
            analysis.diagnostics.report(diag)?;
            Ok(analysis.symbols)
        }
        Err(Halted { error, diagnostics }) => {
            if let Err(err @ CoreError::OutputIo(_)) = diagnostics.report(diag) {
                return Err(err);
            }
            Err(error)
        }
    }
}

/// Read the file at `path` and hand it to [`run_source`], using the
/// path as the diagnostic file name.
pub fn run_file<O, D>(
    path: impl AsRef<Path>,
    options: RunOptions,
    out: &mut O,
    diag: &mut D,
) -> Result<SymbolTable, CoreError>
where
    O: Write + ?Sized,
    D: Write + ?Sized,
{
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    log::debug!("read {} bytes from {}", source.len(), path.display());
    run_source(&source, &path.display().to_string(), options, out, diag)
}
