use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use tcomp_core::{
    CoreError, DEFAULT_MAX_ERRORS, INTERPRETER_NAME, LANGUAGE_VERSION, RunOptions, run_file,
};

/// Command-line arguments for the TComplete interpreter.
///
/// gcc-style `-f<name>` flags are rewritten to `--<name>` by
/// [`normalize_args`] before clap sees them.
#[derive(Parser, Debug)]
#[command(name = "tcomp", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    #[arg(short = 'h', long = "help", help = "Print the interpreter name")]
    help: bool,

    #[arg(short = 'v', long = "version", help = "Print the language version")]
    version: bool,

    #[arg(
        long = "max-error-count",
        value_name = "N",
        default_value_t = DEFAULT_MAX_ERRORS,
        help = "Stop parsing once more than N diagnostics were collected (-fmax_error_count N)"
    )]
    max_error_count: usize,

    /// Source file to run.
    file: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    init_logging()?;
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    execute(cli)
}

fn init_logging() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
        .context("failed to initialize logger")
}

/// Turn `-fmax_error_count` into `--max-error-count`.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(text) if text.len() > 2 && text.starts_with("-f") => {
                OsString::from(format!("--{}", text[2..].replace('_', "-")))
            }
            _ => arg,
        })
        .collect()
}

fn execute(cli: Cli) -> Result<ExitCode> {
    if cli.help {
        println!("{INTERPRETER_NAME}");
    }
    if cli.version {
        println!("{LANGUAGE_VERSION}");
    }

    let Some(path) = cli.file else {
        if cli.help || cli.version {
            return Ok(ExitCode::SUCCESS);
        }
        println!("File not found");
        return Ok(ExitCode::FAILURE);
    };

    let options = RunOptions {
        max_errors: cli.max_error_count,
    };
    let mut out = io::stdout().lock();
    let mut diag = io::stderr().lock();

    match run_file(&path, options, &mut out, &mut diag) {
        Ok(symbols) => {
            log::debug!("{} finished with {} symbols bound", path.display(), symbols.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(CoreError::SourceIo(err)) => {
            log::debug!("cannot read {}: {err}", path.display());
            println!("File not found");
            Ok(ExitCode::FAILURE)
        }
        Err(err @ CoreError::Aborted { .. }) => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).with_context(|| format!("failed to run {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_gcc_style_flags() {
        let args = ["tcomp", "-fmax_error_count", "3", "-f", "prog.tc"].map(OsString::from);
        let expected = ["tcomp", "--max-error-count", "3", "-f", "prog.tc"].map(OsString::from);
        assert_eq!(normalize_args(args), expected);
    }
}
