use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("failed to write output: {0}")]
    OutputIo(std::io::Error),
    #[error("loop counter '{name}' at {line}:{column} is not a declared variable")]
    UnresolvedLoopCounter {
        name: String,
        line: u32,
        column: u32,
    },
    #[error("aborting due to {count} previous error(s)")]
    Aborted { count: usize },
    #[error("evaluation error: {0}")]
    Evaluation(String),
}
