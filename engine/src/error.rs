use thiserror::Error;

/// Failures that stop a load or store outright. Everything else in a
/// script degrades to a [`ScriptWarning`].
#[derive(Error, Debug)]
pub enum CcsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CcsError>;

/// A recovered problem found while reading a script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptWarning {
    #[error("line {line}: round prefix '{prefix}' is not a number; action appended")]
    MalformedRoundIndex { line: usize, prefix: String },

    #[error("[{key}] macro still open at end of input; committed as-is")]
    UnterminatedMacro { key: String },

    #[error("[{key}] has no actions; defaulting to attack")]
    EmptySection { key: String },
}
