use std::path::PathBuf;

use thiserror::Error;

/// Rejected state-machine operations. The UI gates these, so they are
/// programming errors rather than user-facing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no questions to load")]
    NoQuestions,
    #[error("no questions loaded")]
    NotLoaded,
    #[error("question {index} is out of range (quiz has {total})")]
    QuestionOutOfRange { index: usize, total: usize },
    #[error("option {option:?} is not offered by question {index}")]
    UnknownOption { index: usize, option: String },
    #[error("quiz is incomplete: {answered} of {total} answered")]
    Incomplete { answered: usize, total: usize },
    #[error("quiz has already been scored")]
    AlreadyScored,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Only PDF files are allowed")]
    NotPdf,
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("response is missing `{field}`")]
    MissingField {
        field: &'static str,
        detail: Option<String>,
    },
    #[error("cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Failures that should be shown with their underlying error text.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Io { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid server url {0:?}")]
    ServerUrl(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("cannot initialize logging: {0}")]
    Logging(String),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("cannot write report {}: {reason}", path.display())]
    Export { path: PathBuf, reason: String },
    #[error("{0}")]
    Usage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
