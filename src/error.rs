use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the annotation engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the annotation engine
#[derive(Debug, Error)]
pub enum Error {
    /// A type expression has no schema representation (channels, functions, `!`, macros)
    #[error("{declaring}: unsupported type kind `{kind}`")]
    UnsupportedTypeKind { declaring: String, kind: String },

    /// Two tag declarations share the same name
    #[error("duplicate tag name `{0}`")]
    DuplicateTagName(String),

    /// A tag document exists but could not be read
    #[error("failed to read document for tag `{tag}` at {}: {source}", path.display())]
    DocumentReadFailure {
        tag: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directive in a doc comment is malformed
    #[error("invalid @{directive} directive in {location}: {message}")]
    InvalidDirective {
        location: String,
        directive: String,
        message: String,
    },

    #[error("parse error {}: {message}", file.display())]
    ParseError { file: PathBuf, message: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidDirective`]
    pub fn directive(
        location: impl Into<String>,
        directive: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::InvalidDirective {
            location: location.into(),
            directive: directive.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Error::ParseError {
            file: PathBuf::from("<unknown>"),
            message: err.to_string(),
        }
    }
}
