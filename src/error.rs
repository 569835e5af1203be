use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Lyricloze's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Lyricloze's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// The input had fewer than two lines, so there is nothing to recall from context.
    #[error("input needs at least 2 lines to build cards, found {found}")]
    InsufficientInput { found: usize },

    /// Title/artist could not be derived (or were empty).
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),

    /// The output destination could not be created or written.
    #[error("failed to write output")]
    EncodingIo(#[source] io::Error),

    /// The input could not be read.
    #[error("failed to read input")]
    Input(#[source] io::Error),

    #[error("failed to launch '{}'", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn metadata(message: impl Into<String>) -> Self {
        Self::MalformedMetadata(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::EncodingIo(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::EncodingIo(err.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::EncodingIo(err.into())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Self::EncodingIo(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_causes_are_chained_not_repeated() {
        let err = Error::Input(io::Error::other("disk on fire"));
        assert_eq!(err.to_string(), "failed to read input");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("disk on fire")
        );

        let chained = format!("{:#}", anyhow::Error::new(Error::from(io::Error::other("full"))));
        assert_eq!(chained, "failed to write output: full");
        assert_eq!(chained.matches("full").count(), 1);
    }

    #[test]
    fn launch_error_names_the_path_once() {
        let err = Error::Launch {
            path: PathBuf::from("/opt/anki"),
            source: io::Error::other("denied"),
        };
        assert_eq!(err.to_string(), "failed to launch '/opt/anki'");
        assert!(err.source().is_some());
    }
}
