use std::io;
use std::string::FromUtf8Error;

/// Fatal failures of a translation session. Command-level problems never end
/// up here; see [`crate::translator::LineError`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("generated program is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
