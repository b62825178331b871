use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;
pub type LopperResult<T> = Result<T, LopperError>;

#[derive(Error, Debug)]
pub enum HalError {
    #[error("Failed to spawn `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    PathIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Command log unusable: {0}")]
    Log(#[source] io::Error),

    #[error("UTF-8 decode error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum LopperError {
    #[error(transparent)]
    Hal(#[from] HalError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Command failed (exit={code:?}): {command}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Could not locate lopper rule files: {0}")]
    LopsDirNotFound(String),

    #[error("Path is not valid UTF-8 and cannot be passed to lopper: {0:?}")]
    NonUtf8Path(PathBuf),
}

