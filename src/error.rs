//! Error types for photo-orient.
//!
//! Orientation detection itself never fails; these cover file I/O,
//! configuration, the JPEG codec and misuse of the stage model.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {parameter} = {value}")]
    InvalidConfig { parameter: String, value: String },

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("filters are disabled for this stage")]
    FiltersDisabled,

    #[error("sprite type must not be empty")]
    EmptySpriteKind,

    #[error("refusing to write {}: {reason}", target.display())]
    TargetConflict {
        target: PathBuf,
        reason: &'static str,
    },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[cfg(feature = "jpeg")]
    #[error("JPEG codec error: {0}")]
    Jpeg(#[from] turbojpeg::Error),

    #[error("{0} support was not compiled in")]
    Unsupported(&'static str),
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_config(parameter: &str, value: impl ToString) -> Self {
        Error::InvalidConfig {
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }
}
