//! Error types surfaced by the library.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open capture source {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed landmark frame on line {line}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("capture source {} contains no frames", .0.display())]
    Empty(PathBuf),
    #[error("failed to spawn capture thread")]
    Spawn(#[source] std::io::Error),
}
