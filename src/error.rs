use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("repetition count must be at least 1")]
    ZeroRepetitions,

    #[error("workload id {0:?} is registered more than once")]
    DuplicateWorkload(String),

    #[error("cannot read reference table {path}: {source}")]
    ReferenceFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed reference table {path}: {source}")]
    ReferenceFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ConfigError> for io::Error {
    fn from(e: ConfigError) -> Self {
        let kind = match &e {
            ConfigError::ReferenceFile { source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, e)
    }
}
