use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Undecodable task data, or a record missing one of its fields.
    /// `path` and `index` are filled in when the record came from a file.
    #[error("Malformed task record{}: {source}", location(path.as_deref(), *index))]
    MalformedRecord {
        path: Option<PathBuf>,
        index: Option<usize>,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    #[error("Failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TaskError {
    pub(crate) fn malformed(source: serde_json::Error) -> Self {
        TaskError::MalformedRecord {
            path: None,
            index: None,
            source,
        }
    }

    /// Attaches the file and record position to a malformed-record error.
    pub(crate) fn in_file(self, file: &Path, at: Option<usize>) -> Self {
        match self {
            TaskError::MalformedRecord { source, .. } => TaskError::MalformedRecord {
                path: Some(file.to_path_buf()),
                index: at,
                source,
            },
            other => other,
        }
    }
}

fn location(path: Option<&Path>, index: Option<usize>) -> String {
    match (path, index) {
        (Some(path), Some(index)) => format!(" {} in {}", index, path.display()),
        (Some(path), None) => format!(" in {}", path.display()),
        (None, Some(index)) => format!(" {index}"),
        (None, None) => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
