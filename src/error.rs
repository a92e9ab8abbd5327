use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    // Root validation
    #[error("path '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    // Traversal
    #[error("permission denied")]
    PermissionDenied(PathBuf),

    #[error("symlink loop")]
    SymlinkLoop(PathBuf),

    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Output
    #[error("failed to write tree output")]
    Output(#[source] io::Error),

    // Third-party extensibility
    #[error("source error: {0}")]
    Source(String),
}

impl TreeError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: impl AsRef<Path>, err: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io { path, source: err },
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::PermissionDenied(p)
            | Self::SymlinkLoop(p)
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether rendering can continue past this error.
    ///
    /// Recoverable errors are reported inline at the node they belong to and
    /// the walk moves on to the next sibling. `NotFound` is recoverable too:
    /// below the root it means an entry vanished between listing and visiting.
    ///
    /// Root validation failures and a broken output stream are fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_)
                | Self::SymlinkLoop(_)
                | Self::NotFound(_)
                | Self::Io { .. }
                | Self::Source(_)
        )
    }
}
