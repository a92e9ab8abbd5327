use std::path::{Path, PathBuf};

use crate::engine::RenderConfig;
use crate::entry::Entry;
use crate::error::TreeError;

/// Something that can be listed one directory at a time.
///
/// [`FsSource`](crate::FsSource) is the real filesystem. Implement this to
/// render in-memory trees, archives, remote listings, or fixtures that fail
/// in controlled ways.
///
/// # Error Handling
///
/// `list()` failures are recovered by the engine at the node they belong to:
/// return [`TreeError::PermissionDenied`] for access failures so they render
/// as `[Permission Denied]`; any other recoverable error renders as
/// `[Error: ...]`. A child that was listed but can't be inspected is returned
/// with [`Entry::error`] set instead of failing the whole listing.
///
/// Only recoverable errors (see [`TreeError::is_recoverable`]) belong here;
/// root validation failures are reported through `check_root()`.
///
/// # Example
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use dirtree::{Entry, EntryKind, Source, TreeError};
/// use dirtree::engine::RenderConfig;
///
/// struct Flat(Vec<&'static str>);
///
/// impl Source for Flat {
///     fn list(
///         &self,
///         dir: &Path,
///         depth: usize,
///         _config: &RenderConfig,
///     ) -> Result<Vec<Entry>, TreeError> {
///         if dir != Path::new("root") {
///             return Ok(Vec::new());
///         }
///         Ok(self.0.iter().map(|name| Entry {
///             path: PathBuf::from("root").join(name),
///             name: name.to_string(),
///             kind: EntryKind::File,
///             depth,
///             error: None,
///         }).collect())
///     }
/// }
/// ```
pub trait Source {
    /// List the immediate children of `dir`. `depth` is the depth the
    /// children will be rendered at (root's children = 1).
    ///
    /// Order does not matter; the engine sorts.
    fn list(
        &self,
        dir: &Path,
        depth: usize,
        config: &RenderConfig,
    ) -> Result<Vec<Entry>, TreeError>;

    /// Check that `root` can be rendered at all. Called once, before anything
    /// is written.
    fn check_root(&self, _root: &Path) -> Result<(), TreeError> {
        Ok(())
    }

    /// Resolve `path` to an identity used for cycle detection. Sources
    /// without links can keep the default, which disables the check.
    fn canonical(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

/// Decides whether a listed entry appears in the tree.
///
/// Rejected entries are neither rendered nor descended into.
///
/// ```rust
/// use dirtree::{Entry, Filter};
///
/// struct NoTargetDirs;
///
/// impl Filter for NoTargetDirs {
///     fn keep(&self, entry: &Entry) -> bool {
///         !(entry.is_dir() && entry.name == "target")
///     }
/// }
/// ```
pub trait Filter {
    fn keep(&self, entry: &Entry) -> bool;
}

/// Presentation of the tree's markers.
///
/// Connectors and prefixes are owned by the engine and are not styleable;
/// a style only decides what follows the connector.
pub trait Style {
    /// The root line.
    fn root(&self, name: &str) -> String;

    /// Marker and name for a non-root entry.
    fn entry(&self, entry: &Entry) -> String;

    /// Inline text written in place of an entry's children when its listing
    /// fails.
    fn diagnostic(&self, err: &TreeError) -> String {
        match err {
            TreeError::PermissionDenied(_) => "[Permission Denied]".to_string(),
            TreeError::SymlinkLoop(_) => "[Symlink Loop]".to_string(),
            other => format!("[Error: {other}]"),
        }
    }
}
