use std::path::PathBuf;

use crate::error::TreeError;

/// A single child produced by a [`Source`](crate::traits::Source) listing.
#[derive(Debug)]
pub struct Entry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// Display name — the final path segment.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,

    /// How deep in the tree this entry sits. Root = 0.
    pub depth: usize,

    /// Set when the entry showed up in its parent's listing but could not be
    /// inspected. The engine still renders it, then writes this error in
    /// place of its children.
    pub error: Option<TreeError>,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The kind of a listed entry.
///
/// Only `Dir` is descended into. Everything else renders as a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory (or a followed symlink to one).
    Dir,

    /// A regular file.
    File,

    /// A symbolic link that was not followed.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

/// Outcome of listing one directory.
///
/// The engine inspects this to decide between descending, printing a
/// permission diagnostic, or printing a generic error diagnostic.
#[derive(Debug)]
pub enum Listing {
    Entries(Vec<Entry>),
    PermissionDenied(TreeError),
    Failed(TreeError),
}

impl From<Result<Vec<Entry>, TreeError>> for Listing {
    fn from(res: Result<Vec<Entry>, TreeError>) -> Self {
        match res {
            Ok(entries) => Listing::Entries(entries),
            Err(e @ TreeError::PermissionDenied(_)) => Listing::PermissionDenied(e),
            Err(e) => Listing::Failed(e),
        }
    }
}

/// Directories first, then case-insensitive name order.
///
/// Names that differ only by case fall back to a byte comparison so the
/// order never depends on what the OS returned first. Keys are built once
/// per entry.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|e| (!e.is_dir(), e.name.to_lowercase(), e.name.clone()));
}
