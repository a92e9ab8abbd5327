use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::engine::RenderConfig;
use crate::entry::{Entry, EntryKind};
use crate::error::TreeError;
use crate::traits::Source;

// ---------------------------------------------------------------------------
// FsSource
// ---------------------------------------------------------------------------

/// The local filesystem, read through `std::fs`.
///
/// Each `list()` call opens, drains and closes one directory handle; nothing
/// is held across sibling visits.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl Source for FsSource {
    fn list(
        &self,
        dir: &Path,
        depth: usize,
        config: &RenderConfig,
    ) -> Result<Vec<Entry>, TreeError> {
        let read = fs::read_dir(dir).map_err(|e| TreeError::from_io(dir, e))?;

        let mut entries = Vec::new();
        for dirent in read {
            let dirent = dirent.map_err(|e| TreeError::from_io(dir, e))?;
            let (kind, error) = classify(&dirent, config.follow_links);
            entries.push(Entry {
                name: dirent.file_name().to_string_lossy().into_owned(),
                path: dirent.path(),
                kind,
                depth,
                error,
            });
        }
        Ok(entries)
    }

    fn check_root(&self, root: &Path) -> Result<(), TreeError> {
        validate_root(root)
    }

    fn canonical(&self, path: &Path) -> Option<PathBuf> {
        fs::canonicalize(path).ok()
    }
}

/// Caller-side precondition: `root` exists and is a directory.
/// Symlinks to directories are accepted.
pub fn validate_root(root: &Path) -> Result<(), TreeError> {
    let meta = fs::metadata(root).map_err(|e| TreeError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(TreeError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a listed entry to an [`EntryKind`], plus the error that stopped it
/// from being inspected, if any.
///
/// The type comes from the directory listing itself, so it needs no search
/// permission on the parent. Only followed links are stat'ed. A dangling
/// link is a plain leaf; any other failure to resolve one is carried on the
/// entry so the engine can report it in place.
fn classify(dirent: &fs::DirEntry, follow_links: bool) -> (EntryKind, Option<TreeError>) {
    let ft = match dirent.file_type() {
        Ok(ft) => ft,
        Err(e) => return (EntryKind::Other, Some(TreeError::from_io(dirent.path(), e))),
    };

    if ft.is_symlink() {
        if !follow_links {
            return (EntryKind::Symlink, None);
        }
        let path = dirent.path();
        return match fs::metadata(&path) {
            Ok(target) if target.is_dir() => (EntryKind::Dir, None),
            Ok(target) if target.is_file() => (EntryKind::File, None),
            Ok(_) => (EntryKind::Other, None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (EntryKind::Symlink, None),
            Err(e) => (EntryKind::Symlink, Some(TreeError::from_io(&path, e))),
        };
    }

    let kind = if ft.is_dir() {
        EntryKind::Dir
    } else if ft.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };
    (kind, None)
}
