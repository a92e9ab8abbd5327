//! # dirtree
//!
//! Render a directory as a sorted box-drawing tree, one line per entry,
//! without letting an unreadable branch take the rest of the tree down.
//!
//! ```text
//! 📦 pkg
//! ├─📂 B
//!    [Permission Denied]
//! ├─📂 C
//! │  └─📜 x.txt
//! └─📜 a.txt
//! ```
//!
//! Directories sort before files; within each group names compare
//! case-insensitively. Failures listing any directory below the root are
//! written in place and the walk moves on. Only problems with the root
//! itself (missing, not a directory, unreadable) or with the output stream
//! are returned as errors.
//!
//! # Quick Start
//!
//! ```rust
//! use std::fs;
//!
//! let dir = tempfile::tempdir().unwrap();
//! fs::create_dir(dir.path().join("B")).unwrap();
//! fs::write(dir.path().join("a.txt"), "").unwrap();
//!
//! let text = dirtree::tree(dir.path()).render_string().unwrap();
//! let lines: Vec<&str> = text.lines().skip(1).collect();
//! assert_eq!(lines, ["├─📂 B", "└─📜 a.txt"]);
//! ```
//!
//! # Custom Sources
//!
//! Implement [`Source`] to render anything shaped like a directory tree:
//!
//! ```rust
//! use std::path::Path;
//! use dirtree::{Entry, EntryKind, Source, TreeError};
//! use dirtree::engine::RenderConfig;
//!
//! struct Locked;
//!
//! impl Source for Locked {
//!     fn list(
//!         &self,
//!         dir: &Path,
//!         depth: usize,
//!         _config: &RenderConfig,
//!     ) -> Result<Vec<Entry>, TreeError> {
//!         if dir == Path::new("vault") {
//!             return Ok(vec![Entry {
//!                 path: dir.join("secrets"),
//!                 name: "secrets".into(),
//!                 kind: EntryKind::Dir,
//!                 depth,
//!                 error: None,
//!             }]);
//!         }
//!         Err(TreeError::PermissionDenied(dir.to_path_buf()))
//!     }
//! }
//!
//! let text = dirtree::tree("vault").source(Locked).render_string().unwrap();
//! assert_eq!(text, "📦 vault\n└─📂 secrets\n   [Permission Denied]\n");
//! ```

#![forbid(unsafe_code)]

pub mod engine;

mod builder;
mod entry;
mod error;
mod results;
mod source;
mod style;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::TreeBuilder;
pub use entry::{sort_entries, Entry, EntryKind, Listing};
pub use error::TreeError;
pub use results::Summary;
pub use source::{validate_root, FsSource};
pub use style::{Emoji, Plain};
pub use traits::{Filter, Source, Style};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a [`TreeBuilder`] for the directory at `root`.
///
/// # Example
///
/// ```rust,no_run
/// let summary = dirtree::tree(".").print()?;
/// eprintln!("{} directories, {} files", summary.dirs, summary.files);
/// # Ok::<(), dirtree::TreeError>(())
/// ```
pub fn tree(root: impl Into<std::path::PathBuf>) -> TreeBuilder {
    TreeBuilder::new(root)
}
