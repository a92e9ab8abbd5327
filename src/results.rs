use std::time::Duration;

use crate::error::TreeError;

/// What a completed render produced.
///
/// `errors` is opt-in — enable it on the builder with
/// `.collect_errors(true)`. The diagnostic lines are written either way.
#[derive(Debug, Default)]
pub struct Summary {
    /// Directories rendered below the root.
    pub dirs: usize,

    /// Non-directory entries rendered (files, unfollowed links, others).
    pub files: usize,

    /// Inline diagnostic lines written (permission denied, loops, errors).
    pub diagnostics: usize,

    /// Every line written, root and diagnostics included.
    pub lines: usize,

    /// Wall-clock time from start to the final flush.
    pub duration: Duration,

    /// Errors recovered at the node they occurred at, in traversal order.
    /// Only populated if `.collect_errors(true)` was set on the builder.
    pub errors: Vec<TreeError>,
}

impl Summary {
    /// Entries rendered below the root.
    pub fn entries(&self) -> usize {
        self.dirs + self.files
    }
}
