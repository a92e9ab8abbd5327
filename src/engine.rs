use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::entry::{sort_entries, Entry, Listing};
use crate::error::TreeError;
use crate::results::Summary;
use crate::traits::{Filter, Source, Style};

// Connectors and prefix extensions. Every glyph run is the same display
// width so children line up under their parent's name.
const BRANCH: &str = "├─";
const LAST: &str = "└─";
const BAR: &str = "│  ";
const BLANK: &str = "   ";

// ---------------------------------------------------------------------------
// RenderConfig
// ---------------------------------------------------------------------------

/// Traversal parameters handed to the engine and to every [`Source::list`]
/// call. Configure through the builder (`.max_depth()`, `.follow_links()`,
/// `.detect_cycles()`).
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Deepest level rendered. `Some(0)` renders the root line only.
    pub max_depth: Option<usize>,

    /// Treat symlinks to directories as directories.
    pub follow_links: bool,

    /// Refuse to descend into a directory already on the ancestor chain.
    pub detect_cycles: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_links: true,
            detect_cycles: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Everything `run()` needs, assembled by the builder.
pub(crate) struct EngineOptions {
    pub config: RenderConfig,
    pub source: Box<dyn Source>,
    pub style: Box<dyn Style>,
    pub filters: Vec<Box<dyn Filter>>,
    pub collect_errors: bool,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Render the tree under `root` into `out`, one line per node, in pre-order
/// with sorted siblings.
///
/// The root is listed before anything is written: if that fails the error is
/// returned and `out` is untouched. Every failure below the root is written
/// inline and the walk continues. A failing `out` aborts with
/// [`TreeError::Output`].
pub(crate) fn run<W: Write>(
    root: &Path,
    opts: &EngineOptions,
    out: &mut W,
) -> Result<Summary, TreeError> {
    let start = Instant::now();

    let children = if opts.config.max_depth == Some(0) {
        Vec::new()
    } else {
        tracing::debug!(path = %root.display(), "listing root");
        opts.source.list(root, 1, &opts.config)?
    };

    let mut renderer = Renderer {
        opts,
        out,
        summary: Summary::default(),
        ancestors: Vec::new(),
    };

    if opts.config.detect_cycles {
        if let Some(id) = opts.source.canonical(root) {
            renderer.ancestors.push(id);
        }
    }

    let root_line = opts.style.root(&display_name(root, &*opts.source));
    renderer.line(&root_line)?;
    renderer.visit_children(children, "")?;
    renderer.out.flush().map_err(TreeError::Output)?;

    let mut summary = renderer.summary;
    summary.duration = start.elapsed();
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

struct Renderer<'a, W: Write> {
    opts: &'a EngineOptions,
    out: &'a mut W,
    summary: Summary,
    /// Canonical paths from the root down to the directory being listed.
    ancestors: Vec<PathBuf>,
}

impl<W: Write> Renderer<'_, W> {
    fn visit_children(&mut self, mut children: Vec<Entry>, prefix: &str) -> Result<(), TreeError> {
        let filters = &self.opts.filters;
        children.retain(|e| filters.iter().all(|f| f.keep(e)));
        sort_entries(&mut children);

        let last = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate() {
            self.visit(child, prefix, i == last)?;
        }
        Ok(())
    }

    fn visit(&mut self, mut entry: Entry, prefix: &str, is_last: bool) -> Result<(), TreeError> {
        let connector = if is_last { LAST } else { BRANCH };
        let text = self.opts.style.entry(&entry);
        self.line(&format!("{prefix}{connector}{text}"))?;

        if entry.is_dir() {
            self.summary.dirs += 1;
        } else {
            self.summary.files += 1;
        }

        // Listed by the parent but never inspected: report it here and go no
        // further, whatever its kind.
        if let Some(err) = entry.error.take() {
            tracing::warn!(
                path = %entry.path.display(),
                error = %err,
                "failed to inspect entry"
            );
            return self.recover(prefix, err);
        }

        if !entry.is_dir() {
            return Ok(());
        }

        if self.opts.config.max_depth.is_some_and(|max| entry.depth >= max) {
            return Ok(());
        }

        let identity = if self.opts.config.detect_cycles {
            self.opts.source.canonical(&entry.path)
        } else {
            None
        };
        if let Some(id) = &identity {
            if self.ancestors.contains(id) {
                tracing::warn!(
                    path = %entry.path.display(),
                    resolved = %id.display(),
                    "symlink loop, not descending"
                );
                return self.recover(prefix, TreeError::SymlinkLoop(entry.path.clone()));
            }
        }

        tracing::debug!(path = %entry.path.display(), depth = entry.depth, "listing directory");
        let listed = self.opts.source.list(&entry.path, entry.depth + 1, &self.opts.config);
        let listing = Listing::from(listed);

        match listing {
            Listing::Entries(children) => {
                let extension = if is_last { BLANK } else { BAR };
                let child_prefix = format!("{prefix}{extension}");

                let pushed = match identity {
                    Some(id) => {
                        self.ancestors.push(id);
                        true
                    }
                    None => false,
                };
                let res = self.visit_children(children, &child_prefix);
                if pushed {
                    self.ancestors.pop();
                }
                res
            }
            Listing::PermissionDenied(err) => {
                tracing::warn!(path = %entry.path.display(), "permission denied, not descending");
                self.recover(prefix, err)
            }
            Listing::Failed(err) => {
                tracing::warn!(
                    path = %entry.path.display(),
                    error = %err,
                    "failed to list directory"
                );
                self.recover(prefix, err)
            }
        }
    }

    /// Write the node-scoped diagnostic for `err` and stop descending.
    fn recover(&mut self, prefix: &str, err: TreeError) -> Result<(), TreeError> {
        debug_assert!(err.is_recoverable(), "fatal error reached a node: {err}");
        let text = self.opts.style.diagnostic(&err);
        self.line(&format!("{prefix}{BLANK}{text}"))?;
        self.summary.diagnostics += 1;
        if self.opts.collect_errors {
            self.summary.errors.push(err);
        }
        Ok(())
    }

    fn line(&mut self, text: &str) -> Result<(), TreeError> {
        writeln!(self.out, "{text}").map_err(TreeError::Output)?;
        self.summary.lines += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Final path segment of `root`, falling back to the canonical path's final
/// segment for `.`-style roots, then to the path as given (e.g. `/`).
fn display_name(root: &Path, source: &dyn Source) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().into_owned();
    }
    source
        .canonical(root)
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use crate::style::Emoji;
    use std::collections::HashMap;

    /// Directory listings keyed by path. Denied paths fail with
    /// PermissionDenied, paths missing from the map with NotFound. Broken
    /// paths are listed by their parent with an inspection error attached.
    #[derive(Default)]
    struct MapSource {
        dirs: HashMap<PathBuf, Vec<(&'static str, EntryKind)>>,
        denied: Vec<PathBuf>,
        broken: Vec<PathBuf>,
    }

    impl MapSource {
        fn dir(mut self, path: &str, children: &[(&'static str, EntryKind)]) -> Self {
            self.dirs.insert(PathBuf::from(path), children.to_vec());
            self
        }

        fn deny(mut self, path: &str) -> Self {
            self.denied.push(PathBuf::from(path));
            self
        }

        fn broken(mut self, path: &str) -> Self {
            self.broken.push(PathBuf::from(path));
            self
        }
    }

    impl Source for MapSource {
        fn list(
            &self,
            dir: &Path,
            depth: usize,
            _config: &RenderConfig,
        ) -> Result<Vec<Entry>, TreeError> {
            if self.denied.iter().any(|d| d == dir) {
                return Err(TreeError::PermissionDenied(dir.to_path_buf()));
            }
            let children = self
                .dirs
                .get(dir)
                .ok_or_else(|| TreeError::NotFound(dir.to_path_buf()))?;
            Ok(children
                .iter()
                .map(|(name, kind)| {
                    let path = dir.join(name);
                    let error = self.broken.contains(&path).then(|| TreeError::Io {
                        path: path.clone(),
                        source: std::io::Error::new(std::io::ErrorKind::Other, "stat failed"),
                    });
                    Entry {
                        path,
                        name: name.to_string(),
                        kind: *kind,
                        depth,
                        error,
                    }
                })
                .collect())
        }
    }

    fn options(source: MapSource) -> EngineOptions {
        EngineOptions {
            config: RenderConfig::default(),
            source: Box::new(source),
            style: Box::new(Emoji),
            filters: Vec::new(),
            collect_errors: true,
        }
    }

    fn render(root: &str, opts: &EngineOptions) -> (String, Summary) {
        let mut out = Vec::new();
        let summary = run(Path::new(root), opts, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn prefixes_follow_last_sibling() {
        let source = MapSource::default()
            .dir("/r", &[("a", EntryKind::Dir), ("b", EntryKind::Dir)])
            .dir("/r/a", &[("x", EntryKind::File), ("y", EntryKind::File)])
            .dir("/r/b", &[("z", EntryKind::File)]);
        let (text, summary) = render("/r", &options(source));

        let expected = "\
📦 r
├─📂 a
│  ├─📜 x
│  └─📜 y
└─📂 b
   └─📜 z
";
        assert_eq!(text, expected);
        assert_eq!(summary.dirs, 2);
        assert_eq!(summary.files, 3);
        assert_eq!(summary.lines, 6);
        assert_eq!(summary.diagnostics, 0);
    }

    #[test]
    fn denied_directory_is_isolated() {
        let source = MapSource::default()
            .dir("/r", &[("B", EntryKind::Dir), ("C", EntryKind::Dir)])
            .dir("/r/C", &[("x.txt", EntryKind::File)])
            .deny("/r/B");
        let (text, summary) = render("/r", &options(source));

        let expected = "\
📦 r
├─📂 B
   [Permission Denied]
└─📂 C
   └─📜 x.txt
";
        assert_eq!(text, expected);
        assert_eq!(summary.diagnostics, 1);
        assert!(matches!(summary.errors[0], TreeError::PermissionDenied(_)));
    }

    #[test]
    fn vanished_directory_reports_error_and_continues() {
        // "/r/gone" is listed by its parent but has no listing of its own.
        let source = MapSource::default()
            .dir("/r", &[("gone", EntryKind::Dir), ("keep", EntryKind::File)]);
        let (text, summary) = render("/r", &options(source));

        assert!(text.contains("├─📂 gone\n   [Error: path '/r/gone' does not exist]\n"));
        assert!(text.ends_with("└─📜 keep\n"));
        assert_eq!(summary.diagnostics, 1);
    }

    #[test]
    fn uninspectable_entry_reports_in_place() {
        let source = MapSource::default()
            .dir(
                "/r",
                &[("sub", EntryKind::Dir), ("odd", EntryKind::Other), ("z", EntryKind::File)],
            )
            .dir("/r/sub", &[("hidden", EntryKind::File)])
            .broken("/r/sub")
            .broken("/r/odd");
        let (text, summary) = render("/r", &options(source));

        let expected = "\
📦 r
├─📂 sub
   [Error: stat failed]
├─📜 odd
   [Error: stat failed]
└─📜 z
";
        assert_eq!(text, expected);
        assert_eq!(summary.dirs, 1);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.diagnostics, 2);
        assert_eq!(summary.lines, 1 + summary.entries() + summary.diagnostics);
        assert!(matches!(summary.errors[0], TreeError::Io { .. }));
    }

    #[test]
    fn root_failure_writes_nothing() {
        let opts = options(MapSource::default().deny("/r"));
        let mut out = Vec::new();
        let err = run(Path::new("/r"), &opts, &mut out).unwrap_err();
        assert!(matches!(err, TreeError::PermissionDenied(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn max_depth_stops_descent() {
        let source = MapSource::default()
            .dir("/r", &[("a", EntryKind::Dir)])
            .dir("/r/a", &[("deep", EntryKind::File)]);
        let mut opts = options(source);

        opts.config.max_depth = Some(1);
        let (text, _) = render("/r", &opts);
        assert_eq!(text, "📦 r\n└─📂 a\n");

        opts.config.max_depth = Some(0);
        let (text, summary) = render("/r", &opts);
        assert_eq!(text, "📦 r\n");
        assert_eq!(summary.lines, 1);
    }

    #[test]
    fn empty_root_renders_root_only() {
        let (text, summary) = render("/r", &options(MapSource::default().dir("/r", &[])));
        assert_eq!(text, "📦 r\n");
        assert_eq!(summary.dirs + summary.files, 0);
    }

    #[test]
    fn broken_output_is_fatal() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let opts = options(MapSource::default().dir("/r", &[("f", EntryKind::File)]));
        let err = run(Path::new("/r"), &opts, &mut Closed).unwrap_err();
        assert!(matches!(err, TreeError::Output(_)));
    }
}
