use std::io::{self, Write};
use std::path::PathBuf;

use crate::engine::{run, EngineOptions, RenderConfig};
use crate::entry::Entry;
use crate::error::TreeError;
use crate::results::Summary;
use crate::source::FsSource;
use crate::style::Emoji;
use crate::traits::{Filter, Source, Style};

// ---------------------------------------------------------------------------
// TreeBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and rendering a tree.
///
/// Created via [`dirtree::tree()`](crate::tree). Configure with chained
/// builder methods, then call [`run()`](TreeBuilder::run),
/// [`print()`](TreeBuilder::print) or
/// [`render_string()`](TreeBuilder::render_string).
///
/// # Example
///
/// ```rust,ignore
/// let summary = dirtree::tree("src")
///     .style(dirtree::Plain)
///     .show_hidden(false)
///     .max_depth(3)
///     .collect_errors(true)
///     .print()?;
/// ```
pub struct TreeBuilder {
    root:           PathBuf,
    source:         Option<Box<dyn Source>>,
    style:          Option<Box<dyn Style>>,
    filters:        Vec<Box<dyn Filter>>,
    max_depth:      Option<usize>,
    follow_links:   bool,
    detect_cycles:  bool,
    show_hidden:    bool,
    collect_errors: bool,
}

impl TreeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = RenderConfig::default();
        Self {
            root:           root.into(),
            source:         None,
            style:          None,
            filters:        Vec::new(),
            max_depth:      defaults.max_depth,
            follow_links:   defaults.follow_links,
            detect_cycles:  defaults.detect_cycles,
            show_hidden:    true,
            collect_errors: false,
        }
    }

    // ── Source ────────────────────────────────────────────────────────────

    /// Set where listings come from. Defaults to [`FsSource`].
    pub fn source(mut self, s: impl Source + 'static) -> Self {
        self.source = Some(Box::new(s));
        self
    }

    // ── Presentation ──────────────────────────────────────────────────────

    /// Set the marker style. Defaults to [`Emoji`](crate::Emoji).
    pub fn style(mut self, s: impl Style + 'static) -> Self {
        self.style = Some(Box::new(s));
        self
    }

    // ── Filtering ─────────────────────────────────────────────────────────

    /// Add a filter. An entry is rendered only if every filter keeps it.
    pub fn with_filter(mut self, f: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(f));
        self
    }

    /// Render entries whose name starts with `.`. On by default.
    pub fn show_hidden(mut self, yes: bool) -> Self {
        self.show_hidden = yes;
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Maximum depth rendered. `0` means the root line only, `1` means one
    /// level of children, and so on. Unlimited by default.
    pub fn max_depth(mut self, d: usize) -> Self {
        self.max_depth = Some(d);
        self
    }

    /// Treat symlinks to directories as directories. On by default.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// Stop at directories that resolve to one of their own ancestors and
    /// mark them `[Symlink Loop]`. On by default; only matters when links
    /// are followed.
    pub fn detect_cycles(mut self, yes: bool) -> Self {
        self.detect_cycles = yes;
        self
    }

    /// Keep recovered errors in [`Summary::errors`].
    ///
    /// Disabled by default. Diagnostics are written inline regardless.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.collect_errors = yes;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Render into `out`, writing each line as soon as its node is visited.
    ///
    /// # Errors
    ///
    /// Returns `Err` before writing anything if the root is missing, is not
    /// a directory, or cannot be listed. Returns [`TreeError::Output`] if
    /// `out` fails. Failures below the root never surface here; they are
    /// written inline.
    pub fn run<W: Write>(self, out: &mut W) -> Result<Summary, TreeError> {
        let source = self.source.unwrap_or_else(|| Box::new(FsSource));
        source.check_root(&self.root)?;

        let mut filters = self.filters;
        if !self.show_hidden {
            filters.insert(0, Box::new(HiddenFilter));
        }

        let opts = EngineOptions {
            config: RenderConfig {
                max_depth:     self.max_depth,
                follow_links:  self.follow_links,
                detect_cycles: self.detect_cycles,
            },
            source,
            style: self.style.unwrap_or_else(|| Box::new(Emoji)),
            filters,
            collect_errors: self.collect_errors,
        };

        run(&self.root, &opts, out)
    }

    /// Render to standard output.
    pub fn print(self) -> Result<Summary, TreeError> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.run(&mut lock)
    }

    /// Render into a `String`.
    pub fn render_string(self) -> Result<String, TreeError> {
        let mut buf = Vec::new();
        self.run(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

// ---------------------------------------------------------------------------
// Built-in filters
// ---------------------------------------------------------------------------

/// Drops dot-entries. Installed by `.show_hidden(false)`.
struct HiddenFilter;

impl Filter for HiddenFilter {
    fn keep(&self, entry: &Entry) -> bool {
        !entry.name.starts_with('.')
    }
}
