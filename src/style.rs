use crate::entry::Entry;
use crate::traits::Style;

/// The default look: `📦` root, `📂` directories, `📜` everything else.
///
/// ```text
/// 📦 pkg
/// ├─📂 B
/// └─📜 a.txt
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Emoji;

impl Style for Emoji {
    fn root(&self, name: &str) -> String {
        format!("📦 {name}")
    }

    fn entry(&self, entry: &Entry) -> String {
        let marker = if entry.is_dir() { "📂" } else { "📜" };
        format!("{marker} {}", entry.name)
    }
}

/// Glyph-free output for terminals and logs that mangle emoji.
/// Directories are suffixed with `/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Style for Plain {
    fn root(&self, name: &str) -> String {
        format!("{name}/")
    }

    fn entry(&self, entry: &Entry) -> String {
        if entry.is_dir() {
            format!(" {}/", entry.name)
        } else {
            format!(" {}", entry.name)
        }
    }
}
