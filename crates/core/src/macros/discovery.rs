//! Recursive enumeration of query files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Query files under a root directory with a given extension.
///
/// Iterating is lazy and [`QueryFiles::iter`] can be called again to restart
/// the walk from scratch.
#[derive(Debug, Clone)]
pub struct QueryFiles {
    root: PathBuf,
    extension: String,
}

impl QueryFiles {
    pub fn new(root: &Path, extension: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Walk the tree depth-first, yielding matching file paths.
    ///
    /// Unreadable entries are logged and skipped; a missing root yields nothing.
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("skipping entry under {}: {e}", self.root.display());
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| self.matches(path))
    }

    /// All matching files in sorted order.
    pub fn sorted(&self) -> Vec<PathBuf> {
        let mut files: Vec<_> = self.iter().collect();
        files.sort();
        files
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| {
                name.strip_suffix(self.extension.as_str())
                    .and_then(|stem| stem.strip_suffix('.'))
                    .is_some()
            })
    }
}

/// Names of the immediate subdirectories of `root`, sorted.
///
/// Each one is a namespace whose query files share one set of answers.
pub fn namespaces(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(ToOwned::to_owned))
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names
}
