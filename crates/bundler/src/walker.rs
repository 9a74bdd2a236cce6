//! Project tree traversal.
//!
//! Depth-first, with each directory's files yielded before its
//! subdirectories. Siblings are sorted by name so repeated runs over the
//! same tree visit files in the same order.

use crate::error::Result;
use crate::rules::{ExclusionRules, SkipReason};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Something the walker found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// A file to bundle.
    File {
        path: PathBuf,
        relative_path: PathBuf,
    },
    /// A file left out by the exclusion rules.
    Skipped {
        relative_path: PathBuf,
        reason: SkipReason,
    },
    /// A directory whose contents were not visited.
    Pruned { relative_path: PathBuf },
    /// An entry below the root that could not be read; the walk goes on.
    Unreadable {
        relative_path: PathBuf,
        message: String,
    },
}

/// Iterator over the files of a project tree.
pub struct ProjectWalker<'a> {
    root: PathBuf,
    rules: &'a ExclusionRules,
    output: Option<PathBuf>,
    inner: walkdir::IntoIter,
}

impl<'a> ProjectWalker<'a> {
    pub fn new(root: impl Into<PathBuf>, rules: &'a ExclusionRules) -> Self {
        let root = root.into();
        let inner = WalkDir::new(&root)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter();

        Self {
            root,
            rules,
            output: None,
            inner,
        }
    }

    /// Skip the file at this canonical path if the walk reaches it.
    pub fn excluding(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    fn relative_path(&self, entry: &DirEntry) -> PathBuf {
        entry
            .path()
            .strip_prefix(&self.root)
            .unwrap_or(entry.path())
            .to_path_buf()
    }

    fn is_output(&self, entry: &DirEntry) -> bool {
        let Some(output) = &self.output else {
            return false;
        };
        if output.file_name() != Some(entry.file_name()) {
            return false;
        }
        fs::canonicalize(entry.path())
            .map(|p| &p == output)
            .unwrap_or(false)
    }
}

impl Iterator for ProjectWalker<'_> {
    type Item = Result<WalkEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                // Failing to read the root ends the walk.
                Err(e) if e.depth() == 0 => return Some(Err(e.into())),
                Err(e) => {
                    let relative_path = e
                        .path()
                        .map(|p| p.strip_prefix(&self.root).unwrap_or(p).to_path_buf())
                        .unwrap_or_default();
                    return Some(Ok(WalkEvent::Unreadable {
                        relative_path,
                        message: e.to_string(),
                    }));
                }
            };

            // The root itself
            if entry.depth() == 0 {
                continue;
            }

            let relative_path = self.relative_path(&entry);

            if entry.file_type().is_dir() {
                if self.rules.is_pruned_dir(&relative_path) {
                    self.inner.skip_current_dir();
                    return Some(Ok(WalkEvent::Pruned { relative_path }));
                }
                continue;
            }

            // Links to directories are neither descended into nor bundled.
            if entry.path_is_symlink() && is_dir_link(entry.path()) {
                continue;
            }

            if let Some(reason) = self.rules.skip_reason(&relative_path) {
                return Some(Ok(WalkEvent::Skipped {
                    relative_path,
                    reason,
                }));
            }

            if self.is_output(&entry) {
                return Some(Ok(WalkEvent::Skipped {
                    relative_path,
                    reason: SkipReason::OutputFile,
                }));
            }

            return Some(Ok(WalkEvent::File {
                path: entry.into_path(),
                relative_path,
            }));
        }
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_dir_link(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn bundled(root: &Path, rules: &ExclusionRules) -> Vec<PathBuf> {
        ProjectWalker::new(root, rules)
            .filter_map(|event| match event.unwrap() {
                WalkEvent::File { relative_path, .. } => Some(relative_path),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_files_before_subdirectories() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/App.jsx", "");
        write(dir.path(), "src/components/Button.jsx", "");
        write(dir.path(), "src/main.jsx", "");
        write(dir.path(), "a_dir/index.js", "");
        write(dir.path(), "z.txt", "");
        write(dir.path(), "index.html", "");

        let rules = ExclusionRules::default();
        assert_eq!(
            bundled(dir.path(), &rules),
            vec![
                PathBuf::from("index.html"),
                PathBuf::from("z.txt"),
                Path::new("a_dir").join("index.js"),
                Path::new("src").join("App.jsx"),
                Path::new("src").join("main.jsx"),
                Path::new("src").join("components").join("Button.jsx"),
            ]
        );
    }

    #[test]
    fn test_prunes_dependency_dirs_at_any_depth() {
        let dir = tempdir().unwrap();
        write(dir.path(), "node_modules/react/index.js", "");
        write(dir.path(), "packages/ui/node_modules/lodash/index.js", "");
        write(dir.path(), "packages/ui/index.js", "");
        write(dir.path(), "my_node_modules_backup/notes.md", "");

        let rules = ExclusionRules::default();
        let events: Vec<WalkEvent> = ProjectWalker::new(dir.path(), &rules)
            .map(|e| e.unwrap())
            .collect();

        assert!(events.contains(&WalkEvent::Pruned {
            relative_path: PathBuf::from("node_modules"),
        }));
        assert!(events.contains(&WalkEvent::Pruned {
            relative_path: Path::new("packages").join("ui").join("node_modules"),
        }));
        assert_eq!(
            bundled(dir.path(), &rules),
            vec![
                Path::new("my_node_modules_backup").join("notes.md"),
                Path::new("packages").join("ui").join("index.js"),
            ]
        );
    }

    #[test]
    fn test_reports_skipped_files() {
        let dir = tempdir().unwrap();
        write(dir.path(), "package-lock.json", "{}");
        write(dir.path(), "public/logo.svg", "<svg/>");
        write(dir.path(), "package.json", "{}");

        let rules = ExclusionRules::default();
        let events: Vec<WalkEvent> = ProjectWalker::new(dir.path(), &rules)
            .map(|e| e.unwrap())
            .collect();

        assert_eq!(
            events,
            vec![
                WalkEvent::Skipped {
                    relative_path: PathBuf::from("package-lock.json"),
                    reason: SkipReason::Lockfile,
                },
                WalkEvent::File {
                    path: dir.path().join("package.json"),
                    relative_path: PathBuf::from("package.json"),
                },
                WalkEvent::Skipped {
                    relative_path: Path::new("public").join("logo.svg"),
                    reason: SkipReason::BinaryExtension,
                },
            ]
        );
    }

    #[test]
    fn test_excludes_output_file() {
        let dir = tempdir().unwrap();
        write(dir.path(), "bundle.txt", "old bundle");
        write(dir.path(), "notes.txt", "");
        let output = fs::canonicalize(dir.path().join("bundle.txt")).unwrap();

        let rules = ExclusionRules::default();
        let events: Vec<WalkEvent> = ProjectWalker::new(dir.path(), &rules)
            .excluding(Some(output))
            .map(|e| e.unwrap())
            .collect();

        assert_eq!(
            events[0],
            WalkEvent::Skipped {
                relative_path: PathBuf::from("bundle.txt"),
                reason: SkipReason::OutputFile,
            }
        );
        assert_eq!(events.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_does_not_follow_directory_links() {
        let dir = tempdir().unwrap();
        write(dir.path(), "real/file.txt", "");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("linked")).unwrap();

        let rules = ExclusionRules::default();
        assert_eq!(
            bundled(dir.path(), &rules),
            vec![Path::new("real").join("file.txt")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_does_not_stop_walk() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        write(dir.path(), "locked/secret.txt", "");
        write(dir.path(), "open/file.txt", "");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let rules = ExclusionRules::default();
        let events: Vec<WalkEvent> = ProjectWalker::new(dir.path(), &rules)
            .map(|e| e.unwrap())
            .collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(
            &events[0],
            WalkEvent::Unreadable { relative_path, .. } if relative_path == Path::new("locked")
        ));
        assert_eq!(
            events[1],
            WalkEvent::File {
                path: dir.path().join("open").join("file.txt"),
                relative_path: Path::new("open").join("file.txt"),
            }
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let rules = ExclusionRules::default();
        let mut walker = ProjectWalker::new(dir.path().join("missing"), &rules);
        assert!(matches!(walker.next(), Some(Err(_))));
    }
}
