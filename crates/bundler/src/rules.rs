//! Fixed exclusion rules for bundling.

use std::ffi::OsStr;
use std::path::{Component, Path};

/// Directory holding installed third-party packages.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Dependency-version lockfile.
pub const LOCKFILE: &str = "package-lock.json";

/// Image and font extensions that are never bundled. Matched case-sensitively.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "svg", "woff", "woff2", "ttf", "eot",
];

/// Why a visited file was left out of the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file is the lockfile.
    Lockfile,
    /// The file has an image or font extension.
    BinaryExtension,
    /// The file is the bundle being written.
    OutputFile,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Lockfile => write!(f, "lockfile"),
            SkipReason::BinaryExtension => write!(f, "binary extension"),
            SkipReason::OutputFile => write!(f, "bundle output"),
        }
    }
}

/// The set of directories and files excluded from a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    pub pruned_dirs: Vec<&'static str>,
    pub skipped_files: Vec<&'static str>,
    pub binary_extensions: Vec<&'static str>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            pruned_dirs: vec![DEPENDENCY_DIR],
            skipped_files: vec![LOCKFILE],
            binary_extensions: BINARY_EXTENSIONS.to_vec(),
        }
    }
}

impl ExclusionRules {
    /// Whether a directory at `relative_path` (relative to the project root)
    /// lies in, or is, a pruned directory.
    ///
    /// Matches whole path components only, so `my_node_modules_backup` is
    /// not pruned.
    pub fn is_pruned_dir(&self, relative_path: &Path) -> bool {
        relative_path.components().any(|component| match component {
            Component::Normal(name) => self.pruned_dirs.iter().any(|d| name == OsStr::new(d)),
            _ => false,
        })
    }

    /// Check a file against the name and extension rules.
    pub fn skip_reason(&self, path: &Path) -> Option<SkipReason> {
        if let Some(name) = path.file_name() {
            if self.skipped_files.iter().any(|f| name == OsStr::new(f)) {
                return Some(SkipReason::Lockfile);
            }
        }

        let ext = path.extension().and_then(|e| e.to_str())?;
        if self.binary_extensions.iter().any(|e| *e == ext) {
            return Some(SkipReason::BinaryExtension);
        }

        None
    }

    /// The exclusion notice written into the bundle header.
    pub fn notice(&self) -> String {
        let dirs = self.pruned_dirs.iter().map(|d| format!("{}/", d));
        let files = self.skipped_files.iter().map(|f| f.to_string());
        dirs.chain(files).collect::<Vec<_>>().join(", ")
    }
}
