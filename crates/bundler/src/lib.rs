//! ReactBundle - concatenate a project's text files into one bundle file.
//!
//! The bundle starts with a two-line header, then holds one section per
//! file in traversal order:
//!
//! ```text
//! REACT PROJECT BUNDLE: my-app
//! Excluded: node_modules/, package-lock.json
//!
//! ==================================================
//! FILE: src/App.jsx
//! ==================================================
//!
//! <file content>
//! ```
//!
//! `node_modules` directories, `package-lock.json` files and image/font
//! files are left out.

pub mod content;
pub mod error;
pub mod rules;
pub mod walker;
pub mod writer;

pub use content::{BundleEntry, FileContent};
pub use error::{BundleError, Result};
pub use rules::{ExclusionRules, SkipReason};
pub use walker::{ProjectWalker, WalkEvent};
pub use writer::BundleWriter;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default bundle file name.
pub const DEFAULT_OUTPUT_FILE: &str = "project_bundle.txt";

/// Bundler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Directory to bundle.
    pub project_path: PathBuf,
    /// Bundle file to create or overwrite.
    pub output_file: PathBuf,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            project_path: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

/// Counts gathered during a bundling run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSummary {
    pub output_file: PathBuf,
    /// Sections written, placeholders included.
    pub files_written: usize,
    /// Files decoded with the single-byte fallback.
    pub fallback_decoded: usize,
    /// Files replaced by a placeholder.
    pub placeholders: usize,
    pub skipped_lockfiles: usize,
    pub skipped_binary: usize,
    pub skipped_output: usize,
    pub pruned_dirs: usize,
    /// Entries below the root the walk could not read.
    pub unreadable_entries: usize,
}

impl BundleSummary {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Lockfile => self.skipped_lockfiles += 1,
            SkipReason::BinaryExtension => self.skipped_binary += 1,
            SkipReason::OutputFile => self.skipped_output += 1,
        }
    }

    fn record_entry(&mut self, content: &FileContent) {
        if content.is_placeholder() {
            self.placeholders += 1;
        } else if matches!(content, FileContent::Fallback(_)) {
            self.fallback_decoded += 1;
        }
    }
}

/// Bundle `project_path` into `output_file`.
pub fn bundle_project(
    project_path: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> Result<BundleSummary> {
    bundle(&BundleConfig {
        project_path: project_path.as_ref().to_path_buf(),
        output_file: output_file.as_ref().to_path_buf(),
    })
}

/// Run a bundling pass.
///
/// The output file is created (or truncated) once the project path has been
/// checked, and held open for the whole walk. Unreadable files become
/// placeholder sections and unreadable subdirectories are skipped with a
/// warning. Failing to read the root or to write the output ends the run
/// and may leave a partial bundle behind.
pub fn bundle(config: &BundleConfig) -> Result<BundleSummary> {
    let root = &config.project_path;
    check_project_root(root)?;

    info!(
        "Bundling {} into {}",
        root.display(),
        config.output_file.display()
    );

    let rules = ExclusionRules::default();
    let file = File::create(&config.output_file).map_err(|source| BundleError::CreateOutput {
        path: config.output_file.clone(),
        source,
    })?;
    let output = fs::canonicalize(&config.output_file).ok();

    let mut writer = BundleWriter::new(BufWriter::new(file));
    writer.write_header(&project_name(root), &rules)?;

    let mut summary = BundleSummary {
        output_file: config.output_file.clone(),
        ..Default::default()
    };

    for event in ProjectWalker::new(root, &rules).excluding(output) {
        match event? {
            WalkEvent::File {
                path,
                relative_path,
            } => {
                let entry = BundleEntry::read(&path, relative_path);
                match &entry.content {
                    FileContent::Utf8(_) => debug!("Adding {}", entry.relative_path.display()),
                    FileContent::Fallback(_) => debug!(
                        "Adding {} (not UTF-8, decoded as latin-1)",
                        entry.relative_path.display()
                    ),
                    FileContent::Unreadable { error } => warn!(
                        "Cannot read {}, writing placeholder: {}",
                        entry.relative_path.display(),
                        error
                    ),
                }
                summary.record_entry(&entry.content);
                writer.write_entry(&entry)?;
            }
            WalkEvent::Skipped {
                relative_path,
                reason,
            } => {
                debug!("Skipping {} ({})", relative_path.display(), reason);
                summary.record_skip(reason);
            }
            WalkEvent::Pruned { relative_path } => {
                debug!("Pruning {}", relative_path.display());
                summary.pruned_dirs += 1;
            }
            WalkEvent::Unreadable {
                relative_path,
                message,
            } => {
                warn!("Skipping unreadable {}: {}", relative_path.display(), message);
                summary.unreadable_entries += 1;
            }
        }
    }

    summary.files_written = writer.sections();
    writer.finish()?;

    info!(
        "Bundled {} files ({} placeholders, {} skipped, {} directories pruned)",
        summary.files_written,
        summary.placeholders,
        summary.skipped_lockfiles + summary.skipped_binary + summary.skipped_output,
        summary.pruned_dirs
    );

    Ok(summary)
}

fn check_project_root(root: &Path) -> Result<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BundleError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BundleError::ProjectNotFound(root.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Name shown in the bundle header: the last component of `root`, or of its
/// canonical form for paths like `.` that have none.
pub fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            fs::canonicalize(root)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_default()
}
