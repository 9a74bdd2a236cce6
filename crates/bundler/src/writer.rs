//! Bundle text format.

use crate::content::BundleEntry;
use crate::rules::ExclusionRules;
use std::io::{self, Write};
use std::path::Path;

/// Width of the `=` separator lines around each file header.
pub const SEPARATOR_WIDTH: usize = 50;

/// Title prefix of the bundle's first line.
pub const HEADER_TITLE: &str = "REACT PROJECT BUNDLE";

/// Writes the header and per-file sections of a bundle.
pub struct BundleWriter<W: Write> {
    inner: W,
    separator: String,
    sections: usize,
}

impl<W: Write> BundleWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            separator: "=".repeat(SEPARATOR_WIDTH),
            sections: 0,
        }
    }

    /// Write the title line, the exclusion notice and a blank line.
    pub fn write_header(&mut self, project_name: &str, rules: &ExclusionRules) -> io::Result<()> {
        writeln!(self.inner, "{}: {}", HEADER_TITLE, project_name)?;
        writeln!(self.inner, "Excluded: {}", rules.notice())?;
        writeln!(self.inner)?;
        Ok(())
    }

    /// Write one file section.
    pub fn write_entry(&mut self, entry: &BundleEntry) -> io::Result<()> {
        self.write_section(&entry.relative_path, &entry.body())
    }

    /// Write a section for `relative_path` with the given body, terminating
    /// a non-empty body with a newline if it lacks one.
    pub fn write_section(&mut self, relative_path: &Path, body: &str) -> io::Result<()> {
        writeln!(self.inner, "{}", self.separator)?;
        writeln!(self.inner, "FILE: {}", relative_path.display())?;
        writeln!(self.inner, "{}", self.separator)?;
        writeln!(self.inner)?;
        self.inner.write_all(body.as_bytes())?;
        if !body.is_empty() && !body.ends_with('\n') {
            writeln!(self.inner)?;
        }
        self.sections += 1;
        Ok(())
    }

    /// Number of sections written so far.
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
