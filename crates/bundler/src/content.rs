//! File content acquisition.
//!
//! Files are read whole and decoded as UTF-8, falling back to latin-1
//! (which maps every byte) when the bytes are not valid UTF-8. Line endings
//! are normalised to `\n`. A file that cannot be read at all is recorded as
//! [`FileContent::Unreadable`] and rendered as a placeholder.

use encoding_rs::mem::decode_latin1;
use encoding_rs::UTF_8;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of reading one file.
#[derive(Debug)]
pub enum FileContent {
    /// Valid UTF-8 text.
    Utf8(String),
    /// Bytes that were not valid UTF-8, decoded as latin-1.
    Fallback(String),
    /// The file could not be opened or read.
    Unreadable { error: std::io::Error },
}

impl FileContent {
    /// Whether the content is a placeholder rather than file text.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FileContent::Unreadable { .. })
    }
}

/// One file's section in the bundle.
#[derive(Debug)]
pub struct BundleEntry {
    pub relative_path: PathBuf,
    pub content: FileContent,
}

impl BundleEntry {
    /// Read `path` and pair its content with `relative_path`.
    pub fn read(path: &Path, relative_path: PathBuf) -> Self {
        Self {
            relative_path,
            content: read_entry_content(path),
        }
    }

    /// The section body as written to the bundle.
    pub fn body(&self) -> Cow<'_, str> {
        match &self.content {
            FileContent::Utf8(text) | FileContent::Fallback(text) => Cow::Borrowed(text.as_str()),
            FileContent::Unreadable { .. } => Cow::Owned(placeholder(&self.relative_path)),
        }
    }
}

/// Marker written in place of content that could not be read.
pub fn placeholder(relative_path: &Path) -> String {
    format!("<BINARY FILE: {}>\n", relative_path.display())
}

/// Read and decode a file.
pub fn read_entry_content(path: &Path) -> FileContent {
    match fs::read(path) {
        Ok(bytes) => decode_text(&bytes),
        Err(error) => FileContent::Unreadable { error },
    }
}

/// Decode raw bytes as text.
///
/// A UTF-8 byte-order mark is kept as part of the text.
pub fn decode_text(bytes: &[u8]) -> FileContent {
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => FileContent::Utf8(normalize_newlines(&text).into_owned()),
        None => {
            let text = decode_latin1(bytes);
            FileContent::Fallback(normalize_newlines(&text).into_owned())
        }
    }
}

/// Translate `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
