//! The fundamental edit primitive: byte-span replacement with verification.
//!
//! Every rewrite the engine produces compiles down to an [`Edit`].
//! Intelligence lives in span acquisition (lexical scan, structural
//! matches, include events), not in application. Application is pure for
//! the normal translate-to-new-file path and atomic (tempfile + fsync +
//! rename) for in-place conversion.

use crate::span::Span;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// A verified byte-span replacement within one file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an Edit does nothing until it is applied"]
pub struct Edit {
    /// Starting byte offset (inclusive).
    pub byte_start: usize,
    /// Ending byte offset (exclusive).
    pub byte_end: usize,
    /// Replacement text for `[byte_start, byte_end)`.
    pub new_text: String,
    /// What we expect to find at the span before applying.
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required.
    ExactMatch(String),
    /// xxh3 hash of the expected text (for large spans).
    Hash(u64),
}

impl EditVerification {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected) => xxh3_64(text.as_bytes()) == *expected,
        }
    }

    /// Hash for text over 1KB, exact match otherwise.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("before-text verification failed at byte {byte_start}: expected {expected:?}, found {found:?}")]
    BeforeTextMismatch {
        byte_start: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range [{byte_start}, {byte_end}) in file of length {file_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        file_len: usize,
    },

    #[error("edits overlap: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    Overlap {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("file I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("edit splits a UTF-8 character at byte {offset}")]
    Utf8Boundary { offset: usize },
}

impl Edit {
    /// Create an edit, deriving the verification from the expected text.
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: &str,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(expected_before),
        }
    }

    /// Create an edit covering `span` of `source`, verifying against what
    /// the span currently holds.
    pub fn replacing(span: Span, source: &str, new_text: impl Into<String>) -> Self {
        Self::new(span.start, span.end(), new_text, span.text(source))
    }

    /// A pure insertion before `offset`.
    pub fn inserting(offset: usize, new_text: impl Into<String>) -> Self {
        Self::new(offset, offset, new_text, "")
    }

    /// Validate range, UTF-8 boundaries, and before-text against `source`.
    fn validate(&self, source: &str) -> Result<(), EditError> {
        if self.byte_start > self.byte_end || self.byte_end > source.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                file_len: source.len(),
            });
        }
        for offset in [self.byte_start, self.byte_end] {
            if !source.is_char_boundary(offset) {
                return Err(EditError::Utf8Boundary { offset });
            }
        }

        let current = &source[self.byte_start..self.byte_end];

        // Already applied: verification is moot, application is a no-op.
        if current == self.new_text {
            return Ok(());
        }

        if !self.expected_before.matches(current) {
            return Err(EditError::BeforeTextMismatch {
                byte_start: self.byte_start,
                expected: format!("{:?}", self.expected_before),
                found: current.to_string(),
            });
        }

        Ok(())
    }
}

/// Apply a batch of edits to `source`, returning the rewritten text.
///
/// Edits may arrive in any order; they are sorted by start offset and
/// spliced front-to-back so every span is taken from the original text.
/// Insertions at the same offset keep their emission order. Overlap is an
/// error, not a merge.
pub fn apply_all(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    for edit in edits {
        edit.validate(source)?;
    }

    let mut order: Vec<usize> = (0..edits.len()).collect();
    order.sort_by_key(|&i| (edits[i].byte_start, edits[i].byte_end, i));

    for pair in order.windows(2) {
        let (a, b) = (&edits[pair[0]], &edits[pair[1]]);
        if a.byte_end > b.byte_start {
            return Err(EditError::Overlap {
                first_start: a.byte_start,
                first_end: a.byte_end,
                second_start: b.byte_start,
                second_end: b.byte_end,
            });
        }
    }

    let mut out = String::with_capacity(source.len() + source.len() / 8);
    let mut cursor = 0;
    for &i in &order {
        let edit = &edits[i];
        out.push_str(&source[cursor..edit.byte_start]);
        out.push_str(&edit.new_text);
        cursor = edit.byte_end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// Apply a batch of edits to a file in place, atomically.
///
/// The whole batch lands or nothing changes: content is rewritten in
/// memory, written to a tempfile in the same directory, fsynced, and
/// renamed over the original. The mtime is bumped afterwards so
/// timestamp-based build systems notice.
pub fn apply_in_place(path: &Path, edits: &[Edit]) -> Result<(), EditError> {
    let original = fs::read_to_string(path).map_err(|source| EditError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rewritten = apply_all(&original, edits)?;
    if rewritten == original {
        return Ok(());
    }

    atomic_write(path, rewritten.as_bytes()).map_err(|source| EditError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    filetime::set_file_mtime(path, filetime::FileTime::now()).map_err(|source| EditError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
