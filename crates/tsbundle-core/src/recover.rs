//! Recovery of JSON objects from concatenated, bracket-less dumps.
//!
//! Database dumps inside a tech-support bundle are written as one JSON
//! object after another with no enclosing array and no separators:
//!
//! ```text
//! {"version":"4.1","timestamp":"2024-01-01T00:00:00"}{"version":"4.2", ...}
//! ```
//!
//! Such a file is not a JSON document, so it cannot be handed to a decoder
//! as a whole. [`scan_boundaries`] locates the byte span of each top-level
//! object with a depth-counting scanner that ignores braces inside string
//! literals, and [`recover`] decodes every span on its own. A span that fails
//! to decode is reported and skipped; it never voids the rest of the file.
//!
//! # Truncated objects
//!
//! An object whose braces never balance runs, at most, to the end of the
//! text. Rather than lose everything after it, the scanner resumes at the
//! next `{` that plausibly starts a new record: one whose previous
//! non-whitespace character is `}`, or that is the first non-whitespace
//! character on its line. The truncated span itself is reported as skipped.
//!
//! The same cut applies to a span whose braces balance but which does not
//! decode and holds such a `{`: a string left open by truncation swaps
//! quoted and unquoted text, so the "closing" brace may sit inside the next
//! record.

use std::fs;
use std::path::Path;

use log::debug;
use log::warn;
use serde_json::Value;

use crate::error::ParseError;

/// A byte span of the input believed to hold exactly one JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectBoundary {
    /// Offset of the opening brace.
    pub start: usize,

    /// Offset one past the last byte of the span.
    pub end: usize,

    /// `false` if the span was cut at a resynchronisation point or at the
    /// end of the text, either because the braces never balanced or because
    /// the balanced span did not decode.
    pub complete: bool,
}

impl ObjectBoundary {
    /// Returns the span's text.
    ///
    /// # Panics
    ///
    /// Panics if the boundary was not produced by [`scan_boundaries`] for
    /// `text`.
    #[must_use]
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Objects recovered from one input.
#[derive(Debug, Default)]
pub struct Recovery {
    /// Successfully decoded values, in order of appearance.
    pub objects: Vec<Value>,

    /// Boundaries that did not decode, in order of appearance.
    pub skipped: Vec<ParseError>,

    /// Number of boundaries detected.
    pub boundaries: usize,

    /// Set when the input file could not be read at all.
    pub read_error: Option<std::io::Error>,
}

impl Recovery {
    /// Returns `true` if nothing was recovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns `true` if some boundaries failed to decode or the input could
    /// not be read.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty() || self.read_error.is_some()
    }
}

/// Splits concatenated JSON text into top-level object spans.
///
/// Only `{` opens a span; anything between spans (whitespace, commas, stray
/// tokens) is ignored. The result is ordered by position and spans never
/// overlap.
///
/// # Examples
///
/// ```
/// use tsbundle_core::recover::scan_boundaries;
///
/// let text = r#"{"a":{"b":"}"}} {"c":2}"#;
/// let spans: Vec<_> = scan_boundaries(text).iter().map(|b| b.slice(text)).collect();
/// assert_eq!(spans, vec![r#"{"a":{"b":"}"}}"#, r#"{"c":2}"#]);
/// ```
#[must_use]
pub fn scan_boundaries(text: &str) -> Vec<ObjectBoundary> {
    scan(text).into_iter().map(|(boundary, _)| boundary).collect()
}

/// Decodes every object in `text`, skipping the ones that fail.
///
/// # Examples
///
/// ```
/// use tsbundle_core::recover::recover;
///
/// let recovery = recover(r#"{"a":1}{"b":2,}{"c":3}"#);
/// assert_eq!(recovery.objects.len(), 2);
/// assert_eq!(recovery.skipped.len(), 1);
/// assert_eq!(recovery.objects[1]["c"], 3);
/// ```
#[must_use]
pub fn recover(text: &str) -> Recovery {
    let spans = scan(text);
    let mut recovery = Recovery {
        boundaries: spans.len(),
        ..Recovery::default()
    };

    for (boundary, decoded) in spans {
        match decoded {
            Ok(value) => recovery.objects.push(value),
            Err(source) => {
                debug!(
                    "skipping object at bytes {}..{}: {source}",
                    boundary.start, boundary.end
                );
                recovery.skipped.push(ParseError {
                    start: boundary.start,
                    end: boundary.end,
                    source,
                });
            }
        }
    }

    recovery
}

/// Decodes every object in a byte buffer. Invalid UTF-8 is replaced with
/// U+FFFD before scanning.
#[must_use]
pub fn recover_bytes(bytes: &[u8]) -> Recovery {
    recover(&String::from_utf8_lossy(bytes))
}

/// Reads a record file and decodes every object in it.
///
/// Never fails: an unreadable file yields an empty recovery with
/// [`Recovery::read_error`] set.
pub fn recover_file<P: AsRef<Path>>(path: P) -> Recovery {
    let path = path.as_ref();
    let recovery = match fs::read(path) {
        Ok(bytes) => recover_bytes(&bytes),
        Err(e) => {
            warn!("cannot read {}: {e}", path.display());
            return Recovery {
                read_error: Some(e),
                ..Recovery::default()
            };
        }
    };

    if !recovery.skipped.is_empty() {
        warn!(
            "{}: skipped {} of {} objects",
            path.display(),
            recovery.skipped.len(),
            recovery.boundaries
        );
    }
    recovery
}

/// Splits `text` into spans and decodes each one.
fn scan(text: &str) -> Vec<(ObjectBoundary, serde_json::Result<Value>)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'{') {
        let start = pos + offset;
        let (mut end, mut complete) = match closing_brace(bytes, start) {
            Some(end) => (end, true),
            None => (resync_point(bytes, start + 1).unwrap_or(bytes.len()), false),
        };
        let mut decoded = serde_json::from_str::<Value>(&text[start..end]);

        // A string cut short inverts quoting, so the braces can balance
        // inside a later record. Keep the damage before that record.
        if complete
            && decoded.is_err()
            && let Some(next) = resync_point(bytes, start + 1).filter(|&next| next < end)
        {
            end = next;
            complete = false;
            decoded = serde_json::from_str::<Value>(&text[start..end]);
        }

        spans.push((
            ObjectBoundary {
                start,
                end,
                complete,
            },
            decoded,
        ));
        pos = end;
    }

    spans
}

/// Returns the offset one past the `}` that closes the object opened at
/// `start`, or `None` if it never closes.
fn closing_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Finds the first `{` at or after `from` that plausibly starts a record.
fn resync_point(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| bytes[i] == b'{' && starts_record(bytes, i))
}

fn starts_record(bytes: &[u8], brace: usize) -> bool {
    for &b in bytes[..brace].iter().rev() {
        match b {
            b'\n' => return true,
            b' ' | b'\t' | b'\r' => {}
            b'}' => return true,
            _ => return false,
        }
    }
    true
}
