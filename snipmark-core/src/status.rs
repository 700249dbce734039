//! One-line status shown to the user while searching or indexing.

use serde::Serialize;
use std::fmt;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn searching() -> Self {
        Self::new(StatusKind::Info, "Searching...")
    }

    pub fn extracting() -> Self {
        Self::new(StatusKind::Info, "Extracting text...")
    }

    pub fn found(count: usize) -> Self {
        if count == 0 {
            Self::new(StatusKind::Info, "No results found.")
        } else {
            Self::new(StatusKind::Success, format!("Found {} results", count))
        }
    }

    pub fn indexed(chunks: u64, title: &str) -> Self {
        Self::new(
            StatusKind::Success,
            format!("Indexed {} chunks from \"{}\"", chunks, title),
        )
    }

    pub fn already_indexed(title: &str) -> Self {
        Self::new(StatusKind::Info, format!("\"{}\" is already indexed", title))
    }

    pub fn search_failed(err: &Error) -> Self {
        Self::new(StatusKind::Error, format!("Search failed: {}", err))
    }

    pub fn failed(err: &Error) -> Self {
        Self::new(StatusKind::Error, format!("Error: {}", err))
    }

    pub fn extraction_failed() -> Self {
        Self::new(StatusKind::Error, "Failed to extract text.")
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
