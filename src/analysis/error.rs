//! Per-file extraction errors.

use thiserror::Error;

/// Errors raised while extracting facts from one file.
///
/// These never escape a batch: the file boundary turns them into an
/// error-tagged `FileFacts`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{kind} extraction: offset {offset} is not a valid position in {len} bytes of content")]
    Slice {
        kind: &'static str,
        offset: usize,
        len: usize,
    },
    #[error("extraction panicked: {0}")]
    Panicked(String),
}
