use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("tile data truncated: {width}x{height} needs {expected} bytes, got {actual}")]
    TruncatedData {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("planar screen must be exactly {expected} bytes, got {actual}")]
    InvalidSize { expected: usize, actual: usize },
    #[error("level file too small: needs at least {expected} bytes, got {actual}")]
    FileTooSmall { expected: usize, actual: usize },
}
