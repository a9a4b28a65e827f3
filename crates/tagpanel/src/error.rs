//! Error types for the panel
//!
//! None of these are fatal for the user: the panel logs them and degrades to a
//! no-op or partial effect.

use thiserror::Error;

/// Errors raised while decoding payloads and persisted geometry
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Invalid id {value:?} in {format} payload")]
    InvalidId { value: String, format: &'static str },

    #[error("Invalid column width {0:?}")]
    InvalidWidth(String),

    #[error("Splitter state has {0} bytes, expected 4")]
    SplitterState(usize),

    #[error("Splitter portions {files} + {albums} overflow")]
    SplitterPortions { files: u16, albums: u16 },
}

pub type Result<T> = std::result::Result<T, PanelError>;
