//! Core shared errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid color value: '{0}'")]
    InvalidColor(String),
}
