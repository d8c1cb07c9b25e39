use log::log;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Item id {id} is outside of the signed 16-bit range")]
    Construction { id: i32 },
    #[error("Cannot pop {requested} items from a stack of {available}")]
    Range { requested: i32, available: i32 },
    #[error("Element {index} of {field} must be a {expected}, found {found}")]
    TypeMismatch {
        field: &'static str,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Malformed item data: {0}")]
    Format(String),
    #[error("Invalid item tag data: {0}")]
    Nbt(#[from] gourd_nbt::Error),
    #[error("Invalid item JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid base64 tag payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Invalid hex tag payload: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("Couldn't read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl ItemError {
    /// Errors caused by bad stored or received data are only worth a warning, the rest are bugs
    /// in the caller or a broken installation.
    pub fn severity(&self) -> log::Level {
        match self {
            ItemError::Format(_)
            | ItemError::Nbt(_)
            | ItemError::Json(_)
            | ItemError::Base64(_)
            | ItemError::Hex(_) => log::Level::Warn,
            ItemError::Construction { .. }
            | ItemError::Range { .. }
            | ItemError::TypeMismatch { .. }
            | ItemError::Io { .. } => log::Level::Error,
        }
    }

    pub fn log(&self) {
        log!(self.severity(), "{}", self);
    }
}
