pub mod file_backend;
pub mod json_store;
pub mod record_store;

use crate::error::AppError;
use crate::store::Store;

pub const DEFAULT_DELIMITER: char = ',';

/// On-disk shape of the store, selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Whole-document encoding: one JSON array of task objects.
    Json,
    /// Record-stream encoding: one delimited record per line.
    Records { delimiter: char },
}

impl Encoding {
    pub fn encode(&self, store: &Store) -> Result<String, AppError> {
        match self {
            Self::Json => json_store::encode(store),
            Self::Records { delimiter } => record_store::encode(store, *delimiter),
        }
    }

    pub fn decode(&self, content: &str) -> Result<Store, AppError> {
        match self {
            Self::Json => json_store::decode(content),
            Self::Records { delimiter } => record_store::decode(content, *delimiter),
        }
    }
}
