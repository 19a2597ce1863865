use crate::error::AppError;
use crate::storage::Encoding;
use std::path::PathBuf;

const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKLIST_STORE_PATH";

/// Resolved store configuration for one invocation, built once from parsed
/// arguments and the environment and passed by value. The store and file
/// backend never read process-global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub encoding: Encoding,
}

impl StoreConfig {
    pub fn new(path: PathBuf, encoding: Encoding) -> Self {
        Self { path, encoding }
    }

    /// Combines an optional explicit path with the default resolution chain
    /// (env var, then platform config directory).
    pub fn resolve(path_override: Option<PathBuf>, encoding: Encoding) -> Result<Self, AppError> {
        let path = match path_override {
            Some(path) => path,
            None => default_store_path()?,
        };
        Ok(Self { path, encoding })
    }
}

pub fn default_store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(STORE_FILE_NAME))
    }
}

/// The record-stream delimiter is a single character, comma or semicolon;
/// the decoder must be configured with the delimiter the encoder used.
pub fn parse_delimiter(raw: &str) -> Result<char, AppError> {
    match raw {
        "," => Ok(','),
        ";" => Ok(';'),
        other => Err(AppError::invalid_input(format!(
            "unsupported delimiter '{other}', expected ',' or ';'"
        ))),
    }
}
