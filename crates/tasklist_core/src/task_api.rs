use crate::config::StoreConfig;
use crate::error::AppError;
use crate::model::Task;
use crate::storage::Encoding;
use crate::storage::file_backend::{self, StoreLock};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

fn now_utc() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Adds one task and persists the store. For the record-stream encoding a
/// pure add appends a single record instead of rewriting the file.
pub fn add_task(config: &StoreConfig, message: &str) -> Result<Task, AppError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("message is required"));
    }

    let _lock = StoreLock::acquire(&config.path)?;
    let now = now_utc()?;

    if let Encoding::Records { delimiter } = config.encoding {
        return file_backend::append_record(&config.path, delimiter, trimmed, &now);
    }

    let mut store = file_backend::load_store(&config.path, config.encoding)?;
    let task = store.add(trimmed, &now)?;
    file_backend::save_store(&config.path, config.encoding, &store)?;

    Ok(task)
}

/// Flips the done state of one task and persists the store. A failed lookup
/// leaves both the in-memory collection and the file untouched.
pub fn toggle_task(config: &StoreConfig, id: u64) -> Result<Task, AppError> {
    let _lock = StoreLock::acquire(&config.path)?;
    let now = now_utc()?;

    let mut store = file_backend::load_store(&config.path, config.encoding)?;
    let task = store.toggle(id, &now)?;
    file_backend::save_store(&config.path, config.encoding, &store)?;

    Ok(task)
}

/// Deletes one task by id and persists the store.
pub fn delete_task(config: &StoreConfig, id: u64) -> Result<Task, AppError> {
    let _lock = StoreLock::acquire(&config.path)?;

    let mut store = file_backend::load_store(&config.path, config.encoding)?;
    let task = store.delete(id)?;
    file_backend::save_store(&config.path, config.encoding, &store)?;

    Ok(task)
}

/// Returns all tasks in ascending-id order. Never writes back.
pub fn list_tasks(config: &StoreConfig) -> Result<Vec<Task>, AppError> {
    let _lock = StoreLock::acquire(&config.path)?;

    let store = file_backend::load_store(&config.path, config.encoding)?;
    Ok(store.into_tasks())
}
