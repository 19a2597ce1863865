use crate::error::AppError;
use crate::model::Task;
use crate::store::Store;

/// Serializes the whole store as one JSON array of task objects.
pub fn encode(store: &Store) -> Result<String, AppError> {
    serde_json::to_string_pretty(store.tasks())
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Decodes a JSON document back into a store. Empty input is a first run and
/// yields an empty store.
pub fn decode(content: &str) -> Result<Store, AppError> {
    if content.trim().is_empty() {
        return Ok(Store::new());
    }

    let tasks: Vec<Task> =
        serde_json::from_str(content).map_err(|err| AppError::invalid_data(err.to_string()))?;
    Store::from_tasks(tasks)
}
