use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub message: String,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    pub done: bool,
}
