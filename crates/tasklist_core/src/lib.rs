pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod store;
pub mod task_api;
