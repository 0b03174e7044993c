pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Key-value persistence collaborator: one string value per key, written
/// whole on every `set`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
