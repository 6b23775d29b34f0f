use crate::{code_key, CodeStore};
use arena_core::Result;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-process store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CodeStore for MemoryStore {
    fn load(&self, problem_id: &str, language: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&code_key(problem_id, language)).cloned())
    }

    fn save(&self, problem_id: &str, language: &str, code: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(code_key(problem_id, language), code.to_string());
        Ok(())
    }

    fn remove(&self, problem_id: &str, language: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&code_key(problem_id, language));
        Ok(())
    }
}
