pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use arena_core::Result;

/// Key under which code for a (problem, language) pair is persisted.
pub fn code_key(problem_id: &str, language: &str) -> String {
    format!("{}_{}", problem_id, language)
}

/// Local key-value store for editor code, keyed by (problem, language).
///
/// Writers do not coordinate: the last write wins.
pub trait CodeStore: Send + Sync {
    fn load(&self, problem_id: &str, language: &str) -> Result<Option<String>>;

    fn save(&self, problem_id: &str, language: &str, code: &str) -> Result<()>;

    fn remove(&self, problem_id: &str, language: &str) -> Result<()>;
}

impl<T: CodeStore + ?Sized> CodeStore for std::sync::Arc<T> {
    fn load(&self, problem_id: &str, language: &str) -> Result<Option<String>> {
        (**self).load(problem_id, language)
    }

    fn save(&self, problem_id: &str, language: &str, code: &str) -> Result<()> {
        (**self).save(problem_id, language, code)
    }

    fn remove(&self, problem_id: &str, language: &str) -> Result<()> {
        (**self).remove(problem_id, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_key_format() {
        assert_eq!(code_key("two-sum", "python"), "two-sum_python");
        assert_eq!(code_key("p1", "go"), "p1_go");
    }
}
