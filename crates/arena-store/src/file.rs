use crate::{code_key, CodeStore};
use arena_core::{ArenaError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Code store backed by a single JSON object file.
///
/// Every call re-reads the file, so several processes may share it. There is
/// no lock between them; the last writer wins.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            ArenaError::Store(format!("Corrupt code store at {:?}: {}", self.path, e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write aside then rename so a crash never leaves half a file behind.
        // Each write gets its own scratch file; concurrent writers must not share one.
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
        let tmp = self.path.with_file_name(name);

        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl CodeStore for FileStore {
    fn load(&self, problem_id: &str, language: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(&code_key(problem_id, language)))
    }

    fn save(&self, problem_id: &str, language: &str, code: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(code_key(problem_id, language), code.to_string());
        self.write_all(&entries)?;
        tracing::debug!(
            problem_id = %problem_id,
            language = %language,
            path = ?self.path,
            "Persisted code"
        );
        Ok(())
    }

    fn remove(&self, problem_id: &str, language: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(&code_key(problem_id, language)).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
