// File: src/persistence.rs
use crate::core::types::Sequence;
use crate::error::{FloppyError, Result};
use crate::memory::{Memory, MemorySnapshot};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handle to the on-disk memory file.
///
/// There is no process-wide store: callers open one and pass it around.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted memory. A missing, unreadable or malformed file
    /// yields an empty memory; this never fails.
    pub fn load(&self) -> Memory {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Memory::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "memory unreadable, starting empty");
                return Memory::new();
            }
        };
        match MemorySnapshot::parse(&text) {
            Ok(memory) => memory,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "memory corrupt, starting empty");
                Memory::new()
            }
        }
    }

    /// Writes `memory` atomically: a temp file next to the target, then rename.
    pub fn save(&self, memory: &Memory) -> Result<()> {
        let parent_dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir).map_err(|source| self.persist_err(source))?;

        let temp_file = NamedTempFile::new_in(parent_dir).map_err(|source| self.persist_err(source))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer(&mut writer, memory)?;
            writer.flush().map_err(|source| self.persist_err(source))?;
        }
        temp_file
            .persist(&self.path)
            .map_err(|e| self.persist_err(e.error))?;

        tracing::info!(path = %self.path.display(), total = memory.total, "memory saved");
        Ok(())
    }

    /// Counts one more confirmation of `sequence` and persists. `memory`
    /// only changes once the save went through.
    pub fn bump(&self, memory: &mut Memory, sequence: &Sequence) -> Result<()> {
        let mut staged = memory.clone();
        staged.bump(sequence);
        self.save(&staged)?;
        *memory = staged;
        Ok(())
    }

    /// Adds `incoming` onto `target` and persists. `target` only changes
    /// once the save went through.
    pub fn merge(&self, target: &mut Memory, incoming: &Memory) -> Result<()> {
        let mut staged = target.clone();
        staged.merge(incoming);
        self.save(&staged)?;
        *target = staged;
        Ok(())
    }

    /// Erases the persisted memory. The next `load` returns an empty one.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(self.persist_err(source)),
        }
        tracing::info!(path = %self.path.display(), "memory cleared");
        Ok(())
    }

    /// Pretty-printed snapshot for download/transfer.
    pub fn export_json(memory: &Memory) -> Result<String> {
        memory.to_pretty_json()
    }

    pub fn export_to(memory: &Memory, path: &Path) -> Result<()> {
        fs::write(path, Self::export_json(memory)?)?;
        tracing::info!(path = %path.display(), "memory exported");
        Ok(())
    }

    /// Validates `text` in full, then merges it like [`MemoryStore::merge`].
    /// On any error `current` is left exactly as it was.
    pub fn import_str(&self, current: &mut Memory, text: &str) -> Result<()> {
        let incoming = MemorySnapshot::parse(text)?;
        self.merge(current, &incoming)?;
        let foreign = incoming
            .sequences
            .keys()
            .filter(|key| Sequence::from_key(key).is_err())
            .count();
        tracing::info!(
            entries = incoming.sequences.len(),
            foreign,
            added = incoming.total,
            total = current.total,
            "memory imported"
        );
        Ok(())
    }

    pub fn import_from(&self, current: &mut Memory, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        self.import_str(current, &text)
    }

    fn persist_err(&self, source: std::io::Error) -> FloppyError {
        FloppyError::Persist {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Symbol;
    use tempfile::tempdir;

    fn seq() -> Sequence {
        Sequence::new([Symbol::V, Symbol::VTrap, Symbol::X, Symbol::ClosedBox])
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("none.json"));
        assert_eq!(store.load(), Memory::new());
    }

    #[test]
    fn bump_survives_reload() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("nested").join("memory.json"));
        let mut memory = store.load();
        store.bump(&mut memory, &seq()).unwrap();
        store.bump(&mut memory, &seq()).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.count(&seq()), 2);
        assert_eq!(reloaded.total, 2);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        for junk in ["\"just a string\"", "[1,2]", "{{{", "null", ""] {
            fs::write(&path, junk).unwrap();
            assert_eq!(MemoryStore::open(&path).load(), Memory::new(), "input {junk:?}");
        }
    }

    #[test]
    fn clear_removes_file_and_is_repeatable() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("memory.json"));
        let mut memory = Memory::new();
        store.bump(&mut memory, &seq()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn failed_import_leaves_memory_untouched() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("memory.json"));
        let mut memory = Memory::new();
        store.bump(&mut memory, &seq()).unwrap();
        let before = memory.clone();

        assert!(matches!(
            store.import_str(&mut memory, "[{\"sequences\": {}}]"),
            Err(FloppyError::NotAnObject)
        ));
        assert!(store.import_str(&mut memory, "not json at all").is_err());
        assert_eq!(memory, before);
        assert_eq!(store.load(), before);
    }

    #[test]
    fn failed_save_leaves_memory_untouched() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();
        let store = MemoryStore::open(blocker.join("memory.json"));

        let mut memory = Memory::new();
        assert!(matches!(
            store.bump(&mut memory, &seq()),
            Err(FloppyError::Persist { .. })
        ));
        assert!(memory.is_empty());

        let mut incoming = Memory::new();
        incoming.bump(&seq());
        assert!(store.merge(&mut memory, &incoming).is_err());
        assert!(store.import_str(&mut memory, r#"{"sequences": {"a|b|c|d": 3}}"#).is_err());
        assert!(memory.is_empty());
    }

    #[test]
    fn merge_adds_onto_persisted_counts() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("memory.json"));
        let mut memory = Memory::new();
        store.bump(&mut memory, &seq()).unwrap();

        let mut incoming = Memory::new();
        incoming.bump(&seq());
        incoming.sequences.insert("foreign|key".into(), 2);
        incoming.recompute_total();
        store.merge(&mut memory, &incoming).unwrap();

        assert_eq!(memory.count(&seq()), 2);
        assert_eq!(memory.total, 4);
        assert_eq!(store.load(), memory);
    }
}
