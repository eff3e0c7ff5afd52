use crate::config::Config;
use crate::core::candidates::GenerationStrategy;
use crate::core::catalog::Catalog;
use crate::core::inference::{InferenceEngine, InferenceResult};
use crate::core::selection::SelectionController;
use crate::core::types::{Sequence, Symbol};
use crate::error::Result;
use crate::learning::LearningEngine;
use crate::memory::Memory;
use crate::persistence::MemoryStore;
use std::path::Path;

// Session facade: every mutation recomputes the inference result before
// returning it, so callers only ever render fresh output.
pub struct OracleEngine {
    inference: InferenceEngine,
    store: MemoryStore,
    memory: Memory,
    selection: SelectionController,
    learning_engine: LearningEngine,
    result: InferenceResult,
}

impl OracleEngine {
    pub fn new(store: MemoryStore, strategy: GenerationStrategy) -> Self {
        let memory = store.load();
        let inference = InferenceEngine::new(Catalog::standard(), strategy);
        let selection = SelectionController::new();
        let result = inference.infer(selection.selected(), &memory);
        Self {
            inference,
            store,
            memory,
            selection,
            learning_engine: LearningEngine::new(),
            result,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(MemoryStore::open(&config.store_path), config.strategy)
    }

    pub fn result(&self) -> &InferenceResult {
        &self.result
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn catalog(&self) -> &Catalog {
        self.inference.catalog()
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn strategy(&self) -> GenerationStrategy {
        self.inference.strategy()
    }

    fn refresh(&mut self) -> &InferenceResult {
        self.result = self.inference.infer(self.selection.selected(), &self.memory);
        &self.result
    }

    pub fn toggle(&mut self, symbol: Symbol) -> &InferenceResult {
        self.selection.toggle(symbol);
        self.refresh()
    }

    pub fn undo(&mut self) -> &InferenceResult {
        self.selection.undo();
        self.refresh()
    }

    pub fn reset(&mut self) -> &InferenceResult {
        self.selection.reset();
        self.refresh()
    }

    /// Locks the selection when the answer is certain. Returns whether locked.
    pub fn lock(&mut self) -> bool {
        self.selection.lock(&self.result)
    }

    pub fn unlock(&mut self) -> &InferenceResult {
        self.selection.unlock();
        self.refresh()
    }

    /// Commits the sole remaining candidate, if there is exactly one.
    pub fn confirm(&mut self) -> Result<Option<Sequence>> {
        let committed = self
            .learning_engine
            .confirm(&self.result, &self.store, &mut self.memory)?;
        self.refresh();
        Ok(committed)
    }

    pub fn export_json(&self) -> Result<String> {
        MemoryStore::export_json(&self.memory)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        MemoryStore::export_to(&self.memory, path)
    }

    pub fn import_str(&mut self, text: &str) -> Result<&InferenceResult> {
        self.store.import_str(&mut self.memory, text)?;
        Ok(self.refresh())
    }

    pub fn import_from(&mut self, path: &Path) -> Result<&InferenceResult> {
        self.store.import_from(&mut self.memory, path)?;
        Ok(self.refresh())
    }

    pub fn clear_memory(&mut self) -> Result<&InferenceResult> {
        self.store.clear()?;
        self.memory = self.store.load();
        Ok(self.refresh())
    }
}
