// File: src/learning.rs
use crate::core::inference::InferenceResult;
use crate::core::types::Sequence;
use crate::error::Result;
use crate::memory::Memory;
use crate::persistence::MemoryStore;

/// Feeds confirmed answers back into memory so they weigh more next time.
#[derive(Debug, Default)]
pub struct LearningEngine;

impl LearningEngine {
    pub fn new() -> Self {
        Self
    }

    /// Commits the sole remaining candidate of `result`.
    ///
    /// Returns the committed sequence, or `None` (and writes nothing) when
    /// the result is not down to exactly one candidate.
    pub fn confirm(
        &self,
        result: &InferenceResult,
        store: &MemoryStore,
        memory: &mut Memory,
    ) -> Result<Option<Sequence>> {
        let Some(&sequence) = result.sole_candidate() else {
            tracing::debug!(candidates = result.len(), "confirm ignored, answer not unique");
            return Ok(None);
        };
        store.bump(memory, &sequence)?;
        tracing::info!(sequence = %sequence, count = memory.count(&sequence), "sequence confirmed");
        Ok(Some(sequence))
    }
}
