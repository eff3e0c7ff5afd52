// File: src/memory.rs
use crate::core::types::Sequence;
use crate::error::{FloppyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Observation counts of previously confirmed sequences.
///
/// Keys are canonical sequence keys (`Sequence::key`). Keys that do not
/// parse as a sequence are carried along untouched so a snapshot written by
/// a newer catalog survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Memory {
    pub sequences: BTreeMap<String, u64>,
    /// Always the sum of `sequences`. Older snapshots call it `totalSaved`.
    #[serde(alias = "totalSaved")]
    pub total: u64,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn count(&self, sequence: &Sequence) -> u64 {
        self.count_key(&sequence.key())
    }

    pub fn count_key(&self, key: &str) -> u64 {
        self.sequences.get(key).copied().unwrap_or(0)
    }

    /// Records one more confirmation of `sequence`.
    pub fn bump(&mut self, sequence: &Sequence) {
        let slot = self.sequences.entry(sequence.key()).or_insert(0);
        *slot = slot.saturating_add(1);
        self.recompute_total();
    }

    /// Adds every positive count of `incoming` onto `self`.
    pub fn merge(&mut self, incoming: &Memory) {
        for (key, &add) in &incoming.sequences {
            if add == 0 {
                continue;
            }
            let slot = self.sequences.entry(key.clone()).or_insert(0);
            *slot = slot.saturating_add(add);
        }
        self.recompute_total();
    }

    pub fn recompute_total(&mut self) {
        self.total = self
            .sequences
            .values()
            .fold(0u64, |acc, &v| acc.saturating_add(v));
    }

    pub fn is_consistent(&self) -> bool {
        let sum = self
            .sequences
            .values()
            .fold(0u64, |acc, &v| acc.saturating_add(v));
        sum == self.total
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Validation boundary for snapshots coming from outside the process.
pub struct MemorySnapshot;

impl MemorySnapshot {
    /// Parses and shape-checks a snapshot.
    ///
    /// The top level must be an object, and `sequences`, when present and
    /// not null, must be an object too. Individual counts are coerced
    /// leniently; entries that are not finite and positive are
    /// dropped. `total` is ignored and recomputed.
    pub fn parse(text: &str) -> Result<Memory> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Memory> {
        let root = value.as_object().ok_or(FloppyError::NotAnObject)?;

        let mut memory = Memory::new();
        match root.get("sequences") {
            None | Some(Value::Null) => {}
            Some(Value::Object(entries)) => {
                for (key, raw) in entries {
                    if let Some(count) = coerce_count(raw) {
                        let slot = memory.sequences.entry(key.clone()).or_insert(0);
                        *slot = slot.saturating_add(count);
                    }
                }
            }
            Some(_) => return Err(FloppyError::InvalidShape { field: "sequences" }),
        }
        memory.recompute_total();

        // The stated total (or legacy `totalSaved`) is only a hint.
        if let Ok(stated) = Memory::deserialize(value) {
            if stated.total != 0 && stated.total != memory.total {
                tracing::debug!(stated = stated.total, recomputed = memory.total, "snapshot total ignored");
            }
        }
        Ok(memory)
    }
}

/// Lenient numeric reading of one count. `None` means "skip this entry".
/// Fractions round up, huge values saturate at `u64::MAX`.
fn coerce_count(raw: &Value) -> Option<u64> {
    let n = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        _ => return None,
    };
    if !n.is_finite() || n <= 0.0 {
        return None;
    }
    // Partial evidence still counts once.
    Some(n.ceil() as u64)
}
