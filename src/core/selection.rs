// File: src/core/selection.rs
use crate::core::inference::InferenceResult;
use crate::core::types::Symbol;
use serde::Serialize;
use std::collections::BTreeSet;

/// The player's taps: an unordered selection plus the order they happened in.
///
/// A symbol is in `history` at most once at any time, and `history` always
/// holds exactly the members of `selected`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionController {
    selected: BTreeSet<Symbol>,
    history: Vec<Symbol>,
    locked: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<Symbol> {
        &self.selected
    }

    /// Tap order, oldest first.
    pub fn history(&self) -> &[Symbol] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.selected.contains(&symbol)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Adds `symbol`, or removes it if already selected. Returns whether
    /// anything changed (nothing does while locked).
    pub fn toggle(&mut self, symbol: Symbol) -> bool {
        if self.locked {
            return false;
        }
        if self.selected.remove(&symbol) {
            if let Some(idx) = self.history.iter().rposition(|&s| s == symbol) {
                self.history.remove(idx);
            }
        } else {
            self.selected.insert(symbol);
            self.history.push(symbol);
        }
        true
    }

    /// Drops the most recent tap. Returns the symbol removed, if any.
    pub fn undo(&mut self) -> Option<Symbol> {
        if self.locked {
            return None;
        }
        let last = self.history.pop()?;
        self.selected.remove(&last);
        Some(last)
    }

    /// Clears the selection, the history, and the lock.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.history.clear();
        self.locked = false;
    }

    /// Freezes the selection, but only once the answer is certain.
    pub fn lock(&mut self, result: &InferenceResult) -> bool {
        if result.is_guaranteed() {
            self.locked = true;
        }
        self.locked
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inference::InferenceEngine;
    use crate::memory::Memory;
    use crate::core::types::Symbol::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = SelectionController::new();
        assert!(sel.toggle(Ramp));
        assert!(sel.toggle(V));
        assert_eq!(sel.history(), &[Ramp, V]);
        assert!(sel.toggle(Ramp));
        assert_eq!(sel.history(), &[V]);
        assert!(!sel.contains(Ramp));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn undo_pops_most_recent_tap() {
        let mut sel = SelectionController::new();
        sel.toggle(X);
        sel.toggle(DV);
        sel.toggle(Ninja);
        assert_eq!(sel.undo(), Some(Ninja));
        assert_eq!(sel.selected().iter().copied().collect::<Vec<_>>(), vec![DV, X]);
        sel.undo();
        sel.undo();
        assert_eq!(sel.undo(), None);
        assert!(sel.is_empty());
    }

    #[test]
    fn lock_requires_a_guaranteed_result() {
        let engine = InferenceEngine::default();
        let memory = Memory::new();
        let mut sel = SelectionController::new();

        sel.toggle(TWings);
        assert!(!sel.lock(&engine.infer(sel.selected(), &memory)));

        sel.toggle(Adidas);
        assert!(sel.lock(&engine.infer(sel.selected(), &memory)));
        assert!(!sel.toggle(Ramp));
        assert_eq!(sel.undo(), None);
        assert_eq!(sel.len(), 2);

        sel.reset();
        assert!(!sel.is_locked());
        assert!(sel.history().is_empty());
    }
}
