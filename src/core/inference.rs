// File: src/core/inference.rs
use crate::core::candidates::{generate, GenerationStrategy, Placement};
use crate::core::catalog::Catalog;
use crate::core::types::{Sequence, Symbol, MAX_SELECTED, SEQUENCE_LEN};
use crate::memory::Memory;
use serde::Serialize;
use std::collections::BTreeSet;

/// Why an inference produced nothing even though it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    TooManySelected,
}

/// Coarse state of the puzzle, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Nothing selected yet.
    Idle,
    TooMany,
    /// The selection contradicts every row.
    NoMatch,
    /// Exactly one sequence remains.
    Guaranteed,
    Ambiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightedCandidate {
    pub placement: Placement,
    /// Laplace-smoothed: observation count + 1.
    pub weight: u64,
}

impl WeightedCandidate {
    pub fn sequence(&self) -> &Sequence {
        &self.placement.sequence
    }
}

/// Summed candidate weight per symbol at one position.
///
/// Entries keep the order in which symbols were first seen; ties in
/// [`PositionTally::top`] go to the earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionTally {
    entries: Vec<(Symbol, u64)>,
}

impl PositionTally {
    fn add(&mut self, symbol: Symbol, weight: u64) {
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, w)) => *w = w.saturating_add(weight),
            None => self.entries.push((symbol, weight)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Symbol, u64)> {
        self.entries.iter()
    }

    pub fn top(&self) -> Option<Symbol> {
        let mut best: Option<(Symbol, u64)> = None;
        for &(sym, w) in &self.entries {
            match best {
                Some((_, bw)) if w <= bw => {}
                _ => best = Some((sym, w)),
            }
        }
        best.map(|(sym, _)| sym)
    }

    /// Entries by descending weight, first-seen order among equals.
    pub fn ranked(&self) -> Vec<(Symbol, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by_key(|&(_, w)| std::cmp::Reverse(w));
        ranked
    }

    /// The only symbol seen here, if there is exactly one.
    pub fn locked(&self) -> Option<Symbol> {
        match self.entries.as_slice() {
            [(sym, _)] => Some(*sym),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceResult {
    pub candidates: Vec<WeightedCandidate>,
    pub possible_symbols: BTreeSet<Symbol>,
    pub position_stats: [PositionTally; SEQUENCE_LEN],
    /// Per-position argmax. A heuristic: it need not be a candidate itself.
    pub best_sequence: Option<Sequence>,
    /// Share of total weight held by the heaviest candidate.
    pub confidence: f64,
    pub total_weight: u64,
    pub reason: Option<Rejection>,
    pub selected: usize,
}

impl InferenceResult {
    fn rejected(reason: Rejection, selected: usize) -> Self {
        Self {
            candidates: Vec::new(),
            possible_symbols: BTreeSet::new(),
            position_stats: Default::default(),
            best_sequence: None,
            confidence: 0.0,
            total_weight: 0,
            reason: Some(reason),
            selected,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_guaranteed(&self) -> bool {
        self.candidates.len() == 1
    }

    pub fn sole_candidate(&self) -> Option<&Sequence> {
        match self.candidates.as_slice() {
            [only] => Some(only.sequence()),
            _ => None,
        }
    }

    pub fn locked_positions(&self) -> [Option<Symbol>; SEQUENCE_LEN] {
        [0, 1, 2, 3].map(|i| self.position_stats[i].locked())
    }

    pub fn ranked(&self, position: usize) -> Vec<(Symbol, u64)> {
        self.position_stats
            .get(position)
            .map(PositionTally::ranked)
            .unwrap_or_default()
    }

    /// `weight` as a fraction of the total candidate weight.
    pub fn share(&self, weight: u64) -> f64 {
        if self.total_weight == 0 {
            0.0
        } else {
            weight as f64 / self.total_weight as f64
        }
    }

    /// True when the selection filters, something remains, and `symbol`
    /// appears in none of what remains.
    pub fn is_impossible(&self, symbol: Symbol) -> bool {
        let filtering = self.selected > 0 && self.selected <= MAX_SELECTED;
        filtering && !self.candidates.is_empty() && !self.possible_symbols.contains(&symbol)
    }

    pub fn best_is_consistent(&self) -> bool {
        match &self.best_sequence {
            Some(best) => self.candidates.iter().any(|c| c.sequence() == best),
            None => false,
        }
    }

    pub fn status(&self) -> Status {
        if self.reason == Some(Rejection::TooManySelected) {
            Status::TooMany
        } else if self.selected == 0 {
            Status::Idle
        } else {
            match self.candidates.len() {
                0 => Status::NoMatch,
                1 => Status::Guaranteed,
                _ => Status::Ambiguous,
            }
        }
    }
}

/// Enumerates, weights and aggregates hypotheses for a selection.
///
/// Holds the catalog and its pre-generated hypothesis universe; inference
/// itself is a pure function of `(selection, memory)`.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    catalog: Catalog,
    strategy: GenerationStrategy,
    universe: Vec<Placement>,
}

impl InferenceEngine {
    pub fn new(catalog: Catalog, strategy: GenerationStrategy) -> Self {
        let universe = generate(&catalog, strategy);
        Self {
            catalog,
            strategy,
            universe,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn strategy(&self) -> GenerationStrategy {
        self.strategy
    }

    /// Every generated hypothesis, before filtering.
    pub fn universe(&self) -> &[Placement] {
        &self.universe
    }

    pub fn infer(&self, selection: &BTreeSet<Symbol>, memory: &Memory) -> InferenceResult {
        let selected = selection.len();
        if selected > MAX_SELECTED {
            tracing::debug!(selected, "selection too large, skipping inference");
            return InferenceResult::rejected(Rejection::TooManySelected, selected);
        }

        let candidates: Vec<WeightedCandidate> = self
            .universe
            .iter()
            .filter(|p| selection.iter().all(|&s| p.sequence.contains(s)))
            .map(|p| WeightedCandidate {
                placement: *p,
                weight: memory.count(&p.sequence).saturating_add(1),
            })
            .collect();

        let total_weight = candidates
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.weight));

        let mut possible_symbols = BTreeSet::new();
        let mut position_stats: [PositionTally; SEQUENCE_LEN] = Default::default();
        for cand in &candidates {
            for (i, &sym) in cand.sequence().symbols().iter().enumerate() {
                possible_symbols.insert(sym);
                position_stats[i].add(sym, cand.weight);
            }
        }

        let best_sequence = if candidates.is_empty() {
            None
        } else {
            let mut picks = [Symbol::Adidas; SEQUENCE_LEN];
            for (slot, tally) in picks.iter_mut().zip(&position_stats) {
                // Non-empty: every candidate contributes to every position.
                if let Some(top) = tally.top() {
                    *slot = top;
                }
            }
            Some(Sequence::new(picks))
        };

        let confidence = match candidates.iter().map(|c| c.weight).max() {
            Some(top) if total_weight > 0 => top as f64 / total_weight as f64,
            _ => 0.0,
        };

        tracing::debug!(
            selected,
            candidates = candidates.len(),
            total_weight,
            confidence,
            "inference complete"
        );

        InferenceResult {
            candidates,
            possible_symbols,
            position_stats,
            best_sequence,
            confidence,
            total_weight,
            reason: None,
            selected,
        }
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new(Catalog::standard(), GenerationStrategy::default())
    }
}
