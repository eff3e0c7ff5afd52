// File: src/core/candidates.rs
use crate::core::catalog::{Catalog, Row};
use crate::core::types::{Sequence, Symbol, ROW_LEN, SEQUENCE_LEN};
use crate::error::FloppyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a row is cut into 4-symbol hypotheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStrategy {
    /// The three contiguous windows `[0..4]`, `[1..5]`, `[2..6]`.
    #[default]
    ContiguousWindows,
    /// All C(6,4) = 15 order-preserving choices of four positions.
    OrderedSubsequences,
}

impl GenerationStrategy {
    pub fn per_row(self) -> usize {
        match self {
            GenerationStrategy::ContiguousWindows => ROW_LEN - SEQUENCE_LEN + 1,
            GenerationStrategy::OrderedSubsequences => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationStrategy::ContiguousWindows => "windows",
            GenerationStrategy::OrderedSubsequences => "subsequences",
        }
    }
}

impl fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationStrategy {
    type Err = FloppyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "contiguous" | "contiguous_windows" => Ok(Self::ContiguousWindows),
            "subsequences" | "ordered_subsequences" => Ok(Self::OrderedSubsequences),
            other => Err(FloppyError::UnknownStrategy(other.to_string())),
        }
    }
}

/// A generated sequence together with where in the catalog it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub sequence: Sequence,
    pub row: usize,
    /// Row positions the four symbols were taken from, ascending.
    pub positions: [usize; SEQUENCE_LEN],
}

impl Placement {
    /// First row position used. For a contiguous window this is its offset.
    pub fn start(&self) -> usize {
        self.positions[0]
    }

    pub fn is_contiguous(&self) -> bool {
        self.positions[SEQUENCE_LEN - 1] - self.positions[0] == SEQUENCE_LEN - 1
    }
}

/// Every hypothesis the catalog admits under `strategy`, in row order.
///
/// Identical sequences reached from different rows are kept as separate
/// placements.
pub fn generate(catalog: &Catalog, strategy: GenerationStrategy) -> Vec<Placement> {
    let mut out = Vec::with_capacity(catalog.rows().len() * strategy.per_row());
    for (row_idx, row) in catalog.rows().iter().enumerate() {
        match strategy {
            GenerationStrategy::ContiguousWindows => {
                for start in 0..=ROW_LEN - SEQUENCE_LEN {
                    let positions = [start, start + 1, start + 2, start + 3];
                    out.push(place(row, row_idx, positions));
                }
            }
            GenerationStrategy::OrderedSubsequences => {
                for a in 0..ROW_LEN {
                    for b in a + 1..ROW_LEN {
                        for c in b + 1..ROW_LEN {
                            for d in c + 1..ROW_LEN {
                                out.push(place(row, row_idx, [a, b, c, d]));
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

fn place(row: &Row, row_idx: usize, positions: [usize; SEQUENCE_LEN]) -> Placement {
    let symbols: [Symbol; SEQUENCE_LEN] = positions.map(|p| row[p]);
    Placement {
        sequence: Sequence::new(symbols),
        row: row_idx,
        positions,
    }
}
