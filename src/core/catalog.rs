// File: src/core/catalog.rs
use crate::core::types::{Symbol, ROW_COUNT, ROW_LEN};
use std::collections::BTreeSet;

pub type Row = [Symbol; ROW_LEN];

use crate::core::types::Symbol::*;

const STANDARD_ROWS: [Row; ROW_COUNT] = [
    [Ramp, ClosedBox, OpenBox, V, X, DWings],
    [Adidas, DWings, DV, DSlant, Ninja, Ramp],
    [DSlant, TWings, Ninja, DV, Adidas, Ramp],
    [DSlant, V, OpenBox, X, DWings, ClosedBox],
    [Ramp, VTrap, OpenBox, ClosedBox, X, DWings],
    [V, VTrap, X, ClosedBox, DWings, DV],
];

/// The fixed puzzle data: six ordered rows of six symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    rows: [Row; ROW_COUNT],
    symbols: Vec<Symbol>,
}

impl Catalog {
    pub fn standard() -> Self {
        Self::from_rows(STANDARD_ROWS)
    }

    fn from_rows(rows: [Row; ROW_COUNT]) -> Self {
        let symbols: BTreeSet<Symbol> = rows.iter().flatten().copied().collect();
        Self {
            rows,
            symbols: symbols.into_iter().collect(),
        }
    }

    pub fn rows(&self) -> &[Row; ROW_COUNT] {
        &self.rows
    }

    /// Every symbol appearing in some row, sorted by id.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.binary_search(&symbol).is_ok()
    }

    /// Human-readable name: `d-wings` becomes `D Wings`.
    pub fn label(&self, symbol: Symbol) -> String {
        symbol
            .id()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn icon_path(&self, symbol: Symbol) -> String {
        format!("./assets/{}.png", symbol.id())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
