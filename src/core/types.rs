// src/core/types.rs
use crate::error::FloppyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of symbols in a spawned sequence.
pub const SEQUENCE_LEN: usize = 4;
/// Number of symbols in every catalog row.
pub const ROW_LEN: usize = 6;
/// Number of rows in the catalog.
pub const ROW_COUNT: usize = 6;
/// Largest selection the engine will filter on.
pub const MAX_SELECTED: usize = SEQUENCE_LEN;
/// Joins symbol ids into a memory key. Never appears inside an id.
pub const KEY_SEPARATOR: char = '|';

/// One of the twelve game icons.
///
/// Variants are declared in the alphabetical order of their ids, so the
/// derived `Ord` matches a sort of the textual ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symbol {
    Adidas,
    ClosedBox,
    DSlant,
    DV,
    DWings,
    Ninja,
    OpenBox,
    Ramp,
    TWings,
    V,
    VTrap,
    X,
}

impl Symbol {
    pub const ALL: [Symbol; 12] = [
        Symbol::Adidas,
        Symbol::ClosedBox,
        Symbol::DSlant,
        Symbol::DV,
        Symbol::DWings,
        Symbol::Ninja,
        Symbol::OpenBox,
        Symbol::Ramp,
        Symbol::TWings,
        Symbol::V,
        Symbol::VTrap,
        Symbol::X,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Symbol::Adidas => "adidas",
            Symbol::ClosedBox => "closed-box",
            Symbol::DSlant => "d-slant",
            Symbol::DV => "d-v",
            Symbol::DWings => "d-wings",
            Symbol::Ninja => "ninja",
            Symbol::OpenBox => "open-box",
            Symbol::Ramp => "ramp",
            Symbol::TWings => "t-wings",
            Symbol::V => "v",
            Symbol::VTrap => "v-trap",
            Symbol::X => "x",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Symbol {
    type Err = FloppyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Symbol::ALL
            .iter()
            .copied()
            .find(|sym| sym.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FloppyError::UnknownSymbol(wanted.to_string()))
    }
}

/// An ordered run of four symbols taken from one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence(pub [Symbol; SEQUENCE_LEN]);

impl Sequence {
    pub fn new(symbols: [Symbol; SEQUENCE_LEN]) -> Self {
        Self(symbols)
    }

    pub fn symbols(&self) -> &[Symbol; SEQUENCE_LEN] {
        &self.0
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.0.contains(&symbol)
    }

    /// Canonical memory key. Order-sensitive: permutations give different keys.
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(SEQUENCE_LEN * 8);
        for (i, sym) in self.0.iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(sym.id());
        }
        key
    }

    /// Inverse of [`Sequence::key`].
    pub fn from_key(key: &str) -> Result<Self, FloppyError> {
        let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        if parts.len() != SEQUENCE_LEN {
            return Err(FloppyError::UnknownSymbol(key.to_string()));
        }
        let mut symbols = [Symbol::Adidas; SEQUENCE_LEN];
        for (slot, part) in symbols.iter_mut().zip(parts) {
            *slot = part.parse()?;
        }
        Ok(Self(symbols))
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sorted_in_declaration_order() {
        let ids: Vec<&str> = Symbol::ALL.iter().map(|s| s.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn ids_never_contain_the_separator() {
        assert!(Symbol::ALL.iter().all(|s| !s.id().contains(KEY_SEPARATOR)));
    }

    #[test]
    fn parse_accepts_ids_and_rejects_strangers() {
        assert_eq!("closed-box".parse::<Symbol>().unwrap(), Symbol::ClosedBox);
        assert_eq!(" D-V ".parse::<Symbol>().unwrap(), Symbol::DV);
        assert!(matches!(
            "pyramid".parse::<Symbol>(),
            Err(FloppyError::UnknownSymbol(s)) if s == "pyramid"
        ));
    }

    #[test]
    fn key_is_order_sensitive() {
        let a = Sequence::new([Symbol::Ramp, Symbol::V, Symbol::X, Symbol::DWings]);
        let b = Sequence::new([Symbol::V, Symbol::Ramp, Symbol::X, Symbol::DWings]);
        assert_eq!(a.key(), "ramp|v|x|d-wings");
        assert_ne!(a.key(), b.key());
        assert_eq!(Sequence::from_key(&a.key()).unwrap(), a);
    }

    #[test]
    fn from_key_rejects_short_keys() {
        assert!(Sequence::from_key("ramp|v|x").is_err());
    }
}
