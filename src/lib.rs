// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod learning;
pub mod logging;
pub mod memory;
pub mod persistence;

pub use crate::core::engine::OracleEngine;
pub use crate::core::inference::{InferenceEngine, InferenceResult};
pub use crate::core::types::{Sequence, Symbol};
pub use crate::error::{FloppyError, Result};
pub use crate::memory::Memory;
pub use crate::persistence::MemoryStore;
