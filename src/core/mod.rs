// src/core/mod.rs

pub mod candidates;
pub mod catalog;
pub mod engine;
pub mod inference;
pub mod selection;
pub mod types;
