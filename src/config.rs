// File: src/config.rs
//! Runtime configuration shared by both binaries.
//!
//! Resolution order, later wins: built-in defaults, `FLOPPY_STORE_PATH` /
//! `FLOPPY_STRATEGY` / `FLOPPY_LOG`, then command-line flags.

use crate::core::candidates::GenerationStrategy;
use crate::error::Result;
use clap::Args;
use std::path::PathBuf;

pub const STORE_PATH_ENV: &str = "FLOPPY_STORE_PATH";
pub const STRATEGY_ENV: &str = "FLOPPY_STRATEGY";
pub const LOG_ENV: &str = "FLOPPY_LOG";

const APP_DIR: &str = "beast-floppy";
const STORE_FILE: &str = "memory.json";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub strategy: GenerationStrategy,
    pub log_level: String,
}

/// Command-line overrides, flattened into each binary's parser.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Memory file to read and update.
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Candidate generation: `windows` or `subsequences`.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            strategy: GenerationStrategy::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn resolve(args: &ConfigArgs) -> Result<Self> {
        Self::resolve_with(args, |key| std::env::var(key).ok())
    }

    /// Like [`Config::resolve`], reading the environment through `env`.
    pub fn resolve_with(args: &ConfigArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Config::default();

        if let Some(path) = env(STORE_PATH_ENV).filter(|s| !s.is_empty()) {
            cfg.store_path = PathBuf::from(path);
        }
        if let Some(strategy) = env(STRATEGY_ENV).filter(|s| !s.is_empty()) {
            cfg.strategy = strategy.parse()?;
        }
        if let Some(level) = env(LOG_ENV).filter(|s| !s.is_empty()) {
            cfg.log_level = level;
        }

        if let Some(path) = &args.store {
            cfg.store_path = path.clone();
        }
        if let Some(strategy) = &args.strategy {
            cfg.strategy = strategy.parse()?;
        }
        if let Some(level) = &args.log_level {
            cfg.log_level = level.clone();
        }
        Ok(cfg)
    }
}

/// `<data dir>/beast-floppy/memory.json`, falling back to home, then cwd.
pub fn default_store_path() -> PathBuf {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(STORE_FILE);
    path
}
