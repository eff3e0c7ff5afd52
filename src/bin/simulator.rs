// Line protocol for an external front end: one command per stdin line,
// one JSON reply per stdout line. Logs go to a file since stdout is taken.
use clap::Parser;
use floppy_core::config::{Config, ConfigArgs};
use floppy_core::core::inference::Status;
use floppy_core::{logging, Memory, OracleEngine, Symbol};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "floppy_simulator", version, about = "Line-protocol driver for the floppy engine")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Directory for the log file.
    #[arg(long, value_name = "DIR", default_value = "target")]
    log_dir: PathBuf,
}

#[derive(Serialize, Default)]
struct Reply {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    committed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<Memory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<StateView>,
}

#[derive(Serialize)]
struct StateView {
    status: Status,
    selected: Vec<Symbol>,
    history: Vec<Symbol>,
    locked: bool,
    candidates: Vec<String>,
    confidence: f64,
    best: Option<String>,
    best_consistent: bool,
    locked_positions: Vec<Option<Symbol>>,
    impossible: Vec<Symbol>,
    /// Per position: (symbol, share of total weight), heaviest first.
    positions: Vec<Vec<(Symbol, f64)>>,
    saved_games: u64,
}

impl StateView {
    fn capture(engine: &OracleEngine) -> Self {
        let result = engine.result();
        let selection = engine.selection();
        Self {
            status: result.status(),
            selected: selection.selected().iter().copied().collect(),
            history: selection.history().to_vec(),
            locked: selection.is_locked(),
            candidates: result.candidates.iter().map(|c| c.sequence().key()).collect(),
            confidence: result.confidence,
            best: result.best_sequence.map(|s| s.key()),
            best_consistent: result.best_is_consistent(),
            locked_positions: result.locked_positions().to_vec(),
            impossible: engine
                .catalog()
                .symbols()
                .iter()
                .copied()
                .filter(|&s| result.is_impossible(s))
                .collect(),
            positions: (0..result.position_stats.len())
                .map(|pos| {
                    result
                        .ranked(pos)
                        .into_iter()
                        .map(|(s, w)| (s, result.share(w)))
                        .collect()
                })
                .collect(),
            saved_games: engine.memory().total,
        }
    }
}

impl Reply {
    fn state(engine: &OracleEngine) -> Self {
        Self {
            ok: true,
            state: Some(StateView::capture(engine)),
            ..Default::default()
        }
    }

    fn failed(engine: &OracleEngine, error: impl ToString) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
            state: Some(StateView::capture(engine)),
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli.config)?;
    let _log_guard = logging::init_file(&cli.log_dir, &config.log_level)?;
    tracing::info!(store = %config.store_path.display(), strategy = %config.strategy, "simulator starting");

    let mut engine = OracleEngine::from_config(&config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        tracing::debug!(input = %input, "<-");
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("").to_ascii_uppercase();
        let arg = parts.next();

        let reply = match command.as_str() {
            "" => continue,
            "EXIT" => break,
            "STATE" => Reply::state(&engine),
            "TOGGLE" => match arg.map(str::parse::<Symbol>) {
                Some(Ok(symbol)) => {
                    if engine.selection().is_locked() {
                        Reply::failed(&engine, "selection is locked")
                    } else {
                        engine.toggle(symbol);
                        Reply::state(&engine)
                    }
                }
                Some(Err(e)) => Reply::failed(&engine, e),
                None => Reply::failed(&engine, "TOGGLE needs a symbol id"),
            },
            "UNDO" => {
                engine.undo();
                Reply::state(&engine)
            }
            "RESET" => {
                engine.reset();
                Reply::state(&engine)
            }
            "LOCK" => {
                if engine.lock() {
                    Reply::state(&engine)
                } else {
                    Reply::failed(&engine, "no guaranteed sequence to lock")
                }
            }
            "UNLOCK" => {
                engine.unlock();
                Reply::state(&engine)
            }
            "CONFIRM" => match engine.confirm() {
                Ok(Some(seq)) => Reply {
                    committed: Some(seq.key()),
                    ..Reply::state(&engine)
                },
                Ok(None) => Reply::failed(&engine, "no guaranteed sequence to confirm"),
                Err(e) => Reply::failed(&engine, e),
            },
            "EXPORT" => match arg {
                Some(path) => match engine.export_to(Path::new(path)) {
                    Ok(()) => Reply::state(&engine),
                    Err(e) => Reply::failed(&engine, e),
                },
                None => Reply {
                    ok: true,
                    snapshot: Some(engine.memory().clone()),
                    ..Default::default()
                },
            },
            "IMPORT" => match arg {
                Some(path) => match engine.import_from(Path::new(path)) {
                    Ok(_) => Reply::state(&engine),
                    Err(e) => Reply::failed(&engine, format!("import failed: {}", e)),
                },
                None => Reply::failed(&engine, "IMPORT needs a file path"),
            },
            "CLEAR" => match engine.clear_memory() {
                Ok(_) => Reply::state(&engine),
                Err(e) => Reply::failed(&engine, e),
            },
            other => Reply::failed(&engine, format!("unknown command `{}`", other)),
        };

        let json = serde_json::to_string(&reply)?;
        tracing::debug!(reply = %json, "->");
        writeln!(stdout, "{}", json)?;
        stdout.flush()?;
    }

    tracing::info!("simulator shutting down");
    Ok(())
}
