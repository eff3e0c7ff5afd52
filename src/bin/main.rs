use anyhow::Context;
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use floppy_core::config::{Config, ConfigArgs};
use floppy_core::core::inference::Status;
use floppy_core::{logging, OracleEngine, Symbol};
use std::io::{stdin, stdout, Write};
use std::path::Path;

const DEFAULT_EXPORT: &str = "beast_floppy_memory.json";

/// Interactive helper for the beast floppy symbol puzzle.
#[derive(Debug, Parser)]
#[command(name = "floppy_engine", version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli.config)?;
    logging::init_stderr(&config.log_level);

    let mut engine = OracleEngine::from_config(&config);
    let mut notice = format!(
        "Memory: {} ({} strategy)",
        config.store_path.display(),
        engine.strategy()
    );

    loop {
        print_ui(&engine, &notice)?;
        notice.clear();

        let mut input = String::new();
        if stdin().read_line(&mut input).context("reading stdin")? == 0 {
            break;
        }
        let mut parts = input.split_whitespace();
        let Some(cmd) = parts.next() else { continue };
        let arg = parts.next();

        match cmd {
            "exit" | "quit" | "q" => break,
            "undo" | "u" => {
                engine.undo();
            }
            "reset" | "r" => {
                engine.reset();
            }
            "lock" => {
                if !engine.lock() {
                    notice = "Lock needs a guaranteed sequence.".into();
                }
            }
            "unlock" => {
                engine.unlock();
            }
            "save" => match engine.confirm() {
                Ok(Some(seq)) => notice = format!("Saved {}.", seq),
                Ok(None) => notice = "Save needs a guaranteed sequence.".into(),
                Err(e) => notice = format!("Save failed: {}", e),
            },
            "export" if arg == Some("-") => {
                notice = match engine.export_json() {
                    Ok(json) => json,
                    Err(e) => format!("Export failed: {}", e),
                };
            }
            "export" => {
                let path = Path::new(arg.unwrap_or(DEFAULT_EXPORT));
                notice = match engine.export_to(path) {
                    Ok(()) => format!("Exported to {}.", path.display()),
                    Err(e) => format!("Export failed: {}", e),
                };
            }
            "import" => {
                let path = Path::new(arg.unwrap_or(DEFAULT_EXPORT));
                notice = match engine.import_from(path) {
                    Ok(_) => format!("Imported {}.", path.display()),
                    Err(e) => format!("Import failed: {}", e),
                };
            }
            "clear" => {
                if ask("Clear all saved memory? [y/N] ")? {
                    notice = match engine.clear_memory() {
                        Ok(_) => "Memory cleared.".into(),
                        Err(e) => format!("Clear failed: {}", e),
                    };
                }
            }
            sym => match sym.parse::<Symbol>() {
                Ok(symbol) if engine.selection().is_locked() => {
                    notice = format!("Locked; reset before tapping {}.", symbol);
                }
                Ok(symbol) => {
                    engine.toggle(symbol);
                }
                Err(e) => notice = e.to_string(),
            },
        }
    }
    Ok(())
}

fn ask(question: &str) -> anyhow::Result<bool> {
    print!("{}", question);
    stdout().flush()?;
    let mut answer = String::new();
    stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn pct(p: f64) -> String {
    format!("{}%", (p * 100.0).round() as u32)
}

fn ordinal(n: usize) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn print_ui(engine: &OracleEngine, notice: &str) -> anyhow::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let result = engine.result();
    let catalog = engine.catalog();
    let selection = engine.selection();
    let n = result.len();

    println!("{}", "Beast Floppy Oracle".bold());
    println!("---------------------------------------------------------------");
    println!("Type a symbol id to tap it. Commands: undo, reset, lock, unlock,");
    println!("save, export [file|-], import [file], clear, exit.\n");

    let mut pills = vec![
        format!("{} selected", selection.len()),
        format!("{} saved games", engine.memory().total),
    ];
    if result.status() != Status::TooMany {
        pills.push(format!("{} possible sequence{}", n, if n == 1 { "" } else { "s" }));
        if n > 0 {
            pills.push(format!("Confidence {}", pct(result.confidence)));
        }
    }
    println!("[{}]", pills.join("] ["));
    if selection.is_locked() {
        println!("{}", "LOCKED".green().bold());
    }

    let line = match result.status() {
        Status::Idle => "Select 1-4 symbols to begin...".to_string(),
        Status::TooMany => "Too many selected (max 4). The model assumes exactly 4 spawned."
            .red()
            .to_string(),
        Status::NoMatch => "No valid sequences remain. Undo/reset and re-tap.".red().to_string(),
        Status::Guaranteed => "Guaranteed sequence found. You can lock it or save it."
            .green()
            .to_string(),
        Status::Ambiguous => {
            "Not guaranteed yet, probabilities below (weighted by your history).".to_string()
        }
    };
    println!("{}\n", line);

    for &sym in catalog.symbols() {
        let label = format!("{:<12}", sym.id());
        if selection.contains(sym) {
            print!("{} ", label.black().on_yellow());
        } else if result.is_impossible(sym) {
            print!("{} ", label.dark_grey());
        } else {
            print!("{} ", label);
        }
    }
    println!("\n");

    if let (true, Some(seq)) = (selection.is_locked(), result.sole_candidate()) {
        let names: Vec<String> = seq.symbols().iter().map(|&s| catalog.label(s)).collect();
        println!("Guaranteed order (1st -> 4th), 100%:");
        println!("  {}", names.join(" -> ").green().bold());
    } else if matches!(result.status(), Status::Guaranteed | Status::Ambiguous) {
        let locked = result.locked_positions();
        for pos in 0..locked.len() {
            let ranked = result.ranked(pos);
            let spread = if locked[pos].is_some() {
                "locked".to_string()
            } else {
                format!("{} options", ranked.len())
            };
            let choices: Vec<String> = ranked
                .iter()
                .take(3)
                .map(|&(s, w)| format!("{} {}", catalog.label(s), pct(result.share(w))))
                .collect();
            println!("{}{} position ({}): {}", pos + 1, ordinal(pos + 1), spread, choices.join(", "));
        }
        if let Some(best) = &result.best_sequence {
            let names: Vec<String> = best.symbols().iter().map(|&s| catalog.label(s)).collect();
            let caveat = if result.best_is_consistent() { "" } else { " (mixed, not a real row)" };
            println!("\nBest gamble right now: {}{}", names.join(" -> ").bold(), caveat);
            println!("Confidence: {} (guaranteed only when 100%)", pct(result.confidence));
        }
    }

    if !notice.is_empty() {
        println!("\n{}", notice.yellow());
    }
    print!("\n> ");
    out.flush()?;
    Ok(())
}
