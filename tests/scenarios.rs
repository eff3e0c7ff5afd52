//! End-to-end scenarios against a real memory file.

use floppy_core::core::candidates::GenerationStrategy;
use floppy_core::core::inference::{Rejection, Status};
use floppy_core::{FloppyError, InferenceResult, Memory, MemoryStore, OracleEngine, Sequence};
use std::fs;
use tempfile::tempdir;

use floppy_core::Symbol::*;

fn engine_in(dir: &std::path::Path, strategy: GenerationStrategy) -> OracleEngine {
    OracleEngine::new(MemoryStore::open(dir.join("memory.json")), strategy)
}

#[test]
fn empty_selection_covers_universe_under_both_strategies() {
    let dir = tempdir().unwrap();

    let windows = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);
    assert_eq!(windows.result().len(), 18);
    assert!((windows.result().confidence - 1.0 / 18.0).abs() < 1e-12);

    let subs = engine_in(dir.path(), GenerationStrategy::OrderedSubsequences);
    assert_eq!(subs.result().len(), 90);
    assert!((subs.result().confidence - 1.0 / 90.0).abs() < 1e-12);
}

#[test]
fn single_row_symbol_narrows_to_that_row() {
    let dir = tempdir().unwrap();
    let mut engine = engine_in(dir.path(), GenerationStrategy::OrderedSubsequences);
    let result = engine.toggle(TWings);
    // C(5,3) subsequences of row 3 keep t-wings.
    assert_eq!(result.len(), 10);
    assert!(result.candidates.iter().all(|c| c.placement.row == 2));
    assert!(result.candidates.iter().all(|c| c.sequence().contains(TWings)));
}

#[test]
fn confirm_then_reselect_raises_confidence() {
    let dir = tempdir().unwrap();
    let mut engine = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);

    // open-box + v leaves five windows across rows 1 and 4.
    engine.toggle(OpenBox);
    engine.toggle(V);
    let before = engine.result().clone();
    assert_eq!(before.len(), 5);

    engine.reset();
    for sym in [Ramp, ClosedBox, OpenBox, V] {
        engine.toggle(sym);
    }
    assert!(engine.result().is_guaranteed());
    let committed = engine.confirm().unwrap().unwrap();
    assert_eq!(committed, Sequence::new([Ramp, ClosedBox, OpenBox, V]));

    engine.reset();
    engine.toggle(OpenBox);
    engine.toggle(V);
    let after = engine.result().clone();

    let weight_of = |r: &InferenceResult| {
        r.candidates
            .iter()
            .find(|c| *c.sequence() == committed)
            .map(|c| c.weight)
            .unwrap()
    };
    assert_eq!(weight_of(&before), 1);
    assert_eq!(weight_of(&after), 2);
    assert!(after.share(weight_of(&after)) > before.share(weight_of(&before)));
    assert!(after.confidence > before.confidence);
    assert!((after.confidence - 2.0 / 6.0).abs() < 1e-12);

    assert_eq!(engine.store().load().count(&committed), 1);
}

#[test]
fn confirmed_sequence_outweighs_its_row_neighbour() {
    let dir = tempdir().unwrap();
    let mut engine = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);
    engine.toggle(TWings);
    engine.toggle(Adidas);
    assert_eq!(engine.result().confidence, 1.0);
    engine.confirm().unwrap();
    engine.reset();
    engine.toggle(TWings);
    let result = engine.result();
    // Two windows remain; the confirmed one now weighs 2 of 3.
    assert_eq!(result.total_weight, 3);
    assert!((result.confidence - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn too_many_selected_ignores_memory() {
    let dir = tempdir().unwrap();
    let mut engine = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);
    engine.import_str(r#"{"sequences": {"ramp|closed-box|open-box|v": 10}}"#).unwrap();
    for sym in [Ramp, ClosedBox, OpenBox, V, X] {
        engine.toggle(sym);
    }
    let result = engine.result();
    assert_eq!(result.reason, Some(Rejection::TooManySelected));
    assert_eq!(result.len(), 0);
    assert_eq!(result.confidence, 0.0);

    // Undo brings the engine back to a normal outcome.
    assert_eq!(engine.undo().status(), Status::Guaranteed);
}

#[test]
fn corrupt_store_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memory.json");
    fs::write(&path, "[\"not\", \"an\", \"object\"]").unwrap();
    let engine = OracleEngine::new(MemoryStore::open(&path), GenerationStrategy::ContiguousWindows);
    assert_eq!(engine.memory(), &Memory::new());
    assert!(engine.result().candidates.iter().all(|c| c.weight == 1));
}

#[test]
fn invalid_import_leaves_store_bit_for_bit() {
    let dir = tempdir().unwrap();
    let mut engine = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);
    engine.toggle(TWings);
    engine.toggle(Adidas);
    engine.confirm().unwrap();
    let before_mem = engine.memory().clone();
    let before_file = fs::read(engine.store().path()).unwrap();

    let err = engine.import_str("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, FloppyError::NotAnObject));
    assert_eq!(engine.memory(), &before_mem);
    assert_eq!(fs::read(engine.store().path()).unwrap(), before_file);
}

#[test]
fn export_then_import_into_empty_store_round_trips() {
    let dir = tempdir().unwrap();
    let mut source = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);
    source.toggle(TWings);
    source.toggle(Adidas);
    source.confirm().unwrap();
    source.confirm().unwrap();
    source
        .import_str(r#"{"sequences": {"v|v-trap|x|closed-box": 4, "legacy|key": 1}}"#)
        .unwrap();

    let export_path = dir.path().join("export.json");
    source.export_to(&export_path).unwrap();
    let text = fs::read_to_string(&export_path).unwrap();
    assert!(text.contains("\n  \"sequences\""), "pretty printed: {text}");

    let other = tempdir().unwrap();
    let mut target = engine_in(other.path(), GenerationStrategy::ContiguousWindows);
    target.import_from(&export_path).unwrap();
    assert_eq!(target.memory(), source.memory());
    assert_eq!(target.memory().total, 7);
}

#[test]
fn locked_positions_report_certain_slots() {
    let dir = tempdir().unwrap();
    let mut engine = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);
    // Ramp + v-trap: only row 5, start 0.
    engine.toggle(Ramp);
    let result = engine.toggle(VTrap);
    assert_eq!(
        result.locked_positions(),
        [Some(Ramp), Some(VTrap), Some(OpenBox), Some(ClosedBox)]
    );
}

#[test]
fn confirming_a_saturated_count_stays_saturated() {
    let dir = tempdir().unwrap();
    let mut engine = engine_in(dir.path(), GenerationStrategy::ContiguousWindows);
    engine
        .import_str(r#"{"sequences": {"t-wings|ninja|d-v|adidas": 1e30}}"#)
        .unwrap();
    let seq = Sequence::new([TWings, Ninja, DV, Adidas]);
    assert_eq!(engine.memory().count(&seq), u64::MAX);

    engine.toggle(TWings);
    engine.toggle(Adidas);
    assert_eq!(engine.confirm().unwrap(), Some(seq));
    assert_eq!(engine.memory().count(&seq), u64::MAX);
    assert_eq!(engine.store().load().count(&seq), u64::MAX);
}
