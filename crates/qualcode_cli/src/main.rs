//! CLI smoke entry point.
//!
//! # Responsibility
//! - Run a short scripted coding session against `qualcode_core`.
//! - Print derived analytics and write the REFI-QDA export plus a JSON
//!   snapshot for inspection.
//!
//! Usage: `qualcode_cli [config.json] [out_dir]`. Set `QUALCODE_LOG_DIR` to an
//! absolute path to enable file logging.

use log::info;
use qualcode_core::{
    default_log_level, init_logging, CodingStore, MemoType, NewCode, NewMemo, NewRelation,
    RelationType, RowId, StoreConfig, EXPORT_FILE_NAME,
};
use std::error::Error;
use std::path::PathBuf;

const SNAPSHOT_FILE_NAME: &str = "coding.snapshot.json";

fn main() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("QUALCODE_LOG_DIR") {
        init_logging(default_log_level().as_str(), &log_dir)?;
    }

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path != "-" => StoreConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        _ => StoreConfig::default(),
    };
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let mut store = CodingStore::new(config)?;
    store.set_coder(Some("cli".to_string()));
    run_session(&mut store)?;

    println!("qualcode_core version={}", qualcode_core::core_version());
    for code in store.codes_with_frequency() {
        println!("code id={} name={:?} frequency={}", code.id, code.name, code.frequency);
    }
    for (row, codes) in store.assignments_by_row() {
        println!("row {row}: {}", codes.join(","));
    }
    let saturation = store.saturation();
    println!(
        "saturation total={} recent_new={} trend={}",
        saturation.total_codes, saturation.recent_new_codes, saturation.trend
    );

    std::fs::create_dir_all(&out_dir)?;
    let export_path = out_dir.join(EXPORT_FILE_NAME);
    std::fs::write(&export_path, store.export_refi_qda_bytes()?)?;
    let snapshot_path = out_dir.join(SNAPSHOT_FILE_NAME);
    std::fs::write(&snapshot_path, serde_json::to_vec_pretty(&store.snapshot())?)?;
    info!(
        "event=cli_export module=cli status=ok export={} snapshot={}",
        export_path.display(),
        snapshot_path.display()
    );
    println!("wrote {}", export_path.display());
    println!("wrote {}", snapshot_path.display());
    Ok(())
}

fn run_session(store: &mut CodingStore) -> Result<(), Box<dyn Error>> {
    let access = store.create_code(NewCode::named("Access to care"))?;
    let cost = store.create_code(NewCode::named("Cost").with_parent(access.id.clone()))?;
    let trust = store.create_code(NewCode::named("Trust"))?;

    store.apply_code(&access.id, &rows(&[1, 2, 3, 4]))?;
    store.apply_code(&cost.id, &rows(&[2, 3]))?;
    store.apply_code(&trust.id, &[RowId::Num(3), RowId::from("interview-7")])?;
    store.remove_code(&access.id, &rows(&[4]))?;

    store.create_relation(
        NewRelation::new(cost.id.clone(), trust.id.clone(), RelationType::Causes).with_strength(0.6),
    )?;
    store.create_memo(
        NewMemo::new("Cost talk tends to precede distrust.", MemoType::Theoretical)
            .linked_to_code(cost.id.clone())
            .linked_to_code(trust.id.clone())
            .tagged("hypothesis"),
    )?;
    Ok(())
}

fn rows(ids: &[i64]) -> Vec<RowId> {
    ids.iter().copied().map(RowId::Num).collect()
}
