//! Hand-history export command.
//!
//! Converts a JSONL hand-history file into CSV, a pretty-printed JSON
//! array, or a SQLite database, for downstream analysis tooling that
//! doesn't want to parse JSONL itself.

use crate::error::CliError;
use crate::history::load_records;
use crate::ui;
use std::io::Write;

pub fn handle_export_command(
    input: String,
    output: String,
    format: String,
    _out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let records = load_records(&input).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to read {}: {}", input, e));
        CliError::InvalidInput(e)
    })?;

    match format.as_str() {
        f if f.eq_ignore_ascii_case("csv") => export_csv(&records, &output, err),
        f if f.eq_ignore_ascii_case("json") => export_json(&records, &output, err),
        f if f.eq_ignore_ascii_case("sqlite") => export_sqlite(&records, &output, err),
        _ => Err(CliError::InvalidInput(format!(
            "Unsupported format: {}",
            format
        ))),
    }
}

fn ensure_parent(output: &str, err: &mut dyn Write) -> Result<(), CliError> {
    if let Some(parent) = std::path::Path::new(output).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            let _ = ui::write_error(
                err,
                &format!("Failed to create parent directory for {}: {}", output, e),
            );
            CliError::Io(e)
        })?;
    }
    Ok(())
}

fn export_csv(
    records: &[crate::history::HandHistoryRecord],
    output: &str,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    ensure_parent(output, err)?;
    let mut w = std::fs::File::create(output)
        .map(std::io::BufWriter::new)
        .map_err(|e| {
            let _ = ui::write_error(err, &format!("Failed to write {}: {}", output, e));
            CliError::Io(e)
        })?;
    writeln!(w, "hand_id,game_id,level,pot,actions,winners,recorded_at")?;
    for record in records {
        let winners = record
            .winners()
            .iter()
            .map(|(p, amount)| format!("{}:{}", record.name_of(*p), amount))
            .collect::<Vec<_>>()
            .join("|");
        writeln!(
            w,
            "{},{},{},{},{},{},{}",
            record.hand.id,
            record.game_id,
            record.hand.level,
            record.hand.pot,
            record.actions.len(),
            winners,
            record.recorded_at.to_rfc3339(),
        )?;
    }
    Ok(())
}

fn export_json(
    records: &[crate::history::HandHistoryRecord],
    output: &str,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    ensure_parent(output, err)?;
    let s = serde_json::to_string_pretty(records).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to serialize JSON: {}", e));
        CliError::InvalidInput(e.to_string())
    })?;
    std::fs::write(output, s).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to write {}: {}", output, e));
        CliError::Io(e)
    })?;
    Ok(())
}

fn export_sqlite(
    records: &[crate::history::HandHistoryRecord],
    output: &str,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    ensure_parent(output, err)?;
    let mut conn = rusqlite::Connection::open(output).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to open {}: {}", output, e));
        CliError::InvalidInput(format!("Failed to open {}: {}", output, e))
    })?;

    let tx = conn
        .transaction()
        .map_err(|e| CliError::InvalidInput(format!("Failed to start transaction: {}", e)))?;

    tx.execute("DROP TABLE IF EXISTS hands", [])
        .map_err(|e| CliError::InvalidInput(format!("Failed to reset schema: {}", e)))?;
    tx.execute(
        "CREATE TABLE hands (
            hand_id TEXT NOT NULL PRIMARY KEY,
            game_id TEXT NOT NULL,
            level INTEGER NOT NULL,
            pot INTEGER NOT NULL,
            actions INTEGER NOT NULL,
            winners_json TEXT NOT NULL,
            recorded_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| CliError::InvalidInput(format!("Failed to create schema: {}", e)))?;

    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO hands (hand_id, game_id, level, pot, actions, winners_json, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|e| CliError::InvalidInput(format!("Failed to prepare insert: {}", e)))?;

        for record in records {
            let winners_json = serde_json::to_string(record.winners())
                .map_err(|e| CliError::InvalidInput(e.to_string()))?;
            stmt.execute(rusqlite::params![
                record.hand.id.to_string(),
                record.game_id.to_string(),
                record.hand.level,
                record.hand.pot as i64,
                record.actions.len() as i64,
                winners_json,
                record.recorded_at.to_rfc3339(),
            ])
            .map_err(|e| {
                let _ = ui::write_error(err, &format!("Failed to insert record: {}", e));
                CliError::InvalidInput(format!("Failed to insert record: {}", e))
            })?;
        }
    }

    tx.commit()
        .map_err(|e| CliError::InvalidInput(format!("Failed to commit: {}", e)))?;
    Ok(())
}
