//! Console table and CSV file for the collected rows.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, modifiers};
use portinspector_common::network::device::{ReportRow, SENTINEL};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub fn render_table(rows: &[ReportRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ReportRow::HEADER
            .iter()
            .map(|title| Cell::new(title).add_attribute(Attribute::Bold)),
    );

    for row in rows {
        table.add_row(row.cells().iter().map(|value| {
            if *value == SENTINEL {
                Cell::new(value).fg(Color::DarkGrey)
            } else {
                Cell::new(value)
            }
        }));
    }
    table
}

/// `<hostname>_<timestamp>.csv` inside `dir`.
pub fn csv_path(dir: &Path, hostname: &str, timestamp: &str) -> PathBuf {
    let name: String = hostname
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    dir.join(format!("{name}_{timestamp}.csv"))
}

/// Writes the header even when there are no rows.
pub fn write_csv(path: &Path, rows: &[ReportRow]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    wtr.write_record(ReportRow::HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
