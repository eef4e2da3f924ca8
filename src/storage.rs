use crate::models::Assignment;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Neutralize cells a spreadsheet would evaluate as a formula.
fn safe_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save assignments as CSV with header. Unnamed lines get an empty name cell.
pub fn save_csv<P: AsRef<Path>>(assignments: &[Assignment], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("line", "number", "color", "name"))?;
    for a in assignments {
        wtr.serialize((
            a.line,
            a.number,
            a.color.to_string(),
            a.name.as_deref().map(safe_cell).unwrap_or_default(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save assignments as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(assignments: &[Assignment], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(assignments)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
