use anyhow::{Context, Result};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Contractor names wider than this are shortened in console tables.
pub const DISPLAY_NAME_MAX: usize = 68;
/// Characters kept ahead of the ellipsis when shortening.
pub const DISPLAY_NAME_KEPT: usize = 65;

/// Write `rows` to `path` as CSV. The header row comes from the rows'
/// serde field names; an empty slice leaves the file empty.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("cannot create {}", path))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("cannot write a row to {}", path))?;
    }
    wtr.flush()
        .with_context(|| format!("cannot flush {}", path))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("cannot write {}", path))?;
    Ok(())
}

/// Print the first `max_rows` rows as a markdown table.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table);
}

/// Console-only shortening of long contractor names; file output keeps
/// the full name.
pub fn truncate_for_display(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_MAX {
        let kept: String = name.chars().take(DISPLAY_NAME_KEPT).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}
