//! CSV export and the plain-text summary printed by the CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{CsvRow, PlatformStats, Report, ReportStatus};

pub const CSV_HEADER: [&str; 7] = [
    "Channel",
    "Posts Count",
    "Karma",
    "Impressions",
    "CTR",
    "Likes",
    "Clicks (US)",
];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, cells: &[String]) -> io::Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row_cells(row: &CsvRow) -> Vec<String> {
    vec![
        row.channel.clone(),
        row.posts_count.to_string(),
        opt_cell(row.karma),
        opt_cell(row.impressions),
        row.ctr.map(|c| format!("{c:.2}")).unwrap_or_default(),
        opt_cell(row.likes),
        opt_cell(row.clicks_us),
    ]
}

/// Write the header and one line per row.
///
/// # Errors
///
/// Propagates any write failure from `w`.
pub fn write_csv<W: Write>(mut w: W, rows: &[CsvRow]) -> io::Result<()> {
    let header: Vec<String> = CSV_HEADER.iter().map(ToString::to_string).collect();
    write_row(&mut w, &header)?;
    for row in rows {
        write_row(&mut w, &row_cells(row))?;
    }
    w.flush()
}

/// `weekly_stats_YYYYMMDD.csv` for the report's start date.
#[must_use]
pub fn default_filename(report: &Report) -> String {
    format!("weekly_stats_{}.csv", report.range.start_date().format("%Y%m%d"))
}

/// Export every entry of `report` to a CSV file.
///
/// Relative paths (and the default filename) resolve against the current
/// working directory. Returns the absolute path written.
///
/// # Errors
///
/// Returns any I/O error from resolving the working directory, creating the
/// file or writing it.
pub fn export_csv(report: &Report, filename: Option<&Path>) -> io::Result<PathBuf> {
    let name = filename.map_or_else(|| PathBuf::from(default_filename(report)), Path::to_path_buf);
    let path = if name.is_absolute() {
        name
    } else {
        std::env::current_dir()?.join(name)
    };

    let rows: Vec<CsvRow> = report.platforms.values().map(|e| e.stats.csv_row()).collect();
    let file = File::create(&path)?;
    write_csv(BufWriter::new(file), &rows)?;
    Ok(path)
}

/// `1234567` -> `1,234,567`.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Print the human-readable summary table.
///
/// # Errors
///
/// Propagates any write failure from `w`.
pub fn print_summary<W: Write>(mut w: W, report: &Report) -> io::Result<()> {
    let rule = "=".repeat(80);
    writeln!(w)?;
    writeln!(w, "{rule}")?;
    writeln!(w, "WEEKLY STATS SUMMARY")?;
    writeln!(
        w,
        "Week starting: {}",
        report.range.start_date().format("%B %d, %Y")
    )?;
    writeln!(w, "{rule}")?;

    for (platform, entry) in &report.platforms {
        writeln!(w)?;
        writeln!(w, "{}:", platform.channel_label().to_uppercase())?;
        match entry.status {
            ReportStatus::NotConfigured => writeln!(w, "  (not configured)")?,
            ReportStatus::Failed => writeln!(
                w,
                "  (collection failed: {})",
                entry.error.as_deref().unwrap_or("unknown error")
            )?,
            ReportStatus::Ok | ReportStatus::Manual => {}
        }

        let row = entry.stats.csv_row();
        writeln!(w, "  Posts: {}", row.posts_count)?;
        if let Some(karma) = row.karma {
            writeln!(w, "  Karma: {karma}")?;
        }
        if let Some(impressions) = row.impressions {
            writeln!(w, "  Impressions: {}", thousands(impressions))?;
        }
        if let Some(ctr) = row.ctr {
            writeln!(w, "  CTR: {ctr:.2}%")?;
        }
        if let Some(likes) = row.likes {
            writeln!(w, "  Likes: {}", thousands(likes))?;
        }
        if let Some(clicks) = row.clicks_us {
            writeln!(w, "  Clicks (US): {}", thousands(clicks))?;
        }
        if let PlatformStats::YouTube(yt) = &entry.stats {
            if let Some(subs) = yt.subscribers {
                writeln!(w, "  Subscribers: {}", thousands(subs))?;
            }
        }
    }
    Ok(())
}
