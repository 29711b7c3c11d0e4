//! Plain-text violation report.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the report inside the report directory.
pub const REPORT_FILE: &str = "report.txt";

/// `ctime(3)` layout, e.g. `Thu Jul  3 21:42:10 2008`.
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Write one `<timestamp>    ----    <path>` line per violation.
pub fn write_report<W: Write>(out: &mut W, violations: &[PathBuf], at: DateTime<Local>) -> Result<()> {
    let stamp = at.format(CTIME_FORMAT).to_string();
    for path in violations {
        writeln!(out, "{}    ----    {}", stamp, path.display())?;
    }
    out.flush()?;
    Ok(())
}

/// Create (or replace) `report.txt` in `dir` and return its path.
pub fn write_report_file(dir: &Path, violations: &[PathBuf]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    let path = dir.join(REPORT_FILE);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, violations, Local::now())
        .with_context(|| format!("Failed to write report file {}", path.display()))?;
    Ok(path)
}
