//! Append-only CSV summary, one row per workload per run.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use tracing::debug;

use crate::stats::Aggregate;

pub const DEFAULT_PATH: &str = "results/run.csv";
pub const HEADER: [&str; 7] = ["id", "title", "unit", "avg", "min", "max", "index"];
const DELIMITER: char = ',';

#[derive(Clone, Copy, Debug)]
pub struct ReportRow<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub unit: &'a str,
    pub aggregate: &'a Aggregate,
}

/// Replaces the field delimiter inside free text so the row keeps its shape.
pub fn sanitize_title(title: &str) -> String {
    title.replace(DELIMITER, " ")
}

/// CSV sink that never fails the caller: when the destination cannot be
/// opened it stays inert and every write is dropped.
pub struct CsvReporter {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
}

impl CsvReporter {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let writer = match open_writer(&path) {
            Ok(w) => Some(w),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "result file unavailable");
                None
            }
        };
        Self { path, writer }
    }

    /// Reporter that discards every row.
    pub fn disabled() -> Self {
        Self {
            path: PathBuf::new(),
            writer: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&mut self, row: &ReportRow<'_>) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        if let Err(e) = write_row(writer, row) {
            debug!(path = %self.path.display(), error = %e, "dropping result row");
        }
    }

    pub fn close(mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                debug!(path = %self.path.display(), error = %e, "flush on close failed");
            }
        }
    }
}

fn open_writer(path: &Path) -> io::Result<csv::Writer<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let empty = file.metadata()?.len() == 0;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(file);
    if empty {
        writer.write_record(HEADER)?;
        writer.flush()?;
    }
    Ok(writer)
}

fn write_row(writer: &mut csv::Writer<File>, row: &ReportRow<'_>) -> io::Result<()> {
    let a = row.aggregate;
    let title = sanitize_title(row.title);
    let numbers = [a.average, a.minimum, a.maximum, a.index].map(|v| format!("{v:.6}"));
    writer.write_record([
        row.id,
        title.as_str(),
        row.unit,
        numbers[0].as_str(),
        numbers[1].as_str(),
        numbers[2].as_str(),
        numbers[3].as_str(),
    ])?;
    writer.flush()
}
