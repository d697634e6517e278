use crate::core::{SongRecord, Summary};
use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Receives the final, deduplicated records of a run.
pub trait RecordSink {
    fn write(&mut self, records: &[SongRecord], summary: &Summary) -> Result<()>;

    /// Called instead of `write` when no music was found.
    fn no_content(&mut self, summary: &Summary) -> Result<()>;
}

/// Writes a header row followed by one row per record.
pub fn write_csv<W: io::Write>(writer: W, records: &[SongRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub struct CsvSink {
    pub path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvSink {
    fn write(&mut self, records: &[SongRecord], summary: &Summary) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        write_csv(file, records)?;

        info!("Wrote {} rows to {}", records.len(), self.path.display());
        println!(
            "\nSuccess! Found {} music videos out of {} liked videos.",
            summary.unique, summary.total
        );
        println!("Results saved to {}", self.path.display());
        Ok(())
    }

    fn no_content(&mut self, summary: &Summary) -> Result<()> {
        info!("Nothing to write out of {} liked videos", summary.total);
        println!("\nNo music content identified.");
        Ok(())
    }
}
