//! Writers for filtered events and analysis outputs.

use crate::Result;
use decaytrack_actions::{DzEntry, Histogram1D};
use decaytrack_core::EventRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Buffered writer for event files and analysis tables.
pub struct DataFileWriter {
    writer: BufWriter<File>,
}

impl DataFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Appends events as JSON lines.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_events_jsonl(&mut self, events: &[EventRecord]) -> Result<()> {
        for event in events {
            serde_json::to_writer(&mut self.writer, event)?;
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes `run entry` for every event that still has clusters.
    ///
    /// Returns the number of lines written.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_decay_list(&mut self, events: &[EventRecord]) -> Result<usize> {
        let mut written = 0;
        for event in events.iter().filter(|event| !event.tpc.is_empty()) {
            writeln!(self.writer, "{}", event.merger)?;
            written += 1;
        }
        Ok(written)
    }

    /// Writes per-event dZ values as CSV.
    ///
    /// The `dz_length` column is only present when a drift factor is given.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_dz_csv(&mut self, entries: &[DzEntry], drift_factor: Option<f64>) -> Result<()> {
        match drift_factor {
            Some(_) => writeln!(self.writer, "run,entry,dz,dz_length")?,
            None => writeln!(self.writer, "run,entry,dz")?,
        }
        for e in entries {
            match drift_factor {
                Some(drift) => writeln!(
                    self.writer,
                    "{},{},{},{}",
                    e.merger.run,
                    e.merger.entry,
                    e.dz,
                    e.dz_length(drift)
                )?,
                None => writeln!(self.writer, "{},{},{}", e.merger.run, e.merger.entry, e.dz)?,
            }
        }
        Ok(())
    }

    /// Writes a histogram as CSV, one row per bin.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_histogram_csv(&mut self, hist: &Histogram1D) -> Result<()> {
        writeln!(self.writer, "bin_low,bin_high,count")?;
        for (low, high, count) in hist.iter_bins() {
            writeln!(self.writer, "{low},{high},{count}")?;
        }
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
