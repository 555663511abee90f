//! Memory-mapped event file readers.
//!
//! Event files are JSON lines: one [`EventRecord`] per line. Blank lines are
//! ignored.

use crate::{Error, Result};
use decaytrack_core::EventRecord;
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without reading the whole file
/// through a buffer first.
pub struct MappedFileReader {
    mmap: Option<Mmap>,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        // Zero-length files cannot be mapped on every platform
        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
            // This is the standard safety contract for memory mapping.
            #[allow(unsafe_code)]
            Some(unsafe { Mmap::map(&file)? })
        };
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Path the reader was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Non-blank lines of `data` with their 1-based line numbers.
fn record_lines(data: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    data.split(|&b| b == b'\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
}

fn parse_record(line_no: usize, line: &[u8]) -> Result<EventRecord> {
    serde_json::from_slice(line).map_err(|source| Error::InvalidEvent {
        line: line_no,
        source,
    })
}

/// Reader for JSON-lines event files.
pub struct EventFileReader {
    reader: MappedFileReader,
}

impl EventFileReader {
    /// Opens an event file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            reader: MappedFileReader::open(path)?,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    /// Number of event records (non-blank lines).
    #[must_use]
    pub fn event_count(&self) -> usize {
        record_lines(self.reader.as_bytes()).count()
    }

    /// Parses every event, in parallel, preserving file order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidEvent`] for the first malformed line.
    pub fn read_events(&self) -> Result<Vec<EventRecord>> {
        let lines: Vec<(usize, &[u8])> = record_lines(self.reader.as_bytes()).collect();
        let events = lines
            .par_iter()
            .map(|&(line_no, line)| parse_record(line_no, line))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "read {} events from {}",
            events.len(),
            self.reader.path().display()
        );
        Ok(events)
    }

    /// Iterates over events one at a time.
    pub fn iter_events(&self) -> impl Iterator<Item = Result<EventRecord>> + '_ {
        record_lines(self.reader.as_bytes()).map(|(line_no, line)| parse_record(line_no, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TWO_EVENTS: &str = r#"{"merger":{"run":129,"entry":0},"tpc":{"clusters":[],"rps":[]}}

{"merger":{"run":129,"entry":1},"tpc":{"clusters":[{"id":2,"line":{"point":{"x":0.0,"y":0.0,"z":0.0},"direction":{"x":0.0,"y":0.0,"z":1.0}},"voxels":[{"position":{"x":1.0,"y":2.0,"z":3.0},"charge":50.0}],"is_beam_like":true}]}}
"#;

    #[test]
    fn test_mapped_file_reader() {
        let mut file = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..64).collect();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        let reader = MappedFileReader::open(file.path()).unwrap();
        assert_eq!(reader.len(), 64);
        assert!(!reader.is_empty());
        assert_eq!(reader.as_bytes(), &data[..]);
    }

    #[test]
    fn test_event_reader_empty() {
        let file = NamedTempFile::new().unwrap();
        let reader = EventFileReader::open(file.path()).unwrap();
        assert_eq!(reader.file_size(), 0);
        assert_eq!(reader.event_count(), 0);
        assert!(reader.read_events().unwrap().is_empty());
    }

    #[test]
    fn test_event_reader_parses_lines() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TWO_EVENTS.as_bytes()).unwrap();
        file.flush().unwrap();

        let reader = EventFileReader::open(file.path()).unwrap();
        assert_eq!(reader.event_count(), 2);

        let events = reader.read_events().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].tpc.is_empty());
        assert_eq!(events[1].merger.entry, 1);
        let cluster = &events[1].tpc.clusters[0];
        assert_eq!(cluster.id, 2);
        assert!(cluster.is_beam_like);
        assert_relative_eq!(cluster.voxels[0].charge, 50.0);

        let streamed: Vec<_> = reader.iter_events().collect::<Result<_>>().unwrap();
        assert_eq!(streamed, events);
    }

    #[test]
    fn test_event_reader_reports_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"merger":{{"run":1,"entry":0}},"tpc":{{}}}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        file.flush().unwrap();

        let reader = EventFileReader::open(file.path()).unwrap();
        match reader.read_events() {
            Err(Error::InvalidEvent { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected invalid event error, got {other:?}"),
        }
    }
}
