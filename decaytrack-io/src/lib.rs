//! decaytrack-io: Event files and configuration documents for decaytrack.
//!
//! This crate provides memory-mapped reading of JSON-lines event files,
//! loading of the multi-action and detector documents, and writers for
//! filtered events, decay lists and dZ tables.
//!

pub mod config;
mod error;
mod reader;
mod writer;

pub use config::{DetectorConfig, MultiActionConfig};
pub use error::{Error, Result};
pub use reader::{EventFileReader, MappedFileReader};
pub use writer::DataFileWriter;
