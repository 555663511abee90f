//! Configuration documents.
//!
//! Two JSON documents drive a run:
//! - the multi-action document, one block per action keyed by action name;
//! - the detector document, of which only the `Merger` block is read here.

use crate::{Error, Result};
use decaytrack_actions::correlate::{self, CorrelateConfig};
use decaytrack_actions::{ActionChain, ActionRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Multi-action document: action name -> configuration block.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiActionConfig {
    document: Value,
}

impl MultiActionConfig {
    /// Loads the document from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let document: Value = serde_json::from_reader(BufReader::new(file))?;
        Self::from_value(document)
    }

    /// Parses the document from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    fn from_value(document: Value) -> Result<Self> {
        if !document.is_object() {
            return Err(Error::InvalidConfig(
                "multi-action document must be an object of blocks".to_string(),
            ));
        }
        Ok(Self { document })
    }

    /// Returns the block of `action`, if present.
    #[must_use]
    pub fn block(&self, action: &str) -> Option<&Value> {
        self.document.get(action)
    }

    /// Typed configuration of the correlation action.
    ///
    /// # Errors
    /// Returns an error if the block is missing or malformed.
    pub fn correlate(&self) -> Result<CorrelateConfig> {
        let block = self.block(correlate::ACTION_ID).ok_or_else(|| {
            Error::InvalidConfig(format!("missing [{}] block", correlate::ACTION_ID))
        })?;
        Ok(serde_json::from_value(block.clone())?)
    }

    /// Builds the action chain described by the document.
    ///
    /// # Errors
    /// Returns an error if a block names an unknown action or is malformed.
    pub fn build_chain(&self, registry: &ActionRegistry) -> Result<ActionChain> {
        Ok(ActionChain::from_config(registry, &self.document)?)
    }
}

/// Detector document, reduced to what the analyses use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Merger block.
    #[serde(rename = "Merger")]
    pub merger: MergerBlock,
}

/// `Merger` block of the detector document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergerBlock {
    /// Length per time bucket.
    #[serde(rename = "DriftFactor")]
    pub drift_factor: f64,
}

impl DetectorConfig {
    /// Loads the detector document from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or lacks `Merger.DriftFactor`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Parses the detector document from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string lacks `Merger.DriftFactor`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Length per time bucket.
    #[must_use]
    pub fn drift_factor(&self) -> f64 {
        self.merger.drift_factor
    }
}
