//! Per-event containers.

use crate::cluster::Cluster;
use crate::geometry::XyzPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reconstructed TPC content of one event.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TpcData {
    /// Track clusters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub clusters: Vec<Cluster>,
    /// Reaction points found by earlier reconstruction stages.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rps: Vec<XyzPoint>,
}

impl TpcData {
    /// Creates an event from its clusters, with no reaction points.
    #[must_use]
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self {
            clusters,
            rps: Vec::new(),
        }
    }

    /// Number of clusters tagged beam-like.
    #[must_use]
    pub fn beam_like_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_beam_like).count()
    }

    /// Returns the last beam-like cluster, if any.
    #[must_use]
    pub fn last_beam_like(&self) -> Option<&Cluster> {
        self.clusters.iter().rev().find(|c| c.is_beam_like)
    }

    /// Returns true if the event carries no clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Drops every cluster. Reaction points are kept.
    pub fn clear_clusters(&mut self) {
        self.clusters.clear();
    }
}

/// Identification of an event in the merged data stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergerData {
    /// Run number.
    pub run: u32,
    /// Entry number within the run.
    pub entry: u64,
}

impl MergerData {
    /// Creates a new event identifier.
    #[must_use]
    pub fn new(run: u32, entry: u64) -> Self {
        Self { run, entry }
    }
}

impl std::fmt::Display for MergerData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.run, self.entry)
    }
}

/// One event as stored on disk: its identifier and TPC content.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRecord {
    /// Event identifier.
    pub merger: MergerData,
    /// TPC content.
    pub tpc: TpcData,
}

impl EventRecord {
    /// Creates a new event record.
    #[must_use]
    pub fn new(merger: MergerData, tpc: TpcData) -> Self {
        Self { merger, tpc }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Line;

    fn cluster(id: i32, beam: bool) -> Cluster {
        Cluster::new(id, Line::default(), Vec::new()).with_beam_like(beam)
    }

    #[test]
    fn test_beam_like_lookup() {
        let tpc = TpcData::new(vec![cluster(0, true), cluster(1, false), cluster(2, true)]);
        assert_eq!(tpc.beam_like_count(), 2);
        assert_eq!(tpc.last_beam_like().map(|c| c.id), Some(2));
    }

    #[test]
    fn test_clear_clusters_keeps_rps() {
        let mut tpc = TpcData::new(vec![cluster(0, true)]);
        tpc.rps.push(XyzPoint::new(1.0, 2.0, 3.0));
        tpc.clear_clusters();
        assert!(tpc.is_empty());
        assert_eq!(tpc.rps.len(), 1);
    }

    #[test]
    fn test_merger_data_display() {
        assert_eq!(MergerData::new(129, 4521).to_string(), "129 4521");
    }
}
