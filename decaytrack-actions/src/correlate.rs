//! Implant/decay correlation action.
//!
//! Keeps only events where a single beam-like implant track is followed by a
//! decay track whose first point lies close, in the XY plane, to the point
//! where the implant stopped. Every other event has its clusters removed so
//! that later stages see it as empty.
//!
//! Events that already carry reaction points were resolved as reactions by an
//! earlier stage and are rejected as well, so the reaction-point finder must
//! be configured not to delete the events it could not resolve.

use crate::action::{summary_header, Action, ActionStatus};
use crate::{Error, Result};
use decaytrack_core::{Cluster, TpcData, XyzPoint};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name of the configuration block read by [`CorrelateImplantDecay`].
pub const ACTION_ID: &str = "CorrelateImplantDecay";

/// Configuration block of the correlation action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelateConfig {
    /// Run the action at all.
    #[serde(rename = "IsEnabled")]
    pub is_enabled: bool,
    /// Maximum Lxy (pads) between implant end and decay start.
    ///
    /// Despite the name this is an upper bound.
    #[serde(rename = "MinLength", default)]
    pub min_length: f64,
    /// Log per-event diagnostics.
    #[serde(rename = "IsVerbose", default)]
    pub is_verbose: bool,
}

impl CorrelateConfig {
    /// Enabled configuration with the given Lxy threshold.
    #[must_use]
    pub fn new(min_length: f64) -> Self {
        Self {
            is_enabled: true,
            min_length,
            is_verbose: false,
        }
    }

    /// Sets the enable flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }
}

/// Why an event was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Event has no clusters.
    NoClusters,
    /// Event has a single cluster, so no implant/decay pair.
    SingleCluster,
    /// No cluster is tagged beam-like.
    NoBeamLike,
    /// More than one cluster is tagged beam-like.
    MultipleBeamLike(usize),
    /// The beam-like cluster has no voxels.
    EmptyBeam,
    /// Event already has reaction points.
    ReactionPoints(usize),
    /// No non-beam cluster starts within the threshold.
    NoDecay,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoClusters => write!(f, "no clusters"),
            Self::SingleCluster => write!(f, "only one cluster"),
            Self::NoBeamLike => write!(f, "no beam-like found"),
            Self::MultipleBeamLike(n) => write!(f, "{n} beam-like tracks"),
            Self::EmptyBeam => write!(f, "beam-like cluster has no voxels"),
            Self::ReactionPoints(n) => write!(f, "event has {n} reaction points"),
            Self::NoDecay => write!(f, "didn't find decay"),
        }
    }
}

/// An accepted implant/decay pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayMatch {
    /// Index of the decay cluster in the event's cluster list.
    pub decay_index: usize,
    /// Last beam voxel projected on the beam line.
    pub beam_end: XyzPoint,
    /// First decay voxel projected on the decay line.
    pub decay_start: XyzPoint,
    /// XY distance between `beam_end` and `decay_start`.
    pub lxy: f64,
}

impl DecayMatch {
    /// Z offset between implant end and decay start, in time buckets.
    #[must_use]
    pub fn dz(&self) -> f64 {
        self.beam_end.z - self.decay_start.z
    }
}

/// Outcome of evaluating one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    /// Action disabled.
    Disabled,
    /// Event rejected.
    Rejected(RejectReason),
    /// Implant/decay pair found.
    Accepted(DecayMatch),
}

impl Correlation {
    /// Returns the accepted pair, if any.
    #[must_use]
    pub fn decay(&self) -> Option<&DecayMatch> {
        match self {
            Self::Accepted(m) => Some(m),
            _ => None,
        }
    }
}

/// Searches the non-beam clusters for a decay starting within `max_lxy` of
/// `beam_end`.
///
/// Every cluster is examined and the LAST one within range is returned, not
/// the closest. Clusters without voxels are ignored.
#[must_use]
pub fn find_decay(
    clusters: &[Cluster],
    beam_end: &XyzPoint,
    max_lxy: f64,
    verbose: bool,
) -> Option<DecayMatch> {
    let mut found = None;
    for (idx, cluster) in clusters.iter().enumerate() {
        if cluster.is_beam_like {
            continue;
        }
        let Some(start) = cluster.start_point() else {
            continue;
        };
        let lxy = start.distance_xy(beam_end);
        if verbose {
            log::info!("cluster {idx}: Lxy from beam-like end = {lxy}");
        }
        if lxy <= max_lxy {
            found = Some(DecayMatch {
                decay_index: idx,
                beam_end: *beam_end,
                decay_start: start,
                lxy,
            });
        }
    }
    found
}

/// Correlates a beam-like implant with a decay track in the same event.
#[derive(Debug, Clone, Default)]
pub struct CorrelateImplantDecay {
    config: CorrelateConfig,
}

impl CorrelateImplantDecay {
    /// Create with custom configuration.
    #[must_use]
    pub fn new(config: CorrelateConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &CorrelateConfig {
        &self.config
    }

    /// Decides whether `tpc` holds an implant/decay pair without modifying it.
    #[must_use]
    pub fn evaluate(&self, tpc: &TpcData) -> Correlation {
        if !self.config.is_enabled {
            return Correlation::Disabled;
        }

        match tpc.clusters.len() {
            0 => return Correlation::Rejected(RejectReason::NoClusters),
            1 => return Correlation::Rejected(RejectReason::SingleCluster),
            _ => {}
        }

        match tpc.beam_like_count() {
            0 => return Correlation::Rejected(RejectReason::NoBeamLike),
            1 => {}
            n => return Correlation::Rejected(RejectReason::MultipleBeamLike(n)),
        }

        let Some(beam) = tpc.last_beam_like() else {
            return Correlation::Rejected(RejectReason::NoBeamLike);
        };
        let Some(beam_end) = beam.end_point() else {
            return Correlation::Rejected(RejectReason::EmptyBeam);
        };

        if !tpc.rps.is_empty() {
            return Correlation::Rejected(RejectReason::ReactionPoints(tpc.rps.len()));
        }

        match find_decay(
            &tpc.clusters,
            &beam_end,
            self.config.min_length,
            self.config.is_verbose,
        ) {
            Some(decay) => Correlation::Accepted(decay),
            None => Correlation::Rejected(RejectReason::NoDecay),
        }
    }

    /// Evaluates `tpc` and clears its clusters unless a pair was found.
    pub fn apply(&self, tpc: &mut TpcData) -> Correlation {
        let correlation = self.evaluate(tpc);
        match &correlation {
            Correlation::Disabled => {}
            Correlation::Rejected(reason) => {
                if self.config.is_verbose {
                    log::info!("[{ACTION_ID}] nope: {reason}");
                }
                tpc.clear_clusters();
            }
            Correlation::Accepted(decay) => {
                if self.config.is_verbose {
                    log::info!(
                        "[{ACTION_ID}] decay in cluster {}: Lxy = {} pads, beam z = {}, decay z = {}, dZ = {}",
                        decay.decay_index,
                        decay.lxy,
                        decay.beam_end.z,
                        decay.decay_start.z,
                        decay.dz()
                    );
                }
            }
        }
        correlation
    }
}

impl Action for CorrelateImplantDecay {
    fn id(&self) -> &str {
        ACTION_ID
    }

    fn read_configuration(&mut self, block: &Value) -> Result<()> {
        self.config =
            serde_json::from_value(block.clone()).map_err(|source| Error::InvalidBlock {
                action: ACTION_ID.to_string(),
                source,
            })?;
        Ok(())
    }

    fn run(&mut self, tpc: &mut TpcData) -> ActionStatus {
        match self.apply(tpc) {
            Correlation::Disabled => ActionStatus::Skipped,
            Correlation::Rejected(_) => ActionStatus::Cleared,
            Correlation::Accepted(_) => ActionStatus::Kept,
        }
    }

    fn is_enabled(&self) -> bool {
        self.config.is_enabled
    }

    fn is_verbose(&self) -> bool {
        self.config.is_verbose
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.config.is_verbose = verbose;
    }

    fn summary(&self) -> String {
        let mut out = summary_header(ACTION_ID);
        out.push('\n');
        if self.config.is_enabled {
            out.push_str(&format!("  MinLength      : {}", self.config.min_length));
        } else {
            out.push_str("······························");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use decaytrack_core::{Line, Voxel};
    use serde_json::json;

    fn straight(id: i32, from: XyzPoint, to: XyzPoint) -> Cluster {
        let voxels = (0..=4)
            .map(|i| Voxel::new(from + (to - from) * (f64::from(i) / 4.0), 1.0))
            .collect();
        Cluster::new(id, Line::new(from, to - from), voxels)
    }

    #[test]
    fn test_read_configuration() {
        let mut action = CorrelateImplantDecay::default();
        action
            .read_configuration(&json!({ "IsEnabled": true, "MinLength": 4.5 }))
            .unwrap();
        assert!(action.is_enabled());
        assert_relative_eq!(action.config().min_length, 4.5);
        assert!(!action.config().is_verbose);
    }

    #[test]
    fn test_read_configuration_min_length_defaults_to_zero() {
        let mut action = CorrelateImplantDecay::default();
        action
            .read_configuration(&json!({ "IsEnabled": true }))
            .unwrap();
        assert_relative_eq!(action.config().min_length, 0.0);
    }

    #[test]
    fn test_read_configuration_requires_enable_flag() {
        let mut action = CorrelateImplantDecay::default();
        let err = action
            .read_configuration(&json!({ "MinLength": 4.5 }))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBlock { .. }));
    }

    #[test]
    fn test_find_decay_skips_beam_and_empty_clusters() {
        let beam_end = XyzPoint::new(0.0, 0.0, 10.0);
        let clusters = vec![
            straight(0, XyzPoint::new(0.0, 0.0, 0.0), beam_end).with_beam_like(true),
            Cluster::new(1, Line::default(), Vec::new()),
            straight(2, XyzPoint::new(0.3, 0.0, 0.0), XyzPoint::new(0.3, 0.0, -10.0)),
        ];
        let decay = find_decay(&clusters, &beam_end, 1.0, false).unwrap();
        assert_eq!(decay.decay_index, 2);
        assert_relative_eq!(decay.lxy, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_find_decay_threshold_is_inclusive() {
        let beam_end = XyzPoint::new(0.0, 0.0, 10.0);
        let clusters = vec![straight(
            1,
            XyzPoint::new(2.0, 0.0, 5.0),
            XyzPoint::new(2.0, 0.0, 0.0),
        )];
        assert!(find_decay(&clusters, &beam_end, 2.0, false).is_some());
        assert!(find_decay(&clusters, &beam_end, 1.999, false).is_none());
    }

    #[test]
    fn test_summary() {
        let enabled = CorrelateImplantDecay::new(CorrelateConfig::new(3.0));
        assert!(enabled.summary().contains("MinLength      : 3"));

        let disabled = CorrelateImplantDecay::default();
        assert!(disabled.summary().starts_with("····· CorrelateImplantDecay ·····"));
        assert!(!disabled.summary().contains("MinLength"));
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(RejectReason::MultipleBeamLike(2).to_string(), "2 beam-like tracks");
        assert_eq!(RejectReason::NoDecay.to_string(), "didn't find decay");
    }
}
