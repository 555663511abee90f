//! Implant/decay dZ extraction over filtered events.
//!
//! Runs on the output of the correlation action: every event that still
//! carries clusters is expected to contain a beam-like implant and a decay
//! starting within the same Lxy threshold. For those events the z offset
//! between the projected implant end and the projected decay start is
//! measured and histogrammed.

use crate::correlate::find_decay;
use crate::histogram::Histogram1D;
use decaytrack_core::{EventRecord, Error, MergerData, Result, TpcData, XyzPoint};
use rayon::prelude::*;

/// Number of bins of the dZ histogram.
pub const DZ_BINS: usize = 1000;
/// Lower edge of the dZ histogram (time buckets).
pub const DZ_MIN: f64 = -500.0;
/// Upper edge of the dZ histogram (time buckets).
pub const DZ_MAX: f64 = 500.0;

/// Settings for dZ extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DzConfig {
    /// Lxy threshold; must match the one the events were filtered with.
    pub max_lxy: f64,
    /// Conversion from time buckets to length units, if known.
    pub drift_factor: Option<f64>,
}

impl DzConfig {
    /// Creates a configuration with the given Lxy threshold.
    #[must_use]
    pub fn new(max_lxy: f64) -> Self {
        Self {
            max_lxy,
            drift_factor: None,
        }
    }

    /// Sets the drift factor.
    #[must_use]
    pub fn with_drift_factor(mut self, drift_factor: f64) -> Self {
        self.drift_factor = Some(drift_factor);
        self
    }
}

/// dZ measured in one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DzEntry {
    /// Event identifier.
    pub merger: MergerData,
    /// Implant end, projected on the beam line.
    pub beam_end: XyzPoint,
    /// Decay start, projected on the decay line.
    pub decay_start: XyzPoint,
    /// `beam_end.z - decay_start.z` in time buckets.
    pub dz: f64,
}

impl DzEntry {
    /// dZ converted with a drift factor.
    #[must_use]
    pub fn dz_length(&self, drift_factor: f64) -> f64 {
        self.dz * drift_factor
    }
}

/// Last voxel of the beam-like cluster, projected on its line.
///
/// If several clusters are tagged beam-like the last one is used.
///
/// # Errors
/// Returns [`Error::NoBeamLike`] or [`Error::EmptyCluster`].
pub fn beam_last_point(tpc: &TpcData) -> Result<XyzPoint> {
    let beam = tpc.last_beam_like().ok_or(Error::NoBeamLike)?;
    beam.end_point().ok_or(Error::EmptyCluster(beam.id))
}

/// First voxel of the decay cluster, projected on its line.
///
/// # Errors
/// Returns [`Error::NoDecayFound`] if no non-beam cluster starts within
/// `max_lxy` of `beam_end`; for filtered data that means the filter and this
/// analysis disagree.
pub fn decay_first_point(tpc: &TpcData, beam_end: &XyzPoint, max_lxy: f64) -> Result<XyzPoint> {
    find_decay(&tpc.clusters, beam_end, max_lxy, false)
        .map(|decay| decay.decay_start)
        .ok_or(Error::NoDecayFound { max_lxy })
}

/// Measures dZ in one event.
///
/// # Errors
/// Propagates the errors of [`beam_last_point`] and [`decay_first_point`].
pub fn event_dz(event: &EventRecord, max_lxy: f64) -> Result<DzEntry> {
    let beam_end = beam_last_point(&event.tpc)?;
    let decay_start = decay_first_point(&event.tpc, &beam_end, max_lxy)?;
    Ok(DzEntry {
        merger: event.merger,
        beam_end,
        decay_start,
        dz: beam_end.z - decay_start.z,
    })
}

/// Measures dZ in every event that still has clusters, in parallel.
///
/// Entries come back in input order. Events without clusters are skipped.
///
/// # Errors
/// Fails if any event has no implant/decay pair. With several such events,
/// which one is reported is unspecified.
pub fn extract_dz(events: &[EventRecord], config: &DzConfig) -> Result<Vec<DzEntry>> {
    let entries = events
        .par_iter()
        .filter(|event| !event.tpc.is_empty())
        .map(|event| event_dz(event, config.max_lxy))
        .collect::<Result<Vec<_>>>()?;
    log::debug!(
        "extracted dZ for {} of {} events",
        entries.len(),
        events.len()
    );
    Ok(entries)
}

/// Fills the standard dZ histogram (1000 bins over [-500, 500)).
///
/// # Errors
/// Only fails if the built-in binning is invalid.
pub fn dz_histogram(entries: &[DzEntry]) -> Result<Histogram1D> {
    let mut hist = Histogram1D::new(DZ_BINS, DZ_MIN, DZ_MAX)?;
    for entry in entries {
        hist.fill(entry.dz);
    }
    Ok(hist)
}
