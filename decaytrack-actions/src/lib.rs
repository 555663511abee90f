//! decaytrack-actions: Per-event actions and analyses for implant/decay studies.
//!
//! This crate provides:
//! - **Actions** - the [`Action`] interface, a name-based [`ActionRegistry`]
//!   and the ordered [`ActionChain`]
//! - **CorrelateImplantDecay** - keeps events with a beam-like implant followed
//!   by a nearby decay track
//! - **dZ analysis** - implant/decay z offset over filtered events
//!
#![warn(missing_docs)]

mod action;
mod chain;
pub mod correlate;
pub mod dz;
mod error;
pub mod histogram;

pub use action::{Action, ActionStatus};
pub use chain::{ActionChain, ActionFactory, ActionRegistry, ChainStatistics};
pub use correlate::{
    find_decay, CorrelateConfig, CorrelateImplantDecay, Correlation, DecayMatch, RejectReason,
};
pub use dz::{dz_histogram, extract_dz, DzConfig, DzEntry};
pub use error::{Error, Result};
pub use histogram::Histogram1D;
