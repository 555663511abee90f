//! decaytrack-core: Core geometry and event types for TPC track analysis.
//!
//! This crate provides points and fitted lines, voxelized track clusters,
//! and the per-event containers that actions and analyses operate on.
//!

pub mod cluster;
pub mod error;
pub mod event;
pub mod geometry;

pub use cluster::{Cluster, Voxel};
pub use error::{Error, Result};
pub use event::{EventRecord, MergerData, TpcData};
pub use geometry::{Line, XyzPoint};
