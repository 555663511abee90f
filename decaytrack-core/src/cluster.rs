//! Reconstructed track clusters.

use crate::geometry::{Line, XyzPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single voxel of collected charge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Voxel {
    /// Position in detector space.
    pub position: XyzPoint,
    /// Collected charge.
    #[cfg_attr(feature = "serde", serde(default))]
    pub charge: f64,
}

impl Voxel {
    /// Creates a new voxel.
    #[must_use]
    pub fn new(position: XyzPoint, charge: f64) -> Self {
        Self { position, charge }
    }
}

/// A reconstructed particle track: a fitted line plus the voxels it was
/// fitted to.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    /// Cluster identifier assigned by the reconstruction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: i32,
    /// Fitted line.
    pub line: Line,
    /// Voxels belonging to this cluster.
    pub voxels: Vec<Voxel>,
    /// Tagged as the incoming beam particle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_beam_like: bool,
}

impl Cluster {
    /// Creates a cluster from a fitted line and its voxels.
    #[must_use]
    pub fn new(id: i32, line: Line, voxels: Vec<Voxel>) -> Self {
        Self {
            id,
            line,
            voxels,
            is_beam_like: false,
        }
    }

    /// Sets the beam-like tag.
    #[must_use]
    pub fn with_beam_like(mut self, is_beam_like: bool) -> Self {
        self.is_beam_like = is_beam_like;
        self
    }

    /// Returns the fitted line.
    #[inline]
    #[must_use]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Returns the voxels.
    #[inline]
    #[must_use]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Returns the number of voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Returns true if the cluster has no voxels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Returns a copy of the voxels sorted along the cluster's own fit direction.
    ///
    /// Voxels are ordered by ascending projection on the direction. The sort
    /// is stable; voxels at the same depth keep their order.
    #[must_use]
    pub fn sorted_voxels(&self) -> Vec<Voxel> {
        let dir = self.line.direction();
        let mut voxels = self.voxels.clone();
        voxels.sort_by(|a, b| a.position.dot(&dir).total_cmp(&b.position.dot(&dir)));
        voxels
    }

    /// First voxel along the fit direction, projected onto the fit line.
    ///
    /// Returns `None` if the cluster has no voxels.
    #[must_use]
    pub fn start_point(&self) -> Option<XyzPoint> {
        let first = self.sorted_voxels().first().copied()?;
        Some(self.line.projection_point_on_line(&first.position))
    }

    /// Last voxel along the fit direction, projected onto the fit line.
    ///
    /// Returns `None` if the cluster has no voxels.
    #[must_use]
    pub fn end_point(&self) -> Option<XyzPoint> {
        let last = self.sorted_voxels().last().copied()?;
        Some(self.line.projection_point_on_line(&last.position))
    }
}
