// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the Bead structure.

use getset::CopyGetters;

use crate::structures::vector3d::Vector3D;

/// Coarse-grained particle replacing one contiguous group of atoms.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
pub struct Bead {
    /// Position of the bead in the bead sequence. Atoms are mapped to beads starting from 0.
    /// This is also the index of the bead in the target coordinate buffer.
    #[getset(get_copy = "pub")]
    id: usize,
    /// Group label shared by all atoms of the bead.
    #[getset(get_copy = "pub")]
    label: i64,
    /// Weighted center of the atoms of the bead.
    #[getset(get_copy = "pub")]
    centroid: Vector3D,
}

impl Bead {
    pub fn new(id: usize, label: i64, centroid: Vector3D) -> Self {
        Bead {
            id,
            label,
            centroid,
        }
    }
}
