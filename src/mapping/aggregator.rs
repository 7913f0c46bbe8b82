// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Reduction of atom coordinates into bead coordinates.

use crate::errors::{DataParseError, MappingError, ZeroWeightError};
use crate::structures::{
    bead::Bead, frame::FrameCoordinateBuffer, metadata::AtomSelectionMetadata,
    vector3d::Vector3D,
};

/// Calculate the weighted center of each bead of the selection.
///
/// Atoms are scanned in selection order and every maximal run of atoms sharing
/// a group label forms one bead. The position of atom `i` is read from `source`
/// at its coordinate index `metadata.indices()[i]`.
///
/// ## Returns
/// - Vector of beads in the order in which their runs appear in the selection.
/// - `ZeroWeightError` if the weights of any bead sum to zero.
/// - `DataParseError::IndexOutOfBuffer` if any coordinate index is outside of `source`.
///
/// No partial result is returned on error.
///
/// ## Example
/// ```
/// # use cgmap_rs::prelude::*;
/// # use float_cmp::assert_approx_eq;
/// #
/// let metadata = AtomSelectionMetadata::new(
///     vec![1.0, 1.0, 2.0, 2.0],
///     vec![0, 0, 1, 1],
///     vec![0, 1, 2, 3],
/// ).unwrap();
///
/// let frame = FrameCoordinateBuffer::new(vec![
///     0.0, 0.0, 0.0,
///     2.0, 0.0, 0.0,
///     0.0, 0.0, 0.0,
///     4.0, 0.0, 0.0,
/// ]);
///
/// let beads = compute_bead_centroids(&metadata, &frame).unwrap();
/// assert_eq!(beads.len(), 2);
/// assert_approx_eq!(f32, beads[0].centroid().x, 1.0);
/// assert_approx_eq!(f32, beads[1].centroid().x, 2.0);
/// ```
pub fn compute_bead_centroids(
    metadata: &AtomSelectionMetadata,
    source: &FrameCoordinateBuffer,
) -> Result<Vec<Bead>, MappingError> {
    let weights = metadata.weights();
    let labels = metadata.labels();
    let indices = metadata.indices();

    metadata
        .runs()
        .enumerate()
        .map(|(id, run)| -> Result<Bead, MappingError> {
            let label = labels[run.start];
            let mut total = 0.0f32;
            let mut sum = Vector3D::default();

            for atom in run {
                let weight = weights[atom];
                total += weight;
                sum += source.get_position(indices[atom])? * weight;
            }

            if total == 0.0 {
                return Err(ZeroWeightError::ZeroWeight(id, label).into());
            }

            Ok(Bead::new(id, label, sum / total))
        })
        .collect()
}

/// Write bead centroids into the target coordinate buffer.
/// The centroid of a bead is written at the position given by its id.
///
/// ## Returns
/// `Ok` or `DataParseError::IndexOutOfBuffer` if the target buffer can not hold all the beads.
/// Beads preceding the failing one are already written when the error is returned.
pub fn write_beads(beads: &[Bead], target: &mut FrameCoordinateBuffer) -> Result<(), DataParseError> {
    for bead in beads {
        target.set_position(bead.id(), &bead.centroid())?;
    }

    Ok(())
}

/******************************/
/*         UNIT TESTS         */
/******************************/
