// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the flat coordinate buffer of a single trajectory frame.

use std::ops::Range;

use crate::errors::DataParseError;
use crate::structures::vector3d::Vector3D;

/// Number of bytes occupied by a single XYZ triple of `f32`.
const TRIPLE_BYTES: usize = 3 * std::mem::size_of::<f32>();

/// Coordinates of all atoms of a single frame stored as a flat sequence of X, Y, Z values.
/// The position of atom `i` is stored at `3 * i`, `3 * i + 1`, and `3 * i + 2`.
///
/// The buffer owns its data: reading it from a host or handing it back to a host
/// always transfers the full coordinate set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameCoordinateBuffer {
    coordinates: Vec<f32>,
}

/// Range of the buffer holding the coordinates of atom `index`.
/// `None` if the range can not be represented.
#[inline(always)]
fn atom_span(index: usize) -> Option<Range<usize>> {
    let start = index.checked_mul(3)?;
    Some(start..start.checked_add(3)?)
}

impl FrameCoordinateBuffer {
    /// Wrap a flat vector of coordinates.
    ///
    /// ## Panics
    /// Panics if the length of `coordinates` is not divisible by 3.
    pub fn new(coordinates: Vec<f32>) -> Self {
        if coordinates.len() % 3 != 0 {
            panic!("FATAL CGMAP ERROR | FrameCoordinateBuffer::new | Number of coordinates is not divisible by 3.");
        }

        FrameCoordinateBuffer { coordinates }
    }

    /// Create a buffer for `n_atoms` atoms with all coordinates set to zero.
    pub fn zeros(n_atoms: usize) -> Self {
        FrameCoordinateBuffer {
            coordinates: vec![0.0; 3 * n_atoms],
        }
    }

    /// Number of atoms whose coordinates are stored in the buffer.
    #[inline(always)]
    pub fn n_atoms(&self) -> usize {
        self.coordinates.len() / 3
    }

    /// Number of `f32` values stored in the buffer.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Get the position of the atom with the given index.
    ///
    /// ## Returns
    /// `Vector3D` or `DataParseError::IndexOutOfBuffer` if the buffer has no such atom.
    #[inline]
    pub fn get_position(&self, index: usize) -> Result<Vector3D, DataParseError> {
        match atom_span(index).and_then(|span| self.coordinates.get(span)) {
            Some(xyz) => Ok(Vector3D::new(xyz[0], xyz[1], xyz[2])),
            None => Err(DataParseError::IndexOutOfBuffer(index, self.n_atoms())),
        }
    }

    /// Set the position of the atom with the given index.
    ///
    /// ## Returns
    /// `Ok` or `DataParseError::IndexOutOfBuffer` if the buffer has no such atom.
    #[inline]
    pub fn set_position(&mut self, index: usize, position: &Vector3D) -> Result<(), DataParseError> {
        let n_atoms = self.n_atoms();
        match atom_span(index).and_then(|span| self.coordinates.get_mut(span)) {
            Some(xyz) => {
                xyz[0] = position.x;
                xyz[1] = position.y;
                xyz[2] = position.z;
                Ok(())
            }
            None => Err(DataParseError::IndexOutOfBuffer(index, n_atoms)),
        }
    }

    /// Get the raw coordinates.
    #[inline(always)]
    pub fn as_slice(&self) -> &[f32] {
        &self.coordinates
    }

    /// Consume the buffer returning the raw coordinates.
    #[inline(always)]
    pub fn into_inner(self) -> Vec<f32> {
        self.coordinates
    }

    /// Materialize a buffer from little-endian `f32` bytes.
    ///
    /// ## Returns
    /// `FrameCoordinateBuffer` or `DataParseError::InvalidByteLength` if the bytes
    /// do not form whole XYZ triples.
    ///
    /// ## Example
    /// ```
    /// # use cgmap_rs::prelude::*;
    /// #
    /// let bytes: Vec<u8> = [1.0f32, 2.0, 3.0]
    ///     .iter()
    ///     .flat_map(|x| x.to_le_bytes())
    ///     .collect();
    ///
    /// let buffer = FrameCoordinateBuffer::from_le_bytes(&bytes).unwrap();
    /// assert_eq!(buffer.get_position(0).unwrap(), Vector3D::new(1.0, 2.0, 3.0));
    /// ```
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, DataParseError> {
        if bytes.len() % TRIPLE_BYTES != 0 {
            return Err(DataParseError::InvalidByteLength(bytes.len()));
        }

        let coordinates = bytes
            .chunks_exact(std::mem::size_of::<f32>())
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(FrameCoordinateBuffer { coordinates })
    }

    /// Materialize the buffer as little-endian `f32` bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.coordinates
            .iter()
            .flat_map(|value| value.to_le_bytes())
            .collect()
    }
}

impl From<Vec<Vector3D>> for FrameCoordinateBuffer {
    fn from(positions: Vec<Vector3D>) -> Self {
        FrameCoordinateBuffer {
            coordinates: positions
                .into_iter()
                .flat_map(<[f32; 3]>::from)
                .collect(),
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
