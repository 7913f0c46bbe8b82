// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Boundary between the mapping engine and the program managing the molecular data.

use std::fmt;

use crate::errors::{DataParseError, HostError};
use crate::structures::frame::FrameCoordinateBuffer;

/// Identifier of a molecule managed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoleculeId(pub usize);

impl fmt::Display for MoleculeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a selection of atoms resolved by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionHandle(pub usize);

/// Specification of atoms that should be selected by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCriteria {
    /// All atoms of the molecule.
    All(MoleculeId),
    /// Selection previously defined in the host and referred to by its name.
    Named(String),
}

impl fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionCriteria::All(molecule) => write!(f, "molecule {}", molecule),
            SelectionCriteria::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Value of a per-atom property as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Int(i64),
    Text(String),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Int(x) => write!(f, "{}", x),
            FieldValue::Text(x) => write!(f, "{}", x),
        }
    }
}

impl FieldValue {
    /// Interpret the value as a floating-point number.
    /// `field` is only used to construct the error.
    pub fn as_float(&self, field: &str) -> Result<f64, DataParseError> {
        match self {
            FieldValue::Float(x) => Ok(*x),
            FieldValue::Int(x) => Ok(*x as f64),
            FieldValue::Text(x) => x
                .trim()
                .parse::<f64>()
                .map_err(|_| DataParseError::NotAFloat(field.to_owned(), x.to_owned())),
        }
    }

    /// Interpret the value as an integer.
    /// Floating-point values (also when provided as text) are truncated toward zero.
    /// `field` is only used to construct the error.
    pub fn as_int(&self, field: &str) -> Result<i64, DataParseError> {
        let error = || DataParseError::NotAnInteger(field.to_owned(), self.to_string());

        match self {
            FieldValue::Int(x) => Ok(*x),
            FieldValue::Float(x) if x.is_finite() => Ok(x.trunc() as i64),
            FieldValue::Float(_) => Err(error()),
            FieldValue::Text(x) => {
                let text = x.trim();
                match text.parse::<i64>() {
                    Ok(value) => Ok(value),
                    Err(_) => match text.parse::<f64>() {
                        Ok(value) if value.is_finite() => Ok(value.trunc() as i64),
                        _ => Err(error()),
                    },
                }
            }
        }
    }
}

/// Capabilities a molecular data host must provide so that trajectories can be mapped.
///
/// The mapping engine never touches any global state: everything it needs
/// is requested through this trait. Coordinate buffers are transferred by value;
/// the returned buffer is the only representation of the frame the caller sees.
pub trait MolecularDataHost {
    /// Resolve atoms matching `criteria` into a selection handle.
    /// A named selection the host does not know should be reported as `HostError::UnknownSelection`.
    fn resolve_selection(&mut self, criteria: &SelectionCriteria)
        -> Result<SelectionHandle, HostError>;

    /// Release a selection resolved by `resolve_selection`.
    /// The handle must not be used afterwards.
    fn release_selection(&mut self, handle: SelectionHandle) -> Result<(), HostError>;

    /// Number of atoms in the selection.
    fn selection_size(&self, handle: SelectionHandle) -> Result<usize, HostError>;

    /// Molecule the selection belongs to.
    fn selection_molecule(&self, handle: SelectionHandle) -> Result<MoleculeId, HostError>;

    /// Values of a per-atom field for all atoms of the selection, in selection order.
    fn get_per_atom_field(
        &self,
        handle: SelectionHandle,
        field: &str,
    ) -> Result<Vec<FieldValue>, HostError>;

    /// Number of frames of the molecule.
    fn frame_count(&self, molecule: MoleculeId) -> Result<usize, HostError>;

    /// Number of atoms of the molecule.
    fn atom_count(&self, molecule: MoleculeId) -> Result<usize, HostError>;

    /// Currently active frame of the molecule.
    fn current_frame(&self, molecule: MoleculeId) -> Result<usize, HostError>;

    /// Change the currently active frame of the molecule.
    fn set_current_frame(&mut self, molecule: MoleculeId, frame: usize) -> Result<(), HostError>;

    /// Read the coordinates of all atoms of the molecule in the given frame.
    fn get_frame_coordinates(
        &self,
        molecule: MoleculeId,
        frame: usize,
    ) -> Result<FrameCoordinateBuffer, HostError>;

    /// Append a new frame to the molecule. Returns the index of the new frame.
    fn append_frame(&mut self, molecule: MoleculeId) -> Result<usize, HostError>;

    /// Replace the coordinates of the molecule in the given frame.
    fn set_frame_coordinates(
        &mut self,
        molecule: MoleculeId,
        frame: usize,
        buffer: FrameCoordinateBuffer,
    ) -> Result<(), HostError>;

    /// Copy periodic boundary conditions of `source_frame` into `target_frame`.
    fn copy_box_metadata(
        &mut self,
        source: MoleculeId,
        source_frame: usize,
        target: MoleculeId,
        target_frame: usize,
    ) -> Result<(), HostError>;

    /// Advisory informational message.
    fn notify(&mut self, message: &str);
}

/******************************/
/*         UNIT TESTS         */
/******************************/
