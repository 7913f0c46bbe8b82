// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Error types returned by the `cgmap_rs` library.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur when parsing the configuration of a mapping job.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Unknown option `{0}`.")]
    UnknownOption(String),
    #[error("Option `{0}` requires a value.")]
    MissingValue(String),
    #[error("Could not parse value `{1}` of option `{0}`.")]
    InvalidValue(String, String),
    #[error("Invalid job configuration: {0}")]
    InvalidConfig(String),
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
}

/// Errors that can occur when resolving the atoms to map.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection or molecule `{0}` contains no atoms.")]
    Empty(String),
    #[error("Selection `{0}` does not exist.")]
    NotFound(String),
    #[error("Molecule `{0}` does not exist.")]
    MoleculeNotFound(usize),
    #[error("Target molecule can not hold `{0}` beads (it only has `{1}` atoms).")]
    TargetTooSmall(usize, usize),
}

/// Errors reported by the molecular data host.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostError {
    #[error("Molecule `{0}` does not exist.")]
    MoleculeNotFound(usize),
    #[error("Selection handle `{0}` is not valid.")]
    SelectionNotFound(usize),
    #[error("Selection `{0}` is not defined.")]
    UnknownSelection(String),
    #[error("Frame `{1}` of molecule `{0}` does not exist.")]
    FrameNotFound(usize, usize),
    #[error("Per-atom field `{0}` does not exist.")]
    FieldNotFound(String),
    #[error("Coordinate buffer of length `{1}` does not match the expected length `{0}`.")]
    BufferSize(usize, usize),
    #[error("Host call failed: {0}")]
    Failed(String),
}

/// Errors that can occur when interpreting per-atom metadata or coordinates.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataParseError {
    #[error("Could not interpret value `{1}` of field `{0}` as floating-point number.")]
    NotAFloat(String, String),
    #[error("Could not interpret value `{1}` of field `{0}` as integer.")]
    NotAnInteger(String, String),
    #[error("Field `{0}` has `{2}` values but the selection contains `{1}` atoms.")]
    LengthMismatch(String, usize, usize),
    #[error("Field `{0}` contains a negative atom index `{1}`.")]
    NegativeIndex(String, i64),
    #[error("Atoms of group `{0}` are not contiguous (group reappears at position `{1}`).")]
    NonContiguousGroup(i64, usize),
    #[error("Atom index `{0}` is out of range for a frame with `{1}` atoms.")]
    IndexOutOfBuffer(usize, usize),
    #[error("Byte buffer of length `{0}` does not contain whole XYZ triples.")]
    InvalidByteLength(usize),
}

/// Errors that can occur when validating the frame range of a mapping job.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RangeError {
    #[error("Illegal value of first frame `{0}` (trajectory has `{1}` frames).")]
    FirstOutOfRange(i64, usize),
    #[error("Stride must be positive, not `{0}`.")]
    InvalidStride(i64),
}

/// Error returned when the weights of a bead sum to zero.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ZeroWeightError {
    #[error("Weights of bead `{0}` (group `{1}`) total zero.")]
    ZeroWeight(usize, i64),
}

/// Any error that can terminate a mapping job.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MappingError {
    #[error("{0}")]
    Argument(#[from] ArgumentError),
    #[error("{0}")]
    Selection(#[from] SelectionError),
    #[error("{0}")]
    HostQuery(#[from] HostError),
    #[error("{0}")]
    DataParse(#[from] DataParseError),
    #[error("{0}")]
    Range(#[from] RangeError),
    #[error("{0}")]
    ZeroWeight(#[from] ZeroWeightError),
}
