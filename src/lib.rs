// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! # cgmap_rs: Coarse-Grained Mapping of Molecular Dynamics Trajectories
//!
//! Rust library for mapping all-atom trajectories onto coarse-grained beads.
//!
//! Each bead replaces a contiguous group of atoms and is placed at the weighted
//! center of the group. Frames of the source molecule are mapped one by one and
//! appended as new frames to the target molecule.
//!
//! ## Usage
//!
//! Run
//!
//! ```bash
//! $ cargo add cgmap_rs
//! ```
//!
//! Import the crate in your Rust code:
//! ```
//! use cgmap_rs::prelude::*;
//! ```
//!
//! ## Molecular data host
//!
//! `cgmap_rs` does not read any files. All molecules, per-atom properties and
//! trajectories are provided by a host implementing the [`MolecularDataHost`](crate::host::molecular::MolecularDataHost)
//! trait. The library comes with [`MemoryHost`](crate::host::memory::MemoryHost)
//! which keeps everything in memory.
//!
//! Three per-atom properties of the mapped atoms must be available in the host:
//! - weight of the atom (by default stored in field `user3`),
//! - label of the group (bead) the atom belongs to (field `user`),
//! - index of the atom in the coordinate buffer of a frame (field `user2`).
//!
//! Atoms of each group must form a contiguous run in the selection.
//!
//! ## Examples
//!
//! #### Mapping a trajectory
//!
//! Map a two-frame trajectory of a four-atom molecule onto two beads.
//!
//! ```
//! use cgmap_rs::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut molecule = Molecule::new("ethanol", 4)
//!         .with_field("user3", vec![FieldValue::Float(12.0), FieldValue::Float(12.0), FieldValue::Float(16.0), FieldValue::Float(1.0)])?
//!         .with_field("user", vec![FieldValue::Int(1), FieldValue::Int(1), FieldValue::Int(2), FieldValue::Int(2)])?
//!         .with_field("user2", vec![FieldValue::Int(0), FieldValue::Int(1), FieldValue::Int(2), FieldValue::Int(3)])?;
//!
//!     for shift in [0.0, 1.0] {
//!         let coordinates = vec![
//!             Vector3D::new(shift, 0.0, 0.0),
//!             Vector3D::new(shift + 2.0, 0.0, 0.0),
//!             Vector3D::new(shift, 1.0, 0.0),
//!             Vector3D::new(shift, 18.0, 0.0),
//!         ];
//!         molecule.add_frame(FrameCoordinateBuffer::from(coordinates), Some(SimBox::from([5.0, 5.0, 5.0])))?;
//!     }
//!
//!     let mut host = MemoryHost::new();
//!     let source = host.add_molecule(molecule);
//!     let target = host.add_molecule(Molecule::new("ethanol-cg", 2));
//!
//!     let job = MappingJob::default()
//!         .with_molecule(source.0)
//!         .with_target(target.0);
//!
//!     let report = MappingEngine::new(&mut host)
//!         .with_observer(&mut SilentProgress)
//!         .run(&job)?;
//!
//!     assert_eq!(report.n_frames(), 2);
//!     assert_eq!(report.n_beads(), 2);
//!
//!     let beads = host.get_frame_coordinates(target, 1)?;
//!     assert_eq!(beads.get_position(0)?, Vector3D::new(2.0, 0.0, 0.0));
//!     assert_eq!(beads.get_position(1)?, Vector3D::new(1.0, 2.0, 0.0));
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Using named options
//!
//! Jobs can also be described using a list of named options
//! (`-molid`, `-append`, `-sel`, `-first`, `-last`, `-stride`, `-weight`, `-blockid`, `-order`, `-check`)
//! or a yaml file.
//!
//! ```no_run
//! use cgmap_rs::prelude::*;
//! use colored::Colorize;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut host = MemoryHost::new();
//!     // ... add the molecules into the host ...
//!
//!     // map every 10th frame of molecule 0 starting from frame 100, appending the beads to molecule 1
//!     let report = cgmap(&mut host, &["-molid", "0", "-append", "1", "-first", "100", "-stride", "10"])?;
//!     println!("Mapped {} frames.", report.n_frames());
//!
//!     // read the job from a yaml file and print the progress to standard output
//!     let job = MappingJob::from_yaml_file("job.yaml")?;
//!     let mut printer = ProgressPrinter::new().with_running_msg("MAPPING".yellow());
//!     MappingEngine::new(&mut host).with_observer(&mut printer).run(&job)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! All fallible operations return a [`MappingError`](crate::errors::MappingError)
//! (or one of the error types it wraps). A failed job keeps the frames that
//! were already appended to the target molecule.
//!
//! ## License
//! This library is released under the MIT License.

pub mod errors;
pub mod host {
    pub mod memory;
    pub mod molecular;
}
pub mod mapping {
    pub mod aggregator;
    pub mod engine;
    pub mod job;
}
pub mod progress;
pub mod structures {
    pub mod bead;
    pub mod frame;
    pub mod metadata;
    pub mod simbox;
    pub mod vector3d;
}
mod test_utilities;

/// Version of the `cgmap_rs` library.
pub const CGMAP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reexported basic `cgmap_rs` structures, traits and functions.
pub mod prelude {
    pub use crate::errors::MappingError;
    pub use crate::host::memory::{MemoryHost, Molecule};
    pub use crate::host::molecular::{
        FieldValue, MolecularDataHost, MoleculeId, SelectionCriteria, SelectionHandle,
    };
    pub use crate::mapping::aggregator::{compute_bead_centroids, write_beads};
    pub use crate::mapping::engine::{cgmap, EngineState, MappingEngine, MappingReport};
    pub use crate::mapping::job::{FrameRange, MappingJob};
    pub use crate::progress::{ProgressObserver, ProgressPrinter, ProgressStatus, SilentProgress};
    pub use crate::structures::bead::Bead;
    pub use crate::structures::frame::FrameCoordinateBuffer;
    pub use crate::structures::metadata::AtomSelectionMetadata;
    pub use crate::structures::simbox::SimBox;
    pub use crate::structures::vector3d::Vector3D;
}
