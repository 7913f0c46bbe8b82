// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Frame-by-frame mapping of a trajectory onto beads.

use getset::{CopyGetters, Getters};

use crate::errors::{DataParseError, HostError, MappingError, SelectionError};
use crate::host::molecular::{
    MolecularDataHost, MoleculeId, SelectionCriteria, SelectionHandle,
};
use crate::mapping::aggregator::{compute_bead_centroids, write_beads};
use crate::mapping::job::{FrameRange, MappingJob};
use crate::progress::{host_message, ProgressObserver, ProgressStatus};
use crate::structures::metadata::AtomSelectionMetadata;

/// State of the `MappingEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Validating the job and reading the per-atom metadata.
    Preparing,
    /// Between two frames.
    Iterating,
    /// Mapping a single frame and appending it to the target molecule.
    Appending,
    /// All frames have been mapped.
    Done,
    /// The job has been aborted.
    Failed,
}

/// Summary of a successfully finished mapping job.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct MappingReport {
    /// Source frames that have been mapped, in order.
    #[getset(get = "pub")]
    source_frames: Vec<usize>,
    /// Frames of the target molecule the beads have been written into, in order.
    #[getset(get = "pub")]
    target_frames: Vec<usize>,
    /// Number of beads in each frame.
    #[getset(get_copy = "pub")]
    n_beads: usize,
}

impl MappingReport {
    /// Number of frames appended to the target molecule.
    #[inline(always)]
    pub fn n_frames(&self) -> usize {
        self.target_frames.len()
    }
}

/// Everything resolved before the first frame is mapped.
struct Preparation {
    source: MoleculeId,
    target: MoleculeId,
    range: FrameRange,
    metadata: AtomSelectionMetadata,
}

/// Orchestrates mapping of frames of a source molecule onto beads
/// appended as new frames to a target molecule.
///
/// All data are obtained through the provided `MolecularDataHost`.
/// Progress is reported to the observer, if one is set, and otherwise
/// forwarded to the host's `notify` channel.
///
/// ## Example
/// ```
/// # use cgmap_rs::prelude::*;
/// #
/// let mut source = Molecule::new("water", 3)
///     .with_field("user3", vec![FieldValue::Float(16.0), FieldValue::Float(1.0), FieldValue::Float(1.0)]).unwrap()
///     .with_field("user", vec![FieldValue::Int(1); 3]).unwrap()
///     .with_field("user2", vec![FieldValue::Int(0), FieldValue::Int(1), FieldValue::Int(2)]).unwrap();
///
/// for frame in 0..5 {
///     source.add_frame(FrameCoordinateBuffer::new(vec![frame as f32; 9]), None).unwrap();
/// }
///
/// let mut host = MemoryHost::new();
/// host.add_molecule(source);
/// let target = host.add_molecule(Molecule::new("bead", 1));
///
/// let mut reports = Vec::new();
/// let job = MappingJob::default().with_target(target.0).with_stride(2);
/// let report = MappingEngine::new(&mut host)
///     .with_observer(&mut reports)
///     .run(&job)
///     .unwrap();
///
/// assert_eq!(report.source_frames(), &vec![0, 2, 4]);
/// assert_eq!(report.n_frames(), 3);
/// assert_eq!(host.frame_count(target).unwrap(), 3);
/// assert_eq!(reports.last(), Some(&(ProgressStatus::Completed, 4)));
/// ```
pub struct MappingEngine<'a, H: MolecularDataHost> {
    host: &'a mut H,
    observer: Option<&'a mut dyn ProgressObserver>,
    state: EngineState,
    /// Last source frame the engine started mapping.
    frame: usize,
}

impl<'a, H: MolecularDataHost> MappingEngine<'a, H> {
    /// Create a new engine operating on `host`.
    pub fn new(host: &'a mut H) -> Self {
        MappingEngine {
            host,
            observer: None,
            state: EngineState::Preparing,
            frame: 0,
        }
    }

    /// Report progress to `observer` instead of the host's notification channel.
    pub fn with_observer(mut self, observer: &'a mut dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current state of the engine.
    #[inline(always)]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Map the frames selected by `job`.
    ///
    /// The job is validated completely before any frame is appended to the target molecule.
    /// If mapping of any frame fails, the job is aborted, the frames already appended
    /// to the target molecule are kept and the error is returned.
    ///
    /// ## Returns
    /// `MappingReport` or `MappingError` describing why the job failed.
    pub fn run(&mut self, job: &MappingJob) -> Result<MappingReport, MappingError> {
        self.state = EngineState::Preparing;
        self.frame = 0;

        match self.execute(job) {
            Ok(report) => {
                self.state = EngineState::Done;
                self.report(ProgressStatus::Completed, self.frame);
                Ok(report)
            }
            Err(e) => {
                self.state = EngineState::Failed;
                self.report(ProgressStatus::Failed, self.frame);
                Err(e)
            }
        }
    }

    fn execute(&mut self, job: &MappingJob) -> Result<MappingReport, MappingError> {
        let criteria = match job.selection() {
            Some(name) => SelectionCriteria::Named(name.to_owned()),
            None => SelectionCriteria::All(MoleculeId(job.molecule())),
        };

        let handle = self
            .host
            .resolve_selection(&criteria)
            .map_err(|e| selection_error(&criteria, e))?;

        // the selection is released on success as well as on failure
        let result = self.map_selection(job, &criteria, handle);
        let released = self.host.release_selection(handle);

        let report = result?;
        released?;
        Ok(report)
    }

    fn map_selection(
        &mut self,
        job: &MappingJob,
        criteria: &SelectionCriteria,
        handle: SelectionHandle,
    ) -> Result<MappingReport, MappingError> {
        let preparation = self.prepare(job, criteria, handle)?;

        let mut source_frames = Vec::with_capacity(preparation.range.n_frames());
        let mut target_frames = Vec::with_capacity(preparation.range.n_frames());

        self.state = EngineState::Iterating;
        for frame in preparation.range.iter() {
            self.frame = frame;
            if preparation.range.is_progress_frame(frame) {
                self.report(ProgressStatus::Running, frame);
            }

            self.state = EngineState::Appending;
            let target_frame = self.map_frame(&preparation, frame)?;
            self.state = EngineState::Iterating;

            source_frames.push(frame);
            target_frames.push(target_frame);
        }

        Ok(MappingReport {
            source_frames,
            target_frames,
            n_beads: preparation.metadata.n_beads(),
        })
    }

    /// Validate the frame range and read the per-atom metadata of the resolved selection.
    fn prepare(
        &mut self,
        job: &MappingJob,
        criteria: &SelectionCriteria,
        handle: SelectionHandle,
    ) -> Result<Preparation, MappingError> {
        let source = self.host.selection_molecule(handle)?;
        let n_frames = self.host.frame_count(source)?;
        let range = FrameRange::resolve(job.first(), job.last(), job.stride(), n_frames)?;
        self.frame = range.first();

        let n_atoms = self.host.selection_size(handle)?;
        if n_atoms == 0 {
            return Err(SelectionError::Empty(criteria.to_string()).into());
        }

        let weights = self.host.get_per_atom_field(handle, job.weight_field())?;
        let labels = self.host.get_per_atom_field(handle, job.group_field())?;
        let indices = self.host.get_per_atom_field(handle, job.index_field())?;

        let metadata = AtomSelectionMetadata::from_fields(
            n_atoms,
            (job.weight_field().as_str(), weights.as_slice()),
            (job.group_field().as_str(), labels.as_slice()),
            (job.index_field().as_str(), indices.as_slice()),
        )?;

        if job.check_groups() {
            metadata.check_contiguous()?;
        }

        let source_atoms = self.host.atom_count(source)?;
        if metadata.max_index() >= source_atoms {
            return Err(DataParseError::IndexOutOfBuffer(metadata.max_index(), source_atoms).into());
        }

        let target = MoleculeId(job.target());
        let target_atoms = self
            .host
            .atom_count(target)
            .map_err(|e| selection_error(&SelectionCriteria::All(target), e))?;

        if metadata.n_beads() > target_atoms {
            return Err(SelectionError::TargetTooSmall(metadata.n_beads(), target_atoms).into());
        }

        Ok(Preparation {
            source,
            target,
            range,
            metadata,
        })
    }

    /// Map a single source frame into a newly appended target frame.
    /// Returns the index of the target frame.
    fn map_frame(&mut self, preparation: &Preparation, frame: usize) -> Result<usize, MappingError> {
        let Preparation {
            source,
            target,
            metadata,
            ..
        } = preparation;

        self.host.set_current_frame(*source, frame)?;
        let coordinates = self.host.get_frame_coordinates(*source, frame)?;

        let target_frame = self.host.append_frame(*target)?;
        let mut buffer = self.host.get_frame_coordinates(*target, target_frame)?;

        let beads = compute_bead_centroids(metadata, &coordinates)?;
        write_beads(&beads, &mut buffer)?;

        self.host
            .copy_box_metadata(*source, frame, *target, target_frame)?;
        self.host
            .set_frame_coordinates(*target, target_frame, buffer)?;

        Ok(target_frame)
    }

    fn report(&mut self, status: ProgressStatus, frame: usize) {
        match self.observer.as_deref_mut() {
            Some(observer) => observer.notify(status, frame),
            None => {
                if let Some(message) = host_message(status, frame) {
                    self.host.notify(&message);
                }
            }
        }
    }
}

/// Convert a host error raised while looking up the atoms to map.
fn selection_error(criteria: &SelectionCriteria, error: HostError) -> MappingError {
    match (criteria, error) {
        (SelectionCriteria::Named(name), HostError::UnknownSelection(_)) => {
            SelectionError::NotFound(name.to_owned()).into()
        }
        (_, HostError::MoleculeNotFound(id)) => SelectionError::MoleculeNotFound(id).into(),
        (_, e) => e.into(),
    }
}

/// Map a trajectory using a list of named options.
/// See [`MappingJob::from_args`] for the available options.
///
/// Progress is forwarded to the host's `notify` channel.
///
/// ## Example
/// ```
/// # use cgmap_rs::prelude::*;
/// #
/// let mut source = Molecule::new("pair", 2)
///     .with_field("mass", vec![FieldValue::Float(1.0), FieldValue::Float(3.0)]).unwrap()
///     .with_field("user", vec![FieldValue::Int(0); 2]).unwrap()
///     .with_field("user2", vec![FieldValue::Int(0), FieldValue::Int(1)]).unwrap();
/// source.add_frame(FrameCoordinateBuffer::new(vec![0.0, 0.0, 0.0, 4.0, 4.0, 4.0]), None).unwrap();
///
/// let mut host = MemoryHost::new();
/// host.add_molecule(source);
/// host.add_molecule(Molecule::new("bead", 1));
///
/// let report = cgmap(&mut host, &["-molid", "0", "-append", "1", "-weight", "mass"]).unwrap();
/// assert_eq!(report.n_frames(), 1);
/// assert_eq!(
///     host.get_frame_coordinates(MoleculeId(1), 0).unwrap().as_slice(),
///     &[3.0, 3.0, 3.0]
/// );
/// ```
pub fn cgmap<H: MolecularDataHost, S: AsRef<str>>(
    host: &mut H,
    args: &[S],
) -> Result<MappingReport, MappingError> {
    let job = MappingJob::from_args(args)?;
    MappingEngine::new(host).run(&job)
}

/******************************/
/*         UNIT TESTS         */
/******************************/
