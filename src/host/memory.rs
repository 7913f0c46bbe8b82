// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! In-memory implementation of the molecular data host.

use getset::{CopyGetters, Getters};
use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::errors::{DataParseError, HostError};
use crate::host::molecular::{
    FieldValue, MolecularDataHost, MoleculeId, SelectionCriteria, SelectionHandle,
};
use crate::structures::{frame::FrameCoordinateBuffer, simbox::SimBox};

/// Name of the per-atom field which is always available and
/// contains the index of the atom in the molecule.
pub const INDEX_FIELD: &str = "index";

/// Single trajectory frame of a molecule.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Frame {
    /// Coordinates of all atoms of the molecule.
    #[getset(get = "pub")]
    coordinates: FrameCoordinateBuffer,
    /// Periodic boundary conditions of the frame. (Optional.)
    #[getset(get = "pub")]
    simbox: Option<SimBox>,
}

/// Molecule stored in the `MemoryHost`.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Molecule {
    /// Name of the molecule.
    #[getset(get = "pub")]
    name: String,
    /// Number of atoms.
    #[getset(get_copy = "pub")]
    n_atoms: usize,
    /// Named per-atom properties.
    fields: IndexMap<String, Vec<FieldValue>>,
    /// Trajectory of the molecule.
    #[getset(get = "pub")]
    frames: Vec<Frame>,
    /// Currently active frame.
    #[getset(get_copy = "pub")]
    current_frame: usize,
}

impl Molecule {
    /// Create a new molecule with `n_atoms` atoms, no fields and no frames.
    pub fn new(name: &str, n_atoms: usize) -> Self {
        Molecule {
            name: name.to_owned(),
            n_atoms,
            fields: IndexMap::new(),
            frames: Vec::new(),
            current_frame: 0,
        }
    }

    /// Set per-atom property `name` for all atoms of the molecule.
    /// Replaces the property if it already exists.
    ///
    /// ## Returns
    /// `Ok` or `DataParseError::LengthMismatch` if the number of values does not match the number of atoms.
    pub fn set_field(
        &mut self,
        name: &str,
        values: Vec<FieldValue>,
    ) -> Result<(), DataParseError> {
        if values.len() != self.n_atoms {
            return Err(DataParseError::LengthMismatch(
                name.to_owned(),
                self.n_atoms,
                values.len(),
            ));
        }

        self.fields.insert(name.to_owned(), values);
        Ok(())
    }

    /// Builder variant of [`Molecule::set_field`].
    pub fn with_field(
        mut self,
        name: &str,
        values: Vec<FieldValue>,
    ) -> Result<Self, DataParseError> {
        self.set_field(name, values)?;
        Ok(self)
    }

    /// Get the values of a per-atom property for all atoms.
    pub fn get_field(&self, name: &str) -> Option<&[FieldValue]> {
        self.fields.get(name).map(|x| x.as_slice())
    }

    /// Add a frame to the end of the trajectory. Returns the index of the frame.
    ///
    /// ## Returns
    /// Index of the frame or `HostError::BufferSize` if the buffer does not match the number of atoms.
    pub fn add_frame(
        &mut self,
        coordinates: FrameCoordinateBuffer,
        simbox: Option<SimBox>,
    ) -> Result<usize, HostError> {
        if coordinates.n_atoms() != self.n_atoms {
            return Err(HostError::BufferSize(3 * self.n_atoms, coordinates.len()));
        }

        self.frames.push(Frame {
            coordinates,
            simbox,
        });

        Ok(self.frames.len() - 1)
    }

    /// Get the number of frames of the trajectory.
    #[inline(always)]
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn get_frame(&self, id: MoleculeId, frame: usize) -> Result<&Frame, HostError> {
        self.frames
            .get(frame)
            .ok_or(HostError::FrameNotFound(id.0, frame))
    }

    fn get_frame_mut(&mut self, id: MoleculeId, frame: usize) -> Result<&mut Frame, HostError> {
        self.frames
            .get_mut(frame)
            .ok_or(HostError::FrameNotFound(id.0, frame))
    }
}

/// Atoms of a resolved selection.
#[derive(Debug, Clone)]
struct ResolvedSelection {
    molecule: MoleculeId,
    atoms: Vec<usize>,
}

/// Molecular data host keeping all molecules and their trajectories in memory.
///
/// ## Example
/// ```
/// # use cgmap_rs::prelude::*;
/// #
/// let mut host = MemoryHost::new();
/// let mut molecule = Molecule::new("water", 3);
/// molecule
///     .add_frame(FrameCoordinateBuffer::zeros(3), Some(SimBox::from([3.0, 3.0, 3.0])))
///     .unwrap();
///
/// let id = host.add_molecule(molecule);
/// assert_eq!(host.frame_count(id).unwrap(), 1);
/// assert_eq!(host.atom_count(id).unwrap(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    /// Molecules indexed by their `MoleculeId`.
    molecules: Vec<Molecule>,
    /// Named selections: molecule and indices of the selected atoms.
    selections: HashMap<String, (MoleculeId, Vec<usize>)>,
    /// Live resolved selections, indexed by `SelectionHandle`.
    resolved: HashMap<usize, ResolvedSelection>,
    /// Handle assigned to the next resolved selection.
    next_handle: usize,
    /// Messages received through `notify`.
    notifications: Vec<String>,
}

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        MemoryHost::default()
    }

    /// Add a molecule to the host. Returns identifier of the molecule.
    pub fn add_molecule(&mut self, molecule: Molecule) -> MoleculeId {
        self.molecules.push(molecule);
        MoleculeId(self.molecules.len() - 1)
    }

    /// Get reference to a molecule.
    pub fn get_molecule(&self, id: MoleculeId) -> Option<&Molecule> {
        self.molecules.get(id.0)
    }

    /// Get mutable reference to a molecule.
    pub fn get_molecule_mut(&mut self, id: MoleculeId) -> Option<&mut Molecule> {
        self.molecules.get_mut(id.0)
    }

    /// Define a named selection consisting of atoms of `molecule` with the given indices.
    /// The order of `atoms` is the selection order. Replaces selection with the same name.
    ///
    /// ## Returns
    /// `Ok` or `HostError` if the molecule does not exist or if any of the atoms does not exist.
    pub fn selection_create(
        &mut self,
        name: &str,
        molecule: MoleculeId,
        atoms: Vec<usize>,
    ) -> Result<(), HostError> {
        let n_atoms = self.molecule(molecule)?.n_atoms;
        if let Some(&invalid) = atoms.iter().find(|&&atom| atom >= n_atoms) {
            return Err(HostError::Failed(format!(
                "atom `{}` of selection `{}` does not exist in molecule `{}`",
                invalid, name, molecule
            )));
        }

        self.selections.insert(name.to_owned(), (molecule, atoms));
        Ok(())
    }

    /// Number of resolved selections that have not been released yet.
    pub fn n_resolved(&self) -> usize {
        self.resolved.len()
    }

    /// Messages received through `notify` in the order of arrival.
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    fn molecule(&self, id: MoleculeId) -> Result<&Molecule, HostError> {
        self.molecules
            .get(id.0)
            .ok_or(HostError::MoleculeNotFound(id.0))
    }

    fn molecule_mut(&mut self, id: MoleculeId) -> Result<&mut Molecule, HostError> {
        self.molecules
            .get_mut(id.0)
            .ok_or(HostError::MoleculeNotFound(id.0))
    }

    fn selection(&self, handle: SelectionHandle) -> Result<&ResolvedSelection, HostError> {
        self.resolved
            .get(&handle.0)
            .ok_or(HostError::SelectionNotFound(handle.0))
    }
}

impl MolecularDataHost for MemoryHost {
    fn resolve_selection(
        &mut self,
        criteria: &SelectionCriteria,
    ) -> Result<SelectionHandle, HostError> {
        let selection = match criteria {
            SelectionCriteria::All(molecule) => ResolvedSelection {
                molecule: *molecule,
                atoms: (0..self.molecule(*molecule)?.n_atoms).collect(),
            },
            SelectionCriteria::Named(name) => match self.selections.get(name) {
                Some((molecule, atoms)) => ResolvedSelection {
                    molecule: *molecule,
                    atoms: atoms.clone(),
                },
                None => return Err(HostError::UnknownSelection(name.to_owned())),
            },
        };

        let handle = self.next_handle;
        self.next_handle += 1;
        self.resolved.insert(handle, selection);
        Ok(SelectionHandle(handle))
    }

    fn release_selection(&mut self, handle: SelectionHandle) -> Result<(), HostError> {
        self.resolved
            .remove(&handle.0)
            .map(|_| ())
            .ok_or(HostError::SelectionNotFound(handle.0))
    }

    fn selection_size(&self, handle: SelectionHandle) -> Result<usize, HostError> {
        Ok(self.selection(handle)?.atoms.len())
    }

    fn selection_molecule(&self, handle: SelectionHandle) -> Result<MoleculeId, HostError> {
        Ok(self.selection(handle)?.molecule)
    }

    fn get_per_atom_field(
        &self,
        handle: SelectionHandle,
        field: &str,
    ) -> Result<Vec<FieldValue>, HostError> {
        let selection = self.selection(handle)?;
        let molecule = self.molecule(selection.molecule)?;

        match molecule.get_field(field) {
            Some(values) => Ok(selection
                .atoms
                .iter()
                .map(|&atom| values[atom].clone())
                .collect()),
            None if field == INDEX_FIELD => Ok(selection
                .atoms
                .iter()
                .map(|&atom| FieldValue::Int(atom as i64))
                .collect()),
            None => Err(HostError::FieldNotFound(field.to_owned())),
        }
    }

    fn frame_count(&self, molecule: MoleculeId) -> Result<usize, HostError> {
        Ok(self.molecule(molecule)?.n_frames())
    }

    fn atom_count(&self, molecule: MoleculeId) -> Result<usize, HostError> {
        Ok(self.molecule(molecule)?.n_atoms)
    }

    fn current_frame(&self, molecule: MoleculeId) -> Result<usize, HostError> {
        Ok(self.molecule(molecule)?.current_frame)
    }

    fn set_current_frame(&mut self, molecule: MoleculeId, frame: usize) -> Result<(), HostError> {
        let mol = self.molecule_mut(molecule)?;
        if frame >= mol.n_frames() {
            return Err(HostError::FrameNotFound(molecule.0, frame));
        }

        mol.current_frame = frame;
        Ok(())
    }

    fn get_frame_coordinates(
        &self,
        molecule: MoleculeId,
        frame: usize,
    ) -> Result<FrameCoordinateBuffer, HostError> {
        Ok(self
            .molecule(molecule)?
            .get_frame(molecule, frame)?
            .coordinates
            .clone())
    }

    /// The new frame is a copy of the currently active frame
    /// (or an empty frame if the molecule has no frames) and becomes the active frame.
    fn append_frame(&mut self, molecule: MoleculeId) -> Result<usize, HostError> {
        let mol = self.molecule_mut(molecule)?;

        let frame = match mol.frames.get(mol.current_frame) {
            Some(current) => current.clone(),
            None => Frame {
                coordinates: FrameCoordinateBuffer::zeros(mol.n_atoms),
                simbox: None,
            },
        };

        mol.frames.push(frame);
        mol.current_frame = mol.frames.len() - 1;
        Ok(mol.current_frame)
    }

    fn set_frame_coordinates(
        &mut self,
        molecule: MoleculeId,
        frame: usize,
        buffer: FrameCoordinateBuffer,
    ) -> Result<(), HostError> {
        let mol = self.molecule_mut(molecule)?;
        if buffer.n_atoms() != mol.n_atoms {
            return Err(HostError::BufferSize(3 * mol.n_atoms, buffer.len()));
        }

        mol.get_frame_mut(molecule, frame)?.coordinates = buffer;
        Ok(())
    }

    fn copy_box_metadata(
        &mut self,
        source: MoleculeId,
        source_frame: usize,
        target: MoleculeId,
        target_frame: usize,
    ) -> Result<(), HostError> {
        let simbox = self
            .molecule(source)?
            .get_frame(source, source_frame)?
            .simbox
            .clone();

        self.molecule_mut(target)?
            .get_frame_mut(target, target_frame)?
            .simbox = simbox;
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_owned());
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::vector3d::Vector3D;

    fn molecule_with_frames(n_atoms: usize, n_frames: usize) -> Molecule {
        let mut molecule = Molecule::new("test", n_atoms);
        for frame in 0..n_frames {
            let coordinates =
                FrameCoordinateBuffer::new(vec![frame as f32; 3 * n_atoms]);
            molecule
                .add_frame(coordinates, Some(SimBox::from([frame as f32 + 1.0; 3])))
                .unwrap();
        }

        molecule
    }

    #[test]
    fn add_frame_invalid_size() {
        let mut molecule = Molecule::new("test", 4);
        assert_eq!(
            molecule.add_frame(FrameCoordinateBuffer::zeros(3), None),
            Err(HostError::BufferSize(12, 9))
        );
    }

    #[test]
    fn set_field_invalid_length() {
        let molecule = Molecule::new("test", 2);
        match molecule.with_field("mass", vec![FieldValue::Float(1.0)]) {
            Err(DataParseError::LengthMismatch(field, 2, 1)) => assert_eq!(field, "mass"),
            _ => panic!("Setting the field should have failed."),
        }
    }

    #[test]
    fn resolve_all() {
        let mut host = MemoryHost::new();
        let id = host.add_molecule(molecule_with_frames(5, 1));

        let handle = host
            .resolve_selection(&SelectionCriteria::All(id))
            .unwrap();
        assert_eq!(host.selection_size(handle).unwrap(), 5);
        assert_eq!(host.selection_molecule(handle).unwrap(), id);
    }

    #[test]
    fn resolve_named() {
        let mut host = MemoryHost::new();
        host.add_molecule(molecule_with_frames(2, 1));
        let id = host.add_molecule(molecule_with_frames(5, 1));
        host.selection_create("tail", id, vec![4, 2]).unwrap();

        let handle = host
            .resolve_selection(&SelectionCriteria::Named(String::from("tail")))
            .unwrap();
        assert_eq!(host.selection_size(handle).unwrap(), 2);
        assert_eq!(host.selection_molecule(handle).unwrap(), MoleculeId(1));

        let indices = host.get_per_atom_field(handle, INDEX_FIELD).unwrap();
        assert_eq!(indices, vec![FieldValue::Int(4), FieldValue::Int(2)]);
    }

    #[test]
    fn resolve_fails() {
        let mut host = MemoryHost::new();
        assert_eq!(
            host.resolve_selection(&SelectionCriteria::All(MoleculeId(0))),
            Err(HostError::MoleculeNotFound(0))
        );
        assert_eq!(
            host.resolve_selection(&SelectionCriteria::Named(String::from("missing"))),
            Err(HostError::UnknownSelection(String::from("missing")))
        );
    }

    #[test]
    fn release_selection() {
        let mut host = MemoryHost::new();
        let id = host.add_molecule(molecule_with_frames(3, 1));

        let first = host.resolve_selection(&SelectionCriteria::All(id)).unwrap();
        let second = host.resolve_selection(&SelectionCriteria::All(id)).unwrap();
        assert_ne!(first, second);
        assert_eq!(host.n_resolved(), 2);

        host.release_selection(first).unwrap();
        assert_eq!(host.n_resolved(), 1);
        assert_eq!(
            host.selection_size(first),
            Err(HostError::SelectionNotFound(first.0))
        );
        assert_eq!(host.selection_size(second).unwrap(), 3);

        assert_eq!(
            host.release_selection(first),
            Err(HostError::SelectionNotFound(first.0))
        );

        // released handles are never reused
        let third = host.resolve_selection(&SelectionCriteria::All(id)).unwrap();
        assert_ne!(third, first);
        assert_ne!(third, second);
    }

    #[test]
    fn selection_create_invalid_atom() {
        let mut host = MemoryHost::new();
        let id = host.add_molecule(molecule_with_frames(3, 1));
        assert!(host.selection_create("invalid", id, vec![0, 3]).is_err());
    }

    #[test]
    fn per_atom_field() {
        let mut host = MemoryHost::new();
        let molecule = molecule_with_frames(3, 1)
            .with_field(
                "mass",
                vec![
                    FieldValue::Float(12.0),
                    FieldValue::Float(1.0),
                    FieldValue::Float(16.0),
                ],
            )
            .unwrap();
        let id = host.add_molecule(molecule);
        host.selection_create("sel", id, vec![2, 0]).unwrap();
        let handle = host
            .resolve_selection(&SelectionCriteria::Named(String::from("sel")))
            .unwrap();

        assert_eq!(
            host.get_per_atom_field(handle, "mass").unwrap(),
            vec![FieldValue::Float(16.0), FieldValue::Float(12.0)]
        );
        assert_eq!(
            host.get_per_atom_field(handle, "charge"),
            Err(HostError::FieldNotFound(String::from("charge")))
        );
        assert_eq!(
            host.get_per_atom_field(SelectionHandle(7), "mass"),
            Err(HostError::SelectionNotFound(7))
        );
    }

    #[test]
    fn current_frame() {
        let mut host = MemoryHost::new();
        let id = host.add_molecule(molecule_with_frames(2, 3));

        assert_eq!(host.current_frame(id).unwrap(), 0);
        host.set_current_frame(id, 2).unwrap();
        assert_eq!(host.current_frame(id).unwrap(), 2);
        assert_eq!(
            host.set_current_frame(id, 3),
            Err(HostError::FrameNotFound(0, 3))
        );
    }

    #[test]
    fn append_frame_duplicates_current() {
        let mut host = MemoryHost::new();
        let id = host.add_molecule(molecule_with_frames(2, 3));
        host.set_current_frame(id, 1).unwrap();

        let new = host.append_frame(id).unwrap();
        assert_eq!(new, 3);
        assert_eq!(host.frame_count(id).unwrap(), 4);
        assert_eq!(host.current_frame(id).unwrap(), 3);

        let molecule = host.get_molecule(id).unwrap();
        assert_eq!(molecule.frames()[3], molecule.frames()[1]);
    }

    #[test]
    fn append_frame_empty_molecule() {
        let mut host = MemoryHost::new();
        let id = host.add_molecule(Molecule::new("empty", 4));

        assert_eq!(host.append_frame(id).unwrap(), 0);
        let molecule = host.get_molecule(id).unwrap();
        assert_eq!(molecule.frames()[0].coordinates(), &FrameCoordinateBuffer::zeros(4));
        assert!(molecule.frames()[0].simbox().is_none());
    }

    #[test]
    fn set_frame_coordinates() {
        let mut host = MemoryHost::new();
        let id = host.add_molecule(molecule_with_frames(2, 2));

        let mut buffer = host.get_frame_coordinates(id, 1).unwrap();
        buffer
            .set_position(0, &Vector3D::new(-1.0, -2.0, -3.0))
            .unwrap();
        host.set_frame_coordinates(id, 1, buffer.clone()).unwrap();

        assert_eq!(host.get_frame_coordinates(id, 1).unwrap(), buffer);
        assert_eq!(
            host.set_frame_coordinates(id, 1, FrameCoordinateBuffer::zeros(3)),
            Err(HostError::BufferSize(6, 9))
        );
        assert_eq!(
            host.set_frame_coordinates(id, 5, FrameCoordinateBuffer::zeros(2)),
            Err(HostError::FrameNotFound(0, 5))
        );
    }

    #[test]
    fn copy_box_metadata() {
        let mut host = MemoryHost::new();
        let source = host.add_molecule(molecule_with_frames(4, 3));
        let target = host.add_molecule(Molecule::new("target", 2));
        let frame = host.append_frame(target).unwrap();

        host.copy_box_metadata(source, 2, target, frame).unwrap();
        assert_eq!(
            host.get_molecule(target).unwrap().frames()[0].simbox(),
            &Some(SimBox::from([3.0, 3.0, 3.0]))
        );

        assert_eq!(
            host.copy_box_metadata(source, 3, target, frame),
            Err(HostError::FrameNotFound(0, 3))
        );
    }

    #[test]
    fn notify() {
        let mut host = MemoryHost::new();
        host.notify("first");
        host.notify("second");
        assert_eq!(host.notifications(), &["first", "second"]);
    }
}
