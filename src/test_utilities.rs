// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Small functions for testing purposes.

#[cfg(test)]
pub(crate) mod utilities {
    use crate::host::memory::{MemoryHost, Molecule};
    use crate::host::molecular::{FieldValue, MoleculeId};
    use crate::structures::{
        frame::FrameCoordinateBuffer, simbox::SimBox, vector3d::Vector3D,
    };
    use float_cmp::assert_approx_eq;

    /// Weights of the atoms of the source molecule.
    pub(crate) const WEIGHTS: [f64; 6] = [1.0, 1.0, 2.0, 1.0, 3.0, 1.0];
    /// Group labels of the atoms of the source molecule. Three beads.
    pub(crate) const LABELS: [i64; 6] = [1, 1, 1, 2, 2, 3];

    /// Position of source atom `atom` in frame `frame`.
    pub(crate) fn atom_position(atom: usize, frame: usize) -> Vector3D {
        Vector3D::new(atom as f32 + frame as f32, frame as f32, 0.5 * atom as f32)
    }

    /// Expected centroids of the three beads of the source molecule in frame `frame`.
    pub(crate) fn expected_beads(frame: usize) -> [Vector3D; 3] {
        let f = frame as f32;
        [
            Vector3D::new(1.25 + f, f, 0.625),
            Vector3D::new(3.75 + f, f, 1.875),
            Vector3D::new(5.0 + f, f, 2.5),
        ]
    }

    /// Source molecule with six atoms and `n_frames` frames.
    /// Weights, labels and indices are stored in the default fields ("user3", "user", "user2").
    /// Indices are stored as floats.
    pub(crate) fn source_molecule(n_frames: usize) -> Molecule {
        let mut molecule = Molecule::new("source", WEIGHTS.len())
            .with_field(
                "user3",
                WEIGHTS.iter().map(|&w| FieldValue::Float(w)).collect(),
            )
            .unwrap()
            .with_field(
                "user",
                LABELS.iter().map(|&l| FieldValue::Float(l as f64)).collect(),
            )
            .unwrap()
            .with_field(
                "user2",
                (0..WEIGHTS.len())
                    .map(|i| FieldValue::Float(i as f64))
                    .collect(),
            )
            .unwrap();

        for frame in 0..n_frames {
            let coordinates = (0..WEIGHTS.len())
                .map(|atom| atom_position(atom, frame))
                .collect::<Vec<Vector3D>>();

            molecule
                .add_frame(
                    FrameCoordinateBuffer::from(coordinates),
                    Some(SimBox::from([frame as f32 + 1.0; 3])),
                )
                .unwrap();
        }

        molecule
    }

    /// Host with a source molecule (id 0) with `n_frames` frames
    /// and an empty target molecule (id 1) with `target_atoms` atoms.
    pub(crate) fn mapping_host(
        n_frames: usize,
        target_atoms: usize,
    ) -> (MemoryHost, MoleculeId, MoleculeId) {
        let mut host = MemoryHost::new();
        let source = host.add_molecule(source_molecule(n_frames));
        let target = host.add_molecule(Molecule::new("target", target_atoms));

        (host, source, target)
    }

    /// Check that the first three positions of `buffer` are the beads of source frame `frame`.
    pub(crate) fn compare_beads(buffer: &FrameCoordinateBuffer, frame: usize) {
        for (i, expected) in expected_beads(frame).iter().enumerate() {
            let position = buffer.get_position(i).unwrap();
            assert_approx_eq!(f32, position.x, expected.x, epsilon = 1e-5);
            assert_approx_eq!(f32, position.y, expected.y, epsilon = 1e-5);
            assert_approx_eq!(f32, position.z, expected.z, epsilon = 1e-5);
        }
    }
}
