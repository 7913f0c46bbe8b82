// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of per-atom metadata describing how atoms are mapped onto beads.

use std::ops::Range;

use getset::Getters;
use hashbrown::HashSet;

use crate::errors::{DataParseError, MappingError, SelectionError};
use crate::host::molecular::FieldValue;

/// Per-atom data of the mapped selection, all in selection order.
///
/// Atoms sharing a group label must form a single contiguous run.
/// This is not checked on construction; use [`AtomSelectionMetadata::check_contiguous`]
/// to validate it.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct AtomSelectionMetadata {
    /// Weight of each atom (typically its mass).
    #[getset(get = "pub")]
    weights: Vec<f32>,
    /// Bead-group label of each atom.
    #[getset(get = "pub")]
    labels: Vec<i64>,
    /// Index of each atom in the coordinate buffer of a frame.
    #[getset(get = "pub")]
    indices: Vec<usize>,
}

impl AtomSelectionMetadata {
    /// Create new `AtomSelectionMetadata` from weights, group labels, and coordinate indices.
    ///
    /// ## Returns
    /// - `AtomSelectionMetadata` if successful.
    /// - `SelectionError::Empty` if the vectors are empty.
    /// - `DataParseError::LengthMismatch` if the vectors differ in length.
    ///
    /// ## Example
    /// ```
    /// # use cgmap_rs::prelude::*;
    /// #
    /// let metadata = AtomSelectionMetadata::new(
    ///     vec![12.0, 1.0, 1.0, 16.0],
    ///     vec![1, 1, 1, 2],
    ///     vec![0, 1, 2, 3],
    /// ).unwrap();
    ///
    /// assert_eq!(metadata.n_atoms(), 4);
    /// assert_eq!(metadata.n_beads(), 2);
    /// ```
    pub fn new(
        weights: Vec<f32>,
        labels: Vec<i64>,
        indices: Vec<usize>,
    ) -> Result<Self, MappingError> {
        if weights.is_empty() {
            return Err(SelectionError::Empty(String::from("metadata")).into());
        }

        let n_atoms = weights.len();
        for (name, len) in [("labels", labels.len()), ("indices", indices.len())] {
            if len != n_atoms {
                return Err(DataParseError::LengthMismatch(name.to_owned(), n_atoms, len).into());
            }
        }

        Ok(AtomSelectionMetadata {
            weights,
            labels,
            indices,
        })
    }

    /// Construct `AtomSelectionMetadata` from raw per-atom fields obtained from a host.
    /// Each field is provided together with its name which is used in error messages.
    ///
    /// Group labels and indices provided as floating-point numbers are truncated toward zero.
    ///
    /// ## Returns
    /// - `AtomSelectionMetadata` if successful.
    /// - `SelectionError::Empty` if `n_atoms` is zero.
    /// - `DataParseError` if any field does not have `n_atoms` values,
    ///   if any value can not be interpreted or if any index is negative.
    pub fn from_fields(
        n_atoms: usize,
        weights: (&str, &[FieldValue]),
        labels: (&str, &[FieldValue]),
        indices: (&str, &[FieldValue]),
    ) -> Result<Self, MappingError> {
        if n_atoms == 0 {
            return Err(SelectionError::Empty(String::from("metadata")).into());
        }

        for (name, values) in [weights, labels, indices] {
            if values.len() != n_atoms {
                return Err(
                    DataParseError::LengthMismatch(name.to_owned(), n_atoms, values.len()).into(),
                );
            }
        }

        let (weight_name, weight_values) = weights;
        let parsed_weights = weight_values
            .iter()
            .map(|x| x.as_float(weight_name).map(|w| w as f32))
            .collect::<Result<Vec<f32>, DataParseError>>()?;

        let (label_name, label_values) = labels;
        let parsed_labels = label_values
            .iter()
            .map(|x| x.as_int(label_name))
            .collect::<Result<Vec<i64>, DataParseError>>()?;

        let (index_name, index_values) = indices;
        let parsed_indices = index_values
            .iter()
            .map(|x| {
                let index = x.as_int(index_name)?;
                usize::try_from(index)
                    .map_err(|_| DataParseError::NegativeIndex(index_name.to_owned(), index))
            })
            .collect::<Result<Vec<usize>, DataParseError>>()?;

        AtomSelectionMetadata::new(parsed_weights, parsed_labels, parsed_indices)
    }

    /// Number of atoms in the selection.
    #[inline(always)]
    pub fn n_atoms(&self) -> usize {
        self.weights.len()
    }

    /// Number of beads the atoms are mapped onto,
    /// i.e. the number of maximal contiguous runs of equal group labels.
    #[inline]
    pub fn n_beads(&self) -> usize {
        self.runs().count()
    }

    /// Largest coordinate index referenced by the selection.
    #[inline]
    pub fn max_index(&self) -> usize {
        self.indices.iter().copied().max().unwrap_or(0)
    }

    /// Iterate over the runs of atoms forming the individual beads.
    /// Each item is the range of selection positions of the atoms of one bead.
    #[inline]
    pub fn runs(&self) -> GroupRuns<'_> {
        GroupRuns {
            labels: &self.labels,
            start: 0,
        }
    }

    /// Check that all atoms sharing a group label form a single contiguous run.
    ///
    /// ## Returns
    /// `Ok` or `DataParseError::NonContiguousGroup` identifying the first label
    /// that appears again after its run has ended.
    ///
    /// ## Example
    /// ```
    /// # use cgmap_rs::prelude::*;
    /// #
    /// let metadata = AtomSelectionMetadata::new(
    ///     vec![1.0; 4],
    ///     vec![1, 2, 1, 3],
    ///     vec![0, 1, 2, 3],
    /// ).unwrap();
    ///
    /// assert!(metadata.check_contiguous().is_err());
    /// ```
    pub fn check_contiguous(&self) -> Result<(), DataParseError> {
        let mut finished = HashSet::new();

        for run in self.runs() {
            let label = self.labels[run.start];
            if !finished.insert(label) {
                return Err(DataParseError::NonContiguousGroup(label, run.start));
            }
        }

        Ok(())
    }
}

/// Iterator over maximal runs of equal group labels.
/// Constructed using [`AtomSelectionMetadata::runs`].
pub struct GroupRuns<'a> {
    labels: &'a [i64],
    start: usize,
}

impl Iterator for GroupRuns<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let label = *self.labels.get(self.start)?;

        let length = self.labels[self.start..]
            .iter()
            .take_while(|&&x| x == label)
            .count();

        let run = self.start..self.start + length;
        self.start = run.end;
        Some(run)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(labels: Vec<i64>) -> AtomSelectionMetadata {
        let n = labels.len();
        AtomSelectionMetadata::new(vec![1.0; n], labels, (0..n).collect()).unwrap()
    }

    #[test]
    fn new_empty() {
        match AtomSelectionMetadata::new(vec![], vec![], vec![]) {
            Err(MappingError::Selection(SelectionError::Empty(_))) => (),
            _ => panic!("Empty metadata should not be constructed."),
        }
    }

    #[test]
    fn new_length_mismatch() {
        match AtomSelectionMetadata::new(vec![1.0, 2.0], vec![0, 0], vec![0]) {
            Err(MappingError::DataParse(DataParseError::LengthMismatch(name, 2, 1))) => {
                assert_eq!(name, "indices")
            }
            _ => panic!("Metadata with inconsistent lengths should not be constructed."),
        }
    }

    #[test]
    fn runs() {
        let runs: Vec<Range<usize>> = metadata(vec![4, 4, 4, 1, 7, 7]).runs().collect();
        assert_eq!(runs, vec![0..3, 3..4, 4..6]);
    }

    #[test]
    fn runs_single() {
        let runs: Vec<Range<usize>> = metadata(vec![0]).runs().collect();
        assert_eq!(runs, vec![0..1]);
    }

    #[test]
    fn n_beads_counts_runs_not_labels() {
        assert_eq!(metadata(vec![1, 1, 2, 2, 1, 1]).n_beads(), 3);
        assert_eq!(metadata(vec![3, 3, 3]).n_beads(), 1);
        assert_eq!(metadata(vec![1, 2, 3, 4]).n_beads(), 4);
    }

    #[test]
    fn max_index() {
        let metadata =
            AtomSelectionMetadata::new(vec![1.0; 3], vec![0, 0, 1], vec![7, 2, 11]).unwrap();
        assert_eq!(metadata.max_index(), 11);
    }

    #[test]
    fn check_contiguous() {
        assert!(metadata(vec![1, 1, 2, 3, 3]).check_contiguous().is_ok());
        assert_eq!(
            metadata(vec![1, 1, 2, 3, 1]).check_contiguous(),
            Err(DataParseError::NonContiguousGroup(1, 4))
        );
    }

    #[test]
    fn from_fields() {
        let weights = vec![
            FieldValue::Float(12.011),
            FieldValue::Int(1),
            FieldValue::from("15.999"),
        ];
        let labels = vec![
            FieldValue::Float(1.0),
            FieldValue::Float(1.0),
            FieldValue::Int(2),
        ];
        let indices = vec![
            FieldValue::Float(2.0),
            FieldValue::Int(0),
            FieldValue::from("1"),
        ];

        let metadata = AtomSelectionMetadata::from_fields(
            3,
            ("user3", &weights),
            ("user", &labels),
            ("user2", &indices),
        )
        .unwrap();

        assert_eq!(metadata.weights(), &vec![12.011f32, 1.0, 15.999]);
        assert_eq!(metadata.labels(), &vec![1, 1, 2]);
        assert_eq!(metadata.indices(), &vec![2, 0, 1]);
    }

    #[test]
    fn from_fields_length_mismatch() {
        let values = vec![FieldValue::Int(0); 2];
        let short = vec![FieldValue::Int(0)];

        match AtomSelectionMetadata::from_fields(
            2,
            ("user3", &values),
            ("user", &short),
            ("user2", &values),
        ) {
            Err(MappingError::DataParse(DataParseError::LengthMismatch(name, 2, 1))) => {
                assert_eq!(name, "user")
            }
            _ => panic!("Parsing should have failed."),
        }
    }

    #[test]
    fn from_fields_invalid_weight() {
        let weights = vec![FieldValue::from("heavy")];
        let values = vec![FieldValue::Int(0)];

        match AtomSelectionMetadata::from_fields(
            1,
            ("mass", &weights),
            ("user", &values),
            ("user2", &values),
        ) {
            Err(MappingError::DataParse(DataParseError::NotAFloat(name, value))) => {
                assert_eq!(name, "mass");
                assert_eq!(value, "heavy");
            }
            _ => panic!("Parsing should have failed."),
        }
    }

    #[test]
    fn from_fields_negative_index() {
        let values = vec![FieldValue::Int(0)];
        let indices = vec![FieldValue::Float(-3.0)];

        match AtomSelectionMetadata::from_fields(
            1,
            ("mass", &values),
            ("user", &values),
            ("user2", &indices),
        ) {
            Err(MappingError::DataParse(DataParseError::NegativeIndex(name, -3))) => {
                assert_eq!(name, "user2")
            }
            _ => panic!("Parsing should have failed."),
        }
    }

    #[test]
    fn from_fields_empty() {
        match AtomSelectionMetadata::from_fields(0, ("a", &[]), ("b", &[]), ("c", &[])) {
            Err(MappingError::Selection(SelectionError::Empty(_))) => (),
            _ => panic!("Parsing should have failed."),
        }
    }
}
