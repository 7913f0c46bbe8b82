// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Configuration of a mapping job and resolution of its frame range.

use std::iter::StepBy;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::errors::{ArgumentError, RangeError};

/// Default name of the per-atom field containing atom weights.
pub const DEFAULT_WEIGHT_FIELD: &str = "user3";
/// Default name of the per-atom field containing bead-group labels.
pub const DEFAULT_GROUP_FIELD: &str = "user";
/// Default name of the per-atom field containing indices into the coordinate buffer.
pub const DEFAULT_INDEX_FIELD: &str = "user2";

/// Configuration of a single mapping job.
///
/// Can be constructed from a list of named options ([`MappingJob::from_args`]),
/// from a yaml document ([`MappingJob::from_yaml_str`], [`MappingJob::from_yaml_file`]),
/// or using the `with_*` methods.
///
/// ## Example
/// ```
/// # use cgmap_rs::prelude::*;
/// #
/// let job = MappingJob::from_args(&["-molid", "0", "-append", "1", "-first", "10", "-stride", "2"]).unwrap();
/// assert_eq!(job, MappingJob::default().with_target(1).with_first(10).with_stride(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, CopyGetters)]
#[serde(deny_unknown_fields, default)]
pub struct MappingJob {
    /// Molecule to map. Ignored if `selection` is provided. Default: 0.
    #[getset(get_copy = "pub")]
    molecule: usize,
    /// Molecule the mapped frames are appended to. Default: 0.
    #[getset(get_copy = "pub")]
    target: usize,
    /// Name of a selection defined in the host. Overrides `molecule`. Default: None.
    #[getset(get = "pub")]
    selection: Option<String>,
    /// First frame to map. Default: 0.
    #[getset(get_copy = "pub")]
    first: i64,
    /// Last frame to map (inclusive). -1 means the last frame of the trajectory. Default: -1.
    #[getset(get_copy = "pub")]
    last: i64,
    /// Map every `stride`th frame. Default: 1.
    #[getset(get_copy = "pub")]
    stride: i64,
    /// Per-atom field with weights of the atoms. Default: "user3".
    #[getset(get = "pub")]
    weight_field: String,
    /// Per-atom field with bead-group labels. Default: "user".
    #[getset(get = "pub")]
    group_field: String,
    /// Per-atom field with indices into the coordinate buffer. Default: "user2".
    #[getset(get = "pub")]
    index_field: String,
    /// Check that atoms of each group are contiguous before mapping. Default: false.
    #[getset(get_copy = "pub")]
    check_groups: bool,
}

impl Default for MappingJob {
    fn default() -> Self {
        MappingJob {
            molecule: 0,
            target: 0,
            selection: None,
            first: 0,
            last: -1,
            stride: 1,
            weight_field: DEFAULT_WEIGHT_FIELD.to_owned(),
            group_field: DEFAULT_GROUP_FIELD.to_owned(),
            index_field: DEFAULT_INDEX_FIELD.to_owned(),
            check_groups: false,
        }
    }
}

/// Get the value following an option.
fn next_value<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    option: &str,
) -> Result<&'a str, ArgumentError> {
    args.next()
        .ok_or_else(|| ArgumentError::MissingValue(option.to_owned()))
}

/// Parse the value of an option.
fn parse_value<T: FromStr>(option: &str, value: &str) -> Result<T, ArgumentError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ArgumentError::InvalidValue(option.to_owned(), value.to_owned()))
}

/// Parse the value of a boolean option.
fn parse_bool(option: &str, value: &str) -> Result<bool, ArgumentError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ArgumentError::InvalidValue(
            option.to_owned(),
            value.to_owned(),
        )),
    }
}

impl MappingJob {
    /// Construct a `MappingJob` from a list of named options.
    ///
    /// ## Options
    /// - `-molid <int>`: molecule to map
    /// - `-append <int>`: molecule to append the mapped frames to
    /// - `-sel <name>`: selection to map (overrides `-molid`)
    /// - `-first <int>`, `-last <int>`, `-stride <int>`: frame range
    /// - `-weight <field>`, `-blockid <field>`, `-order <field>`: names of the per-atom fields
    ///   with weights, bead-group labels, and coordinate indices
    /// - `-check <bool>`: validate that the groups are contiguous
    ///
    /// ## Returns
    /// `MappingJob` or `ArgumentError` if any option is unknown, lacks its value or
    /// its value can not be parsed.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ArgumentError> {
        let mut job = MappingJob::default();
        let mut iter = args.iter().map(|x| x.as_ref());

        while let Some(option) = iter.next() {
            let value = match option {
                "-molid" | "-append" | "-sel" | "-first" | "-last" | "-stride" | "-weight"
                | "-blockid" | "-order" | "-check" => next_value(&mut iter, option)?,
                _ => return Err(ArgumentError::UnknownOption(option.to_owned())),
            };

            match option {
                "-molid" => job.molecule = parse_value(option, value)?,
                "-append" => job.target = parse_value(option, value)?,
                "-sel" => job.selection = Some(value.to_owned()),
                "-first" => job.first = parse_value(option, value)?,
                "-last" => job.last = parse_value(option, value)?,
                "-stride" => job.stride = parse_value(option, value)?,
                "-weight" => job.weight_field = value.to_owned(),
                "-blockid" => job.group_field = value.to_owned(),
                "-order" => job.index_field = value.to_owned(),
                "-check" => job.check_groups = parse_bool(option, value)?,
                _ => unreachable!("FATAL CGMAP ERROR | MappingJob::from_args | Option should have been rejected."),
            }
        }

        Ok(job)
    }

    /// Construct a `MappingJob` from a yaml document.
    /// Missing keys take their default values, unknown keys are rejected.
    ///
    /// ## Example
    /// ```
    /// # use cgmap_rs::prelude::*;
    /// #
    /// let job = MappingJob::from_yaml_str("
    /// target: 1
    /// selection: lipids
    /// last: 100
    /// weight_field: mass
    /// ").unwrap();
    ///
    /// assert_eq!(job.target(), 1);
    /// assert_eq!(job.selection().as_deref(), Some("lipids"));
    /// assert_eq!(job.last(), 100);
    /// assert_eq!(job.weight_field(), "mass");
    /// assert_eq!(job.stride(), 1);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ArgumentError> {
        serde_yaml::from_str(yaml).map_err(|e| ArgumentError::InvalidConfig(e.to_string()))
    }

    /// Read a `MappingJob` from a yaml file.
    ///
    /// ## Returns
    /// `MappingJob` or `ArgumentError` if the file does not exist or can not be deserialized.
    pub fn from_yaml_file(filename: impl AsRef<Path>) -> Result<Self, ArgumentError> {
        let content = std::fs::read_to_string(filename.as_ref())
            .map_err(|_| ArgumentError::FileNotFound(Box::from(filename.as_ref())))?;

        MappingJob::from_yaml_str(&content)
    }

    pub fn with_molecule(mut self, molecule: usize) -> Self {
        self.molecule = molecule;
        self
    }

    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    pub fn with_selection(mut self, selection: &str) -> Self {
        self.selection = Some(selection.to_owned());
        self
    }

    pub fn with_first(mut self, first: i64) -> Self {
        self.first = first;
        self
    }

    pub fn with_last(mut self, last: i64) -> Self {
        self.last = last;
        self
    }

    pub fn with_stride(mut self, stride: i64) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_weight_field(mut self, field: &str) -> Self {
        self.weight_field = field.to_owned();
        self
    }

    pub fn with_group_field(mut self, field: &str) -> Self {
        self.group_field = field.to_owned();
        self
    }

    pub fn with_index_field(mut self, field: &str) -> Self {
        self.index_field = field.to_owned();
        self
    }

    pub fn with_check_groups(mut self, check: bool) -> Self {
        self.check_groups = check;
        self
    }
}

/// Validated range of frames to map.
///
/// Frames from `first` to `last` (both inclusive) are mapped with the given `stride`,
/// never reaching past the end of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct FrameRange {
    /// First frame to map.
    first: usize,
    /// Normalized last frame. May be equal to the number of frames in the trajectory.
    last: usize,
    /// Step between the mapped frames.
    stride: usize,
    /// Exclusive upper bound of the mapped frames.
    end: usize,
    /// Progress is reported for frames divisible by this interval.
    progress_interval: usize,
}

impl FrameRange {
    /// Validate and normalize the frame bounds for a trajectory with `n_frames` frames.
    ///
    /// - `first` must be in range `0..n_frames`.
    /// - `last` is set to `n_frames` if it is -1, lower than `first`, or higher than `n_frames`.
    /// - `stride` must be positive.
    ///
    /// The progress interval is `(last - first) / 10` clamped to `10..=100`.
    ///
    /// ## Returns
    /// `FrameRange` or `RangeError` if `first` or `stride` is invalid.
    ///
    /// ## Example
    /// ```
    /// # use cgmap_rs::prelude::*;
    /// #
    /// let range = FrameRange::resolve(0, -1, 1, 50).unwrap();
    /// assert_eq!(range.iter().collect::<Vec<usize>>(), (0..50).collect::<Vec<usize>>());
    ///
    /// let range = FrameRange::resolve(5, 5, 1, 50).unwrap();
    /// assert_eq!(range.iter().collect::<Vec<usize>>(), vec![5]);
    /// ```
    pub fn resolve(
        first: i64,
        last: i64,
        stride: i64,
        n_frames: usize,
    ) -> Result<FrameRange, RangeError> {
        if first < 0 || first >= n_frames as i64 {
            return Err(RangeError::FirstOutOfRange(first, n_frames));
        }

        if stride <= 0 {
            return Err(RangeError::InvalidStride(stride));
        }

        let last = if last == -1 || last < first || last > n_frames as i64 {
            n_frames
        } else {
            last as usize
        };

        let first = first as usize;
        let progress_interval = ((last - first) / 10).clamp(10, 100);

        Ok(FrameRange {
            first,
            last,
            stride: stride as usize,
            end: last.min(n_frames - 1) + 1,
            progress_interval,
        })
    }

    /// Iterate over the indices of the frames to map.
    #[inline]
    pub fn iter(&self) -> StepBy<Range<usize>> {
        (self.first..self.end).step_by(self.stride)
    }

    /// Number of frames that will be mapped.
    #[inline]
    pub fn n_frames(&self) -> usize {
        (self.end - self.first).div_ceil(self.stride)
    }

    /// Returns `true` if progress should be reported when mapping `frame`.
    #[inline(always)]
    pub fn is_progress_frame(&self, frame: usize) -> bool {
        frame % self.progress_interval == 0
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
