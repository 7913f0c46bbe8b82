// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Reporting the progress of trajectory mapping.

use colored::{ColoredString, Colorize};
use std::io::Write;

/// Progress of trajectory mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    /// Mapping is in progress.
    Running,
    /// All frames have been mapped.
    Completed,
    /// Mapping failed.
    Failed,
}

/// Any structure implementing this trait can observe the progress of a mapping job.
///
/// The engine calls `notify` with `ProgressStatus::Running` at the progress interval
/// of the job, then once with `ProgressStatus::Completed` or `ProgressStatus::Failed`.
/// `frame` is the index of the source frame being mapped (or the last frame attempted).
pub trait ProgressObserver {
    fn notify(&mut self, status: ProgressStatus, frame: usize);
}

/// Observer that ignores all progress reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    #[inline(always)]
    fn notify(&mut self, _status: ProgressStatus, _frame: usize) {}
}

/// Collects all reports. Useful for testing.
impl ProgressObserver for Vec<(ProgressStatus, usize)> {
    fn notify(&mut self, status: ProgressStatus, frame: usize) {
        self.push((status, frame));
    }
}

/// Message forwarded to the host's notification channel for the given report.
/// Only `ProgressStatus::Running` reports are forwarded.
pub(crate) fn host_message(status: ProgressStatus, frame: usize) -> Option<String> {
    match status {
        ProgressStatus::Running => Some(format!("CGit> Mapping frame {}", frame)),
        ProgressStatus::Completed | ProgressStatus::Failed => None,
    }
}

/// String that can be used inside `ProgressPrinter`.
#[derive(Debug, Clone, PartialEq)]
struct ProgressMessage {
    msg: ColoredString,
}

impl ProgressMessage {
    /// Create new `ProgressMessage`.
    ///
    /// ## Panics
    /// Panics if the string is longer than 9 characters.
    fn new(string: ColoredString) -> Self {
        if string.chars().count() > 9 {
            panic!("FATAL CGMAP ERROR | ProgressMessage::new | `ProgressMessage` can not be longer than 9 characters.");
        }

        ProgressMessage { msg: string }
    }

    /// Format the message, padding it to 9 characters.
    fn format(&self, colored: bool) -> String {
        if colored {
            format!("[{: ^9}]   ", self.msg)
        } else {
            format!("[{: ^9}]   ", self.msg.as_ref() as &str)
        }
    }
}

/// Observer printing the progress of mapping into a stream.
///
/// ## Example
/// ```no_run
/// use cgmap_rs::prelude::*;
/// use colored::Colorize;
///
/// let mut printer = ProgressPrinter::new()
///     .with_running_msg("MAPPING".yellow())
///     .with_completed_msg("DONE".blue());
///
/// let mut host = MemoryHost::new();
/// // ... add the source and target molecules ...
///
/// let job = MappingJob::default().with_target(1);
/// let report = MappingEngine::new(&mut host)
///     .with_observer(&mut printer)
///     .run(&job)
///     .unwrap();
/// ```
pub struct ProgressPrinter {
    /// Stream to write the progress info to. Default: standard output.
    output: Box<dyn Write>,
    /// If true, the output will be colored. Default: true.
    colored: bool,
    /// String to be printed with the frame number. Default: "Frame".cyan().
    frame_msg: ColoredString,
    /// Default: "RUNNING".yellow().
    running_msg: ProgressMessage,
    /// Default: "COMPLETED".green().
    completed_msg: ProgressMessage,
    /// Default: "FAILED!".red().
    failed_msg: ProgressMessage,
    /// String terminating the progress message. Default: `\r` (carriage return).
    terminating: String,
}

impl ProgressPrinter {
    /// Create an instance of `ProgressPrinter` with default parameters.
    pub fn new() -> Self {
        ProgressPrinter {
            output: Box::from(std::io::stdout()),
            colored: true,
            frame_msg: "Frame".cyan(),
            running_msg: ProgressMessage::new("RUNNING".yellow()),
            completed_msg: ProgressMessage::new("COMPLETED".green()),
            failed_msg: ProgressMessage::new("FAILED!".red()),
            terminating: String::from("\r"),
        }
    }

    /// Create new `ProgressPrinter` with specific `output` stream.
    pub fn with_output(mut self, stream: Box<dyn Write>) -> Self {
        self.output = stream;
        self
    }

    /// Create new `ProgressPrinter` with specific value for `colored`.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Create new `ProgressPrinter` with specific value for `frame_msg`.
    pub fn with_frame_msg(mut self, frame_msg: ColoredString) -> Self {
        self.frame_msg = frame_msg;
        self
    }

    /// Create new `ProgressPrinter` with specific value for `running_msg`.
    ///
    /// ## Panics
    /// Panics if the `running_msg` is longer than 9 characters.
    pub fn with_running_msg(mut self, running_msg: ColoredString) -> Self {
        self.running_msg = ProgressMessage::new(running_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `completed_msg`.
    ///
    /// ## Panics
    /// Panics if the `completed_msg` is longer than 9 characters.
    pub fn with_completed_msg(mut self, completed_msg: ColoredString) -> Self {
        self.completed_msg = ProgressMessage::new(completed_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `failed_msg`.
    ///
    /// ## Panics
    /// Panics if the `failed_msg` is longer than 9 characters.
    pub fn with_failed_msg(mut self, failed_msg: ColoredString) -> Self {
        self.failed_msg = ProgressMessage::new(failed_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `terminating`.
    /// Set to `\n` when printing into a file.
    pub fn with_terminating(mut self, string: &str) -> Self {
        self.terminating = string.to_string();
        self
    }
}

impl ProgressObserver for ProgressPrinter {
    /// Print progress info about the mapping.
    ///
    /// ## Panics
    /// Panics if the output stream can not be written into.
    fn notify(&mut self, status: ProgressStatus, frame: usize) {
        let status_msg = match status {
            ProgressStatus::Running => &self.running_msg,
            ProgressStatus::Completed => &self.completed_msg,
            ProgressStatus::Failed => &self.failed_msg,
        };

        let frame_msg = if self.colored {
            self.frame_msg.to_string()
        } else {
            (self.frame_msg.as_ref() as &str).to_owned()
        };

        write!(
            self.output,
            "{}{} {:12}{}",
            status_msg.format(self.colored),
            frame_msg,
            frame,
            self.terminating
        )
        .expect("FATAL CGMAP ERROR | ProgressPrinter::notify (1) | Could not write to `ProgressPrinter` stream.");

        if status != ProgressStatus::Running && self.terminating != "\n" {
            writeln!(self.output)
                .expect("FATAL CGMAP ERROR | ProgressPrinter::notify (2) | Could not write to `ProgressPrinter` stream.");
        }

        self.output
            .flush()
            .expect("FATAL CGMAP ERROR | ProgressPrinter::notify (3) | Could not flush `ProgressPrinter` stream.");
    }
}

impl Default for ProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
