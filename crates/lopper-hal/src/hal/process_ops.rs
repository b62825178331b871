//! Process execution helpers.
//!
//! External commands are considered "world-touching" and must go through the HAL so we can
//! test workflows without spawning real processes.

use crate::HalResult;
use std::fs::File;
use std::path::Path;
use std::process::{ExitStatus, Output};

/// Shell command runner.
///
/// Commands are full shell command lines handed to `sh -c`, so quoting is the caller's job.
pub trait ProcessOps {
    /// Run `command` with the child's stdout/stderr attached to ours.
    fn shell_status(&self, command: &str, cwd: Option<&Path>) -> HalResult<ExitStatus>;

    /// Run `command` with stdout and stderr both appended to `log`, in the order written.
    fn shell_status_logged(
        &self,
        command: &str,
        cwd: Option<&Path>,
        log: &File,
    ) -> HalResult<ExitStatus>;

    /// Run `command` and capture its stdout and stderr.
    fn shell_output(&self, command: &str, cwd: Option<&Path>) -> HalResult<Output>;
}
