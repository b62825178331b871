//! Fake HAL implementation for testing.
//!
//! Shell commands are recorded and answered by an optional handler instead of being
//! spawned. Filesystem operations are recorded and then performed for real, so tests
//! run them inside a temporary directory.

use super::{FsOps, ProcessOps};
use crate::{HalError, HalResult};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Shell {
        command: String,
        cwd: Option<PathBuf>,
        captured: bool,
    },
    CreateDirAll {
        path: PathBuf,
    },
    CopyFile {
        src: PathBuf,
        dst: PathBuf,
    },
    OpenAppend {
        path: PathBuf,
    },
    RemoveDirAll {
        path: PathBuf,
    },
}

/// What a faked shell command "did".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeOutcome {
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl FakeOutcome {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(code: i32) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<Vec<u8>>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<Vec<u8>>) -> Self {
        self.stderr = stderr.into();
        self
    }

    fn status(&self) -> ExitStatus {
        // Any non-zero code stays a failure once squeezed into the 8-bit exit status.
        let code = if self.code == 0 {
            0
        } else {
            self.code.clamp(1, 255)
        };
        // Wait-status encoding: the exit code lives in the second byte.
        ExitStatus::from_raw(code << 8)
    }
}

type CommandHandler = dyn Fn(&str, Option<&Path>) -> FakeOutcome + Send + Sync;

/// Fake HAL implementation that records operations.
#[derive(Clone, Default)]
pub struct FakeHal {
    operations: Arc<Mutex<Vec<Operation>>>,
    handler: Option<Arc<CommandHandler>>,
}

impl fmt::Debug for FakeHal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeHal")
            .field("operations", &self.operations)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl FakeHal {
    /// A fake where every shell command succeeds without output.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fake whose shell commands are answered by `handler`.
    ///
    /// The handler receives the full command line and working directory and may touch the
    /// filesystem to simulate the command's outputs.
    pub fn with_handler(
        handler: impl Fn(&str, Option<&Path>) -> FakeOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            operations: Arc::default(),
            handler: Some(Arc::new(handler)),
        }
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.lock().unwrap().clone()
    }

    /// Command lines of all recorded shell operations, in order.
    pub fn commands(&self) -> Vec<String> {
        self.operations
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                Operation::Shell { command, .. } => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.operations.lock().unwrap().iter().any(check)
    }

    /// Clear all recorded operations.
    pub fn clear(&self) {
        self.operations.lock().unwrap().clear();
    }

    fn record_operation(&self, op: Operation) {
        self.operations.lock().unwrap().push(op);
    }

    fn run(&self, command: &str, cwd: Option<&Path>, captured: bool) -> FakeOutcome {
        log::info!("FAKE HAL: sh -c {:?}", command);
        self.record_operation(Operation::Shell {
            command: command.to_string(),
            cwd: cwd.map(Path::to_path_buf),
            captured,
        });
        match &self.handler {
            Some(handler) => handler(command, cwd),
            None => FakeOutcome::success(),
        }
    }
}

impl ProcessOps for FakeHal {
    fn shell_status(&self, command: &str, cwd: Option<&Path>) -> HalResult<ExitStatus> {
        Ok(self.run(command, cwd, false).status())
    }

    fn shell_status_logged(
        &self,
        command: &str,
        cwd: Option<&Path>,
        log: &File,
    ) -> HalResult<ExitStatus> {
        let outcome = self.run(command, cwd, true);
        let mut log = log;
        log.write_all(&outcome.stdout)
            .and_then(|()| log.write_all(&outcome.stderr))
            .map_err(HalError::Log)?;
        Ok(outcome.status())
    }

    fn shell_output(&self, command: &str, cwd: Option<&Path>) -> HalResult<Output> {
        let outcome = self.run(command, cwd, true);
        Ok(Output {
            status: outcome.status(),
            stdout: outcome.stdout,
            stderr: outcome.stderr,
        })
    }
}

fn path_io(path: &Path, source: std::io::Error) -> HalError {
    HalError::PathIo {
        path: path.to_path_buf(),
        source,
    }
}

impl FsOps for FakeHal {
    fn create_dir_all(&self, path: &Path) -> HalResult<()> {
        self.record_operation(Operation::CreateDirAll {
            path: path.to_path_buf(),
        });
        fs::create_dir_all(path).map_err(|e| path_io(path, e))
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> HalResult<u64> {
        self.record_operation(Operation::CopyFile {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
        fs::copy(src, dst).map_err(|e| {
            let path = if src.is_file() { dst } else { src };
            path_io(path, e)
        })
    }

    fn open_append(&self, path: &Path) -> HalResult<File> {
        self.record_operation(Operation::OpenAppend {
            path: path.to_path_buf(),
        });
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| path_io(path, e))
    }

    fn remove_dir_all(&self, path: &Path) -> HalResult<()> {
        self.record_operation(Operation::RemoveDirAll {
            path: path.to_path_buf(),
        });
        fs::remove_dir_all(path).map_err(|e| path_io(path, e))
    }
}
