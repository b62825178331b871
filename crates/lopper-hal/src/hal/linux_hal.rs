//! Linux HAL implementation using real processes and the real filesystem.

use super::{FsOps, ProcessOps};
use crate::{HalError, HalResult};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::process::{Command, ExitStatus, Output, Stdio};

/// Real HAL implementation for Linux hosts.
#[derive(Debug, Clone, Default)]
pub struct LinuxHal;

impl LinuxHal {
    pub fn new() -> Self {
        Self
    }
}

fn shell(command: &str, cwd: Option<&Path>) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    // Avoid commands hanging waiting for input.
    cmd.stdin(Stdio::null());
    cmd
}

fn map_spawn_err(command: &str, source: std::io::Error) -> HalError {
    HalError::CommandSpawn {
        command: command.to_string(),
        source,
    }
}

fn path_io(path: &Path) -> impl FnOnce(std::io::Error) -> HalError + '_ {
    move |source| HalError::PathIo {
        path: path.to_path_buf(),
        source,
    }
}

impl ProcessOps for LinuxHal {
    fn shell_status(&self, command: &str, cwd: Option<&Path>) -> HalResult<ExitStatus> {
        log::debug!("sh -c {:?} (cwd: {:?})", command, cwd);
        shell(command, cwd)
            .status()
            .map_err(|e| map_spawn_err(command, e))
    }

    fn shell_status_logged(
        &self,
        command: &str,
        cwd: Option<&Path>,
        log: &File,
    ) -> HalResult<ExitStatus> {
        log::debug!("sh -c {:?} (cwd: {:?}, logged)", command, cwd);
        // Both streams share one file description so their output interleaves.
        let stdout = log.try_clone().map_err(HalError::Log)?;
        let stderr = log.try_clone().map_err(HalError::Log)?;
        shell(command, cwd)
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|e| map_spawn_err(command, e))
    }

    fn shell_output(&self, command: &str, cwd: Option<&Path>) -> HalResult<Output> {
        log::debug!("sh -c {:?} (cwd: {:?}, captured)", command, cwd);
        // `output()` drains both pipes concurrently.
        shell(command, cwd)
            .output()
            .map_err(|e| map_spawn_err(command, e))
    }
}

impl FsOps for LinuxHal {
    fn create_dir_all(&self, path: &Path) -> HalResult<()> {
        fs::create_dir_all(path).map_err(path_io(path))
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> HalResult<u64> {
        // Blame whichever side is actually missing.
        let blamed = if src.is_file() { dst } else { src };
        fs::copy(src, dst).map_err(path_io(blamed))
    }

    fn open_append(&self, path: &Path) -> HalResult<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(path_io(path))
    }

    fn remove_dir_all(&self, path: &Path) -> HalResult<()> {
        fs::remove_dir_all(path).map_err(path_io(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn shell_status_reports_exit_code() {
        let hal = LinuxHal::new();
        let status = hal.shell_status("exit 3", None).unwrap();
        assert_eq!(status.code(), Some(3));

        let status = hal.shell_status("true", None).unwrap();
        assert!(status.success());
    }

    #[test]
    fn shell_output_runs_in_cwd_and_captures_both_streams() {
        let dir = tempdir().unwrap();
        let hal = LinuxHal::new();
        let output = hal
            .shell_output("pwd; echo oops >&2", Some(dir.path()))
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(std::path::Path::new(stdout.trim()), expected);
        assert_eq!(String::from_utf8(output.stderr).unwrap(), "oops\n");
    }

    #[test]
    fn logged_shell_interleaves_streams_in_order() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("lopper.log");
        fs::write(&log_path, "earlier run\n").unwrap();

        let hal = LinuxHal::new();
        let log = hal.open_append(&log_path).unwrap();
        let status = hal
            .shell_status_logged("echo one; echo two >&2; echo three; exit 5", None, &log)
            .unwrap();

        assert_eq!(status.code(), Some(5));
        assert_eq!(
            fs::read_to_string(&log_path).unwrap(),
            "earlier run\none\ntwo\nthree\n"
        );
    }

    #[test]
    fn shell_in_missing_cwd_is_spawn_error() {
        let dir = tempdir().unwrap();
        let hal = LinuxHal::new();
        let missing = dir.path().join("nope");
        let err = hal.shell_status("true", Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, HalError::CommandSpawn { .. }));
    }

    #[test]
    fn copy_file_overwrites_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.dts");
        let dst = dir.path().join("b.dts");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        let hal = LinuxHal::new();
        hal.copy_file(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[test]
    fn copy_file_does_not_create_parent_dirs() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("Kconfig");
        fs::write(&src, "config SOC").unwrap();

        let hal = LinuxHal::new();
        let dst = dir.path().join("soc/xlnx/mbv32/Kconfig");
        let err = hal.copy_file(&src, &dst).unwrap_err();
        match err {
            HalError::PathIo { path, .. } => assert_eq!(path, dst),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn create_and_remove_dir_tree() {
        let dir = tempdir().unwrap();
        let scratch = dir.path().join("ws/lopper_metadata");
        let hal = LinuxHal::new();

        hal.create_dir_all(&scratch).unwrap();
        hal.create_dir_all(&scratch).unwrap();
        fs::write(scratch.join("system-domain.dts"), "/dts-v1/;").unwrap();

        hal.remove_dir_all(&scratch).unwrap();
        assert!(!scratch.exists());
        assert!(dir.path().join("ws").exists());
    }
}
