//! Shell command runner.

use lopper_error::{LopperError, LopperResult};
use lopper_hal::ProcessOps;
use std::fs::File;
use std::path::Path;

/// Run `command` through the shell, optionally in `cwd`.
///
/// Without a `log_sink` the child shares our terminal and a non-zero exit is an error
/// (`CommandFailed`), which the binary turns into exit status 1.
///
/// With a `log_sink` the child's stdout and stderr both go to the file as they are written,
/// and a non-zero exit is reported as `Ok(false)` so the caller can decide whether to carry on.
///
/// Failing to start the shell at all is an error in both modes.
pub fn runcmd<P: ProcessOps + ?Sized>(
    hal: &P,
    command: &str,
    cwd: Option<&Path>,
    log_sink: Option<&File>,
) -> LopperResult<bool> {
    let Some(sink) = log_sink else {
        let status = hal.shell_status(command, cwd)?;
        if status.success() {
            return Ok(true);
        }
        return Err(LopperError::CommandFailed {
            command: command.to_string(),
            code: status.code(),
        });
    };

    let status = hal.shell_status_logged(command, cwd, sink)?;
    if !status.success() {
        log::warn!(
            "command exited with {:?}, output logged: {}",
            status.code(),
            command
        );
    }
    Ok(status.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopper_hal::{FakeHal, FakeOutcome, FsOps, LinuxHal, Operation};
    use tempfile::tempdir;

    #[test]
    fn success_without_sink() {
        let hal = FakeHal::new();
        assert!(runcmd(&hal, "lopper -f", Some(Path::new("/scratch")), None).unwrap());
        assert_eq!(
            hal.operations(),
            vec![Operation::Shell {
                command: "lopper -f".into(),
                cwd: Some("/scratch".into()),
                captured: false,
            }]
        );
    }

    #[test]
    fn failure_without_sink_is_an_error() {
        let hal = FakeHal::with_handler(|_, _| FakeOutcome::failure(1));
        let err = runcmd(&hal, "lopper -f", None, None).unwrap_err();
        match err {
            LopperError::CommandFailed { command, code } => {
                assert_eq!(command, "lopper -f");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failure_with_sink_returns_false_and_logs_output() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("lopper.log");
        let hal = FakeHal::with_handler(|_, _| {
            FakeOutcome::failure(4)
                .with_stdout("[INFO]: loading tree\n")
                .with_stderr("[ERROR]: no such node\n")
        });
        let log = hal.open_append(&log_path).unwrap();
        let ok = runcmd(&hal, "lopper -f", None, Some(&log)).unwrap();

        assert!(!ok);
        assert_eq!(
            std::fs::read_to_string(&log_path).unwrap(),
            "[INFO]: loading tree\n[ERROR]: no such node\n"
        );
        assert!(hal.has_operation(|op| matches!(op, Operation::Shell { captured: true, .. })));
    }

    #[test]
    fn sink_keeps_stdout_and_stderr_in_write_order() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("lopper.log");
        let hal = LinuxHal::new();
        let log = hal.open_append(&log_path).unwrap();

        let ok = runcmd(
            &hal,
            "echo '[INFO]: a'; echo '[ERROR]: b' >&2; echo '[INFO]: c'",
            None,
            Some(&log),
        )
        .unwrap();

        assert!(ok);
        assert_eq!(
            std::fs::read_to_string(&log_path).unwrap(),
            "[INFO]: a\n[ERROR]: b\n[INFO]: c\n"
        );
    }
}
