use lopper_error::LopperResult;
use std::path::{Component, Path, PathBuf};

/// Workspace used when `--ws_dir` is not given.
pub const DEFAULT_WS_DIR: &str = "./zephyr/";

/// Program used to invoke lopper when `--lopper` is not given.
pub const DEFAULT_LOPPER: &str = "lopper";

/// Everything a single run needs. Built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Processor (domain) name handed to `gen_domain_dts`.
    pub proc_name: String,
    /// Top-level system device tree (`system-top.dts`).
    pub sdt: PathBuf,
    /// Root of the Zephyr workspace receiving the generated files.
    pub ws_dir: PathBuf,
    /// Shell fragment used to start lopper. Inserted into command lines verbatim.
    pub lopper: String,
    /// Directory holding the lop rule files. Located through the lopper install when unset.
    pub lops_dir: Option<PathBuf>,
    /// Append lopper's console output here instead of the terminal.
    pub log_file: Option<PathBuf>,
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(proc_name: impl Into<String>, sdt: impl Into<PathBuf>) -> Self {
        Self {
            proc_name: proc_name.into(),
            sdt: sdt.into(),
            ws_dir: PathBuf::from(DEFAULT_WS_DIR),
            lopper: DEFAULT_LOPPER.to_string(),
            lops_dir: None,
            log_file: None,
            dry_run: false,
        }
    }

    pub fn with_ws_dir(mut self, ws_dir: impl Into<PathBuf>) -> Self {
        self.ws_dir = ws_dir.into();
        self
    }

    pub fn with_lops_dir(mut self, lops_dir: impl Into<PathBuf>) -> Self {
        self.lops_dir = Some(lops_dir.into());
        self
    }

    /// Make every path in the config absolute relative to `cwd`.
    pub fn resolved(self, cwd: &Path) -> Self {
        Self {
            sdt: absolutize(&self.sdt, cwd),
            ws_dir: absolutize(&self.ws_dir, cwd),
            lops_dir: self.lops_dir.map(|p| absolutize(&p, cwd)),
            log_file: self.log_file.map(|p| absolutize(&p, cwd)),
            ..self
        }
    }

    pub fn resolved_from_current_dir(self) -> LopperResult<Self> {
        let cwd = std::env::current_dir()?;
        Ok(self.resolved(&cwd))
    }
}

/// Join `path` onto `cwd` (unless already absolute) and normalize it lexically.
///
/// `.` components and trailing separators are dropped and `..` pops the previous
/// component. Symlinks are left alone.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
