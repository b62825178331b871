//! Locating the lop rule files that ship with lopper.

use lopper_error::{LopperError, LopperResult};
use lopper_hal::ProcessOps;
use std::path::{Path, PathBuf};

/// Rules for `gen_domain_dts` on MicroBlaze-V.
pub const DOMAIN_LOP: &str = "lop-microblaze-riscv.dts";

/// Interrupt-controller rules that turn the Zephyr domain tree into the board tree.
pub const INTC_LOP: &str = "lop-mbv-zephyr-intc.dts";

/// Asks the Python lopper package where it is installed.
pub const LOPPER_MODULE_QUERY: &str = "python3 -c 'import lopper; print(lopper.__file__)'";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LopFiles {
    pub domain: PathBuf,
    pub intc: PathBuf,
}

impl LopFiles {
    pub fn in_dir(lops_dir: &Path) -> Self {
        Self {
            domain: lops_dir.join(DOMAIN_LOP),
            intc: lops_dir.join(INTC_LOP),
        }
    }
}

/// Directory containing `fpath`, ignoring trailing separators.
pub fn get_dir_path(fpath: &str) -> PathBuf {
    let trimmed = fpath.trim_end_matches(std::path::MAIN_SEPARATOR);
    Path::new(trimmed)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Find the `lops` directory.
///
/// An explicit directory wins. Otherwise the installed lopper package is queried and its
/// sibling `lops` directory is used. The rule files themselves are not checked here.
pub fn locate_lops_dir<P: ProcessOps + ?Sized>(
    hal: &P,
    explicit: Option<&Path>,
) -> LopperResult<PathBuf> {
    if let Some(dir) = explicit {
        log::debug!("using lops dir {}", dir.display());
        return Ok(dir.to_path_buf());
    }

    let output = hal.shell_output(LOPPER_MODULE_QUERY, None)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LopperError::LopsDirNotFound(format!(
            "`{}` failed: {}",
            LOPPER_MODULE_QUERY,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8(output.stdout).map_err(lopper_hal::HalError::from)?;
    let module_file = stdout.trim();
    if module_file.is_empty() {
        return Err(LopperError::LopsDirNotFound(
            "lopper package reported no install location".to_string(),
        ));
    }

    let lops_dir = get_dir_path(module_file).join("lops");
    log::debug!("lopper rules located at {}", lops_dir.display());
    Ok(lops_dir)
}
