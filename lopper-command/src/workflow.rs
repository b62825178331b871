//! The board generation workflow.
//!
//! Three lopper passes turn the system device tree into the mbv32 board tree:
//!
//! 1. `system-top.dts` -> `system-domain.dts` (domain for the processor)
//! 2. `system-domain.dts` -> `system-zephyr.dts` (Zephyr flavoured domain, also emits Kconfig)
//! 3. `system-zephyr.dts` -> `mbv32.dts` (interrupt controller rules)
//!
//! The results are copied into the workspace and the scratch directory is removed. Any
//! failure stops the workflow where it is and leaves the scratch directory for inspection.

use crate::config::RunConfig;
use crate::lopper::LopperInvocation;
use crate::lops::{locate_lops_dir, LopFiles};
use crate::runner::runcmd;
use lopper_error::{LopperError, LopperResult};
use lopper_hal::LopperHal;
use std::path::{Path, PathBuf};

/// Scratch directory created under the workspace for a run.
pub const SCRATCH_DIR_NAME: &str = "lopper_metadata";

/// Every path a run reads or writes, derived from the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPaths {
    pub ws_dir: PathBuf,
    pub scratch: PathBuf,
    pub system_domain_dts: PathBuf,
    pub system_zephyr_dts: PathBuf,
    pub generated_dts: PathBuf,
    pub generated_kconfig_defconfig: PathBuf,
    pub generated_kconfig: PathBuf,
    pub board_dts: PathBuf,
    pub soc_kconfig_defconfig: PathBuf,
    pub soc_kconfig: PathBuf,
}

impl WorkflowPaths {
    pub fn new(ws_dir: &Path) -> Self {
        let scratch = ws_dir.join(SCRATCH_DIR_NAME);
        let board_dir = ws_dir.join("boards").join("amd").join("mbv32");
        let soc_dir = ws_dir.join("soc").join("xlnx").join("mbv32");
        Self {
            ws_dir: ws_dir.to_path_buf(),
            system_domain_dts: scratch.join("system-domain.dts"),
            system_zephyr_dts: scratch.join("system-zephyr.dts"),
            generated_dts: scratch.join("mbv32.dts"),
            generated_kconfig_defconfig: scratch.join("Kconfig.defconfig"),
            generated_kconfig: scratch.join("Kconfig"),
            board_dts: board_dir.join("mbv32.dts"),
            soc_kconfig_defconfig: soc_dir.join("Kconfig.defconfig"),
            soc_kconfig: soc_dir.join("Kconfig"),
            scratch,
        }
    }

    /// Generated artifact -> workspace destination, in install order.
    pub fn installs(&self) -> [(&Path, &Path); 3] {
        [
            (&self.generated_dts, &self.board_dts),
            (&self.generated_kconfig_defconfig, &self.soc_kconfig_defconfig),
            (&self.generated_kconfig, &self.soc_kconfig),
        ]
    }
}

/// The three lopper passes, in the order they must run.
pub fn plan_invocations(
    config: &RunConfig,
    paths: &WorkflowPaths,
    lops: &LopFiles,
) -> [LopperInvocation; 3] {
    let pass = |rules: &PathBuf, input: &PathBuf, output: &PathBuf| {
        LopperInvocation::new(&config.lopper, &paths.scratch, rules, input, output)
    };
    [
        pass(&lops.domain, &config.sdt, &paths.system_domain_dts)
            .with_assist(["gen_domain_dts", config.proc_name.as_str()]),
        pass(
            &lops.domain,
            &paths.system_domain_dts,
            &paths.system_zephyr_dts,
        )
        .with_assist(["gen_domain_dts", config.proc_name.as_str(), "zephyr_dt"]),
        pass(&lops.intc, &paths.system_zephyr_dts, &paths.generated_dts),
    ]
}

/// What a run did (or, for a dry run, would have done).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub paths: WorkflowPaths,
    pub commands: Vec<String>,
    pub installed: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Run the whole workflow.
///
/// Relative paths in `config` are resolved against the current directory first.
pub fn run<H: LopperHal + ?Sized>(hal: &H, config: &RunConfig) -> LopperResult<RunReport> {
    let config = config.clone().resolved_from_current_dir()?;
    let paths = WorkflowPaths::new(&config.ws_dir);
    let lops = LopFiles::in_dir(&locate_lops_dir(hal, config.lops_dir.as_deref())?);
    let commands = plan_invocations(&config, &paths, &lops)
        .iter()
        .map(LopperInvocation::command_line)
        .collect::<LopperResult<Vec<String>>>()?;

    if config.dry_run {
        log::info!("DRY RUN: mkdir -p {}", paths.scratch.display());
        for cmd in &commands {
            log::info!("DRY RUN: (cd {} && {})", paths.scratch.display(), cmd);
        }
        for (src, dst) in paths.installs() {
            log::info!("DRY RUN: cp {} {}", src.display(), dst.display());
        }
        log::info!("DRY RUN: rm -rf {}", paths.scratch.display());
        return Ok(RunReport {
            paths,
            commands,
            installed: Vec::new(),
            dry_run: true,
        });
    }

    // Stale files from an earlier failed run are left for lopper to overwrite.
    hal.create_dir_all(&paths.scratch)?;

    let log_file = match config.log_file.as_deref() {
        Some(path) => Some(hal.open_append(path)?),
        None => None,
    };
    for (step, cmd) in commands.iter().enumerate() {
        log::info!("lopper pass {}/{}: {}", step + 1, commands.len(), cmd);
        if !runcmd(hal, cmd, Some(paths.scratch.as_path()), log_file.as_ref())? {
            return Err(LopperError::CommandFailed {
                command: cmd.clone(),
                code: None,
            });
        }
    }

    let mut installed = Vec::new();
    for (src, dst) in paths.installs() {
        log::debug!("cp {} {}", src.display(), dst.display());
        hal.copy_file(src, dst)?;
        installed.push(dst.to_path_buf());
    }

    log::debug!("rm -rf {}", paths.scratch.display());
    hal.remove_dir_all(&paths.scratch)?;

    for dst in &installed {
        log::info!("installed {}", dst.display());
    }
    Ok(RunReport {
        paths,
        commands,
        installed,
        dry_run: false,
    })
}
