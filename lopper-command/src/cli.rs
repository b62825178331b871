use clap::Parser;
use lopper_command::config::{RunConfig, DEFAULT_LOPPER, DEFAULT_WS_DIR};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lopper-command", author, version)]
#[command(about = "Install lopper dependencies and run lopper commands")]
#[command(long_about = "This command runs lopper commands based on user inputs.")]
pub struct Cli {
    /// Specify the processor name
    #[arg(short = 'p', long = "proc", help_heading = "Required arguments")]
    pub proc_name: String,

    /// Specify the System device-tree path (till system-top.dts file)
    #[arg(short, long, help_heading = "Required arguments")]
    pub sdt: PathBuf,

    /// Workspace directory (zephyr repository path) where domain will be created
    #[arg(short = 'w', long = "ws_dir", default_value = DEFAULT_WS_DIR)]
    pub ws_dir: PathBuf,

    /// Directory holding the lopper rule files (default: next to the installed lopper package)
    #[arg(long, env = "LOPPER_LOPS_DIR")]
    pub lops_dir: Option<PathBuf>,

    /// Program used to run lopper
    #[arg(long, env = "LOPPER", default_value = DEFAULT_LOPPER)]
    pub lopper: String,

    /// Append lopper output to this file instead of the terminal
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print what would be done without running lopper or touching the workspace
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            proc_name: self.proc_name,
            sdt: self.sdt,
            ws_dir: self.ws_dir,
            lopper: self.lopper,
            lops_dir: self.lops_dir,
            log_file: self.log_file,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags_and_defaults() {
        let cli = Cli::try_parse_from([
            "lopper-command",
            "-p",
            "psu_cortexa53_0",
            "-s",
            "/work/sdt/system-top.dts",
        ])
        .unwrap();
        assert_eq!(cli.proc_name, "psu_cortexa53_0");
        assert_eq!(cli.sdt, PathBuf::from("/work/sdt/system-top.dts"));
        assert_eq!(cli.ws_dir, PathBuf::from("./zephyr/"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn long_flags_map_into_config() {
        let config = Cli::try_parse_from([
            "lopper-command",
            "--proc",
            "microblaze_riscv_0",
            "--sdt",
            "sdt/system-top.dts",
            "--ws_dir",
            "../zephyr",
            "--lops-dir",
            "/opt/lops",
            "--log-file",
            "lopper.log",
            "--dry-run",
        ])
        .unwrap()
        .into_config();
        assert_eq!(config.ws_dir, PathBuf::from("../zephyr"));
        assert_eq!(config.lops_dir, Some(PathBuf::from("/opt/lops")));
        assert_eq!(config.log_file, Some(PathBuf::from("lopper.log")));
        assert!(config.dry_run);
    }

    #[test]
    fn proc_and_sdt_are_required() {
        assert!(Cli::try_parse_from(["lopper-command", "--sdt", "x.dts"]).is_err());
        assert!(Cli::try_parse_from(["lopper-command", "--proc", "cpu0"]).is_err());
    }
}
