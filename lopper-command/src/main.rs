use anyhow::Context;
use clap::Parser;
use lopper_command::workflow;
use lopper_hal::LinuxHal;

mod cli;
mod logging;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    let config = cli.into_config();
    let hal = LinuxHal::new();
    let report = workflow::run(&hal, &config)
        .with_context(|| format!("failed to generate board files for {}", config.proc_name))?;

    if report.dry_run {
        log::info!("dry run complete; nothing was changed");
    } else {
        log::info!(
            "mbv32 board files installed into {}",
            report.paths.ws_dir.display()
        );
    }
    Ok(())
}
