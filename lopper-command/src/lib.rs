//! Generate the mbv32 board device tree and SoC Kconfig fragments from a system device
//! tree by driving lopper, then install them into a Zephyr workspace.

pub mod config;
pub mod lopper;
pub mod lops;
pub mod runner;
pub mod workflow;

pub use config::RunConfig;
pub use lopper_error::{LopperError, LopperResult};
pub use workflow::{RunReport, WorkflowPaths};
