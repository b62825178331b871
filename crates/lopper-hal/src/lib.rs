//! Host abstraction layer for lopper-command.
//!
//! Everything that touches the outside world (spawning lopper, copying generated
//! files, removing the scratch directory) goes through the traits in [`hal`] so the
//! workflow can run against [`hal::FakeHal`] in tests.

pub mod hal;

pub use hal::{FakeHal, FakeOutcome, FsOps, LinuxHal, LopperHal, Operation, ProcessOps};
pub use lopper_error::{HalError, HalResult};
