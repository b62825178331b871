//! HAL trait definitions and implementations.
//!
//! This module defines the traits for host operations and provides both the real
//! (LinuxHal) and fake (FakeHal) implementations.

pub mod fake_hal;
pub mod fs_ops;
pub mod linux_hal;
pub mod process_ops;

pub use fake_hal::{FakeHal, FakeOutcome, Operation};
pub use fs_ops::FsOps;
pub use linux_hal::LinuxHal;
pub use process_ops::ProcessOps;

/// Complete HAL combining all host operation traits.
pub trait LopperHal: ProcessOps + FsOps + Send + Sync {}

/// Automatically implement LopperHal for any type implementing all required traits.
impl<T> LopperHal for T where T: ProcessOps + FsOps + Send + Sync {}
