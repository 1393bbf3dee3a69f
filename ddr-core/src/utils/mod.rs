//! Utility re-exports and helper macros for the rover core.
//!
//! This module re-exports the control and math components:
//!
//! - `controllers`: motor-controller access, wheel drivers, and the drive
//!   command loop
//! - `math`: thrust-vectoring mixer for differential drive
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod controllers;
pub mod math;

pub use controllers::DriveController;
pub use math::thrust::MixerConfig;

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.init($val)
    }};
}
