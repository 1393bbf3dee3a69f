//! Drive core for a two-wheel differential-drive rover on no-std embedded platforms.
//!
//! For a runnable host-side simulation, see the `mock-rig` application crate.
#![no_std]

pub mod utils;
