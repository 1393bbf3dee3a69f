//! Math utilities for the rover.
//!
//! This module provides the thrust-mixing calculation for two-wheeled
//! differentially-steered vehicles.

pub mod thrust;
