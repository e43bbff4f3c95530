//! # Stash Server Library
//!
//! Dependency injection wiring, telemetry setup and startup output
//! for the Stash server binary.

pub mod di;
pub mod startup;
pub mod telemetry;
