//! # Stash REST
//!
//! HTTP boundary of the user lookup service.
//! Serves user lines, the sample weather forecast, health and metrics.

pub mod controllers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
