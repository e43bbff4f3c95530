//! Lookup service implementations.
//!
//! Trait definitions live in the parent module (`user_lookup.rs`).

mod in_flight;
pub mod user_lookup_impl;

pub use in_flight::{FlightGuard, InFlight};
pub use user_lookup_impl::{
    CacheAsideUserLookup, CacheAsideUserLookupParameters, LookupSettings,
};
