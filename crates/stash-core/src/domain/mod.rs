//! Domain model.

pub mod entities;

pub use entities::*;
