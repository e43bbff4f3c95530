//! # Stash Core
//!
//! Core types and error definitions shared by every Stash crate:
//! the [`User`] record, its [`UserId`], and the unified [`StashError`].

pub mod domain;
pub mod error;
pub mod id;
pub mod result;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
