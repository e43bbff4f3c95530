//! # Stash Service
//!
//! Cache-aside user lookups in front of the primary store.

pub mod cache;
pub mod r#impl;
pub mod observer;
pub mod timeout;
pub mod user_lookup;

pub use cache::*;
pub use observer::*;
pub use r#impl::*;
pub use user_lookup::*;
