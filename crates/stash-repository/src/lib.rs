//! # Stash Repository
//!
//! Read-only access to the primary store:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>
//! SqliteUserRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! SQLite (users table, seeded by migrations)
//! ```

pub mod pool;
pub mod sqlite;
pub mod traits;

pub use pool::*;
pub use sqlite::*;
pub use traits::*;
