//! User and task storage for the to-do list service.
//!
//! The [`TaskStore`] trait is the persistence boundary: it owns the
//! uniqueness invariants (case-insensitive usernames, one title per owner)
//! and the user-to-task cascade. [`SqliteTaskStore`] enforces them with
//! real database constraints; [`MemoryTaskStore`] mirrors the same
//! semantics for tests.

mod error;
mod memory;
mod query;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use query::*;
pub use sqlite::*;
pub use traits::*;
