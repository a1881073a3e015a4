//! Core entity definitions for the to-do list service.
//!
//! This crate defines the domain types shared across the service: users,
//! tasks, and the task lifecycle rules (status progression and the title
//! edit window).

mod task;
mod user;

pub use task::*;
pub use user::*;
