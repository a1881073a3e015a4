//! HTTP API definitions for the to-do list service.
//!
//! This crate defines the request and response bodies exchanged between the
//! server and its clients, the pagination envelope returned by every listing
//! endpoint, and the stable error codes used in error responses.

pub mod error_codes;
mod pagination;
mod requests;
mod responses;

pub use pagination::*;
pub use requests::*;
pub use responses::*;
