//! slidechat-core
//!
//! Pure domain types, slide document validation, and session title rules.
//! No I/O; this is the shared vocabulary of the slidechat system.

pub mod error;
pub mod models;
pub mod title;
pub mod validate;
