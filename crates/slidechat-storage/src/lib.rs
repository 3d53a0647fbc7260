//! slidechat-storage
//!
//! Key/value state backends and the session store built on them.

pub mod backend;
pub mod error;
pub mod sessions;
pub mod state;
