//! slidechat-server library root.
//!
//! The HTTP API, chat turn flow, and configuration, exposed as a library
//! so integration tests can drive them without binding a socket.

pub mod chat;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
