//! The Conclave Server
//!
//! Role registry, permission table and access evaluation for The Conclave
//! community site. Route handlers and UI gate staff actions through here.

pub mod api;
pub mod config;
pub mod permissions;
