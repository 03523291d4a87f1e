//! Helm repository credential secrets.
//!
//! Assembles a secret from basic-auth values and TLS files, then either prints
//! it as a portable `v1/Secret` document or upserts it into a named-resource
//! store.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Business logic (labels, assembly, export, upsert)
//! - `store` — Resource store trait and file-backed implementation
//! - `models` — Data structures
//! - `util` — Filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod store;
pub mod util;
