//! Core business logic modules.

pub mod assembler;
pub mod config;
pub mod export;
pub mod file_loader;
pub mod file_lock;
pub mod labels;
pub mod paths;
pub mod upsert;
