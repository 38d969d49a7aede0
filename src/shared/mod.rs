//! Shared module for functionality used by both the library and the CLI

pub mod config;
