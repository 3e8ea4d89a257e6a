//! Dotsmith core library.
//!
//! This crate exposes programmatic APIs for deploying AI-assistant
//! configuration artifacts from a TOML catalog into per-platform
//! destinations, with syntax validation before and after every copy and a
//! post-install verification report.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `convert`: Claude-to-OpenCode MCP document rewrite.
//! - `deploy`: Orchestrator — install fan-out, verification barrier, report.
//! - `install`: Per-target installer with atomic writes.
//! - `validate`: Pure per-format validation strategies.
//! - `verify`: Post-install verification checks.
//! - `models`: Data models for catalog, outcomes, and the report.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod convert;
pub mod deploy;
pub mod install;
pub mod models;
pub mod output;
pub mod utils;
pub mod validate;
pub mod verify;
