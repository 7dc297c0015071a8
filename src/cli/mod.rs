//! CLI command handlers

pub mod run;
