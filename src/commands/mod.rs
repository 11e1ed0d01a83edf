//! Command implementations for parrun CLI

pub mod clean;
pub mod completions;
pub mod run;
pub mod show;
pub mod version;
