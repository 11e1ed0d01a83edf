//! Terminal presentation of run results
//!
//! Progress bars for extraction live in [`crate::progress`]; this module renders what a run
//! produced.

pub mod display;
