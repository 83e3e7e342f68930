#![deny(missing_docs)]

//! # Ledger
//!
//! Translates numeric player identifiers into player tags and writes tag
//! lists for large identifier ranges in batches.
//!
//! * [`tagpack`]: the identifier to tag encoding
//! * [`batch`]: range partitioning, batch output and merging
//! * [`pipeline`]: a full generation run with cancellation and reporting
//! * [`command`]: the commands exposed by the command line tool

pub mod batch;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod tagpack;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
