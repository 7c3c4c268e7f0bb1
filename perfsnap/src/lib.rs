//! The perfsnap counter report tool.
//!
//! This library supports the perfsnap binary found elsewhere in this project.
//! It plays the collector's part for [`perfsnap_model`]: category reads are
//! loaded from line-delimited JSON captures, assembled into snapshots and two
//! successive snapshots are turned into a report of displayable values.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions)]

pub mod capture;
pub mod config;
pub mod report;
