//! Command-line front end for the dental treatment report.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
