//! Subcommand implementations
//!
//! Each command writes its report to the supplied writer and returns the
//! first error it meets.

pub mod albums;
pub mod demo;

pub use albums::{run_add, run_count, run_list, run_whoami};
pub use demo::run_demo;
