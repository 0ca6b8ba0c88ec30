//! Library part of the `swarmctl` utility.
//!
//! All the work is done by `swarmviz-engine`, here we only select what to compute from the
//! command-line and format the result as a table, CSV or JSON.
//!

/// Re-export
///
pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use error::*;

mod cli;
mod cmds;
mod config;
mod error;
