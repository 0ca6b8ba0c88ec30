//! Definition of the drone swarm telemetry format.
//!
//! The input is a CSV file with a header line, one line per drone per timepoint.  The header
//! gives the column names which are matched verbatim against what the source emits (typos
//! included).  Rows are decoded into a `TelemetryRecord`, tolerating bad values (see
//! `parse_telemetry()` for the rules).
//!

// Re-export for convenience
//
pub use error::*;
pub use export::*;
pub use parser::*;
pub use telemetry::*;

mod error;
mod export;
mod parser;
mod telemetry;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
