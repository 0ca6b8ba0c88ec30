//! This library is there to share some common code amongst all swarmviz modules.
//!

mod config;
mod logging;
mod macros;

use clap::{crate_name, crate_version};
pub use config::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Every on-disk file we load carries a `version` field, checked against the one we were
/// compiled with.
///
pub trait Versioned {
    /// Version this build understands.
    const VERSION: usize;

    fn version(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(version().starts_with("swarmviz-common/"));
    }
}
