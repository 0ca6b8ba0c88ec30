//! Error module
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Status {
    #[error("Use either --index or --at to select a frame")]
    NoFrameSelected,
}
