use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineStatus {
    #[error("No data loaded.")]
    EmptyDataset,
    #[error("Frame {0} out of range, only {1} timepoints")]
    FrameOutOfRange(usize, usize),
    #[error("Unknown timepoint {0}")]
    UnknownTimepoint(String),
}
