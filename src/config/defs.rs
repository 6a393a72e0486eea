use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;
use crate::cli::Arguments;

// Input
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
pub const STDIN_TAG: &str = "-";

// Static Parameters
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
pub const DEFAULT_WORKERS: usize = 4;
pub const PHRED_OFFSET: u8 = 33;

/// Chunks allowed to wait in the dispatch queue, per worker.
pub const CHUNK_QUEUE_FACTOR: usize = 2;

/// Upper bound on the up-front allocation for a chunk's read buffer.
pub const CHUNK_PREALLOC_LIMIT: usize = 4_096;


#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed FASTQ record {record}: {reason}")]
    MalformedRecord { record: u64, reason: String },

    #[error("No complete FASTQ records found in input")]
    EmptyInput,

    #[error("Worker failed: {0}")]
    WorkerFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}


/// Fixed parameters for a single run. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub chunk_size: NonZeroUsize,
    pub workers: NonZeroUsize,
}

impl RunConfig {
    /// Validates the numeric parameters. Nothing is opened here, so a bad
    /// configuration is always rejected before any input I/O.
    pub fn new(input: PathBuf, chunk_size: usize, workers: usize) -> Result<Self, PipelineError> {
        let chunk_size = NonZeroUsize::new(chunk_size)
            .ok_or_else(|| PipelineError::InvalidConfig("chunk size must be at least 1".to_string()))?;
        let workers = NonZeroUsize::new(workers)
            .ok_or_else(|| PipelineError::InvalidConfig("worker count must be at least 1".to_string()))?;
        Ok(RunConfig { input, chunk_size, workers })
    }

    pub fn from_args(args: &Arguments) -> Result<Self, PipelineError> {
        RunConfig::new(PathBuf::from(&args.input), args.chunk_size, args.workers)
    }

    /// Capacity of the bounded chunk queue feeding the workers.
    pub fn queue_depth(&self) -> usize {
        self.workers.get().saturating_mul(CHUNK_QUEUE_FACTOR)
    }

    pub fn reads_from_stdin(&self) -> bool {
        self.input.as_os_str() == STDIN_TAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_rejects_zero_chunk_size() {
        let result = RunConfig::new(PathBuf::from("reads.fq"), 0, 4);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_run_config_rejects_zero_workers() {
        let result = RunConfig::new(PathBuf::from("reads.fq"), 10, 0);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_run_config_queue_depth() -> Result<(), PipelineError> {
        let config = RunConfig::new(PathBuf::from("reads.fq"), DEFAULT_CHUNK_SIZE, 3)?;
        assert_eq!(config.queue_depth(), 3 * CHUNK_QUEUE_FACTOR);
        assert_eq!(config.chunk_size.get(), DEFAULT_CHUNK_SIZE);
        assert!(!config.reads_from_stdin());
        Ok(())
    }

    #[test]
    fn test_run_config_stdin() -> Result<(), PipelineError> {
        let config = RunConfig::new(PathBuf::from(STDIN_TAG), 1, 1)?;
        assert!(config.reads_from_stdin());
        Ok(())
    }
}
