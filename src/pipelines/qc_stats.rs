use std::io::Read;
use std::sync::Arc;
use std::time::Instant;
use log::info;
use crate::config::defs::{PipelineError, RunConfig};
use crate::utils::chunks::chunk_reads;
use crate::utils::fastq::FastqRecords;
use crate::utils::file::open_input;
use crate::utils::metrics::{aggregate_summaries, ReportSummary};
use crate::utils::streams::dispatch_chunks;


/// Runs the QC statistics pipeline over the configured input file.
pub async fn run(run_config: Arc<RunConfig>) -> Result<ReportSummary, PipelineError> {
    let input = open_input(&run_config.input)?;
    analyze(input, &run_config).await
}


/// Runs the QC statistics pipeline over an already decompressed stream:
/// records -> chunks -> workers -> aggregate.
///
/// # Arguments
///
/// * `input` - FASTQ bytes; moved onto the producer thread and closed when drained.
/// * `run_config` - Chunk size and worker count.
///
/// # Returns
/// ReportSummary over every read in `input`.
///
pub async fn analyze<R>(input: R, run_config: &RunConfig) -> Result<ReportSummary, PipelineError>
where
    R: Read + Send + 'static,
{
    let start = Instant::now();
    info!(
        "Analyzing with chunk size {} and {} workers",
        run_config.chunk_size, run_config.workers
    );

    let chunks = chunk_reads(FastqRecords::new(input), run_config.chunk_size);
    let summaries = dispatch_chunks(chunks, run_config.workers, run_config.queue_depth()).await?;
    info!("Reduced {} chunks in {} milliseconds", summaries.len(), start.elapsed().as_millis());

    aggregate_summaries(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    const TWO_READS: &[u8] = b"@A\nGGCC\n+\n!!!!\n@B\nAATT\n+\nIIII\n";

    fn config(chunk_size: usize, workers: usize) -> RunConfig {
        RunConfig::new(PathBuf::from("-"), chunk_size, workers).unwrap()
    }

    #[tokio::test]
    async fn test_two_record_scenario() -> Result<(), PipelineError> {
        let report = analyze(Cursor::new(TWO_READS.to_vec()), &config(1, 4)).await?;
        assert_eq!(report.total_reads, 2);
        assert_eq!(report.avg_gc, 50.0);
        assert_eq!(report.avg_length, 4.0);
        assert_eq!(report.avg_quality, 20.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_input_fails() {
        let result = analyze(Cursor::new(Vec::new()), &config(10, 2)).await;
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_truncated_input_fails() {
        let mut data = TWO_READS.to_vec();
        data.extend_from_slice(b"@C\nACGT\n");
        let result = analyze(Cursor::new(data), &config(1, 2)).await;
        assert!(matches!(result, Err(PipelineError::MalformedRecord { record: 3, .. })));
    }

    #[tokio::test]
    async fn test_run_missing_file_is_io_error() {
        let run_config = Arc::new(RunConfig::new(PathBuf::from("/nonexistent/reads.fq"), 10, 1).unwrap());
        assert!(matches!(run(run_config).await, Err(PipelineError::Io(_))));
    }
}
