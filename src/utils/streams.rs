// src/utils/streams.rs
use std::num::NonZeroUsize;
use std::sync::Arc;
use futures::StreamExt;
use log::debug;
use tokio::sync::mpsc;
use tokio::task;
use tokio_stream::wrappers::ReceiverStream;
use crate::config::defs::PipelineError;
use crate::utils::chunks::Chunk;
use crate::utils::metrics::{reduce_chunk, ChunkSummary};


/// Reduces every chunk with `reduce_chunk` across `workers` parallel workers.
/// See `dispatch_with`.
pub async fn dispatch_chunks<I>(
    chunks: I,
    workers: NonZeroUsize,
    queue_depth: usize,
) -> Result<Vec<ChunkSummary>, PipelineError>
where
    I: Iterator<Item = Result<Chunk, PipelineError>> + Send + 'static,
{
    dispatch_with(chunks, workers, queue_depth, reduce_chunk).await
}


/// Fans a chunk sequence out to a pool of workers and collects every result.
///
/// A single blocking producer drains `chunks` (and so owns the input stream)
/// into a bounded channel of `queue_depth` chunks; it blocks when the channel
/// is full. At most `workers` chunks are reduced concurrently, each on its own
/// blocking thread. Summaries come back in completion order.
///
/// The whole chunk sequence is always consumed. Any producer error, reducer
/// error or worker panic fails the run and no partial results are returned.
///
/// # Arguments
///
/// * `chunks` - Chunk sequence, read on a blocking thread.
/// * `workers` - Maximum number of chunks reduced at once.
/// * `queue_depth` - Capacity of the chunk channel; clamped to at least 1.
/// * `reducer` - Pure function applied to each chunk.
///
/// # Returns
/// All chunk summaries, unordered.
///
pub async fn dispatch_with<I, F>(
    chunks: I,
    workers: NonZeroUsize,
    queue_depth: usize,
    reducer: F,
) -> Result<Vec<ChunkSummary>, PipelineError>
where
    I: Iterator<Item = Result<Chunk, PipelineError>> + Send + 'static,
    F: Fn(&Chunk) -> Result<ChunkSummary, PipelineError> + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel::<Chunk>(queue_depth.max(1));

    let producer = task::spawn_blocking(move || -> Result<usize, PipelineError> {
        let mut dispatched = 0;
        for chunk in chunks {
            let chunk = chunk?;
            debug!("Dispatching chunk {} ({} reads from record {})", dispatched, chunk.len(), chunk.first_record);
            if tx.blocking_send(chunk).is_err() {
                return Err(PipelineError::WorkerFailed("chunk queue closed before input was drained".to_string()));
            }
            dispatched += 1;
        }
        Ok(dispatched)
    });

    let reducer = Arc::new(reducer);
    let mut results = ReceiverStream::new(rx)
        .map(|chunk| {
            let reducer = Arc::clone(&reducer);
            task::spawn_blocking(move || reducer(&chunk))
        })
        .buffer_unordered(workers.get());

    let mut summaries = Vec::new();
    while let Some(joined) = results.next().await {
        let summary = joined.map_err(|e| PipelineError::WorkerFailed(e.to_string()))??;
        debug!("Chunk complete: {} reads ({} chunks collected)", summary.len(), summaries.len() + 1);
        summaries.push(summary);
    }

    let dispatched = producer
        .await
        .map_err(|e| PipelineError::WorkerFailed(format!("chunk producer: {}", e)))??;
    if dispatched != summaries.len() {
        return Err(PipelineError::WorkerFailed(format!(
            "dispatched {} chunks but collected {} summaries",
            dispatched,
            summaries.len()
        )));
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fastq::ReadRecord;
    use crate::utils::metrics::aggregate_summaries;

    fn chunks(count: usize, reads_per_chunk: usize) -> Vec<Chunk> {
        (0..count)
            .map(|c| {
                let reads = (0..reads_per_chunk)
                    .map(|r| {
                        let seq = if (c + r) % 2 == 0 { b"GGCA".as_slice() } else { b"ATTA".as_slice() };
                        ReadRecord::new(seq, b"I5+!")
                    })
                    .collect();
                Chunk::new((c * reads_per_chunk) as u64 + 1, reads)
            })
            .collect()
    }

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_collects_every_chunk() -> Result<(), PipelineError> {
        let input = chunks(25, 3);
        let summaries = dispatch_chunks(input.into_iter().map(Ok), workers(4), 2).await?;
        assert_eq!(summaries.len(), 25);
        assert_eq!(summaries.iter().map(ChunkSummary::len).sum::<usize>(), 75);
        Ok(())
    }

    #[tokio::test]
    async fn test_order_independence() -> Result<(), PipelineError> {
        let input = chunks(12, 5);
        let mut reversed = input.clone();
        reversed.reverse();
        let mut interleaved = input.clone();
        interleaved.sort_by_key(|c| (c.first_record % 3, c.first_record));

        let forward = aggregate_summaries(dispatch_chunks(input.into_iter().map(Ok), workers(8), 16).await?)?;
        let backward = aggregate_summaries(dispatch_chunks(reversed.into_iter().map(Ok), workers(1), 1).await?)?;
        let shuffled = aggregate_summaries(dispatch_chunks(interleaved.into_iter().map(Ok), workers(3), 2).await?)?;
        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_chunks_yields_no_summaries() -> Result<(), PipelineError> {
        let summaries = dispatch_chunks(Vec::<Result<Chunk, PipelineError>>::new().into_iter(), workers(2), 4).await?;
        assert!(summaries.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_producer_error_fails_run() {
        let mut input: Vec<Result<Chunk, PipelineError>> = chunks(3, 2).into_iter().map(Ok).collect();
        input.push(Err(PipelineError::MalformedRecord { record: 7, reason: "truncated".to_string() }));
        let result = dispatch_chunks(input.into_iter(), workers(2), 2).await;
        assert!(matches!(result, Err(PipelineError::MalformedRecord { record: 7, .. })));
    }

    #[tokio::test]
    async fn test_reducer_error_fails_run() {
        let result = dispatch_with(chunks(10, 2).into_iter().map(Ok), workers(4), 4, |chunk: &Chunk| {
            if chunk.first_record == 9 {
                Err(PipelineError::WorkerFailed("bad chunk".to_string()))
            } else {
                reduce_chunk(chunk)
            }
        })
        .await;
        assert!(matches!(result, Err(PipelineError::WorkerFailed(_))));
    }

    #[tokio::test]
    async fn test_worker_panic_fails_run() {
        let result = dispatch_with(chunks(4, 2).into_iter().map(Ok), workers(2), 2, |chunk: &Chunk| {
            if chunk.first_record == 3 {
                panic!("worker crashed");
            }
            reduce_chunk(chunk)
        })
        .await;
        assert!(matches!(result, Err(PipelineError::WorkerFailed(_))));
    }
}
