use std::fmt;
use crate::config::defs::PipelineError;
use crate::utils::chunks::Chunk;
use crate::utils::stats::{gc_content, mean_length, mean_quality, order_independent_mean};


/// Per-read values for every read in one chunk, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkSummary {
    pub gc_contents: Vec<f64>,
    pub qualities: Vec<f64>,
    pub lengths: Vec<usize>,
}

impl ChunkSummary {
    pub fn with_capacity(capacity: usize) -> Self {
        ChunkSummary {
            gc_contents: Vec::with_capacity(capacity),
            qualities: Vec::with_capacity(capacity),
            lengths: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.gc_contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gc_contents.is_empty()
    }
}


/// Final statistics over every read in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSummary {
    pub total_reads: u64,
    pub avg_gc: f64,
    pub avg_quality: f64,
    pub avg_length: f64,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Total Reads:     {}", self.total_reads)?;
        writeln!(f, "  Avg GC Content:  {:.2}%", self.avg_gc)?;
        writeln!(f, "  Avg Read Length: {:.1} bp", self.avg_length)?;
        writeln!(f, "  Avg Quality:     {:.2}", self.avg_quality)
    }
}


/// Computes GC%, mean quality and length for each read of a chunk.
/// Touches nothing outside the chunk, so chunks may be reduced in any order
/// on any worker.
///
/// # Arguments
///
/// * `chunk` - Batch of reads from the chunker.
///
/// # Returns
/// ChunkSummary, or MalformedRecord if a read has an empty quality string.
///
pub fn reduce_chunk(chunk: &Chunk) -> Result<ChunkSummary, PipelineError> {
    let mut summary = ChunkSummary::with_capacity(chunk.len());
    for (offset, read) in chunk.reads.iter().enumerate() {
        let quality = mean_quality(&read.qual).ok_or_else(|| PipelineError::MalformedRecord {
            record: chunk.first_record + offset as u64,
            reason: "empty quality string".to_string(),
        })?;
        summary.gc_contents.push(gc_content(&read.seq));
        summary.qualities.push(quality);
        summary.lengths.push(read.seq.len());
    }
    Ok(summary)
}


/// Folds chunk summaries, in any order, into the final report.
/// Averages are taken over all individual reads, never over chunk means, so
/// the result does not depend on chunk size, worker count or arrival order.
///
/// # Arguments
///
/// * `summaries` - Every chunk summary of the run.
///
/// # Returns
/// ReportSummary, or EmptyInput if no reads were summarised.
///
pub fn aggregate_summaries<I>(summaries: I) -> Result<ReportSummary, PipelineError>
where
    I: IntoIterator<Item = ChunkSummary>,
{
    let mut all_gc = Vec::new();
    let mut all_qual = Vec::new();
    let mut all_lens = Vec::new();
    for summary in summaries {
        all_gc.extend(summary.gc_contents);
        all_qual.extend(summary.qualities);
        all_lens.extend(summary.lengths);
    }
    debug_assert!(all_gc.len() == all_qual.len() && all_gc.len() == all_lens.len());

    let total_reads = all_gc.len() as u64;
    let (Some(avg_gc), Some(avg_quality), Some(avg_length)) = (
        order_independent_mean(&mut all_gc),
        order_independent_mean(&mut all_qual),
        mean_length(&all_lens),
    ) else {
        return Err(PipelineError::EmptyInput);
    };

    Ok(ReportSummary {
        total_reads,
        avg_gc,
        avg_quality,
        avg_length,
    })
}
