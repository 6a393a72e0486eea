use std::iter::FusedIterator;
use std::num::NonZeroUsize;
use crate::config::defs::{PipelineError, CHUNK_PREALLOC_LIMIT};
use crate::utils::fastq::ReadRecord;

/// An ordered batch of reads; one unit of parallel work.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// 1-based number of the first read in the chunk, for error reporting.
    pub first_record: u64,
    pub reads: Vec<ReadRecord>,
}

impl Chunk {
    pub fn new(first_record: u64, reads: Vec<ReadRecord>) -> Self {
        Chunk { first_record, reads }
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }
}


/// Groups a read stream into chunks of at most `chunk_size` reads in stream order.
/// The last chunk may be short and is only emitted if non-empty. An upstream
/// error is forwarded once, discarding the partially filled chunk, and ends
/// the sequence.
pub struct ReadChunks<I> {
    reads: I,
    chunk_size: NonZeroUsize,
    emitted: u64,
    finished: bool,
}

pub fn chunk_reads<I>(reads: I, chunk_size: NonZeroUsize) -> ReadChunks<I::IntoIter>
where
    I: IntoIterator<Item = Result<ReadRecord, PipelineError>>,
{
    ReadChunks {
        reads: reads.into_iter(),
        chunk_size,
        emitted: 0,
        finished: false,
    }
}

impl<I> Iterator for ReadChunks<I>
where
    I: Iterator<Item = Result<ReadRecord, PipelineError>>,
{
    type Item = Result<Chunk, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let limit = self.chunk_size.get();
        let mut reads = Vec::with_capacity(limit.min(CHUNK_PREALLOC_LIMIT));
        while reads.len() < limit {
            match self.reads.next() {
                Some(Ok(read)) => reads.push(read),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        if reads.is_empty() {
            return None;
        }
        let chunk = Chunk::new(self.emitted + 1, reads);
        self.emitted += chunk.len() as u64;
        Some(Ok(chunk))
    }
}

impl<I> FusedIterator for ReadChunks<I> where I: Iterator<Item = Result<ReadRecord, PipelineError>> {}
