use seq_io::fastq::{Reader, Record};
use std::io::{self, BufRead, BufReader, Read};
use crate::config::defs::PipelineError;

/// One FASTQ read: sequence and Phred+33 quality string, line endings stripped.
/// The header and separator lines are not retained.
///
/// Both fields are raw bytes. FASTQ is ASCII, so one byte is one character:
/// lengths count bytes and each quality byte decodes to one score. Non-ASCII
/// bytes are not rejected; each byte is counted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl ReadRecord {
    pub fn new(seq: &[u8], qual: &[u8]) -> Self {
        ReadRecord { seq: seq.to_vec(), qual: qual.to_vec() }
    }
}


/// Lazy, forward-only iterator of reads over a single input stream.
///
/// The stream is owned by the iterator and closed when it is dropped,
/// whether or not it was read to the end. A stream that ends on a record
/// boundary finishes cleanly; one that ends mid-record, or any record with a
/// bad header, separator, or mismatched sequence/quality lengths, yields a
/// `MalformedRecord` error and then stops.
pub struct FastqRecords<R: Read> {
    reader: Reader<TrailingBlankLines<R>>,
    position: u64,
    finished: bool,
}

impl<R: Read> FastqRecords<R> {
    pub fn new(input: R) -> Self {
        FastqRecords {
            reader: Reader::new(TrailingBlankLines::new(input)),
            position: 0,
            finished: false,
        }
    }

    /// Number of records yielded so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: Read> Iterator for FastqRecords<R> {
    type Item = Result<ReadRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.reader.next() {
            Some(Ok(record)) => {
                self.position += 1;
                Some(Ok(ReadRecord::new(record.seq(), record.qual())))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(PipelineError::MalformedRecord {
                    record: self.position + 1,
                    reason: e.to_string(),
                }))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}


fn is_line_terminator(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Passes a stream through unchanged, except that a run of blank lines at the
/// very end collapses to the single line ending of the last line. Runs of
/// terminators are held back until a non-terminator byte shows they are not
/// trailing.
pub struct TrailingBlankLines<R: Read> {
    inner: BufReader<R>,
    held: Vec<u8>,
    ready: Vec<u8>,
    ready_pos: usize,
    finished: bool,
}

impl<R: Read> TrailingBlankLines<R> {
    pub fn new(input: R) -> Self {
        TrailingBlankLines {
            inner: BufReader::new(input),
            held: Vec::new(),
            ready: Vec::new(),
            ready_pos: 0,
            finished: false,
        }
    }

    fn release_held(&mut self) {
        std::mem::swap(&mut self.ready, &mut self.held);
        self.held.clear();
        self.ready_pos = 0;
    }
}

impl<R: Read> Read for TrailingBlankLines<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.ready_pos < self.ready.len() {
                let n = buf.len().min(self.ready.len() - self.ready_pos);
                buf[..n].copy_from_slice(&self.ready[self.ready_pos..self.ready_pos + n]);
                self.ready_pos += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }

            let chunk = self.inner.fill_buf()?;
            if chunk.is_empty() {
                // EOF: keep only the first line ending of the held run.
                self.finished = true;
                let keep = self.held.iter().position(|&b| b == b'\n').map_or(self.held.len(), |i| i + 1);
                self.held.truncate(keep);
                self.release_held();
                continue;
            }
            if is_line_terminator(chunk[0]) {
                let run = chunk.iter().position(|&b| !is_line_terminator(b)).unwrap_or(chunk.len());
                self.held.extend_from_slice(&chunk[..run]);
                self.inner.consume(run);
                continue;
            }
            if !self.held.is_empty() {
                self.release_held();
                continue;
            }
            let run = chunk.iter().position(|&b| is_line_terminator(b)).unwrap_or(chunk.len()).min(buf.len());
            buf[..run].copy_from_slice(&chunk[..run]);
            self.inner.consume(run);
            return Ok(run);
        }
    }
}
