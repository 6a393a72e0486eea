use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use flate2::read::MultiGzDecoder;
use log::info;
use crate::config::defs::{GZIP_MAGIC, STDIN_TAG};

type BoxedSource = Box<dyn Read + Send>;

/// Enum to hold either an uncompressed or gzipped input stream.
/// Downstream stages only ever see decompressed bytes.
pub enum FileReader {
    Uncompressed(BufReader<BoxedSource>),
    Gzipped(MultiGzDecoder<BufReader<BoxedSource>>),
}

impl FileReader {
    pub fn is_gzipped(&self) -> bool {
        matches!(self, FileReader::Gzipped(_))
    }
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FileReader::Uncompressed(r) => r.read(buf),
            FileReader::Gzipped(r) => r.read(buf),
        }
    }
}


/// Opens a FASTQ input, resolving gzip compression from the magic bytes.
///
/// # Arguments
///
/// * `path` - Path to a plain or gzipped file, or `-` for stdin.
///
/// # Returns
/// io::Result<FileReader> yielding decompressed bytes.
///
pub fn open_input(path: &Path) -> io::Result<FileReader> {
    let source: BoxedSource = if path.as_os_str() == STDIN_TAG {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(path)?)
    };
    let reader = detect_compression(source)?;
    info!(
        "Reading {} input from {}",
        if reader.is_gzipped() { "gzip" } else { "plain" },
        path.display()
    );
    Ok(reader)
}


/// Peeks at the head of a stream and wraps it in a gzip decoder if needed.
/// An empty stream is passed through uncompressed.
pub fn detect_compression(source: BoxedSource) -> io::Result<FileReader> {
    let mut buffered = BufReader::new(source);
    let head = buffered.fill_buf()?;
    if head.starts_with(&GZIP_MAGIC) {
        Ok(FileReader::Gzipped(MultiGzDecoder::new(buffered)))
    } else {
        Ok(FileReader::Uncompressed(buffered))
    }
}
