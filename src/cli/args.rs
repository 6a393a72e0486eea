use clap::Parser;
use crate::config::defs::{DEFAULT_CHUNK_SIZE, DEFAULT_WORKERS};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fastq-stats", version, about = "Analyze FASTQ files for GC content, quality, and read length.")]
pub struct Arguments {

    #[arg(help = "Input FASTQ file (plain or gzip); '-' reads from stdin")]
    pub input: String,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, help = "Number of reads per processing chunk")]
    pub chunk_size: usize,

    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS, help = "Number of parallel workers")]
    pub workers: usize,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,
}
