pub mod chunks;
pub mod fastq;
pub mod fastx;
pub mod file;
pub mod metrics;
pub mod stats;
pub mod streams;
pub mod system;
