use std::io::{self, Write};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use crate::config::defs::PHRED_OFFSET;

const BASES: &[u8] = b"ACGT";
const MAX_PHRED: f64 = 41.0;


pub fn write_fastq_record<W: Write>(
    writer: &mut W,
    id: &str,
    desc: Option<&str>,
    seq: &[u8],
    qual: &[u8],
) -> io::Result<()> {
    // Write header
    writer.write_all(b"@")?;
    writer.write_all(id.as_bytes())?;
    if let Some(desc) = desc {
        writer.write_all(b" ")?;
        writer.write_all(desc.as_bytes())?;
    }
    writer.write_all(b"\n")?;

    writer.write_all(seq)?;
    writer.write_all(b"\n")?;

    writer.write_all(b"+\n")?;

    writer.write_all(qual)?;
    writer.write_all(b"\n")?;
    Ok(())
}


/// Generates a synthetic FASTQ file in memory.
/// Bases are uniform over ACGT; Phred scores are drawn from a normal
/// distribution and clamped to 0..=41.
///
/// # Arguments
///
/// * `num_reads` - Number of records.
/// * `read_size` - Length of every read. Zero produces no records.
/// * `mean_quality` - Mean Phred score.
/// * `quality_stddev` - Standard deviation of the Phred score.
/// * `seed` - RNG seed; the same seed always yields the same bytes.
///
/// # Returns
/// FASTQ text as bytes.
///
pub fn fastq_generator(
    num_reads: usize,
    read_size: usize,
    mean_quality: f64,
    quality_stddev: f64,
    seed: u64,
) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(num_reads * (2 * read_size + 16));
    if read_size == 0 {
        return Ok(out);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let quality_dist = Normal::new(mean_quality, quality_stddev)
        .map_err(|e| anyhow::anyhow!("Invalid quality distribution: {}", e))?;

    let mut seq = vec![0u8; read_size];
    let mut qual = vec![0u8; read_size];
    for i in 0..num_reads {
        for (base, q) in seq.iter_mut().zip(qual.iter_mut()) {
            *base = BASES[rng.random_range(0..BASES.len())];
            let phred = quality_dist.sample(&mut rng).round().clamp(0.0, MAX_PHRED);
            *q = phred as u8 + PHRED_OFFSET;
        }
        write_fastq_record(&mut out, &format!("read{}", i), None, &seq, &qual)?;
    }
    Ok(out)
}
