//! Per-read statistics and order-independent averaging.
use crate::config::defs::PHRED_OFFSET;


/// GC content of a sequence as a percentage. Case-insensitive.
///
/// # Arguments
///
/// - `seq`: Nucleotide sequence, line ending stripped.
///
/// # Returns
///
/// Percentage of G/C bases; 0.0 for an empty sequence.
pub fn gc_content(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc = seq.iter().filter(|&&b| matches!(b, b'G' | b'C' | b'g' | b'c')).count();
    (gc as f64 / seq.len() as f64) * 100.0
}

/// Decodes a single Phred+33 quality character.
pub fn phred_score(qual: u8) -> i32 {
    qual as i32 - PHRED_OFFSET as i32
}

/// Mean Phred score of a quality string.
///
/// # Arguments
///
/// - `qual`: Phred+33 encoded quality string.
///
/// # Returns
///
/// None for an empty string, which has no defined mean.
pub fn mean_quality(qual: &[u8]) -> Option<f64> {
    if qual.is_empty() {
        return None;
    }
    let total: i64 = qual.iter().map(|&q| phred_score(q) as i64).sum();
    Some(total as f64 / qual.len() as f64)
}


/// Arithmetic mean that is bit-for-bit identical for any permutation of `values`.
/// Sorts in place, then sums with Neumaier compensation.
///
/// # Arguments
///
/// - `values`: Per-read values from every chunk, in any order.
///
/// # Returns
///
/// None if `values` is empty.
pub fn order_independent_mean(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(f64::total_cmp);
    Some(compensated_sum(values) / values.len() as f64)
}

/// Mean of integer lengths, summed exactly.
pub fn mean_length(lengths: &[usize]) -> Option<f64> {
    if lengths.is_empty() {
        return None;
    }
    let total: u128 = lengths.iter().map(|&len| len as u128).sum();
    Some(total as f64 / lengths.len() as f64)
}

fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &value in values {
        let t = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - t) + value;
        } else {
            compensation += (value - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}
