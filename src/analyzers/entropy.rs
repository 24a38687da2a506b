//! Shannon entropy estimation.
//!
//! High overall entropy is a cheap, format-independent proxy for packed or
//! encrypted payloads; the threshold that turns the raw value into a finding
//! is aggregation policy and lives in [`crate::config::EntropyConfig`].

/// Calculates the Shannon entropy of a byte slice.
///
/// Returns a value between 0.0 and 8.0, where:
/// - 0.0 represents no randomness (empty input, or all bytes identical)
/// - 8.0 represents maximum randomness (uniform distribution)
#[inline]
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    // Single-pass histogram over the 256 byte values
    let mut histogram = [0usize; 256];
    for &byte in data {
        histogram[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &count in &histogram {
        if count == 0 {
            continue;
        }
        let p = (count as f64) / len;
        entropy -= p * p.log2();
    }

    entropy
}
