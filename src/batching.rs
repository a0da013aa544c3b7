/*!
 * Batch partitioning of input lines.
 *
 * Splits an ordered sequence of lines into contiguous fixed-size batches
 * for translation, preserving order. The final batch may be shorter.
 */

/// Partition `lines` into contiguous batches of at most `batch_size` lines.
///
/// Concatenating the returned batches in order reproduces the input exactly.
/// Every batch has length `batch_size` except possibly the last. An empty
/// input yields zero batches.
pub fn chunk_lines(lines: &[String], batch_size: usize) -> Vec<Vec<String>> {
    assert!(batch_size > 0, "batch_size must be at least 1");
    lines
        .chunks(batch_size)
        .map(|chunk| chunk.to_vec())
        .collect()
}
