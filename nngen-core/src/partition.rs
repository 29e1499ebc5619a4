//! Static contiguous partitioning of index ranges across workers.

use std::ops::Range;

/// Splits `0..len` into `workers` contiguous ranges whose lengths differ by
/// at most one; the first `len % workers` ranges take the extra element.
///
/// Empty ranges are produced when `len < workers` so the result always has
/// exactly `workers` entries.
pub(crate) fn contiguous_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    debug_assert!(workers > 0, "worker count must be non-zero");
    let base = len / workers;
    let remainder = len % workers;
    let mut start = 0;
    (0..workers)
        .map(|index| {
            let size = base + usize::from(index < remainder);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}
