//! Misc utility functions

/// Binary-search header fields shared by the table directory, `cmap`
/// format 4 and `kern` format 0.
///
/// The values are derived from the number of items and the size of each item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchRange {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl SearchRange {
    /// Compute the search fields for `n_items` items of `item_size` bytes.
    ///
    /// `search_range` is the largest power of two not exceeding `n_items`,
    /// times `item_size`; `entry_selector` is its log2, and `range_shift`
    /// covers the remaining items.
    pub fn compute(n_items: usize, item_size: usize) -> Self {
        if n_items == 0 {
            return Default::default();
        }
        let entry_selector = n_items.ilog2();
        let search_range = (1usize << entry_selector) * item_size;
        let range_shift = (n_items * item_size).saturating_sub(search_range);
        SearchRange {
            search_range: search_range as u16,
            entry_selector: entry_selector as u16,
            range_shift: range_shift as u16,
        }
    }
}

/// Round `len` up to the next multiple of four.
pub fn round4(len: usize) -> usize {
    (len + 3) & !3
}

/// The sfnt table checksum: the wrapping sum of the data as big-endian `u32`
/// words, with the final word padded with zeros.
pub fn checksum(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(4);
    let mut sum = chunks
        .by_ref()
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .fold(0u32, u32::wrapping_add);
    let rem = chunks.remainder();
    if !rem.is_empty() {
        let mut last = [0u8; 4];
        last[..rem.len()].copy_from_slice(rem);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 16, (16, 0, 0))]
    #[case(9, 16, (128, 3, 16))]
    #[case(0x16, 16, (256, 4, 96))]
    #[case(2, 2, (4, 1, 0))]
    #[case(5, 6, (24, 2, 6))]
    fn search_range(#[case] n: usize, #[case] size: usize, #[case] expected: (u16, u16, u16)) {
        let computed = SearchRange::compute(n, size);
        assert_eq!(
            (computed.search_range, computed.entry_selector, computed.range_shift),
            expected
        );
    }

    #[test]
    fn checksum_pads_with_zeros() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(checksum(&[0, 0, 0, 1, 0xAB]), 0xAB00_0001);
        assert_eq!(checksum(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 2]), 1);
    }

    #[test]
    fn pad4() {
        for i in 0..10 {
            let padded = round4(i);
            assert!(padded - i < 4);
            assert_eq!(padded % 4, 0, "pad {i}");
        }
    }
}
