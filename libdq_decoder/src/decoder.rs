use bit_set::BitSet;
use bitvec::prelude::*;

use super::constants::{MaskWord, MASK_WIDTH};
use super::error::DecodeError;

/// A boolean channel with one entry per mask sample. `true` means good.
pub type BoolSeries = BitVec;

fn check_bit(bit_position: usize) -> Result<(), DecodeError> {
    if bit_position >= MASK_WIDTH {
        Err(DecodeError::InvalidBitPosition(bit_position))
    } else {
        Ok(())
    }
}

/// Collapse a selection of bit positions into a single mask word.
///
/// Duplicate positions are ignored. An empty selection is an error rather than
/// a vacuously good result.
pub fn selection_mask(bit_positions: &[usize]) -> Result<MaskWord, DecodeError> {
    let mut selection = BitSet::with_capacity(MASK_WIDTH);
    for bit in bit_positions {
        check_bit(*bit)?;
        selection.insert(*bit);
    }
    if selection.is_empty() {
        return Err(DecodeError::EmptySelection);
    }

    Ok(selection
        .iter()
        .fold(0 as MaskWord, |word, bit| word | (1 << bit)))
}

/// Pull a single flag out of a bit-mask series
pub fn extract_flag(
    mask_series: &[MaskWord],
    bit_position: usize,
) -> Result<BoolSeries, DecodeError> {
    check_bit(bit_position)?;
    Ok(mask_series
        .iter()
        .map(|word| (*word >> bit_position) & 1 == 1)
        .collect())
}

/// Element-wise AND of every selected flag.
///
/// A sample is good only if all of the selected bits are set.
pub fn combine_flags(
    mask_series: &[MaskWord],
    bit_positions: &[usize],
) -> Result<BoolSeries, DecodeError> {
    let selection = selection_mask(bit_positions)?;
    Ok(mask_series
        .iter()
        .map(|word| *word & selection == selection)
        .collect())
}

/// Element-wise AND of two boolean channels covering the same samples
pub fn and_channels(left: &BitSlice, right: &BitSlice) -> Result<BoolSeries, DecodeError> {
    if left.len() != right.len() {
        return Err(DecodeError::LengthMismatch(left.len(), right.len()));
    }
    Ok(left
        .iter()
        .by_vals()
        .zip(right.iter().by_vals())
        .map(|(l, r)| l && r)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;

    // Deterministic pseudo-random mask words from a linear congruential generator
    fn pseudo_mask(len: usize, seed: u64) -> Vec<MaskWord> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                (state >> 40) as MaskWord
            })
            .collect()
    }

    #[test]
    fn test_extract_flag_matches_shift() {
        let mask = pseudo_mask(500, 7);
        for bit in [0, 1, 5, 11, 31] {
            let channel = extract_flag(&mask, bit).unwrap();
            assert_eq!(channel.len(), mask.len());
            for (idx, word) in mask.iter().enumerate() {
                assert_eq!(channel[idx], ((word >> bit) & 1) == 1);
            }
        }
    }

    #[test]
    fn test_extract_flag_bad_bit() {
        let mask = vec![1, 2, 3];
        assert_eq!(
            extract_flag(&mask, 32),
            Err(DecodeError::InvalidBitPosition(32))
        );
        assert_eq!(
            extract_flag(&mask, 1000),
            Err(DecodeError::InvalidBitPosition(1000))
        );
    }

    #[test]
    fn test_extract_flag_empty_series() {
        let channel = extract_flag(&[], 3).unwrap();
        assert!(channel.is_empty());
    }

    #[test]
    fn test_combine_scenario() {
        let mask = vec![3, 1, 0, 3, 3];
        let combined = combine_flags(&mask, &[0, 1]).unwrap();
        assert_eq!(combined, bitvec![1, 0, 0, 1, 1]);
    }

    #[test]
    fn test_combine_order_independent() {
        let mask = pseudo_mask(300, 42);
        let ab = combine_flags(&mask, &[2, 9]).unwrap();
        let ba = combine_flags(&mask, &[9, 2]).unwrap();
        assert_eq!(ab, ba);

        let reference = combine_flags(&mask, &[0, 4, 13]).unwrap();
        for perm in [[0, 13, 4], [4, 0, 13], [4, 13, 0], [13, 0, 4], [13, 4, 0]] {
            assert_eq!(combine_flags(&mask, &perm).unwrap(), reference);
        }
    }

    #[test]
    fn test_combine_duplicates_ignored() {
        let mask = pseudo_mask(100, 3);
        assert_eq!(
            combine_flags(&mask, &[1, 1, 6, 1]).unwrap(),
            combine_flags(&mask, &[1, 6]).unwrap()
        );
    }

    #[test]
    fn test_combine_is_and_of_extracts() {
        let mask = pseudo_mask(200, 11);
        let combined = combine_flags(&mask, &[3, 8]).unwrap();
        let three = extract_flag(&mask, 3).unwrap();
        let eight = extract_flag(&mask, 8).unwrap();
        assert_eq!(combined, and_channels(&three, &eight).unwrap());
    }

    #[test]
    fn test_combine_errors() {
        let mask = vec![1, 2, 3];
        assert_eq!(combine_flags(&mask, &[]), Err(DecodeError::EmptySelection));
        assert_eq!(
            combine_flags(&mask, &[0, 40]),
            Err(DecodeError::InvalidBitPosition(40))
        );
    }

    #[test]
    fn test_and_channels_length_mismatch() {
        let left = bitvec![1, 1, 0];
        let right = bitvec![1, 0];
        assert_eq!(
            and_channels(&left, &right),
            Err(DecodeError::LengthMismatch(3, 2))
        );
    }
}
