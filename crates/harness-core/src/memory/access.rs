//! Byte-lane write merge policy for masked RAM writes.

use crate::ByteMask;

/// Merges a masked write into the word previously held at the target slot.
///
/// Each enabled lane takes the matching byte of `write_data`; every other lane
/// keeps the byte of `prior`.
#[must_use]
pub const fn merge_byte_lanes(prior: u32, write_data: u32, mask: ByteMask) -> u32 {
    let lanes = mask.word_mask();
    (prior & !lanes) | (write_data & lanes)
}

#[cfg(test)]
mod tests {
    use super::merge_byte_lanes;
    use crate::ByteMask;

    #[test]
    fn low_half_write_into_zero_word_keeps_upper_bytes_zero() {
        assert_eq!(
            merge_byte_lanes(0, 0xAABB_CCDD, ByteMask::new(0b0011)),
            0x0000_CCDD
        );
    }

    #[test]
    fn disabled_lanes_preserve_prior_bytes() {
        assert_eq!(
            merge_byte_lanes(0x1122_3344, 0xAABB_CCDD, ByteMask::new(0b0101)),
            0x11BB_33DD
        );
    }

    #[test]
    fn every_enabled_lane_is_written_not_only_the_highest() {
        assert_eq!(
            merge_byte_lanes(0x1122_3344, 0xAABB_CCDD, ByteMask::new(0b1001)),
            0xAA22_33DD
        );
    }

    #[test]
    fn empty_and_full_masks() {
        assert_eq!(
            merge_byte_lanes(0x1122_3344, 0xAABB_CCDD, ByteMask::NONE),
            0x1122_3344
        );
        assert_eq!(
            merge_byte_lanes(0x1122_3344, 0xAABB_CCDD, ByteMask::ALL),
            0xAABB_CCDD
        );
    }
}
