//! Bit-level helpers shared by command encoders and decoders.
//!
//! All functions are pure and operate on primitive integers. Bit position 0 is
//! the least-significant bit of an octet.
//!
//! ## Indexed Bit Tables
//!
//! Some reports carry a table of fixed-width bit groups, one per entry, packed
//! back to back with no length prefix. Group `i` (0-based) occupies stream bits
//! `i * width .. (i + 1) * width`, where stream bit `g` is bit `g % 8` of byte
//! `g / 8`. For byte-aligned widths this means each group's bytes appear in
//! wire order and bit `n` of the group is bit `n % 8` of its `n / 8`th byte.

use std::collections::BTreeMap;

use crate::error::{CcError, CcResult};

/// Entry index (1-based) to the ascending list of set bits in that entry.
pub type BitTable = BTreeMap<usize, Vec<usize>>;

/// Read a single bit.
pub fn get_bit(byte: u8, position: u8) -> bool {
    debug_assert!(position < 8);
    byte & (1 << position) != 0
}

/// Return `byte` with the bit at `position` set to `value`.
pub fn set_bit(byte: u8, position: u8, value: bool) -> u8 {
    debug_assert!(position < 8);
    if value {
        byte | (1 << position)
    } else {
        byte & !(1 << position)
    }
}

/// Read a `width`-bit field starting at bit `shift`.
pub fn get_bits(byte: u8, shift: u8, width: u8) -> u8 {
    debug_assert!(shift + width <= 8);
    (byte >> shift) & field_mask(width)
}

/// Return `byte` with the `width`-bit field at `shift` replaced by `value`.
///
/// Bits of `value` above `width` are discarded.
pub fn set_bits(byte: u8, shift: u8, width: u8, value: u8) -> u8 {
    debug_assert!(shift + width <= 8);
    let mask = field_mask(width) << shift;
    (byte & !mask) | ((value << shift) & mask)
}

/// Pack flags into a zeroed octet.
pub fn pack_flags(flags: &[(u8, bool)]) -> u8 {
    flags
        .iter()
        .fold(0, |acc, &(position, value)| set_bit(acc, position, value))
}

fn field_mask(width: u8) -> u8 {
    if width >= 8 {
        0xFF
    } else {
        (1u8 << width) - 1
    }
}

/// Decode `entry_count` groups of `bits_per_entry` bits.
///
/// Every index `1..=entry_count` is present in the result, with an empty list
/// when no bit is set. Set bits are reported as `bit + origin`. Trailing bytes
/// beyond the last group are ignored.
pub fn decode_indexed_bit_table(
    bytes: &[u8],
    entry_count: usize,
    bits_per_entry: usize,
    origin: usize,
) -> CcResult<BitTable> {
    let available_bits = bytes.len() * 8;
    let required_bits = entry_count.saturating_mul(bits_per_entry);
    if required_bits > available_bits {
        return Err(CcError::InconsistentTableLength {
            entries: entry_count,
            bits_per_entry,
            available_bits,
        });
    }

    let mut table = BitTable::new();
    for entry in 0..entry_count {
        let base = entry * bits_per_entry;
        let set: Vec<usize> = (0..bits_per_entry)
            .filter(|bit| {
                let g = base + bit;
                get_bit(bytes[g / 8], (g % 8) as u8)
            })
            .map(|bit| bit + origin)
            .collect();
        table.insert(entry + 1, set);
    }

    Ok(table)
}

/// Encode a table into `entry_count` groups of `bits_per_entry` bits.
///
/// Indexes outside `1..=entry_count` and bits outside the group width are
/// skipped. The output is padded with zero bits to a whole byte.
pub fn encode_indexed_bit_table(
    table: &BitTable,
    entry_count: usize,
    bits_per_entry: usize,
    origin: usize,
) -> Vec<u8> {
    let total_bits = entry_count * bits_per_entry;
    let mut buf = vec![0u8; total_bits.div_ceil(8)];

    for (&index, bits) in table.range(1..=entry_count) {
        let base = (index - 1) * bits_per_entry;
        for &value in bits {
            let Some(bit) = value.checked_sub(origin) else {
                continue;
            };
            if bit >= bits_per_entry {
                continue;
            }
            let g = base + bit;
            buf[g / 8] = set_bit(buf[g / 8], (g % 8) as u8, true);
        }
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_bit() {
        assert!(get_bit(0b1000_0000, 7));
        assert!(!get_bit(0b1000_0000, 6));
        assert!(get_bit(0b0000_0001, 0));

        assert_eq!(set_bit(0, 7, true), 0b1000_0000);
        assert_eq!(set_bit(0xFF, 7, false), 0b0111_1111);
        assert_eq!(set_bit(0b0000_0100, 2, true), 0b0000_0100);
    }

    #[test]
    fn test_get_set_bits() {
        // bits 2-1 of the supported report control octet
        assert_eq!(get_bits(0b1000_0100, 1, 2), 2);
        assert_eq!(get_bits(0b1000_0110, 1, 2), 3);
        assert_eq!(get_bits(0xAB, 0, 8), 0xAB);

        assert_eq!(set_bits(0b1000_0001, 1, 2, 3), 0b1000_0111);
        assert_eq!(set_bits(0xFF, 1, 2, 0), 0b1111_1001);
        // value wider than the field is truncated
        assert_eq!(set_bits(0, 0, 7, 0xFF), 0x7F);
    }

    #[test]
    fn test_pack_flags() {
        assert_eq!(pack_flags(&[]), 0);
        assert_eq!(pack_flags(&[(7, true)]), 0b1000_0000);
        assert_eq!(pack_flags(&[(7, false)]), 0);
        assert_eq!(pack_flags(&[(7, true), (0, true), (3, false)]), 0b1000_0001);
    }

    #[test]
    fn test_decode_two_byte_groups() {
        let bytes = [0b1, 0b11, 0b10101, 0];
        let table = decode_indexed_bit_table(&bytes, 2, 16, 1).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[&1], vec![1, 9, 10]);
        assert_eq!(table[&2], vec![1, 3, 5]);
    }

    #[test]
    fn test_decode_zero_origin() {
        let table = decode_indexed_bit_table(&[0b1000_0001], 1, 8, 0).unwrap();
        assert_eq!(table[&1], vec![0, 7]);
    }

    #[test]
    fn test_decode_straddling_groups() {
        // Three 3-bit groups: 0b101, 0b011, 0b110 packed LSB first
        // stream bits: g0=1,0,1  g1=1,1,0  g2=0,1,1
        // byte0 = bits 0..8 = 1,0,1,1,1,0,0,1 -> 0b1001_1101
        // byte1 = bit 8 = 1 -> 0b0000_0001
        let table = decode_indexed_bit_table(&[0b1001_1101, 0b0000_0001], 3, 3, 0).unwrap();
        assert_eq!(table[&1], vec![0, 2]);
        assert_eq!(table[&2], vec![0, 1]);
        assert_eq!(table[&3], vec![1, 2]);
    }

    #[test]
    fn test_decode_empty_entries_present() {
        let table = decode_indexed_bit_table(&[0, 0], 2, 8, 1).unwrap();
        assert_eq!(table[&1], Vec::<usize>::new());
        assert_eq!(table[&2], Vec::<usize>::new());
    }

    #[test]
    fn test_decode_inconsistent_length() {
        let err = decode_indexed_bit_table(&[0xFF, 0xFF, 0xFF], 2, 16, 1).unwrap_err();
        assert_eq!(
            err,
            CcError::InconsistentTableLength {
                entries: 2,
                bits_per_entry: 16,
                available_bits: 24,
            }
        );
    }

    #[test]
    fn test_decode_zero_entries() {
        let table = decode_indexed_bit_table(&[], 0, 8, 1).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_encode_matches_decode() {
        let bytes = [0b1001_1101, 0b0000_0001];
        let table = decode_indexed_bit_table(&bytes, 3, 3, 0).unwrap();
        assert_eq!(encode_indexed_bit_table(&table, 3, 3, 0), bytes.to_vec());

        let bytes = [0b1, 0b11, 0b10101, 0];
        let table = decode_indexed_bit_table(&bytes, 2, 16, 1).unwrap();
        assert_eq!(encode_indexed_bit_table(&table, 2, 16, 1), bytes.to_vec());
    }

    #[test]
    fn test_encode_skips_out_of_range() {
        let mut table = BitTable::new();
        table.insert(1, vec![0, 1, 9]); // 0 is below origin, 9 beyond width
        table.insert(5, vec![1]); // index beyond entry count
        assert_eq!(encode_indexed_bit_table(&table, 1, 8, 1), vec![0b1]);
    }
}
