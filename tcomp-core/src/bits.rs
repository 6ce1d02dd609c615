//! Bit-strings and their integer/character codecs.
//!
//! Bits are stored most-significant first with no implicit width.
//! Integer decoding works modulo 2^64 once a string is longer than 64
//! bits.

use core::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitset {
    bits: String,
}

/// Returned by [`Bitset::parse`] when the text holds something other
/// than `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBit(pub char);

impl Bitset {
    /// Build from a literal such as `"0110"`.
    pub fn parse(text: &str) -> Result<Self, InvalidBit> {
        if let Some(bad) = text.chars().find(|c| !matches!(c, '0' | '1')) {
            return Err(InvalidBit(bad));
        }
        Ok(Bitset {
            bits: text.to_string(),
        })
    }

    /// Build by concatenating boolean values, first value most
    /// significant.
    pub fn from_bools(values: impl IntoIterator<Item = bool>) -> Self {
        Bitset {
            bits: values
                .into_iter()
                .map(|bit| if bit { '1' } else { '0' })
                .collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    fn leading_one(&self) -> bool {
        self.bits.starts_with('1')
    }

    /// Plain base-2 value.
    pub fn decode_unsigned(&self) -> u64 {
        self.bits
            .bytes()
            .fold(0u64, |acc, bit| acc.wrapping_shl(1) | u64::from(bit == b'1'))
    }

    /// Two's-complement value: a leading `1` subtracts `2^n`.
    pub fn decode_signed(&self) -> i64 {
        let unsigned = self.decode_unsigned();
        let width = self.len();
        if !self.leading_one() || width >= 64 {
            // 2^n vanishes modulo 2^64 at and past 64 bits.
            return unsigned as i64;
        }
        (i128::from(unsigned) - (1i128 << width)) as i64
    }

    /// The character for an 8-bit value; `None` for any other width.
    pub fn decode_byte(&self) -> Option<char> {
        if self.len() != 8 {
            return None;
        }
        Some(char::from(self.decode_unsigned() as u8))
    }

    /// Sign bit followed by the magnitude's binary digits.
    ///
    /// Zero encodes as `"0"`. For negative values this is sign-magnitude,
    /// so [`Bitset::decode_signed`] does not undo it.
    pub fn encode_signed(value: i64) -> Self {
        if value == 0 {
            return Bitset {
                bits: "0".to_string(),
            };
        }
        let sign = if value < 0 { '1' } else { '0' };
        Bitset {
            bits: format!("{sign}{:b}", value.unsigned_abs()),
        }
    }
}

impl fmt::Display for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(text: &str) -> Bitset {
        Bitset::parse(text).expect("valid bits")
    }

    #[test]
    fn rejects_non_binary_literals() {
        assert_eq!(Bitset::parse("0120"), Err(InvalidBit('2')));
    }

    #[test]
    fn from_bools_is_msb_first() {
        let set = Bitset::from_bools([true, false, false]);
        assert_eq!(set.as_str(), "100");
        assert_eq!(set.decode_unsigned(), 4);
    }

    #[test]
    fn decodes_unsigned() {
        assert_eq!(bits("0").decode_unsigned(), 0);
        assert_eq!(bits("101").decode_unsigned(), 5);
        assert_eq!(bits("11111111").decode_unsigned(), 255);
        assert_eq!(Bitset::default().decode_unsigned(), 0);
    }

    #[test]
    fn decodes_twos_complement() {
        assert_eq!(bits("11111111").decode_signed(), -1);
        assert_eq!(bits("10000000").decode_signed(), -128);
        assert_eq!(bits("01111111").decode_signed(), 127);
        assert_eq!(bits("1").decode_signed(), -1);
        assert_eq!(bits("110").decode_signed(), -2);
    }

    #[test]
    fn decodes_wide_values_modulo_two_to_the_64() {
        let all_ones = bits(&"1".repeat(64));
        assert_eq!(all_ones.decode_signed(), -1);
        let one = bits(&format!("{}1", "0".repeat(70)));
        assert_eq!(one.decode_signed(), 1);
    }

    #[test]
    fn decodes_bytes_only_at_width_eight() {
        assert_eq!(bits("01000001").decode_byte(), Some('A'));
        assert_eq!(bits("1000001").decode_byte(), None);
        assert_eq!(bits("001000001").decode_byte(), None);
    }

    #[test]
    fn encodes_with_sign_bit() {
        assert_eq!(Bitset::encode_signed(0).as_str(), "0");
        assert_eq!(Bitset::encode_signed(5).as_str(), "0101");
        assert_eq!(Bitset::encode_signed(-5).as_str(), "1101");
        assert_eq!(Bitset::encode_signed(-1).as_str(), "11");
        assert_eq!(Bitset::encode_signed(i64::MIN).len(), 65);
    }

    #[test]
    fn positive_values_survive_encode_then_decode() {
        for value in [1, 2, 7, 8, 255, 1 << 40] {
            assert_eq!(Bitset::encode_signed(value).decode_signed(), value);
        }
    }

    #[test]
    fn negative_encoding_is_not_decoder_symmetric() {
        // Known asymmetry: sign-magnitude in, two's complement out.
        assert_eq!(Bitset::encode_signed(-1).decode_signed(), -1);
        assert_eq!(Bitset::encode_signed(-3).decode_signed(), -1);
        assert_eq!(Bitset::encode_signed(-5).decode_signed(), -3);
    }
}
