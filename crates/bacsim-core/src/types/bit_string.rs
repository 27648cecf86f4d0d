/// An owned BACnet BIT STRING.
///
/// Bits are packed most-significant first, so bit 0 is the high bit of the
/// first octet. `unused_bits` counts the padding bits at the end of the last
/// octet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    pub unused_bits: u8,
    pub data: Vec<u8>,
}

impl BitString {
    pub fn new(unused_bits: u8, data: Vec<u8>) -> Self {
        Self { unused_bits, data }
    }

    /// Bit string of `len` cleared bits.
    pub fn zeros(len: usize) -> Self {
        let octets = len.div_ceil(8);
        Self {
            unused_bits: (octets * 8 - len) as u8,
            data: vec![0; octets],
        }
    }

    pub fn from_bits(bits: &[bool]) -> Self {
        let mut out = Self::zeros(bits.len());
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                out.data[i / 8] |= 0x80 >> (i % 8);
            }
        }
        out
    }

    /// Number of meaningful bits.
    pub fn len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len() {
            return None;
        }
        Some(self.data[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len() {
            return;
        }
        let mask = 0x80 >> (index % 8);
        if value {
            self.data[index / 8] |= mask;
        } else {
            self.data[index / 8] &= !mask;
        }
    }

    /// `true` when no bit is set.
    pub fn all_clear(&self) -> bool {
        self.data.iter().all(|b| *b == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::BitString;

    #[test]
    fn packs_msb_first() {
        let bits = BitString::from_bits(&[true, false, false, true]);
        assert_eq!(bits.data, vec![0b1001_0000]);
        assert_eq!(bits.unused_bits, 4);
        assert_eq!(bits.len(), 4);
        assert_eq!(bits.bit(3), Some(true));
        assert_eq!(bits.bit(4), None);
    }

    #[test]
    fn spans_multiple_octets() {
        let mut bits = BitString::zeros(44);
        assert_eq!(bits.data.len(), 6);
        assert_eq!(bits.unused_bits, 4);
        bits.set(34, true);
        assert_eq!(bits.bit(34), Some(true));
        assert!(!bits.all_clear());
        bits.set(34, false);
        assert!(bits.all_clear());
    }
}
