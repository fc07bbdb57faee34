//! Fixed-width band key packing.

use smallvec::SmallVec;

use crate::config::KeyWidth;

/// Packed bytes of one band. Keys up to 32 bytes stay inline.
pub type BandKey = SmallVec<[u8; 32]>;

/// Packs signature bands into byte keys.
///
/// Each value contributes its `width` low-order bytes, little-endian, so a
/// band of `r` rows becomes a key of exactly `r · width` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEncoder {
    width: KeyWidth,
    rows: usize,
}

impl KeyEncoder {
    pub fn new(width: KeyWidth, rows: usize) -> Self {
        Self { width, rows }
    }

    /// Length in bytes of every key this encoder produces.
    #[inline]
    pub fn key_len(&self) -> usize {
        self.rows * self.width.bytes()
    }

    /// Pack `values` (a band slice).
    pub fn encode(&self, values: &[u64]) -> BandKey {
        let w = self.width.bytes();
        let mut key = BandKey::with_capacity(values.len() * w);
        for v in values {
            key.extend_from_slice(&v.to_le_bytes()[..w]);
        }
        key
    }

    /// Key for band `band` of a full signature.
    ///
    /// The caller guarantees `(band + 1) · rows <= signature.len()`.
    #[inline]
    pub fn band_key(&self, signature: &[u64], band: usize) -> BandKey {
        let start = band * self.rows;
        self.encode(&signature[start..start + self.rows])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_key_length() {
        let enc = KeyEncoder::new(KeyWidth::Narrow, 2);
        let key = enc.encode(&[0x0102_0304_0506_0708, 42]);
        assert_eq!(key.len(), 2 * 2);
        assert_eq!(enc.key_len(), 4);
        assert_eq!(key.as_slice(), &[0x08, 0x07, 42, 0]);
    }

    #[test]
    fn wide_key_length() {
        let enc = KeyEncoder::new(KeyWidth::Wide, 2);
        let key = enc.encode(&[1, u64::MAX]);
        assert_eq!(key.len(), 8 * 2);
        assert_eq!(&key[..8], &1u64.to_le_bytes());
        assert_eq!(&key[8..], &[0xff; 8]);
    }

    #[test]
    fn band_slicing() {
        let enc = KeyEncoder::new(KeyWidth::Wide, 2);
        let sig = [1, 2, 3, 4, 5];
        assert_eq!(enc.band_key(&sig, 1), enc.encode(&[3, 4]));
    }

    #[test]
    fn narrow_truncation_collides() {
        let enc = KeyEncoder::new(KeyWidth::Narrow, 1);
        assert_eq!(enc.encode(&[0x1_0005]), enc.encode(&[0x2_0005]));
        let wide = KeyEncoder::new(KeyWidth::Wide, 1);
        assert_ne!(wide.encode(&[0x1_0005]), wide.encode(&[0x2_0005]));
    }
}
