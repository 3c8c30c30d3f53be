//! Pixels are opaque to this crate: they are copied, compared and checksummed,
//! never interpreted as color.

use crc32fast::Hasher;
use smart_leds::RGB8;

/// A fixed-size, copyable pixel unit.
///
/// The only thing the crate needs from a pixel is a stable byte serialization for
/// diagnostic checksums (see [`ConversionTrace`](crate::pipeline::ConversionTrace)).
pub trait Pixel: Copy {
    /// Feed this pixel's bytes into a checksum, in a platform-independent order.
    fn hash_into(&self, hasher: &mut Hasher);
}

impl Pixel for RGB8 {
    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.update(&[self.r, self.g, self.b]);
    }
}

impl<const N: usize> Pixel for [u8; N] {
    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.update(self);
    }
}

macro_rules! impl_pixel_for_int {
    ($($int:ty),*) => {
        $(
            impl Pixel for $int {
                fn hash_into(&self, hasher: &mut Hasher) {
                    hasher.update(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_pixel_for_int!(u8, u16, u32, u64);

/// CRC-32 of a pixel buffer.
#[must_use]
pub fn checksum<P: Pixel>(pixels: &[P]) -> u32 {
    let mut hasher = Hasher::new();
    for pixel in pixels {
        pixel.hash_into(&mut hasher);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_and_order_sensitive() {
        let pixels = [RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)];
        let swapped = [RGB8::new(4, 5, 6), RGB8::new(1, 2, 3)];
        assert_eq!(checksum(&pixels), checksum(&pixels));
        assert_ne!(checksum(&pixels), checksum(&swapped));
    }

    #[test]
    fn rgb8_hashes_like_its_bytes() {
        let pixels = [RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)];
        let bytes = [[1u8, 2, 3], [4, 5, 6]];
        assert_eq!(checksum(&pixels), checksum(&bytes));
        assert_eq!(checksum(&pixels), crc32fast::hash(&[1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn empty_buffer_has_crc_of_nothing() {
        assert_eq!(checksum::<u32>(&[]), 0);
    }
}
