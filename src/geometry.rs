//! Panel dimensions and pure coordinate math.
//!
//! Coordinates use a screen-style convention: `(0, 0)` is the top-left corner,
//! `x` increases to the right, and `y` increases downward. The design index of a
//! cell is `y * width + x`.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, wiring::StartCorner};

/// Width and height of a rectangular panel, both non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawDimensions {
    width: u32,
    height: u32,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = Error;

    fn try_from(raw: RawDimensions) -> Result<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl Dimensions {
    /// Validated dimensions.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if either side is zero or the cell count does
    /// not fit in `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let invalid = Error::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(invalid)?;
        Ok(Self { width, height })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Total number of cells (`width * height`).
    #[must_use]
    #[allow(clippy::len_without_is_empty, reason = "dimensions are never empty")]
    pub const fn len(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check that a pixel buffer has exactly one pixel per cell.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] when `pixel_count != width * height`. Buffers are
    /// never truncated or padded.
    pub fn validate(self, pixel_count: usize) -> Result<()> {
        let expected = self.len();
        if pixel_count == expected {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: pixel_count,
            })
        }
    }

    /// True when `(x, y)` lies on the panel.
    #[must_use]
    pub const fn contains(self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Design (row-major) index of an in-bounds cell.
    #[must_use]
    pub const fn index(self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Cell at a design index; inverse of [`Self::index`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "index < width * height")]
    pub const fn xy(self, index: usize) -> (u32, u32) {
        debug_assert!(index < self.len());
        let width = self.width as usize;
        ((index % width) as u32, (index / width) as u32)
    }

    /// Mirror a raw traversal coordinate so that `(0, 0)` lands on `corner`.
    ///
    /// ```text
    /// TopLeft:     (x, y)
    /// TopRight:    (width-1-x, y)
    /// BottomLeft:  (x, height-1-y)
    /// BottomRight: (width-1-x, height-1-y)
    /// ```
    #[must_use]
    pub const fn mirror(self, corner: StartCorner, x: u32, y: u32) -> (u32, u32) {
        let x = if corner.is_right() { self.flip_x(x) } else { x };
        let y = if corner.is_bottom() { self.flip_y(y) } else { y };
        (x, y)
    }

    /// `width - 1 - x`.
    #[must_use]
    pub const fn flip_x(self, x: u32) -> u32 {
        self.width - 1 - x
    }

    /// `height - 1 - y`.
    #[must_use]
    pub const fn flip_y(self, y: u32) -> u32 {
        self.height - 1 - y
    }
}

impl core::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Mirror a design-order frame left-right and/or top-bottom.
///
/// This is orientation correction for a panel mounted rotated or mirrored. It works
/// purely on design coordinates and knows nothing about wiring. Each flip is its own
/// inverse, and the two flips commute.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if `frame.len() != dims.len()`.
pub fn flip_frame<P: Copy>(
    frame: &[P],
    dims: Dimensions,
    flip_x: bool,
    flip_y: bool,
) -> Result<Vec<P>> {
    dims.validate(frame.len())?;
    let flipped = (0..dims.len())
        .map(|index| {
            let (x, y) = dims.xy(index);
            let x = if flip_x { dims.flip_x(x) } else { x };
            let y = if flip_y { dims.flip_y(y) } else { y };
            frame[dims.index(x, y)]
        })
        .collect();
    Ok(flipped)
}
