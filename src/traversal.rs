//! The order in which a physical wire visits design cells.
//!
//! [`Traversal`] yields, for hardware index `0, 1, 2, ...`, the `(x, y)` design cell
//! that LED sits on. It allocates nothing; each coordinate is computed from the index.
//!
//! Row (or column) parity is counted from the first line the wire visits, not from
//! `y = 0`, so a serpentine panel fed from the bottom-left runs left-to-right along
//! the bottom row:
//!
//! ```text
//! 4×3 Serpentine from BottomLeft (cell value = hardware index):
//!
//!    8  9 10 11
//!    7  6  5  4
//!    0  1  2  3
//! ```

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{
    geometry::Dimensions,
    wiring::{StartCorner, WiringMode},
};

/// Iterator over the design coordinates visited by the wire, in hardware order.
///
/// Always yields exactly `width * height` distinct in-bounds cells.
///
/// ```rust
/// use led_rewire::{geometry::Dimensions, traversal::Traversal};
/// use led_rewire::wiring::{StartCorner, WiringMode};
///
/// let dims = Dimensions::new(3, 2)?;
/// let cells: Vec<_> = Traversal::new(dims, WiringMode::Serpentine, StartCorner::TopLeft).collect();
/// assert_eq!(cells, [(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)]);
/// # Ok::<(), led_rewire::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Traversal {
    dims: Dimensions,
    mode: WiringMode,
    corner: StartCorner,
    front: usize,
    back: usize,
}

impl Traversal {
    /// Traversal for one `(mode, corner)` combination.
    #[must_use]
    pub const fn new(dims: Dimensions, mode: WiringMode, corner: StartCorner) -> Self {
        Self {
            dims,
            mode,
            corner,
            front: 0,
            back: dims.len(),
        }
    }

    /// Design cell visited at `hw_index`, or `None` past the end of the strip.
    #[must_use]
    pub const fn cell(&self, hw_index: usize) -> Option<(u32, u32)> {
        if hw_index >= self.dims.len() {
            return None;
        }
        Some(cell_at(self.dims, self.mode, self.corner, hw_index))
    }
}

// Raw position along the wire before corner mirroring: rows (or columns) are counted
// from the start of the traversal, so parity is relative to the first line visited.
#[allow(clippy::cast_possible_truncation, reason = "line and offset are bounded by u32 sides")]
const fn cell_at(
    dims: Dimensions,
    mode: WiringMode,
    corner: StartCorner,
    hw_index: usize,
) -> (u32, u32) {
    let row_first = mode.is_row_first();
    let line_len = (if row_first { dims.width() } else { dims.height() }) as usize;
    let line = hw_index / line_len;
    let mut offset = hw_index % line_len;
    if mode.is_serpentine() && line % 2 == 1 {
        offset = line_len - 1 - offset;
    }
    let (raw_x, raw_y) = if row_first {
        (offset as u32, line as u32)
    } else {
        (line as u32, offset as u32)
    };
    dims.mirror(corner, raw_x, raw_y)
}

impl Iterator for Traversal {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let cell = cell_at(self.dims, self.mode, self.corner, self.front);
        self.front += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for Traversal {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(cell_at(self.dims, self.mode, self.corner, self.back))
    }
}

impl ExactSizeIterator for Traversal {}

impl FusedIterator for Traversal {}

/// Collected traversal: element `i` is the design cell of hardware index `i`.
#[must_use]
pub fn traversal(dims: Dimensions, mode: WiringMode, corner: StartCorner) -> Vec<(u32, u32)> {
    Traversal::new(dims, mode, corner).collect()
}
