//! Irregular panels: a rectangular grid where only some cells hold an LED.
//!
//! The wire still follows an ordinary [`LedLayout`] path but skips empty cells, so
//! the strip is shorter than `width * height`. Design frames keep one pixel per grid
//! cell; hardware buffers hold one pixel per active LED.
//!
//! ```rust
//! use led_rewire::{geometry::Dimensions, shape::{MaskedLayout, MaskedPermutation}};
//! use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
//!
//! // 3×3 serpentine with an empty centre cell.
//! let dims = Dimensions::new(3, 3)?;
//! let ring = [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)];
//! let serpentine = WiringConfig::new(WiringMode::Serpentine, StartCorner::TopLeft);
//! let layout = MaskedLayout::from_config(dims, serpentine, &ring)?;
//! let permutation = MaskedPermutation::new(&layout);
//!
//! let design: Vec<u8> = (0..9).collect();
//! assert_eq!(permutation.to_hardware(&design)?, [0, 1, 2, 5, 3, 6, 7, 8]);
//! # Ok::<(), led_rewire::Error>(())
//! ```
//!
//! ```text
//! Hardware index per cell (`.` = no LED):
//!   0  1  2
//!   4  .  3
//!   5  6  7
//! ```

use alloc::vec::Vec;

use tracing::debug;

use crate::{Error, Result, geometry::Dimensions, layout::LedLayout, wiring::WiringConfig};

/// A wiring path restricted to the active cells of a panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaskedLayout {
    dims: Dimensions,
    active: Vec<bool>,
    map: Vec<(u32, u32)>,
}

impl MaskedLayout {
    /// Keep the cells of `layout` listed in `active_cells`, in wiring order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLayout`] for an active cell off the panel or listed twice.
    pub fn new(layout: &LedLayout, active_cells: &[(u32, u32)]) -> Result<Self> {
        let dims = layout.dims();
        let mut active = alloc::vec![false; dims.len()];
        for &(x, y) in active_cells {
            if !dims.contains(x, y) {
                return Err(Error::InvalidLayout {
                    reason: "active cell out of bounds",
                    x,
                    y,
                });
            }
            let cell = &mut active[dims.index(x, y)];
            if *cell {
                return Err(Error::InvalidLayout {
                    reason: "active cell listed twice",
                    x,
                    y,
                });
            }
            *cell = true;
        }
        Ok(Self::filtered(layout, active))
    }

    /// Like [`new`](Self::new), from a design-order mask (`true` = LED present).
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `mask.len() != width * height`.
    pub fn from_mask(layout: &LedLayout, mask: &[bool]) -> Result<Self> {
        layout.dims().validate(mask.len())?;
        Ok(Self::filtered(layout, mask.to_vec()))
    }

    /// Standard wiring for `config`, skipping inactive cells.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(
        dims: Dimensions,
        config: WiringConfig,
        active_cells: &[(u32, u32)],
    ) -> Result<Self> {
        Self::new(&LedLayout::from_config(dims, config), active_cells)
    }

    fn filtered(layout: &LedLayout, active: Vec<bool>) -> Self {
        let dims = layout.dims();
        let map: Vec<(u32, u32)> = layout
            .index_to_xy()
            .iter()
            .copied()
            .filter(|&(x, y)| active[dims.index(x, y)])
            .collect();
        debug!(%dims, leds = map.len(), "masked layout");
        Self { dims, active, map }
    }

    /// Panel (grid) dimensions.
    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Design cell of each LED, in wiring order.
    #[must_use]
    pub fn index_to_xy(&self) -> &[(u32, u32)] {
        &self.map
    }

    /// Number of LEDs on the strip.
    #[must_use]
    pub fn led_count(&self) -> usize {
        self.map.len()
    }

    /// True when `(x, y)` is on the panel and holds an LED.
    #[must_use]
    pub fn is_active(&self, x: u32, y: u32) -> bool {
        self.dims.contains(x, y) && self.active[self.dims.index(x, y)]
    }
}

/// Index maps between a full design frame and an irregular panel's shorter strip.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaskedPermutation {
    dims: Dimensions,
    design_to_hw: Vec<Option<usize>>,
    hw_to_design: Vec<usize>,
}

impl MaskedPermutation {
    /// Build both directions from a masked layout.
    #[must_use]
    pub fn new(layout: &MaskedLayout) -> Self {
        let dims = layout.dims();
        let mut design_to_hw = alloc::vec![None; dims.len()];
        let hw_to_design = layout
            .index_to_xy()
            .iter()
            .enumerate()
            .map(|(hw_index, &(x, y))| {
                let design_index = dims.index(x, y);
                design_to_hw[design_index] = Some(hw_index);
                design_index
            })
            .collect();
        Self {
            dims,
            design_to_hw,
            hw_to_design,
        }
    }

    /// Panel (grid) dimensions.
    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of LEDs on the strip.
    #[must_use]
    pub fn led_count(&self) -> usize {
        self.hw_to_design.len()
    }

    /// `hw_to_design[hw_index] = design_index`.
    #[must_use]
    pub fn hw_to_design(&self) -> &[usize] {
        &self.hw_to_design
    }

    /// `design_to_hw[design_index]`, `None` for an empty cell.
    #[must_use]
    pub fn design_to_hw(&self) -> &[Option<usize>] {
        &self.design_to_hw
    }

    /// Strip position of the LED on `(x, y)`, or `None` for an empty or off-panel cell.
    #[must_use]
    pub fn hardware_index(&self, x: u32, y: u32) -> Option<usize> {
        if !self.dims.contains(x, y) {
            return None;
        }
        self.design_to_hw[self.dims.index(x, y)]
    }

    /// Pick the active cells of a design frame, in strip order.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if the frame does not have one pixel per grid cell.
    pub fn to_hardware<P: Copy>(&self, frame: &[P]) -> Result<Vec<P>> {
        self.dims.validate(frame.len())?;
        Ok(self
            .hw_to_design
            .iter()
            .map(|&design_index| frame[design_index])
            .collect())
    }

    /// Spread a strip buffer back over the grid, writing `fill` into empty cells.
    ///
    /// # Errors
    ///
    /// [`Error::LedCountMismatch`] if the buffer does not have one pixel per LED.
    pub fn to_design<P: Copy>(&self, hardware: &[P], fill: P) -> Result<Vec<P>> {
        if hardware.len() != self.led_count() {
            return Err(Error::LedCountMismatch {
                expected: self.led_count(),
                actual: hardware.len(),
            });
        }
        Ok(self
            .design_to_hw
            .iter()
            .map(|slot| slot.map_or(fill, |hw_index| hardware[hw_index]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mapper::Permutation,
        wiring::{StartCorner, WiringMode},
    };

    fn every_cell(dims: Dimensions) -> Vec<(u32, u32)> {
        (0..dims.len()).map(|index| dims.xy(index)).collect()
    }

    #[test]
    fn full_mask_matches_the_plain_permutation() -> Result<()> {
        let dims = Dimensions::new(4, 3)?;
        for config in WiringConfig::standard() {
            let masked = MaskedPermutation::new(&MaskedLayout::from_config(
                dims,
                config,
                &every_cell(dims),
            )?);
            assert_eq!(masked.hw_to_design(), Permutation::new(dims, config).hw_to_design());
        }
        Ok(())
    }

    #[test]
    fn empty_cells_are_skipped_in_wiring_order() -> Result<()> {
        let dims = Dimensions::new(2, 2)?;
        // No LED at bottom-left.
        let mask = [true, true, false, true];
        let column = WiringConfig::new(WiringMode::ColumnMajor, StartCorner::TopLeft);
        let layout = MaskedLayout::from_mask(&LedLayout::from_config(dims, column), &mask)?;
        assert_eq!(layout.index_to_xy(), [(0, 0), (1, 0), (1, 1)]);
        assert!(!layout.is_active(0, 1));
        assert!(!layout.is_active(5, 0));

        let permutation = MaskedPermutation::new(&layout);
        assert_eq!(permutation.design_to_hw(), [Some(0), Some(1), None, Some(2)]);
        assert_eq!(permutation.hardware_index(1, 1), Some(2));
        assert_eq!(permutation.hardware_index(0, 1), None);
        Ok(())
    }

    #[test]
    fn design_round_trip_fills_empty_cells() -> Result<()> {
        let dims = Dimensions::new(2, 2)?;
        let layout = MaskedLayout::from_config(dims, WiringConfig::DESIGN, &[(1, 1), (0, 0)])?;
        let permutation = MaskedPermutation::new(&layout);
        let hardware = permutation.to_hardware(&['a', 'b', 'c', 'd'])?;
        assert_eq!(hardware, ['a', 'd']);
        assert_eq!(permutation.to_design(&hardware, '.')?, ['a', '.', '.', 'd']);
        Ok(())
    }

    #[test]
    fn wrong_lengths_are_rejected() -> Result<()> {
        let dims = Dimensions::new(2, 2)?;
        let layout = MaskedLayout::from_config(dims, WiringConfig::DESIGN, &[(0, 0)])?;
        let permutation = MaskedPermutation::new(&layout);
        assert!(matches!(
            permutation.to_hardware(&[0u8; 3]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(
            permutation.to_design(&[0u8; 4], 0),
            Err(Error::LedCountMismatch {
                expected: 1,
                actual: 4,
            })
        );
        assert!(matches!(
            MaskedLayout::from_mask(&LedLayout::from_config(dims, WiringConfig::DESIGN), &[true]),
            Err(Error::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn bad_active_cells_are_rejected() -> Result<()> {
        let dims = Dimensions::new(2, 2)?;
        assert_eq!(
            MaskedLayout::from_config(dims, WiringConfig::DESIGN, &[(0, 0), (2, 1)]),
            Err(Error::InvalidLayout {
                reason: "active cell out of bounds",
                x: 2,
                y: 1,
            })
        );
        assert_eq!(
            MaskedLayout::from_config(dims, WiringConfig::DESIGN, &[(1, 0), (1, 0)]),
            Err(Error::InvalidLayout {
                reason: "active cell listed twice",
                x: 1,
                y: 0,
            })
        );
        Ok(())
    }

    #[test]
    fn no_active_cells_means_an_empty_strip() -> Result<()> {
        let dims = Dimensions::new(3, 1)?;
        let permutation = MaskedPermutation::new(&MaskedLayout::from_config(
            dims,
            WiringConfig::DESIGN,
            &[],
        )?);
        assert_eq!(permutation.led_count(), 0);
        assert!(permutation.to_hardware(&[1u8, 2, 3])?.is_empty());
        assert_eq!(permutation.to_design(&[], 9u8)?, [9, 9, 9]);
        Ok(())
    }
}
