//! Index permutations between design order and hardware order, and applying them to
//! frames.
//!
//! A [`Permutation`] is derived from a [`LedLayout`]: `hw_to_design[hw]` is the design
//! index (`y * width + x`) of LED `hw`, and `design_to_hw` is its inverse.
//!
//! ```rust
//! use led_rewire::{geometry::Dimensions, mapper};
//! use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
//!
//! let dims = Dimensions::new(3, 2)?;
//! let serpentine = WiringConfig::new(WiringMode::Serpentine, StartCorner::TopLeft);
//! let design = [0, 1, 2, 3, 4, 5];
//! let hardware = mapper::to_hardware(&design, dims, serpentine)?;
//! assert_eq!(hardware, [0, 1, 2, 5, 4, 3]);
//! assert_eq!(mapper::to_design(&hardware, dims, serpentine)?, design);
//! # Ok::<(), led_rewire::Error>(())
//! ```

use alloc::{collections::BTreeMap, vec::Vec};

use tracing::{debug, trace};

use crate::{Result, geometry::Dimensions, layout::LedLayout, wiring::WiringConfig};

/// Bijection between design indices and hardware indices for one panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permutation {
    dims: Dimensions,
    design_to_hw: Vec<usize>,
    hw_to_design: Vec<usize>,
}

impl Permutation {
    /// Permutation for one of the standard wirings.
    #[must_use]
    pub fn new(dims: Dimensions, config: WiringConfig) -> Self {
        Self::from_layout(&LedLayout::from_config(dims, config))
    }

    /// Permutation for any validated layout, including custom wirings.
    #[must_use]
    pub fn from_layout(layout: &LedLayout) -> Self {
        let dims = layout.dims();
        let hw_to_design = layout
            .index_to_xy()
            .iter()
            .map(|&(x, y)| dims.index(x, y))
            .collect();
        Self {
            dims,
            design_to_hw: layout.xy_to_index(),
            hw_to_design,
        }
    }

    /// The permutation that leaves design order unchanged.
    #[must_use]
    pub fn identity(dims: Dimensions) -> Self {
        let indexes: Vec<usize> = (0..dims.len()).collect();
        Self {
            dims,
            design_to_hw: indexes.clone(),
            hw_to_design: indexes,
        }
    }

    /// Panel dimensions this permutation was built for.
    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        self.dims
    }

    /// `design_to_hw[design_index] = hw_index`.
    #[must_use]
    pub fn design_to_hw(&self) -> &[usize] {
        &self.design_to_hw
    }

    /// `hw_to_design[hw_index] = design_index`.
    #[must_use]
    pub fn hw_to_design(&self) -> &[usize] {
        &self.hw_to_design
    }

    /// True when hardware order equals design order.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.hw_to_design
            .iter()
            .enumerate()
            .all(|(hw_index, &design_index)| hw_index == design_index)
    }

    /// Strip position of the LED on design cell `(x, y)`, or `None` off the panel.
    #[must_use]
    pub fn hardware_index(&self, x: u32, y: u32) -> Option<usize> {
        self.dims
            .contains(x, y)
            .then(|| self.design_to_hw[self.dims.index(x, y)])
    }

    /// Design cell of strip position `hw_index`, or `None` past the end of the strip.
    #[must_use]
    pub fn design_xy(&self, hw_index: usize) -> Option<(u32, u32)> {
        self.hw_to_design
            .get(hw_index)
            .map(|&design_index| self.dims.xy(design_index))
    }

    /// Reorder a design-order frame into hardware order.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if the frame does
    /// not have one pixel per cell.
    pub fn to_hardware<P: Copy>(&self, frame: &[P]) -> Result<Vec<P>> {
        self.dims.validate(frame.len())?;
        Ok(self
            .hw_to_design
            .iter()
            .map(|&design_index| frame[design_index])
            .collect())
    }

    /// Reorder a hardware-order frame into design order.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if the frame does
    /// not have one pixel per cell.
    pub fn to_design<P: Copy>(&self, frame: &[P]) -> Result<Vec<P>> {
        self.dims.validate(frame.len())?;
        Ok(self
            .design_to_hw
            .iter()
            .map(|&hw_index| frame[hw_index])
            .collect())
    }
}

/// Reorder a design-order frame into the hardware order described by `config`.
///
/// # Errors
///
/// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
/// `frame.len() != width * height`.
pub fn to_hardware<P: Copy>(frame: &[P], dims: Dimensions, config: WiringConfig) -> Result<Vec<P>> {
    dims.validate(frame.len())?;
    Permutation::new(dims, config).to_hardware(frame)
}

/// Reorder a frame stored in the order described by `config` into design order.
///
/// # Errors
///
/// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
/// `frame.len() != width * height`.
pub fn to_design<P: Copy>(frame: &[P], dims: Dimensions, config: WiringConfig) -> Result<Vec<P>> {
    dims.validate(frame.len())?;
    Permutation::new(dims, config).to_design(frame)
}

/// Caller-owned memo of permutations keyed by `(Dimensions, WiringConfig)`.
///
/// Converting a long animation needs the same two permutations for every frame.
/// The cache only saves work; results are identical with or without it.
#[derive(Clone, Debug, Default)]
pub struct PermutationCache {
    permutations: BTreeMap<(Dimensions, WiringConfig), Permutation>,
    hits: u64,
    misses: u64,
}

impl PermutationCache {
    /// Empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            permutations: BTreeMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Permutation for `(dims, config)`, building it on first use.
    pub fn get(&mut self, dims: Dimensions, config: WiringConfig) -> &Permutation {
        self.ensure(dims, config);
        &self.permutations[&(dims, config)]
    }

    /// Borrow two cached permutations at once, building either if missing.
    pub fn get_pair(
        &mut self,
        dims: Dimensions,
        first: WiringConfig,
        second: WiringConfig,
    ) -> (&Permutation, &Permutation) {
        self.ensure(dims, first);
        self.ensure(dims, second);
        (
            &self.permutations[&(dims, first)],
            &self.permutations[&(dims, second)],
        )
    }

    /// Number of cached permutations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permutations.len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permutations.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[must_use]
    pub const fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Drop every cached permutation.
    pub fn clear(&mut self) {
        self.permutations.clear();
    }

    fn ensure(&mut self, dims: Dimensions, config: WiringConfig) {
        if self.permutations.contains_key(&(dims, config)) {
            self.hits += 1;
            trace!(%dims, %config, "permutation cache hit");
            return;
        }
        self.misses += 1;
        debug!(%dims, %config, cached = self.permutations.len(), "permutation cache miss");
        self.permutations
            .insert((dims, config), Permutation::new(dims, config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        wiring::{StartCorner, WiringMode},
    };

    #[test]
    fn permutation_arrays_are_mutual_inverses() -> Result<()> {
        let dims = Dimensions::new(5, 3)?;
        for config in WiringConfig::standard() {
            let permutation = Permutation::new(dims, config);
            for (design_index, &hw_index) in permutation.design_to_hw().iter().enumerate() {
                assert_eq!(permutation.hw_to_design()[hw_index], design_index);
            }
        }
        Ok(())
    }

    #[test]
    fn only_design_order_is_identity() -> Result<()> {
        let dims = Dimensions::new(4, 3)?;
        assert_eq!(Permutation::new(dims, WiringConfig::DESIGN), Permutation::identity(dims));
        let identities = WiringConfig::standard()
            .filter(|&config| Permutation::new(dims, config).is_identity())
            .count();
        assert_eq!(identities, 1);
        Ok(())
    }

    #[test]
    fn single_cell_lookups() -> Result<()> {
        let dims = Dimensions::new(4, 3)?;
        let serpentine = Permutation::new(
            dims,
            WiringConfig::new(WiringMode::Serpentine, StartCorner::BottomLeft),
        );
        assert_eq!(serpentine.hardware_index(0, 2), Some(0));
        assert_eq!(serpentine.hardware_index(0, 1), Some(7));
        assert_eq!(serpentine.hardware_index(4, 0), None);
        assert_eq!(serpentine.design_xy(4), Some((3, 1)));
        assert_eq!(serpentine.design_xy(12), None);
        Ok(())
    }

    #[test]
    fn wrong_length_is_a_dimension_mismatch() -> Result<()> {
        let dims = Dimensions::new(4, 4)?;
        let result = to_hardware(&[0u8; 15], dims, WiringConfig::DESIGN);
        assert_eq!(
            result,
            Err(Error::DimensionMismatch {
                width: 4,
                height: 4,
                expected: 16,
                actual: 15,
            })
        );
        assert!(to_design(&[0u8; 17], dims, WiringConfig::DESIGN).is_err());
        Ok(())
    }

    #[test]
    fn cache_builds_each_key_once() -> Result<()> {
        let dims = Dimensions::new(8, 8)?;
        let serpentine = WiringConfig::new(WiringMode::Serpentine, StartCorner::TopLeft);
        let mut cache = PermutationCache::new();
        assert!(cache.is_empty());
        let expected = Permutation::new(dims, serpentine);
        assert_eq!(cache.get(dims, serpentine), &expected);
        assert_eq!(cache.get(dims, serpentine), &expected);
        let (first, second) = cache.get_pair(dims, WiringConfig::DESIGN, serpentine);
        assert!(first.is_identity());
        assert_eq!(second, &expected);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats(), (2, 2));
        cache.clear();
        assert!(cache.is_empty());
        Ok(())
    }
}
