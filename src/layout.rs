//! Runtime description of panel wiring: hardware index → `(x, y)` design cell.
//!
//! See [`LedLayout`] for examples including standard wirings, custom wirings and flips.

use alloc::vec::Vec;

use tracing::trace;

use crate::{
    Error, Result,
    geometry::Dimensions,
    shape::MaskedLayout,
    traversal::Traversal,
    wiring::WiringConfig,
};

/// Validated mapping from LED wiring order to `(x, y)` design coordinates.
///
/// `LedLayout` defines how a rectangular `(x, y)` panel of LEDs maps to the linear
/// order of LEDs on a NeoPixel-style (WS2812) strip. Element `i` of
/// [`index_to_xy`](Self::index_to_xy) is the cell that LED `i` sits on.
///
/// Most layouts come from [`from_config`](Self::from_config), which covers the 16
/// standard wirings. For unusual wiring, list the `(x, y)` of each LED in strip order
/// with [`new`](Self::new).
///
/// ## Validation
///
/// Every layout is checked on construction:
/// - the list has exactly `width * height` entries
/// - coordinates are in-bounds
/// - every `(x, y)` cell appears exactly once
///
/// # Example
///
/// A hand-listed 3×2 serpentine equals the generated one:
///
/// ```rust
/// use led_rewire::{geometry::Dimensions, layout::LedLayout};
/// use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
///
/// let dims = Dimensions::new(3, 2)?;
/// let custom = LedLayout::new(dims, vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)])?;
/// let config = WiringConfig::new(WiringMode::Serpentine, StartCorner::TopLeft);
/// assert_eq!(custom, LedLayout::from_config(dims, config));
/// # Ok::<(), led_rewire::Error>(())
/// ```
///
/// ```text
/// Serpentine 3×2:
///   LED0  LED1  LED2
///   LED5  LED4  LED3
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LedLayout {
    dims: Dimensions,
    map: Vec<(u32, u32)>,
}

impl LedLayout {
    /// Constructor: verifies the mapping covers every cell exactly once.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `map.len() != width * height`.
    /// - [`Error::InvalidLayout`] for an out-of-bounds or repeated cell.
    ///
    /// ```rust
    /// use led_rewire::{Error, geometry::Dimensions, layout::LedLayout};
    ///
    /// let dims = Dimensions::new(2, 2)?;
    /// let repeated = LedLayout::new(dims, vec![(0, 0), (1, 0), (1, 0), (0, 1)]);
    /// assert!(matches!(repeated, Err(Error::InvalidLayout { x: 1, y: 0, .. })));
    /// # Ok::<(), led_rewire::Error>(())
    /// ```
    pub fn new(dims: Dimensions, map: Vec<(u32, u32)>) -> Result<Self> {
        dims.validate(map.len())?;

        let mut seen = alloc::vec![false; dims.len()];
        for &(x, y) in &map {
            if !dims.contains(x, y) {
                return Err(Error::InvalidLayout {
                    reason: "cell out of bounds",
                    x,
                    y,
                });
            }
            let cell = &mut seen[dims.index(x, y)];
            if *cell {
                return Err(Error::InvalidLayout {
                    reason: "cell wired twice",
                    x,
                    y,
                });
            }
            *cell = true;
        }
        // Length matched and nothing repeated, so every cell is covered.

        Ok(Self { dims, map })
    }

    /// Layout for one of the standard wirings, including the config's path mirroring.
    ///
    /// ```rust
    /// use led_rewire::{geometry::Dimensions, layout::LedLayout};
    /// use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
    ///
    /// let dims = Dimensions::new(3, 2)?;
    /// let config = WiringConfig::new(WiringMode::ColumnSerpentine, StartCorner::TopLeft);
    /// let layout = LedLayout::from_config(dims, config);
    /// assert_eq!(layout.index_to_xy(), [(0, 0), (0, 1), (1, 1), (1, 0), (2, 0), (2, 1)]);
    /// # Ok::<(), led_rewire::Error>(())
    /// ```
    ///
    /// ```text
    /// Strip snakes down columns (3×2 example):
    ///   LED0  LED3  LED4
    ///   LED1  LED2  LED5
    /// ```
    #[must_use]
    pub fn from_config(dims: Dimensions, config: WiringConfig) -> Self {
        trace!(%dims, %config, "building LED layout");
        // Traversal visits each cell once; mirroring preserves that.
        let layout = Self {
            dims,
            map: Traversal::new(dims, config.mode, config.corner).collect(),
        };
        match (config.flip_x, config.flip_y) {
            (false, false) => layout,
            (true, false) => layout.flip_h(),
            (false, true) => layout.flip_v(),
            (true, true) => layout.flip_h().flip_v(),
        }
    }

    /// Return the list mapping LED wiring order to `(x, y)` coordinates.
    #[must_use]
    pub fn index_to_xy(&self) -> &[(u32, u32)] {
        &self.map
    }

    /// Panel dimensions.
    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dims.width()
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dims.height()
    }

    /// Total number of LEDs in the layout.
    #[must_use]
    #[allow(clippy::len_without_is_empty, reason = "layouts are never empty")]
    pub const fn len(&self) -> usize {
        self.dims.len()
    }

    /// Inverse mapping: element `y * width + x` is the LED index wired to `(x, y)`.
    #[must_use]
    pub fn xy_to_index(&self) -> Vec<usize> {
        let mut mapping = alloc::vec![None; self.len()];
        for (led_index, &(x, y)) in self.map.iter().enumerate() {
            let slot = &mut mapping[self.dims.index(x, y)];
            debug_assert!(slot.is_none(), "duplicate (x, y) in xy_to_index inversion");
            *slot = Some(led_index);
        }
        mapping
            .into_iter()
            .map(|led_index| led_index.unwrap_or_default())
            .collect()
    }

    /// Restrict this wiring to the cells of an irregular panel that hold an LED.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLayout`] for an active cell off the panel or listed twice.
    pub fn with_active_cells(&self, active_cells: &[(u32, u32)]) -> Result<MaskedLayout> {
        MaskedLayout::new(self, active_cells)
    }

    /// Flip horizontally (mirror columns).
    ///
    /// ```rust
    /// use led_rewire::{geometry::Dimensions, layout::LedLayout};
    /// use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
    ///
    /// let dims = Dimensions::new(3, 2)?;
    /// let serpentine = WiringConfig::new(WiringMode::ColumnSerpentine, StartCorner::TopLeft);
    /// let flipped = LedLayout::from_config(dims, serpentine).flip_h();
    /// assert_eq!(flipped.index_to_xy(), [(2, 0), (2, 1), (1, 1), (1, 0), (0, 0), (0, 1)]);
    /// # Ok::<(), led_rewire::Error>(())
    /// ```
    ///
    /// ```text
    /// Before (serpentine): After:
    ///   LED0  LED3  LED4      LED4  LED3  LED0
    ///   LED1  LED2  LED5      LED5  LED2  LED1
    /// ```
    #[must_use]
    pub fn flip_h(self) -> Self {
        let dims = self.dims;
        let map = self
            .map
            .into_iter()
            .map(|(x, y)| (dims.flip_x(x), y))
            .collect();
        Self { dims, map }
    }

    /// Flip vertically (mirror rows).
    ///
    /// ```text
    /// Before (serpentine): After:
    ///   LED0  LED3  LED4      LED1  LED2  LED5
    ///   LED1  LED2  LED5      LED0  LED3  LED4
    /// ```
    #[must_use]
    pub fn flip_v(self) -> Self {
        let dims = self.dims;
        let map = self
            .map
            .into_iter()
            .map(|(x, y)| (x, dims.flip_y(y)))
            .collect();
        Self { dims, map }
    }
}
