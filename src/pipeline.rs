//! Two-stage conversion: file order → design order → target order.
//!
//! 1. Undo the source wiring ([`Permutation::to_design`]).
//! 2. Optionally mirror in design space ([`flip_frame`]) for a panel mounted flipped.
//! 3. Apply the target wiring ([`Permutation::to_hardware`]).
//!
//! The flips sit strictly between the two wiring stages, so they compose with any pair
//! of wirings the same way.
//!
//! # Example
//!
//! A 4×4 pattern authored in design order, re-targeted to a serpentine panel:
//!
//! ```rust
//! use led_rewire::{geometry::Dimensions, pipeline::Conversion};
//! use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
//!
//! let dims = Dimensions::new(4, 4)?;
//! let design: Vec<u32> = (0..16).collect();
//! let conversion = Conversion::new(
//!     WiringConfig::DESIGN,
//!     WiringConfig::new(WiringMode::Serpentine, StartCorner::TopLeft),
//! );
//! assert_eq!(
//!     conversion.convert(&design, dims)?,
//!     [0, 1, 2, 3, 7, 6, 5, 4, 8, 9, 10, 11, 15, 14, 13, 12]
//! );
//! # Ok::<(), led_rewire::Error>(())
//! ```

use alloc::{borrow::Cow, vec::Vec};
use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    Result,
    geometry::{Dimensions, flip_frame},
    mapper::{Permutation, PermutationCache},
    pixel::{Pixel, checksum},
    wiring::WiringConfig,
};

/// A source ordering, a target ordering, and design-space orientation correction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Conversion {
    /// Order the input frames are stored in.
    pub source: WiringConfig,
    /// Order the output frames must be in.
    pub target: WiringConfig,
    /// Mirror left-right in design space.
    #[serde(default)]
    pub flip_x: bool,
    /// Mirror top-bottom in design space.
    #[serde(default)]
    pub flip_y: bool,
}

impl Conversion {
    /// Conversion with no orientation correction.
    #[must_use]
    pub const fn new(source: WiringConfig, target: WiringConfig) -> Self {
        Self {
            source,
            target,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Set left-right mirroring.
    #[must_use]
    pub const fn with_flip_x(self, flip_x: bool) -> Self {
        Self { flip_x, ..self }
    }

    /// Set top-bottom mirroring.
    #[must_use]
    pub const fn with_flip_y(self, flip_y: bool) -> Self {
        Self { flip_y, ..self }
    }

    /// Conversion that undoes this one.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            ..self
        }
    }

    /// True when output always equals input.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.source == self.target && !self.flip_x && !self.flip_y
    }

    /// Build both permutations once, for converting many frames of one size.
    #[must_use]
    pub fn prepare(&self, dims: Dimensions) -> PreparedConversion<'static> {
        PreparedConversion {
            conversion: *self,
            dims,
            source: Cow::Owned(Permutation::new(dims, self.source)),
            target: Cow::Owned(Permutation::new(dims, self.target)),
        }
    }

    /// Like [`prepare`](Self::prepare), borrowing the permutations from a cache.
    pub fn prepare_cached<'a>(
        &self,
        dims: Dimensions,
        cache: &'a mut PermutationCache,
    ) -> PreparedConversion<'a> {
        let (source, target) = cache.get_pair(dims, self.source, self.target);
        PreparedConversion {
            conversion: *self,
            dims,
            source: Cow::Borrowed(source),
            target: Cow::Borrowed(target),
        }
    }

    /// Convert one frame.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
    /// `frame.len() != width * height`.
    pub fn convert<P: Copy>(&self, frame: &[P], dims: Dimensions) -> Result<Vec<P>> {
        dims.validate(frame.len())?;
        if self.is_identity() {
            trace!(%dims, config = %self.source, "identity conversion");
            return Ok(frame.to_vec());
        }
        self.prepare(dims).convert(frame)
    }

    /// Convert one frame, recording a checksum after every stage.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
    /// `frame.len() != width * height`.
    pub fn convert_traced<P: Pixel>(
        &self,
        frame: &[P],
        dims: Dimensions,
    ) -> Result<(Vec<P>, ConversionTrace)> {
        dims.validate(frame.len())?;
        self.prepare(dims).convert_traced(frame)
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)?;
        if self.flip_x {
            f.write_str(" (flip x)")?;
        }
        if self.flip_y {
            f.write_str(" (flip y)")?;
        }
        Ok(())
    }
}

/// Convert one frame from `source` order to `target` order, with optional
/// design-space flips.
///
/// # Errors
///
/// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
/// `frame.len() != width * height`.
pub fn convert<P: Copy>(
    frame: &[P],
    dims: Dimensions,
    source: WiringConfig,
    target: WiringConfig,
    flip_x: bool,
    flip_y: bool,
) -> Result<Vec<P>> {
    Conversion::new(source, target)
        .with_flip_x(flip_x)
        .with_flip_y(flip_y)
        .convert(frame, dims)
}

/// A [`Conversion`] with both permutations built for one panel size.
#[derive(Clone, Debug)]
pub struct PreparedConversion<'a> {
    conversion: Conversion,
    dims: Dimensions,
    source: Cow<'a, Permutation>,
    target: Cow<'a, Permutation>,
}

impl PreparedConversion<'_> {
    /// The conversion this was prepared from.
    #[must_use]
    pub const fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Panel size every frame must match.
    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Convert one frame, skipping all work for an identity conversion.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
    /// `frame.len() != width * height`.
    pub fn convert<P: Copy>(&self, frame: &[P]) -> Result<Vec<P>> {
        self.dims.validate(frame.len())?;
        if self.conversion.is_identity() {
            return Ok(frame.to_vec());
        }
        self.run(frame, |_, _| {})
    }

    /// Convert one frame through every stage (never short-cut) and checksum each
    /// stage's output.
    ///
    /// The trace is observational: the returned pixels always equal
    /// [`convert`](Self::convert)'s.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
    /// `frame.len() != width * height`.
    pub fn convert_traced<P: Pixel>(&self, frame: &[P]) -> Result<(Vec<P>, ConversionTrace)> {
        self.dims.validate(frame.len())?;
        let mut trace = ConversionTrace::default();
        trace.record(Stage::Input, frame);
        let output = self.run(frame, |stage, pixels| trace.record(stage, pixels))?;
        debug!(conversion = %self.conversion, dims = %self.dims, %trace, "conversion traced");
        Ok((output, trace))
    }

    fn run<P: Copy>(&self, frame: &[P], mut observe: impl FnMut(Stage, &[P])) -> Result<Vec<P>> {
        let design = self.source.to_design(frame)?;
        observe(Stage::Design, &design);

        let Conversion { flip_x, flip_y, .. } = self.conversion;
        let oriented = if flip_x || flip_y {
            let flipped = flip_frame(&design, self.dims, flip_x, flip_y)?;
            observe(Stage::Oriented, &flipped);
            flipped
        } else {
            design
        };

        let output = self.target.to_hardware(&oriented)?;
        observe(Stage::Output, &output);
        Ok(output)
    }
}

/// Pipeline stage a checksum was taken after.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// The frame as supplied, in source order.
    Input,
    /// After undoing the source wiring.
    Design,
    /// After design-space flips (only present when a flip is requested).
    Oriented,
    /// After applying the target wiring.
    Output,
}

impl Stage {
    /// Short lowercase name, for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Design => "design",
            Self::Oriented => "oriented",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checksum of one stage's pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StageChecksum {
    /// Stage the buffer came out of.
    pub stage: Stage,
    /// CRC-32 of the buffer's bytes.
    pub checksum: u32,
}

/// Ordered per-stage checksums from one conversion, for diagnostics only.
///
/// Comparing traces shows where two conversions diverge: equal `design` checksums
/// with different `output` checksums point at the target wiring.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConversionTrace {
    entries: Vec<StageChecksum>,
}

impl ConversionTrace {
    /// Every recorded stage, in pipeline order.
    #[must_use]
    pub fn entries(&self) -> &[StageChecksum] {
        &self.entries
    }

    /// Checksum recorded for `stage`, if that stage ran.
    #[must_use]
    pub fn checksum(&self, stage: Stage) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.checksum)
    }

    fn record<P: Pixel>(&mut self, stage: Stage, pixels: &[P]) {
        let checksum = checksum(pixels);
        trace!(%stage, checksum, "stage checksum");
        self.entries.push(StageChecksum { stage, checksum });
    }
}

impl fmt::Display for ConversionTrace {
    /// `input=1a2b3c4d design=...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, entry) in self.entries.iter().enumerate() {
            if position > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={:08x}", entry.stage, entry.checksum)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        wiring::{StartCorner, WiringMode},
    };

    fn serpentine() -> WiringConfig {
        WiringConfig::new(WiringMode::Serpentine, StartCorner::BottomLeft)
    }

    #[test]
    fn trace_records_each_stage_in_order() -> Result<()> {
        let dims = Dimensions::new(4, 3)?;
        let frame: Vec<u32> = (0..12).collect();
        let conversion = Conversion::new(serpentine(), WiringConfig::DESIGN);

        let (_, trace) = conversion.convert_traced(&frame, dims)?;
        let stages: Vec<Stage> = trace.entries().iter().map(|entry| entry.stage).collect();
        assert_eq!(stages, [Stage::Input, Stage::Design, Stage::Output]);
        assert_eq!(trace.checksum(Stage::Input), Some(checksum(&frame)));
        assert_eq!(trace.checksum(Stage::Oriented), None);

        let (_, flipped) = conversion.with_flip_y(true).convert_traced(&frame, dims)?;
        assert_eq!(flipped.entries().len(), 4);
        assert_eq!(flipped.checksum(Stage::Design), trace.checksum(Stage::Design));
        Ok(())
    }

    #[test]
    fn trace_does_not_change_the_result() -> Result<()> {
        let dims = Dimensions::new(5, 2)?;
        let frame: Vec<u8> = (10..20).collect();
        let conversion = Conversion::new(
            serpentine(),
            WiringConfig::new(WiringMode::ColumnMajor, StartCorner::TopRight),
        )
        .with_flip_x(true);
        let (traced, trace) = conversion.convert_traced(&frame, dims)?;
        assert_eq!(traced, conversion.convert(&frame, dims)?);
        assert_eq!(trace.checksum(Stage::Output), Some(checksum(&traced)));
        Ok(())
    }

    #[test]
    fn identical_configs_round_trip_through_every_stage() -> Result<()> {
        let dims = Dimensions::new(3, 3)?;
        let frame: Vec<u16> = (0..9).collect();
        let conversion = Conversion::new(serpentine(), serpentine());
        assert!(conversion.is_identity());
        let (output, trace) = conversion.prepare(dims).convert_traced(&frame)?;
        assert_eq!(output, frame);
        assert_eq!(trace.checksum(Stage::Input), trace.checksum(Stage::Output));
        Ok(())
    }

    #[test]
    fn prepared_conversion_checks_every_frame() -> Result<()> {
        let dims = Dimensions::new(2, 2)?;
        let prepared = Conversion::new(WiringConfig::DESIGN, serpentine()).prepare(dims);
        assert_eq!(prepared.dims(), dims);
        assert!(matches!(
            prepared.convert(&[1u8, 2, 3]),
            Err(Error::DimensionMismatch { actual: 3, .. })
        ));
        Ok(())
    }

    #[test]
    fn cached_and_uncached_agree() -> Result<()> {
        let dims = Dimensions::new(6, 4)?;
        let frame: Vec<u32> = (0..24).collect();
        let conversion = Conversion::new(
            WiringConfig::new(WiringMode::ColumnSerpentine, StartCorner::BottomRight),
            serpentine(),
        )
        .with_flip_x(true);
        let mut cache = PermutationCache::new();
        let cached = conversion.prepare_cached(dims, &mut cache).convert(&frame)?;
        assert_eq!(cached, conversion.convert(&frame, dims)?);
        assert_eq!(cache.len(), 2);
        Ok(())
    }

    #[test]
    fn display_forms() {
        let conversion = Conversion::new(WiringConfig::DESIGN, serpentine()).with_flip_y(true);
        assert_eq!(
            alloc::format!("{conversion}"),
            "Row-major/LT -> Serpentine/LB (flip y)"
        );
        let trace = ConversionTrace {
            entries: alloc::vec![
                StageChecksum {
                    stage: Stage::Input,
                    checksum: 0xdead_beef,
                },
                StageChecksum {
                    stage: Stage::Output,
                    checksum: 1,
                },
            ],
        };
        assert_eq!(alloc::format!("{trace}"), "input=deadbeef output=00000001");
    }
}
