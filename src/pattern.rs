//! Multi-frame patterns and converting every frame at once.
//!
//! Only pixel order changes: frame count, frame order, durations, name and
//! dimensions are carried over untouched.
//!
//! ```rust
//! use led_rewire::{geometry::Dimensions, pattern::{Frame, Pattern}, pipeline::Conversion};
//! use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
//!
//! let dims = Dimensions::new(2, 2)?;
//! let mut pattern = Pattern::new("blink", dims);
//! pattern.push(Frame::new(vec![1u8, 2, 3, 4], 100));
//! pattern.push(Frame::new(vec![0u8; 4], 50));
//!
//! let to_panel = Conversion::new(
//!     WiringConfig::DESIGN,
//!     WiringConfig::new(WiringMode::Serpentine, StartCorner::TopLeft),
//! );
//! let converted = pattern.convert(&to_panel)?;
//! assert_eq!(converted.frames[0].pixels, [1, 2, 4, 3]);
//! assert_eq!(converted.frames[1].duration_ms, 50);
//! # Ok::<(), led_rewire::Error>(())
//! ```

use alloc::{string::String, vec::Vec};

use smart_leds::RGB8;
use tracing::{debug, warn};

use crate::{
    Error, Result,
    geometry::Dimensions,
    mapper::PermutationCache,
    pipeline::{Conversion, ConversionTrace, PreparedConversion},
    pixel::Pixel,
};

/// One frame of an animation: pixels in some ordering, plus how long to show it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Frame<P = RGB8> {
    /// `width * height` pixels, in the ordering of the owning pattern.
    pub pixels: Vec<P>,
    /// Display time in milliseconds.
    pub duration_ms: u32,
}

impl<P> Frame<P> {
    /// Frame from pixels and a duration.
    #[must_use]
    pub const fn new(pixels: Vec<P>, duration_ms: u32) -> Self {
        Self {
            pixels,
            duration_ms,
        }
    }

    /// Same timing, different pixels.
    #[must_use]
    fn with_pixels<Q>(&self, pixels: Vec<Q>) -> Frame<Q> {
        Frame {
            pixels,
            duration_ms: self.duration_ms,
        }
    }
}

/// A named animation for one panel size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern<P = RGB8> {
    /// Display name, carried through conversion unchanged.
    pub name: String,
    /// Panel size every frame must match.
    pub dims: Dimensions,
    /// Frames in playback order.
    pub frames: Vec<Frame<P>>,
}

impl<P> Pattern<P> {
    /// Pattern with no frames yet.
    #[must_use]
    pub fn new(name: impl Into<String>, dims: Dimensions) -> Self {
        Self {
            name: name.into(),
            dims,
            frames: Vec::new(),
        }
    }

    /// Append a frame.
    pub fn push(&mut self, frame: Frame<P>) {
        self.frames.push(frame);
    }

    /// Sum of frame durations.
    #[must_use]
    pub fn total_duration_ms(&self) -> u64 {
        self.frames
            .iter()
            .map(|frame| u64::from(frame.duration_ms))
            .sum()
    }

    /// Check that the pattern has frames and that each has one pixel per cell.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyPattern`] for a pattern with no frames.
    /// - [`Error::InFrame`] wrapping [`Error::DimensionMismatch`] for the first bad frame.
    pub fn validate(&self) -> Result<()> {
        if self.frames.is_empty() {
            warn!(name = %self.name, "pattern has no frames");
            return Err(Error::EmptyPattern);
        }
        self.frames
            .iter()
            .enumerate()
            .try_for_each(|(frame_index, frame)| {
                self.dims
                    .validate(frame.pixels.len())
                    .map_err(|err| err.in_frame(frame_index))
            })
    }
}

impl<P: Copy> Pattern<P> {
    /// Convert every frame, returning a new pattern.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyPattern`] if there are no frames.
    /// - [`Error::InFrame`] with the index of the first frame that failed.
    pub fn convert(&self, conversion: &Conversion) -> Result<Self> {
        self.validate()?;
        let prepared = conversion.prepare(self.dims);
        self.convert_prepared(&prepared)
    }

    /// Like [`convert`](Self::convert), reusing permutations from `cache`.
    ///
    /// # Errors
    ///
    /// Same as [`convert`](Self::convert).
    pub fn convert_cached(
        &self,
        conversion: &Conversion,
        cache: &mut PermutationCache,
    ) -> Result<Self> {
        self.validate()?;
        let prepared = conversion.prepare_cached(self.dims, cache);
        self.convert_prepared(&prepared)
    }

    /// Lazily convert frames one at a time.
    ///
    /// Lets a caller stop between frames (to stay responsive, or to cancel) without
    /// converting the rest. Each item carries its own frame index on failure.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyPattern`] up front if there are no frames.
    pub fn convert_frames<'a>(
        &'a self,
        conversion: &Conversion,
    ) -> Result<impl Iterator<Item = Result<Frame<P>>> + use<'a, P>> {
        if self.frames.is_empty() {
            return Err(Error::EmptyPattern);
        }
        let prepared = conversion.prepare(self.dims);
        Ok(self
            .frames
            .iter()
            .enumerate()
            .map(move |(frame_index, frame)| convert_frame(&prepared, frame_index, frame)))
    }

    // Callers validate first, so permutations are only built for well-formed input.
    fn convert_prepared(&self, prepared: &PreparedConversion<'_>) -> Result<Self> {
        debug!(
            name = %self.name,
            dims = %self.dims,
            frames = self.frames.len(),
            conversion = %prepared.conversion(),
            "converting pattern"
        );
        let frames = self
            .frames
            .iter()
            .enumerate()
            .map(|(frame_index, frame)| convert_frame(prepared, frame_index, frame))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: self.name.clone(),
            dims: self.dims,
            frames,
        })
    }
}

impl<P: Pixel> Pattern<P> {
    /// Convert every frame and keep each frame's stage checksums.
    ///
    /// # Errors
    ///
    /// Same as [`convert`](Self::convert).
    pub fn convert_traced(&self, conversion: &Conversion) -> Result<(Self, Vec<ConversionTrace>)> {
        self.validate()?;
        let prepared = conversion.prepare(self.dims);
        let (frames, traces) = self
            .frames
            .iter()
            .enumerate()
            .map(|(frame_index, frame)| {
                prepared
                    .convert_traced(&frame.pixels)
                    .map(|(pixels, trace)| (frame.with_pixels(pixels), trace))
                    .map_err(|err| err.in_frame(frame_index))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();
        Ok((
            Self {
                name: self.name.clone(),
                dims: self.dims,
                frames,
            },
            traces,
        ))
    }
}

fn convert_frame<P: Copy>(
    prepared: &PreparedConversion<'_>,
    frame_index: usize,
    frame: &Frame<P>,
) -> Result<Frame<P>> {
    prepared
        .convert(&frame.pixels)
        .map(|pixels| frame.with_pixels(pixels))
        .map_err(|err| {
            warn!(frame_index, %err, "frame conversion failed");
            err.in_frame(frame_index)
        })
}
