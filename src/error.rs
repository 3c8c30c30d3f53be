use alloc::{boxed::Box, string::String};

use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// Every variant carries enough context (sizes, offending value, frame index) to
/// explain the failure without access to the call site. None of them are transient.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum Error {
    /// A panel side is zero, or `width * height` does not fit in `usize`.
    #[display("invalid panel dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A pixel buffer's length does not equal `width * height`.
    #[display(
        "pixel buffer has {actual} pixels but a {width}x{height} panel needs {expected}"
    )]
    DimensionMismatch {
        /// Panel width.
        width: u32,
        /// Panel height.
        height: u32,
        /// `width * height`.
        expected: usize,
        /// Length of the buffer that was supplied.
        actual: usize,
    },

    /// An irregular panel's hardware buffer does not have one pixel per active LED.
    #[display("hardware buffer has {actual} pixels but the panel has {expected} LEDs")]
    LedCountMismatch {
        /// Number of active cells.
        expected: usize,
        /// Length of the buffer that was supplied.
        actual: usize,
    },

    /// A wiring mode, start corner or flip label was not recognized.
    #[display("unsupported wiring {kind}: {value:?}")]
    UnsupportedWiringConfig {
        /// Which part of the config failed (`"mode"`, `"corner"` or `"flip"`).
        kind: &'static str,
        /// The rejected text.
        value: String,
    },

    /// A custom layout does not visit every cell exactly once.
    #[display("invalid LED layout: {reason} at ({x}, {y})")]
    InvalidLayout {
        /// What is wrong with the cell.
        reason: &'static str,
        /// Column of the offending cell.
        x: u32,
        /// Row of the offending cell.
        y: u32,
    },

    /// A pattern with zero frames was handed to the pattern adapter.
    #[display("pattern has no frames")]
    EmptyPattern,

    /// A per-frame failure, tagged with the frame that caused it.
    #[display("frame {frame_index}: {source}")]
    InFrame {
        /// Zero-based index of the offending frame.
        frame_index: usize,
        /// The underlying failure.
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the index of the frame that produced it.
    #[must_use]
    pub fn in_frame(self, frame_index: usize) -> Self {
        Self::InFrame {
            frame_index,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any frame context.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::InFrame { source, .. } => source.root(),
            other => other,
        }
    }
}
