//! Reorder LED matrix frames between physical wiring schemes.
//!
//! A pattern authored for one panel wiring looks scrambled on a panel wired another
//! way. This crate converts pixel buffers between orderings by routing every frame
//! through a canonical *design order* (row-major from the top-left):
//!
//! ```text
//! source order --to_design--> design order --[flip x / flip y]--> --to_hardware--> target order
//! ```
//!
//! # Glossary
//!
//! - **Design order:** pixel `(x, y)` is at index `y * width + x`. The shared intermediate.
//! - **Hardware order:** the order LEDs sit along the physical data line.
//! - **Wiring:** a [`WiringMode`] (row-major, serpentine, column-major, column-serpentine)
//!   plus the [`StartCorner`] where the data line enters the panel.
//! - **Permutation:** the index maps between design and hardware order for one panel size
//!   and one wiring. See [`mapper`].
//! - **Irregular panel:** a grid where some cells have no LED; the wire skips them.
//!   See [`shape`].
//!
//! # Example
//!
//! ```rust
//! use led_rewire::{Conversion, Dimensions, StartCorner, WiringConfig, WiringMode};
//!
//! let dims = Dimensions::new(4, 4)?;
//! let frame: Vec<u8> = (0..16).collect();
//! let row_major_right = WiringConfig::new(WiringMode::RowMajor, StartCorner::TopRight);
//! let converted = Conversion::new(WiringConfig::DESIGN, row_major_right).convert(&frame, dims)?;
//! assert_eq!(&converted[..4], [3, 2, 1, 0]);
//! # Ok::<(), led_rewire::Error>(())
//! ```
#![cfg_attr(not(any(test, feature = "host")), no_std)]

extern crate alloc;

mod error;
pub mod geometry;
pub mod layout;
pub mod mapper;
pub mod pattern;
pub mod pipeline;
pub mod pixel;
pub mod shape;
pub mod traversal;
pub mod wiring;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};

pub use crate::{
    geometry::Dimensions,
    layout::LedLayout,
    mapper::{Permutation, PermutationCache},
    pattern::{Frame, Pattern},
    pipeline::{Conversion, ConversionTrace},
    pixel::Pixel,
    shape::{MaskedLayout, MaskedPermutation},
    wiring::{StartCorner, WiringConfig, WiringMode},
};
pub use smart_leds::RGB8;
