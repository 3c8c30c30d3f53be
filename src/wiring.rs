//! How a physical LED strip is threaded through a panel.
//!
//! A [`WiringConfig`] names one of the 16 standard traversals
//! ([`WiringMode`] × [`StartCorner`]) plus optional mirroring of the whole path.
//! Collaborators (file headers, UI dropdowns, project metadata) describe wiring with
//! short text labels, so every type here parses from and prints to those labels.
//!
//! ```rust
//! use led_rewire::wiring::{StartCorner, WiringConfig, WiringMode};
//!
//! let config: WiringConfig = "Serpentine/LB".parse()?;
//! assert_eq!(config, WiringConfig::new(WiringMode::Serpentine, StartCorner::BottomLeft));
//! assert_eq!(config.to_string(), "Serpentine/LB");
//! # Ok::<(), led_rewire::Error>(())
//! ```

use alloc::{borrow::ToOwned, string::String};
use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Order in which the strip visits the panel's cells.
///
/// ```text
/// 3×2, starting top-left:
///
///   RowMajor      Serpentine    ColumnMajor   ColumnSerpentine
///   0  1  2       0  1  2       0  2  4       0  3  4
///   3  4  5       5  4  3       1  3  5       1  2  5
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WiringMode {
    /// Every row runs in the same direction.
    #[default]
    RowMajor,
    /// Rows alternate direction (boustrophedon).
    Serpentine,
    /// Every column runs in the same direction.
    ColumnMajor,
    /// Columns alternate direction.
    ColumnSerpentine,
}

impl WiringMode {
    /// All modes, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::RowMajor,
        Self::Serpentine,
        Self::ColumnMajor,
        Self::ColumnSerpentine,
    ];

    /// Canonical text label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RowMajor => "Row-major",
            Self::Serpentine => "Serpentine",
            Self::ColumnMajor => "Column-major",
            Self::ColumnSerpentine => "Column-serpentine",
        }
    }

    /// True when the strip advances along rows first.
    #[must_use]
    pub const fn is_row_first(self) -> bool {
        matches!(self, Self::RowMajor | Self::Serpentine)
    }

    /// True when consecutive lines alternate direction.
    #[must_use]
    pub const fn is_serpentine(self) -> bool {
        matches!(self, Self::Serpentine | Self::ColumnSerpentine)
    }
}

impl fmt::Display for WiringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WiringMode {
    type Err = Error;

    /// Accepts the canonical labels case-insensitively, with `-`, `_` or a space
    /// between words (`"Row-major"`, `"row_major"`, `"COLUMN SERPENTINE"`).
    fn from_str(text: &str) -> Result<Self> {
        match normalize_label(text).as_str() {
            "rowmajor" | "row" => Ok(Self::RowMajor),
            "serpentine" | "rowserpentine" | "snake" | "zigzag" => Ok(Self::Serpentine),
            "columnmajor" | "column" => Ok(Self::ColumnMajor),
            "columnserpentine" | "columnsnake" | "columnzigzag" => Ok(Self::ColumnSerpentine),
            _ => Err(Error::UnsupportedWiringConfig {
                kind: "mode",
                value: text.to_owned(),
            }),
        }
    }
}

/// Corner of the panel that holds hardware index 0 (where data enters).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartCorner {
    /// `(0, 0)`.
    #[default]
    TopLeft,
    /// `(width - 1, 0)`.
    TopRight,
    /// `(0, height - 1)`.
    BottomLeft,
    /// `(width - 1, height - 1)`.
    BottomRight,
}

impl StartCorner {
    /// All corners, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Two-letter label used by pattern files (`LT`, `RT`, `LB`, `RB`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopLeft => "LT",
            Self::TopRight => "RT",
            Self::BottomLeft => "LB",
            Self::BottomRight => "RB",
        }
    }

    /// True for the two right-hand corners.
    #[must_use]
    pub const fn is_right(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight)
    }

    /// True for the two bottom corners.
    #[must_use]
    pub const fn is_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight)
    }
}

impl fmt::Display for StartCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StartCorner {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match normalize_label(text).as_str() {
            "lt" | "tl" | "topleft" => Ok(Self::TopLeft),
            "rt" | "tr" | "topright" => Ok(Self::TopRight),
            "lb" | "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "rb" | "br" | "bottomright" => Ok(Self::BottomRight),
            _ => Err(Error::UnsupportedWiringConfig {
                kind: "corner",
                value: text.to_owned(),
            }),
        }
    }
}

/// Full description of one pixel ordering: traversal plus optional path mirroring.
///
/// `flip_x`/`flip_y` mirror the traversal path itself, for a strip that was laid
/// mirrored relative to its nominal corner. They are part of the ordering, unlike the
/// design-space flips of [`Conversion`](crate::pipeline::Conversion), which correct how
/// the panel is mounted.
///
/// Two configs are equal iff all four fields match. Equal configs always produce the
/// same permutation; different configs may still coincide on degenerate panels (1×N).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WiringConfig {
    /// Traversal order.
    pub mode: WiringMode,
    /// Corner holding hardware index 0.
    pub corner: StartCorner,
    /// Mirror the path left-right.
    #[serde(default)]
    pub flip_x: bool,
    /// Mirror the path top-bottom.
    #[serde(default)]
    pub flip_y: bool,
}

impl WiringConfig {
    /// Canonical design order: row-major from the top-left, no mirroring.
    pub const DESIGN: Self = Self::new(WiringMode::RowMajor, StartCorner::TopLeft);

    /// Config with no path mirroring.
    #[must_use]
    pub const fn new(mode: WiringMode, corner: StartCorner) -> Self {
        Self {
            mode,
            corner,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Set left-right path mirroring.
    #[must_use]
    pub const fn with_flip_x(self, flip_x: bool) -> Self {
        Self { flip_x, ..self }
    }

    /// Set top-bottom path mirroring.
    #[must_use]
    pub const fn with_flip_y(self, flip_y: bool) -> Self {
        Self { flip_y, ..self }
    }

    /// Every unflipped `(mode, corner)` combination: modes outer, corners inner.
    pub fn standard() -> impl Iterator<Item = Self> {
        itertools::iproduct!(WiringMode::ALL, StartCorner::ALL)
            .map(|(mode, corner)| Self::new(mode, corner))
    }

    /// True when this config is the canonical design order.
    #[must_use]
    pub fn is_design_order(&self) -> bool {
        *self == Self::DESIGN
    }
}

impl fmt::Display for WiringConfig {
    /// `Mode/CORNER`, followed by `+flip-x` / `+flip-y` when set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mode, self.corner)?;
        if self.flip_x {
            f.write_str("+flip-x")?;
        }
        if self.flip_y {
            f.write_str("+flip-y")?;
        }
        Ok(())
    }
}

impl FromStr for WiringConfig {
    type Err = Error;

    /// Parses the [`Display`](fmt::Display) form. The corner may be omitted (`"Serpentine"`
    /// means top-left).
    fn from_str(text: &str) -> Result<Self> {
        let mut parts = text.split('+');
        let head = parts.next().unwrap_or_default();
        let (mode, corner) = match head.split_once('/') {
            Some((mode, corner)) => (mode.parse()?, corner.parse()?),
            None => (head.parse()?, StartCorner::TopLeft),
        };
        let mut config = Self::new(mode, corner);
        for flag in parts {
            match normalize_label(flag).as_str() {
                "flipx" => config.flip_x = true,
                "flipy" => config.flip_y = true,
                _ => {
                    return Err(Error::UnsupportedWiringConfig {
                        kind: "flip",
                        value: flag.to_owned(),
                    });
                }
            }
        }
        Ok(config)
    }
}

// Lowercase, with word separators removed.
fn normalize_label(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_labels_round_trip() {
        for mode in WiringMode::ALL {
            assert_eq!(mode.label().parse::<WiringMode>(), Ok(mode));
        }
        assert_eq!("column_serpentine".parse::<WiringMode>(), Ok(WiringMode::ColumnSerpentine));
        assert_eq!("ROW MAJOR".parse::<WiringMode>(), Ok(WiringMode::RowMajor));
    }

    #[test]
    fn corner_labels_accept_both_spellings() {
        assert_eq!("LB".parse::<StartCorner>(), Ok(StartCorner::BottomLeft));
        assert_eq!("bottom-left".parse::<StartCorner>(), Ok(StartCorner::BottomLeft));
        assert_eq!("tr".parse::<StartCorner>(), Ok(StartCorner::TopRight));
    }

    #[test]
    fn unknown_labels_are_rejected_not_defaulted() {
        assert_eq!(
            "Spiral".parse::<WiringMode>(),
            Err(Error::UnsupportedWiringConfig {
                kind: "mode",
                value: "Spiral".to_owned(),
            })
        );
        assert!(matches!(
            "middle".parse::<StartCorner>(),
            Err(Error::UnsupportedWiringConfig { kind: "corner", .. })
        ));
        assert!(matches!(
            "Serpentine/LT+rotate".parse::<WiringConfig>(),
            Err(Error::UnsupportedWiringConfig { kind: "flip", .. })
        ));
    }

    #[test]
    fn config_display_parses_back() {
        let config = WiringConfig::new(WiringMode::ColumnMajor, StartCorner::BottomRight)
            .with_flip_x(true)
            .with_flip_y(true);
        assert_eq!(config.to_string(), "Column-major/RB+flip-x+flip-y");
        assert_eq!(config.to_string().parse::<WiringConfig>(), Ok(config));
        assert_eq!(
            "Serpentine".parse::<WiringConfig>(),
            Ok(WiringConfig::new(WiringMode::Serpentine, StartCorner::TopLeft))
        );
    }

    #[test]
    fn standard_lists_sixteen_distinct_configs() {
        let configs: alloc::vec::Vec<_> = WiringConfig::standard().collect();
        assert_eq!(configs.len(), 16);
        let mut sorted = configs.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 16);
        assert!(configs[0].is_design_order());
    }
}
