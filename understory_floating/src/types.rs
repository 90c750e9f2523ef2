// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement, positioning mode, and style value types shared across the crate.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::ParsePlacementError;

/// Requested or resolved placement of the floating element relative to its target.
///
/// The set is closed and matches the placements a positioning engine is expected to
/// understand. `Auto*` lets the engine pick the side with the most room.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Engine chooses the side.
    Auto,
    /// Engine chooses the side, aligned to its start.
    AutoStart,
    /// Engine chooses the side, aligned to its end.
    AutoEnd,
    /// Above the target, centered.
    Top,
    /// Above the target, aligned to its start.
    TopStart,
    /// Above the target, aligned to its end.
    TopEnd,
    /// Right of the target, centered.
    Right,
    /// Right of the target, aligned to its start.
    RightStart,
    /// Right of the target, aligned to its end.
    RightEnd,
    /// Below the target, centered.
    #[default]
    Bottom,
    /// Below the target, aligned to its start.
    BottomStart,
    /// Below the target, aligned to its end.
    BottomEnd,
    /// Left of the target, centered.
    Left,
    /// Left of the target, aligned to its start.
    LeftStart,
    /// Left of the target, aligned to its end.
    LeftEnd,
}

impl Placement {
    /// Every placement, in the engine's canonical order.
    pub const ALL: [Self; 15] = [
        Self::AutoStart,
        Self::Auto,
        Self::AutoEnd,
        Self::TopStart,
        Self::Top,
        Self::TopEnd,
        Self::RightStart,
        Self::Right,
        Self::RightEnd,
        Self::BottomEnd,
        Self::Bottom,
        Self::BottomStart,
        Self::LeftEnd,
        Self::Left,
        Self::LeftStart,
    ];

    /// The attribute/wire spelling of this placement, e.g. `"bottom-start"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::AutoStart => "auto-start",
            Self::AutoEnd => "auto-end",
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePlacementError::new(s))
    }
}

/// CSS-like positioning scheme the engine computed offsets for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositionMode {
    /// Positioned relative to the nearest positioned ancestor.
    #[default]
    Absolute,
    /// Positioned relative to the viewport.
    Fixed,
}

impl PositionMode {
    /// The keyword spelling, `"absolute"` or `"fixed"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        }
    }
}

/// A single style value.
///
/// The render layer decides how to apply these; this crate only produces them.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// A keyword such as `absolute`, `none`, or a preformatted value like `translate3d(..)`.
    Keyword(Cow<'static, str>),
    /// A unitless number (opacity, z-index).
    Number(f64),
    /// A length in logical pixels.
    Px(f64),
}

impl StyleValue {
    /// Convenience constructor for keyword values.
    pub fn keyword(value: impl Into<Cow<'static, str>>) -> Self {
        Self::Keyword(value.into())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => f.write_str(k),
            Self::Number(n) => write!(f, "{n}"),
            Self::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Style properties keyed by camelCase name (`position`, `pointerEvents`, `willChange`, ...).
///
/// Ordered so that rendered output is deterministic.
pub type StyleMap = BTreeMap<String, StyleValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn placement_round_trips_through_its_spelling() {
        for p in Placement::ALL {
            assert_eq!(p.as_str().parse::<Placement>(), Ok(p), "{p}");
        }
    }

    #[test]
    fn unknown_placement_is_rejected() {
        let err = "middle".parse::<Placement>().unwrap_err();
        assert!(err.to_string().contains("middle"), "{err}");
    }

    #[test]
    fn default_placement_is_bottom() {
        assert_eq!(Placement::default(), Placement::Bottom);
    }

    #[test]
    fn style_values_display_like_css() {
        assert_eq!(StyleValue::Px(4.5).to_string(), "4.5px");
        assert_eq!(StyleValue::Number(0.0).to_string(), "0");
        assert_eq!(StyleValue::keyword("none").to_string(), "none");
    }
}
