// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry produced by one positioning-engine computation pass.

use kurbo::{Point, Rect};

use crate::types::{Placement, PositionMode, StyleMap};

/// Offsets of one logical part (`popper`, `reference`, or `arrow`).
///
/// Engines always report `top`/`left`; `width`/`height` are present when the part was
/// measured. [`PartOffsets::same_as`] is the comparison the dirty check uses: exact, so
/// sub-pixel differences count as changes, except that all non-finite values match each
/// other.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PartOffsets {
    /// Distance from the top edge of the offset parent.
    pub top: f64,
    /// Distance from the left edge of the offset parent.
    pub left: f64,
    /// Measured width, if any.
    pub width: Option<f64>,
    /// Measured height, if any.
    pub height: Option<f64>,
}

impl PartOffsets {
    /// Offsets with only a position.
    #[must_use]
    pub const fn at(top: f64, left: f64) -> Self {
        Self {
            top,
            left,
            width: None,
            height: None,
        }
    }

    /// Offsets with a position and a size.
    #[must_use]
    pub const fn sized(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width: Some(width),
            height: Some(height),
        }
    }

    /// The top-left corner as a point (`x = left`, `y = top`).
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// The covered rectangle, if both dimensions are known.
    #[must_use]
    pub fn to_rect(&self) -> Option<Rect> {
        let (w, h) = (self.width?, self.height?);
        Some(Rect::new(self.left, self.top, self.left + w, self.top + h))
    }

    /// Returns `true` if both offsets describe the same geometry.
    ///
    /// Unlike `==`, a NaN matches a NaN, so an engine that keeps reporting an unmeasurable
    /// part does not look like it keeps moving.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        same_coord(self.top, other.top)
            && same_coord(self.left, other.left)
            && same_extent(self.width, other.width)
            && same_extent(self.height, other.height)
    }
}

fn same_coord(a: f64, b: f64) -> bool {
    a == b || (!a.is_finite() && !b.is_finite())
}

fn same_extent(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_coord(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl From<Rect> for PartOffsets {
    fn from(rect: Rect) -> Self {
        Self::sized(rect.y0, rect.x0, rect.width(), rect.height())
    }
}

/// Offsets for every logical part the engine positioned.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offsets {
    /// The floating element.
    pub popper: PartOffsets,
    /// The target element.
    pub reference: PartOffsets,
    /// The arrow element, when an arrow is registered and the engine positioned it.
    pub arrow: Option<PartOffsets>,
}

impl Offsets {
    /// Part-wise [`PartOffsets::same_as`].
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.popper.same_as(&other.popper)
            && self.reference.same_as(&other.reference)
            && match (&self.arrow, &other.arrow) {
                (Some(a), Some(b)) => a.same_as(b),
                (None, None) => true,
                _ => false,
            }
    }
}

/// Result of one engine computation pass.
///
/// Snapshots are whole values: the controller replaces its published snapshot with a new one
/// and never patches individual fields.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometrySnapshot {
    /// Per-part offsets. The only input to the dirty check.
    pub offsets: Offsets,
    /// Placement the engine settled on (may differ from the requested one after flipping).
    pub placement: Placement,
    /// Styles to apply to the floating element, excluding `position`.
    pub styles: StyleMap,
    /// Positioning scheme for the floating element.
    pub position: PositionMode,
    /// The target is outside the floating element's valid boundary.
    pub hide: bool,
}

impl GeometrySnapshot {
    /// A snapshot with the given offsets and placement, absolute positioning, no extra styles,
    /// and the target in bounds.
    #[must_use]
    pub fn new(offsets: Offsets, placement: Placement) -> Self {
        Self {
            offsets,
            placement,
            styles: StyleMap::new(),
            position: PositionMode::Absolute,
            hide: false,
        }
    }

    /// Replaces the style map.
    #[must_use]
    pub fn with_styles(mut self, styles: StyleMap) -> Self {
        self.styles = styles;
        self
    }

    /// Replaces the positioning scheme.
    #[must_use]
    pub fn with_position(mut self, position: PositionMode) -> Self {
        self.position = position;
        self
    }

    /// Sets the out-of-boundary flag.
    #[must_use]
    pub fn with_hide(mut self, hide: bool) -> Self {
        self.hide = hide;
        self
    }
}
