// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-facing outputs derived from the published snapshot.

use alloc::string::ToString;

use kurbo::Point;

use crate::snapshot::GeometrySnapshot;
use crate::types::{Placement, PositionMode, StyleMap, StyleValue};

/// Present when the target has left the floating element's valid boundary.
///
/// Rendered as an attribute whose mere presence carries the meaning; its value is the empty
/// string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutOfBoundaries;

impl OutOfBoundaries {
    /// The attribute value, always `""`.
    #[must_use]
    pub const fn as_attr_value(self) -> &'static str {
        ""
    }
}

/// Offset of the arrow element inside the floating element.
///
/// Empty until a snapshot with arrow offsets is published.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ArrowStyle {
    /// `x = left`, `y = top`.
    pub offset: Option<Point>,
}

impl ArrowStyle {
    /// `true` if there is nothing to apply.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.offset.is_none()
    }

    /// The `top` value, if any.
    #[must_use]
    pub fn top(&self) -> Option<f64> {
        self.offset.map(|p| p.y)
    }

    /// The `left` value, if any.
    #[must_use]
    pub fn left(&self) -> Option<f64> {
        self.offset.map(|p| p.x)
    }

    /// The style map (`top`, `left` in pixels), empty when there is no offset.
    #[must_use]
    pub fn to_style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        if let Some(p) = self.offset {
            style.insert("top".to_string(), StyleValue::Px(p.y));
            style.insert("left".to_string(), StyleValue::Px(p.x));
        }
        style
    }
}

/// Everything the render layer needs from the controller for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    /// Style for the floating element.
    pub style: StyleMap,
    /// Resolved placement, once geometry has been published.
    pub placement: Option<Placement>,
    /// Out-of-boundary marker.
    pub out_of_boundaries: Option<OutOfBoundaries>,
    /// Arrow offset.
    pub arrow_style: ArrowStyle,
}

/// Style used while nothing is positioned yet: laid out, but invisible and inert.
#[must_use]
pub fn pending_style() -> StyleMap {
    let mut style = StyleMap::new();
    style.insert(
        "position".to_string(),
        StyleValue::keyword(PositionMode::Absolute.as_str()),
    );
    style.insert("pointerEvents".to_string(), StyleValue::keyword("none"));
    style.insert("opacity".to_string(), StyleValue::Number(0.0));
    style
}

/// Projects the published snapshot into render outputs.
///
/// `engine_active` is whether an engine instance is live; without one the style stays
/// pending even if an older snapshot is still around.
#[must_use]
pub fn project(snapshot: Option<&GeometrySnapshot>, engine_active: bool) -> Projection {
    Projection {
        style: floating_style(snapshot.filter(|_| engine_active)),
        placement: snapshot.map(|s| s.placement),
        out_of_boundaries: snapshot.filter(|s| s.hide).map(|_| OutOfBoundaries),
        arrow_style: arrow_style(snapshot),
    }
}

fn floating_style(snapshot: Option<&GeometrySnapshot>) -> StyleMap {
    let Some(snapshot) = snapshot else {
        return pending_style();
    };
    let mut style = StyleMap::new();
    style.insert(
        "position".to_string(),
        StyleValue::keyword(snapshot.position.as_str()),
    );
    style.extend(
        snapshot
            .styles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    style
}

/// Arrow offset of `snapshot`, or empty.
#[must_use]
pub fn arrow_style(snapshot: Option<&GeometrySnapshot>) -> ArrowStyle {
    ArrowStyle {
        offset: snapshot
            .and_then(|s| s.offsets.arrow)
            .map(|arrow| arrow.origin()),
    }
}
