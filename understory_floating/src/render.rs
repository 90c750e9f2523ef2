// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render contract: how projected geometry reaches the view layer.
//!
//! There are two mutually exclusive modes, picked per render through [`Content`]:
//!
//! - **Callback**: the caller's function receives [`RenderArgs`] (positioning props, the
//!   caller's pass-through props, and a [`Scheduler`] while an engine is live) and builds
//!   whatever it wants.
//! - **Children**: the controller builds an [`Element`] of the configured [`ElementKind`]
//!   around the caller's children, with the projected style merged over the pass-through
//!   style and the positioning attributes attached.
//!
//! Both modes consume the same [`Projection`](crate::Projection).

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use smallvec::SmallVec;

use crate::engine::{PositioningEngine, Scheduler};
use crate::popper::Popper;
use crate::projection::{OutOfBoundaries, Projection};
use crate::types::{Placement, StyleMap};

/// Attribute carrying the resolved placement.
pub const DATA_PLACEMENT: &str = "data-placement";
/// Attribute present while the target is out of bounds.
pub const DATA_OUT_OF_BOUNDARIES: &str = "data-x-out-of-boundaries";

/// Element attributes by name.
pub type Attributes = BTreeMap<String, String>;

/// Caller props the controller does not consume; forwarded to the rendered output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostProps {
    /// Caller style. Projected style wins on conflicts.
    pub style: StyleMap,
    /// Caller attributes.
    pub attributes: Attributes,
}

/// Which injection convention the host must use to report the floating node back through
/// [`Popper::set_floating_node`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// Primitive elements take the node callback as `ref`.
    Ref,
    /// Composite components take it as `innerRef` and forward it to their root.
    InnerRef,
}

impl NodeRef {
    /// The prop name the binding is passed under.
    #[must_use]
    pub const fn prop_name(self) -> &'static str {
        match self {
            Self::Ref => "ref",
            Self::InnerRef => "innerRef",
        }
    }
}

/// What kind of element wraps the children in [`Content::Children`] mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A host primitive such as `div` or `ul`.
    Primitive(Cow<'static, str>),
    /// A caller-defined component.
    Composite(Cow<'static, str>),
}

impl Default for ElementKind {
    fn default() -> Self {
        Self::Primitive(Cow::Borrowed("div"))
    }
}

impl ElementKind {
    /// Node-reference convention for this kind.
    #[must_use]
    pub const fn node_ref(&self) -> NodeRef {
        match self {
            Self::Primitive(_) => NodeRef::Ref,
            Self::Composite(_) => NodeRef::InnerRef,
        }
    }

    /// The tag or component name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(name) | Self::Composite(name) => name,
        }
    }
}

/// Positioning outputs bundled for callback mode.
#[derive(Clone, Debug, PartialEq)]
pub struct PositioningProps {
    /// How to report the floating node.
    pub node_ref: NodeRef,
    /// Style for the floating element.
    pub style: StyleMap,
    /// Resolved placement, once known.
    pub placement: Option<Placement>,
    /// Out-of-boundary marker.
    pub out_of_boundaries: Option<OutOfBoundaries>,
}

impl PositioningProps {
    fn from_projection(projection: Projection, node_ref: NodeRef) -> Self {
        Self {
            node_ref,
            style: projection.style,
            placement: projection.placement,
            out_of_boundaries: projection.out_of_boundaries,
        }
    }

    /// The attributes that are present, by name.
    #[must_use]
    pub fn attributes(&self) -> SmallVec<[(&'static str, &'static str); 2]> {
        let mut attrs = SmallVec::new();
        if let Some(placement) = self.placement {
            attrs.push((DATA_PLACEMENT, placement.as_str()));
        }
        if let Some(marker) = self.out_of_boundaries {
            attrs.push((DATA_OUT_OF_BOUNDARIES, marker.as_attr_value()));
        }
        attrs
    }

    /// Writes the positioning attributes into `attributes`, removing absent ones.
    pub fn apply_attributes(&self, attributes: &mut Attributes) {
        attributes.remove(DATA_PLACEMENT);
        attributes.remove(DATA_OUT_OF_BOUNDARIES);
        for (name, value) in self.attributes() {
            attributes.insert(name.to_string(), value.to_string());
        }
    }
}

/// Arguments handed to a render callback.
pub struct RenderArgs<'a, N, E: PositioningEngine<N>> {
    /// Positioning outputs.
    pub positioning: PositioningProps,
    /// Caller props not consumed by the controller.
    pub passthrough: &'a HostProps,
    /// Recompute trigger for the live engine instance, if any.
    pub scheduler: Option<Scheduler<'a, N, E>>,
}

impl<N, E: PositioningEngine<N>> core::fmt::Debug for RenderArgs<'_, N, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderArgs")
            .field("positioning", &self.positioning)
            .field("passthrough", &self.passthrough)
            .field("scheduler", &self.scheduler.is_some())
            .finish()
    }
}

/// An element description produced in children mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Element<C> {
    /// Element type.
    pub kind: ElementKind,
    /// Merged style.
    pub style: StyleMap,
    /// Merged attributes.
    pub attributes: Attributes,
    /// How the host must report the element's node.
    pub node_ref: NodeRef,
    /// The caller's children, untouched.
    pub children: C,
}

/// What the caller supplies as content.
#[derive(Debug)]
pub enum Content<F, C> {
    /// Render through a callback.
    Callback(F),
    /// Wrap these children in an element.
    Children(C),
}

/// Output of [`Popper::render`].
#[derive(Debug, PartialEq)]
pub enum Rendered<R, C> {
    /// Whatever the callback returned.
    Callback(R),
    /// The wrapping element.
    Element(Element<C>),
}

impl<N: Clone + PartialEq, E: PositioningEngine<N>> Popper<N, E> {
    /// Renders `content` in the mode it selects.
    pub fn render<F, R, C>(&mut self, content: Content<F, C>) -> Rendered<R, C>
    where
        F: FnOnce(RenderArgs<'_, N, E>) -> R,
    {
        match content {
            Content::Callback(f) => Rendered::Callback(self.render_callback(f)),
            Content::Children(children) => Rendered::Element(self.render_element(children)),
        }
    }

    /// Callback mode.
    pub fn render_callback<R>(&mut self, f: impl FnOnce(RenderArgs<'_, N, E>) -> R) -> R {
        let parts = self.render_parts();
        f(RenderArgs {
            positioning: PositioningProps::from_projection(parts.projection, NodeRef::Ref),
            passthrough: parts.passthrough,
            scheduler: parts.scheduler,
        })
    }

    /// Children mode.
    pub fn render_element<C>(&mut self, children: C) -> Element<C> {
        let parts = self.render_parts();
        let kind = parts.component.clone();
        let node_ref = kind.node_ref();
        let positioning = PositioningProps::from_projection(parts.projection, node_ref);

        let mut style = parts.passthrough.style.clone();
        style.extend(positioning.style.iter().map(|(k, v)| (k.clone(), v.clone())));
        let mut attributes = parts.passthrough.attributes.clone();
        positioning.apply_attributes(&mut attributes);

        Element {
            kind,
            style,
            attributes,
            node_ref,
            children,
        }
    }
}
