// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Floating: keep tooltips, popovers, and menus anchored to their target.
//!
//! This crate binds a floating element's view lifecycle to an external positioning engine.
//! It does not compute positions. It decides *when* an engine instance exists, *which*
//! computed geometry is worth a re-render, and *what* the render layer should apply.
//!
//! - [`PositioningEngine`]: the engine seam (create, destroy, schedule an update).
//! - [`Popper`]: the lifecycle controller, one per floating element.
//! - [`GeometrySnapshot`]: one computation pass, reported through [`Popper::report_geometry`].
//! - [`is_dirty`]: only passes whose offsets changed are published.
//! - [`Projection`]: style, placement, out-of-boundary marker, and arrow offset derived from
//!   the published snapshot.
//! - [`Content`] / [`Rendered`]: callback and wrapped-element render modes.
//! - [`TargetResolver`] / [`Manager`] and [`ArrowHost`]: collaborator capabilities for the
//!   target and the arrow.
//!
//! ## Lifecycle
//!
//! ```text
//! Unmounted --mount--> PendingEngine --floating node known--> Active
//!     ^                      ^                                  |
//!     |                      +---- floating node cleared -------+
//!     +---------------------- unmount --------------------------+
//! ```
//!
//! Entering `Active` creates an engine instance and immediately schedules one update, since
//! creation alone does not guarantee geometry before the first paint. Changing `placement` or
//! `events_enabled` destroys the instance and creates a new one; changing only the content
//! forwards a scheduled update. If no target can be resolved, the element stays in its
//! pending style (laid out, invisible, not pickable) until the next update or mount.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_floating::{
//!     EngineOptions, Epoch, GeometrySnapshot, LifecycleState, ModifierEntry, Offsets,
//!     PartOffsets, Placement, Popper, PopperOptions, PositioningEngine, UPDATE_STATE,
//! };
//!
//! /// An engine that queues work for the host instead of listening to layout events.
//! #[derive(Default)]
//! struct QueueEngine {
//!     pending: Vec<Epoch>,
//! }
//!
//! impl PositioningEngine<u32> for QueueEngine {
//!     type Instance = Epoch;
//!
//!     fn create(&mut self, _target: u32, _floating: u32, options: EngineOptions<u32>) -> Epoch {
//!         match options.modifiers.get(UPDATE_STATE) {
//!             Some(ModifierEntry::UpdateState { epoch, .. }) => *epoch,
//!             _ => Epoch::default(),
//!         }
//!     }
//!
//!     fn destroy(&mut self, epoch: Epoch) {
//!         self.pending.retain(|e| *e != epoch);
//!     }
//!
//!     fn schedule_update(&mut self, epoch: &mut Epoch) {
//!         self.pending.push(*epoch);
//!     }
//! }
//!
//! let options = PopperOptions::default().with_target(1).with_placement(Placement::Top);
//! let mut popper = Popper::new(QueueEngine::default(), options);
//! popper.set_floating_node(Some(2));
//! popper.mount();
//! assert_eq!(popper.state(), LifecycleState::Active);
//!
//! // Run the queued pass: the engine computes geometry and reports it back.
//! let epoch = popper.engine_mut().pending.pop().unwrap();
//! let offsets = Offsets {
//!     popper: PartOffsets::sized(-30.0, 0.0, 80.0, 24.0),
//!     reference: PartOffsets::sized(0.0, 0.0, 40.0, 20.0),
//!     arrow: None,
//! };
//! let _ = popper.report_geometry(epoch, GeometrySnapshot::new(offsets, Placement::Top));
//!
//! assert!(popper.take_render_request());
//! assert_eq!(popper.projection().placement, Some(Placement::Top));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`, `thiserror`, and `tracing`.
//! - `libm`: `no_std` floating-point support for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod context;
mod dirty;
mod engine;
mod error;
mod modifiers;
mod popper;
mod projection;
mod render;
mod snapshot;
mod types;

pub use context::{ArrowHost, Manager, TargetResolver};
pub use dirty::{PassDecision, decide, is_dirty};
pub use engine::{EngineOptions, Epoch, PositioningEngine, Scheduler, create_instance};
pub use error::{MissingTargetError, ParsePlacementError};
pub use modifiers::{
    APPLY_STYLE, ARROW, ModifierConfig, ModifierEntry, ModifierSet, Modifiers, ParamValue,
    UPDATE_STATE, UPDATE_STATE_ORDER, merge_modifiers,
};
pub use popper::{InnerRef, LifecycleState, OptionChanges, Popper, PopperOptions};
pub use projection::{ArrowStyle, OutOfBoundaries, Projection, arrow_style, pending_style, project};
pub use render::{
    Attributes, Content, DATA_OUT_OF_BOUNDARIES, DATA_PLACEMENT, Element, ElementKind, HostProps,
    NodeRef, PositioningProps, RenderArgs, Rendered,
};
pub use snapshot::{GeometrySnapshot, Offsets, PartOffsets};
pub use types::{Placement, PositionMode, StyleMap, StyleValue};
