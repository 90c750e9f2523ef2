// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator capabilities passed between a floating element, its target, and its arrow.

use core::cell::RefCell;

use crate::projection::ArrowStyle;

/// Resolves the target node when none is given explicitly.
///
/// Typically implemented by whatever owns the target element (see [`Manager`]).
pub trait TargetResolver<N> {
    /// The current target node, if one is registered.
    fn target_node(&self) -> Option<N>;
}

/// Lets a resolver stay mutable on the target's side while the controller holds a shared
/// handle to it (`Rc<RefCell<Manager<N>>>`).
impl<N, R: TargetResolver<N>> TargetResolver<N> for RefCell<R> {
    fn target_node(&self) -> Option<N> {
        self.borrow().target_node()
    }
}

/// A minimal target registry.
///
/// The target element registers itself on mount and clears itself on unmount; the floating
/// element's controller reads it when it creates an engine instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manager<N> {
    target: Option<N>,
}

impl<N> Manager<N> {
    /// An empty manager.
    #[must_use]
    pub const fn new() -> Self {
        Self { target: None }
    }

    /// Registers (or clears) the target node.
    pub fn set_target_node(&mut self, node: Option<N>) {
        self.target = node;
    }
}

impl<N: Clone> TargetResolver<N> for Manager<N> {
    fn target_node(&self) -> Option<N> {
        self.target.clone()
    }
}

/// Capability offered to an arrow sub-element.
///
/// The arrow registers its node so the engine can position it, then reads back its offset.
/// Registration only takes effect for engine instances created afterwards.
pub trait ArrowHost<N> {
    /// Registers (or clears) the arrow node.
    fn set_arrow_node(&mut self, node: Option<N>);

    /// The arrow's offset from the published snapshot.
    fn arrow_style(&self) -> ArrowStyle;
}
