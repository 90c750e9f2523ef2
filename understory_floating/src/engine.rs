// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The positioning engine seam.
//!
//! The engine owns all geometry math. This crate only creates, updates, and destroys
//! instances, and receives the snapshots they compute through the
//! [`UPDATE_STATE`](crate::modifiers::UPDATE_STATE) stage.

use core::marker::PhantomData;

use crate::error::MissingTargetError;
use crate::modifiers::ModifierSet;
use crate::types::Placement;

/// Generation of an engine instance.
///
/// Every instance the controller creates gets a fresh epoch. Passes reported with any other
/// epoch come from a destroyed instance and are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(pub u64);

impl Epoch {
    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Options an engine instance is created with.
#[derive(Clone, Debug)]
pub struct EngineOptions<N> {
    /// Requested placement.
    pub placement: Placement,
    /// Whether the instance recomputes on scroll and resize by itself.
    pub events_enabled: bool,
    /// Merged modifier pipeline.
    pub modifiers: ModifierSet<N>,
}

/// An external positioning engine.
///
/// Implementations attach their own scroll/resize listeners when
/// [`EngineOptions::events_enabled`] is set and must detach them in
/// [`destroy`](Self::destroy), so that no pass is reported for a destroyed instance.
pub trait PositioningEngine<N> {
    /// A live engine instance bound to one target/floating pair.
    type Instance;

    /// Creates an instance positioning `floating` relative to `target`.
    fn create(&mut self, target: N, floating: N, options: EngineOptions<N>) -> Self::Instance;

    /// Tears an instance down and detaches its listeners.
    fn destroy(&mut self, instance: Self::Instance);

    /// Requests an out-of-band recomputation, e.g. after the floating content changed size.
    fn schedule_update(&mut self, instance: &mut Self::Instance);
}

/// Creates an engine instance, refusing to do so without a target.
///
/// The engine is not touched when `target` is `None`.
pub fn create_instance<N, E>(
    engine: &mut E,
    target: Option<N>,
    floating: N,
    options: EngineOptions<N>,
) -> Result<E::Instance, MissingTargetError>
where
    E: PositioningEngine<N>,
{
    let target = target.ok_or(MissingTargetError)?;
    Ok(engine.create(target, floating, options))
}

/// A borrowed trigger for the live instance's [`PositioningEngine::schedule_update`].
///
/// Handed to render callbacks so content that knows it changed size can request a
/// recomputation directly.
pub struct Scheduler<'a, N, E: PositioningEngine<N>> {
    engine: &'a mut E,
    instance: &'a mut E::Instance,
    _node: PhantomData<fn(N)>,
}

impl<'a, N, E: PositioningEngine<N>> Scheduler<'a, N, E> {
    pub(crate) fn new(engine: &'a mut E, instance: &'a mut E::Instance) -> Self {
        Self {
            engine,
            instance,
            _node: PhantomData,
        }
    }

    /// Asks the engine to recompute the live instance.
    pub fn schedule_update(&mut self) {
        self.engine.schedule_update(self.instance);
    }
}

impl<N, E: PositioningEngine<N>> core::fmt::Debug for Scheduler<'_, N, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler").finish_non_exhaustive()
    }
}
