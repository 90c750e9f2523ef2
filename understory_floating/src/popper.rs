// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle controller.
//!
//! [`Popper`] ties one engine instance to the mount/update/unmount lifecycle of a floating
//! element. All state changes go through five entry points:
//!
//! - [`Popper::mount`] / [`Popper::unmount`]
//! - [`Popper::update`] with the next [`PopperOptions`]
//! - [`Popper::set_floating_node`] (and [`ArrowHost::set_arrow_node`])
//! - [`Popper::report_geometry`], called from the engine's terminal pipeline stage
//!
//! At most one engine instance is live at a time; the old one is always destroyed before a
//! replacement is created.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use tracing::{debug, trace, warn};

use crate::context::{ArrowHost, TargetResolver};
use crate::dirty::{self, PassDecision};
use crate::engine::{self, EngineOptions, Epoch, PositioningEngine, Scheduler};
use crate::error::MissingTargetError;
use crate::modifiers::{Modifiers, merge_modifiers};
use crate::projection::{self, ArrowStyle, Projection};
use crate::render::{ElementKind, HostProps};
use crate::snapshot::GeometrySnapshot;
use crate::types::Placement;

/// Caller configuration of a floating element.
#[derive(Clone, Debug, PartialEq)]
pub struct PopperOptions<N> {
    /// Requested placement. Changing it recreates the engine instance.
    pub placement: Placement,
    /// Whether the engine recomputes on scroll and resize. Changing it recreates the engine
    /// instance.
    pub events_enabled: bool,
    /// Caller modifiers. Picked up the next time an instance is created.
    pub modifiers: Modifiers,
    /// Explicit target. Falls back to the [`TargetResolver`] when `None`.
    pub target: Option<N>,
    /// Element wrapping the children in children render mode.
    pub component: ElementKind,
    /// Props forwarded to the rendered output.
    pub passthrough: HostProps,
}

impl<N> Default for PopperOptions<N> {
    fn default() -> Self {
        Self {
            placement: Placement::Bottom,
            events_enabled: true,
            modifiers: Modifiers::new(),
            target: None,
            component: ElementKind::default(),
            passthrough: HostProps::default(),
        }
    }
}

impl<N> PopperOptions<N> {
    /// Sets the placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Sets whether the engine listens to scroll and resize.
    #[must_use]
    pub fn with_events_enabled(mut self, enabled: bool) -> Self {
        self.events_enabled = enabled;
        self
    }

    /// Sets the explicit target.
    #[must_use]
    pub fn with_target(mut self, target: N) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the caller modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

bitflags::bitflags! {
    /// What differs between two [`PopperOptions`] (plus whether the content changed).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OptionChanges: u8 {
        /// `placement` changed.
        const PLACEMENT   = 0b0000_0001;
        /// `events_enabled` changed.
        const EVENTS      = 0b0000_0010;
        /// `modifiers` changed.
        const MODIFIERS   = 0b0000_0100;
        /// `target` changed.
        const TARGET      = 0b0000_1000;
        /// `component` changed.
        const COMPONENT   = 0b0001_0000;
        /// `passthrough` changed.
        const PASSTHROUGH = 0b0010_0000;
        /// The rendered content changed.
        const CONTENT     = 0b0100_0000;
    }
}

impl OptionChanges {
    /// Diffs two option sets.
    #[must_use]
    pub fn between<N: PartialEq>(
        prev: &PopperOptions<N>,
        next: &PopperOptions<N>,
        content_changed: bool,
    ) -> Self {
        let mut changes = Self::empty();
        changes.set(Self::PLACEMENT, prev.placement != next.placement);
        changes.set(Self::EVENTS, prev.events_enabled != next.events_enabled);
        changes.set(Self::MODIFIERS, prev.modifiers != next.modifiers);
        changes.set(Self::TARGET, prev.target != next.target);
        changes.set(Self::COMPONENT, prev.component != next.component);
        changes.set(Self::PASSTHROUGH, prev.passthrough != next.passthrough);
        changes.set(Self::CONTENT, content_changed);
        changes
    }

    /// Whether these changes force a new engine instance.
    #[must_use]
    pub const fn requires_new_instance(self) -> bool {
        self.intersects(Self::PLACEMENT.union(Self::EVENTS))
    }
}

/// Where the controller is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Not mounted. No engine instance, no node references.
    Unmounted,
    /// Mounted without a live engine instance: the floating node is unknown or no target
    /// could be resolved.
    PendingEngine,
    /// Mounted with a live engine instance.
    Active,
}

/// Observer for the floating node, called whenever the host reports it.
pub type InnerRef<N> = Box<dyn FnMut(Option<&N>)>;

/// Positioning-synchronization controller for one floating element.
pub struct Popper<N, E: PositioningEngine<N>> {
    engine: E,
    options: PopperOptions<N>,
    resolver: Option<Rc<dyn TargetResolver<N>>>,
    inner_ref: Option<InnerRef<N>>,

    mounted: bool,
    floating: Option<N>,
    arrow: Option<N>,

    instance: Option<E::Instance>,
    epoch: Epoch,
    snapshot: Option<GeometrySnapshot>,
    last_error: Option<MissingTargetError>,
    render_requested: bool,
}

/// Borrowed pieces of a [`Popper`] needed to render it.
pub(crate) struct RenderParts<'a, N, E: PositioningEngine<N>> {
    pub(crate) projection: Projection,
    pub(crate) passthrough: &'a HostProps,
    pub(crate) component: &'a ElementKind,
    pub(crate) scheduler: Option<Scheduler<'a, N, E>>,
}

impl<N: Clone + PartialEq, E: PositioningEngine<N>> Popper<N, E> {
    /// Creates an unmounted controller.
    #[must_use]
    pub fn new(engine: E, options: PopperOptions<N>) -> Self {
        Self {
            engine,
            options,
            resolver: None,
            inner_ref: None,
            mounted: false,
            floating: None,
            arrow: None,
            instance: None,
            epoch: Epoch::default(),
            snapshot: None,
            last_error: None,
            render_requested: false,
        }
    }

    /// Uses `resolver` to find the target when [`PopperOptions::target`] is `None`.
    #[must_use]
    pub fn with_target_resolver(mut self, resolver: Rc<dyn TargetResolver<N>>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replaces (or removes) the target resolver.
    pub fn set_target_resolver(&mut self, resolver: Option<Rc<dyn TargetResolver<N>>>) {
        self.resolver = resolver;
    }

    /// Installs an observer that sees every floating node reported by the host.
    pub fn set_inner_ref(&mut self, inner_ref: Option<InnerRef<N>>) {
        self.inner_ref = inner_ref;
    }

    /// The current options.
    #[must_use]
    pub fn options(&self) -> &PopperOptions<N> {
        &self.options
    }

    /// The engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The engine, mutably. Does not affect the live instance.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        match (self.mounted, self.instance.is_some()) {
            (false, _) => LifecycleState::Unmounted,
            (true, false) => LifecycleState::PendingEngine,
            (true, true) => LifecycleState::Active,
        }
    }

    /// Epoch of the live engine instance, if any.
    #[must_use]
    pub fn live_epoch(&self) -> Option<Epoch> {
        self.instance.as_ref().map(|_| self.epoch)
    }

    /// The floating node, if reported.
    #[must_use]
    pub fn floating_node(&self) -> Option<&N> {
        self.floating.as_ref()
    }

    /// The last published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<&GeometrySnapshot> {
        self.snapshot.as_ref()
    }

    /// Why the last construction attempt failed, if it did.
    #[must_use]
    pub fn last_error(&self) -> Option<MissingTargetError> {
        self.last_error
    }

    /// Render outputs for the current state.
    #[must_use]
    pub fn projection(&self) -> Projection {
        projection::project(self.snapshot.as_ref(), self.instance.is_some())
    }

    /// Returns `true` once per change that affects rendering (a publish, or an engine
    /// instance appearing or going away), then resets.
    pub fn take_render_request(&mut self) -> bool {
        core::mem::take(&mut self.render_requested)
    }

    /// Mounts the controller. Creates an engine instance right away if the floating node is
    /// already known.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        debug!("mounting floating element");
        self.mounted = true;
        if self.floating.is_some() {
            self.create_instance();
        }
    }

    /// Applies the next options.
    ///
    /// A change of `placement` or `events_enabled` destroys the live instance and creates a
    /// new one. A content change asks the live instance to recompute. If the last creation
    /// attempt failed for lack of a target, it is retried. Returns what changed.
    pub fn update(&mut self, options: PopperOptions<N>, content_changed: bool) -> OptionChanges {
        let changes = OptionChanges::between(&self.options, &options, content_changed);
        self.options = options;
        if !self.mounted {
            return changes;
        }

        let mut created = false;
        if changes.requires_new_instance() {
            debug!(?changes, "engine configuration changed");
            self.destroy_instance();
            self.create_instance();
            created = self.instance.is_some();
        } else if self.instance.is_none() && self.last_error.is_some() {
            debug!("retrying engine creation");
            self.create_instance();
            created = self.instance.is_some();
        }

        // A fresh instance has already scheduled its first pass.
        if changes.contains(OptionChanges::CONTENT) && !created {
            self.schedule_update();
        }
        changes
    }

    /// Unmounts the controller: destroys any live instance and forgets all node references
    /// and geometry. Idempotent.
    pub fn unmount(&mut self) {
        self.destroy_instance();
        if self.mounted {
            debug!("unmounting floating element");
        }
        self.mounted = false;
        self.arrow = None;
        self.snapshot = None;
        self.last_error = None;
        if self.floating.take().is_some()
            && let Some(inner_ref) = self.inner_ref.as_mut()
        {
            inner_ref(None);
        }
    }

    /// Records the floating node reported by the host (or its removal).
    ///
    /// The first node seen while mounted brings up the engine instance. A different node
    /// replaces the instance; `None` tears it down.
    pub fn set_floating_node(&mut self, node: Option<N>) {
        if let Some(inner_ref) = self.inner_ref.as_mut() {
            inner_ref(node.as_ref());
        }
        if self.floating == node {
            return;
        }
        self.floating = node;
        if !self.mounted {
            return;
        }
        self.destroy_instance();
        if self.floating.is_some() {
            self.create_instance();
        }
    }

    /// Asks the live instance to recompute. Returns `false` if there is none.
    pub fn schedule_update(&mut self) -> bool {
        let Some(instance) = self.instance.as_mut() else {
            return false;
        };
        trace!(epoch = self.epoch.0, "scheduling engine update");
        self.engine.schedule_update(instance);
        true
    }

    /// A recompute trigger for the live instance.
    pub fn scheduler(&mut self) -> Option<Scheduler<'_, N, E>> {
        let instance = self.instance.as_mut()?;
        Some(Scheduler::new(&mut self.engine, instance))
    }

    /// Receives one computation pass from the engine's terminal stage.
    ///
    /// Publishes `snapshot` if its offsets differ from the published ones. Passes from any
    /// instance other than the live one (including any pass after unmount) are ignored.
    /// The snapshot is always handed back so the engine can finish its pipeline.
    pub fn report_geometry(
        &mut self,
        epoch: Epoch,
        snapshot: GeometrySnapshot,
    ) -> GeometrySnapshot {
        if self.live_epoch() != Some(epoch) {
            trace!(epoch = epoch.0, "ignoring pass from an inactive engine instance");
            return snapshot;
        }
        match dirty::decide(self.snapshot.as_ref(), &snapshot) {
            PassDecision::Publish => {
                trace!(
                    placement = %snapshot.placement,
                    hide = snapshot.hide,
                    "publishing geometry"
                );
                self.snapshot = Some(snapshot.clone());
                self.render_requested = true;
            }
            PassDecision::Discard => {
                trace!("offsets unchanged; discarding pass");
            }
        }
        snapshot
    }

    pub(crate) fn render_parts(&mut self) -> RenderParts<'_, N, E> {
        let projection = self.projection();
        let scheduler = match self.instance.as_mut() {
            Some(instance) => Some(Scheduler::new(&mut self.engine, instance)),
            None => None,
        };
        RenderParts {
            projection,
            passthrough: &self.options.passthrough,
            component: &self.options.component,
            scheduler,
        }
    }

    fn resolve_target(&self) -> Option<N> {
        self.options
            .target
            .clone()
            .or_else(|| self.resolver.as_ref().and_then(|r| r.target_node()))
    }

    fn create_instance(&mut self) {
        debug_assert!(self.instance.is_none(), "destroy before create");
        let Some(floating) = self.floating.clone() else {
            return;
        };
        let target = self.resolve_target();
        let epoch = self.epoch.next();
        let options = EngineOptions {
            placement: self.options.placement,
            events_enabled: self.options.events_enabled,
            modifiers: merge_modifiers(&self.options.modifiers, epoch, self.arrow.as_ref()),
        };
        match engine::create_instance(&mut self.engine, target, floating, options) {
            Ok(mut instance) => {
                debug!(
                    epoch = epoch.0,
                    placement = %self.options.placement,
                    events_enabled = self.options.events_enabled,
                    "created engine instance"
                );
                self.epoch = epoch;
                self.last_error = None;
                // Creation alone does not guarantee a pass before the first paint.
                self.engine.schedule_update(&mut instance);
                self.instance = Some(instance);
                self.render_requested = true;
            }
            Err(err) => {
                warn!(%err, "floating element stays hidden");
                self.last_error = Some(err);
            }
        }
    }

    fn destroy_instance(&mut self) {
        if let Some(instance) = self.instance.take() {
            debug!(epoch = self.epoch.0, "destroying engine instance");
            self.engine.destroy(instance);
            self.render_requested = true;
        }
    }
}

impl<N: Clone + PartialEq, E: PositioningEngine<N>> ArrowHost<N> for Popper<N, E> {
    fn set_arrow_node(&mut self, node: Option<N>) {
        self.arrow = node;
    }

    fn arrow_style(&self) -> ArrowStyle {
        projection::arrow_style(self.snapshot.as_ref())
    }
}

impl<N: fmt::Debug, E: PositioningEngine<N>> fmt::Debug for Popper<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popper")
            .field("options", &self.options)
            .field("mounted", &self.mounted)
            .field("floating", &self.floating)
            .field("arrow", &self.arrow)
            .field("live", &self.instance.is_some())
            .field("epoch", &self.epoch)
            .field("snapshot", &self.snapshot)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Manager;
    use crate::modifiers::{ARROW, ModifierConfig, ModifierEntry, UPDATE_STATE};
    use crate::projection::{OutOfBoundaries, pending_style};
    use crate::snapshot::{Offsets, PartOffsets};
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Create {
            id: u32,
            target: u32,
            floating: u32,
            placement: Placement,
            events_enabled: bool,
        },
        Destroy(u32),
        Schedule(u32),
    }

    #[derive(Debug, Default)]
    struct RecordingEngine {
        next_id: u32,
        calls: Vec<Call>,
        last_options: Option<EngineOptions<u32>>,
    }

    impl RecordingEngine {
        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }

        fn creates(&self) -> usize {
            self.count(|c| matches!(c, Call::Create { .. }))
        }

        fn destroys(&self) -> usize {
            self.count(|c| matches!(c, Call::Destroy(_)))
        }

        fn schedules(&self) -> usize {
            self.count(|c| matches!(c, Call::Schedule(_)))
        }
    }

    impl PositioningEngine<u32> for RecordingEngine {
        type Instance = u32;

        fn create(&mut self, target: u32, floating: u32, options: EngineOptions<u32>) -> u32 {
            self.next_id += 1;
            self.calls.push(Call::Create {
                id: self.next_id,
                target,
                floating,
                placement: options.placement,
                events_enabled: options.events_enabled,
            });
            self.last_options = Some(options);
            self.next_id
        }

        fn destroy(&mut self, instance: u32) {
            self.calls.push(Call::Destroy(instance));
        }

        fn schedule_update(&mut self, instance: &mut u32) {
            self.calls.push(Call::Schedule(*instance));
        }
    }

    const TARGET: u32 = 10;
    const FLOATING: u32 = 20;

    fn offsets(top: f64) -> Offsets {
        Offsets {
            popper: PartOffsets::sized(top, 4.0, 120.0, 40.0),
            reference: PartOffsets::sized(0.0, 0.0, 60.0, 20.0),
            arrow: None,
        }
    }

    fn snapshot(top: f64) -> GeometrySnapshot {
        GeometrySnapshot::new(offsets(top), Placement::Bottom)
    }

    fn options() -> PopperOptions<u32> {
        PopperOptions::default().with_target(TARGET)
    }

    fn active() -> Popper<u32, RecordingEngine> {
        let mut popper = Popper::new(RecordingEngine::default(), options());
        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        assert_eq!(popper.state(), LifecycleState::Active);
        popper
    }

    fn pass(popper: &mut Popper<u32, RecordingEngine>, snapshot: GeometrySnapshot) {
        let epoch = popper.live_epoch().expect("engine should be live");
        let returned = popper.report_geometry(epoch, snapshot.clone());
        assert_eq!(returned, snapshot, "pass must be handed back unchanged");
    }

    #[test]
    fn mount_creates_and_schedules_once() {
        let popper = active();
        assert_eq!(
            popper.engine().calls,
            [
                Call::Create {
                    id: 1,
                    target: TARGET,
                    floating: FLOATING,
                    placement: Placement::Bottom,
                    events_enabled: true,
                },
                Call::Schedule(1),
            ]
        );
    }

    #[test]
    fn floating_node_arriving_after_mount_creates_the_instance() {
        let mut popper = Popper::new(RecordingEngine::default(), options());
        popper.mount();
        assert_eq!(popper.state(), LifecycleState::PendingEngine);
        assert_eq!(popper.engine().creates(), 0);

        popper.set_floating_node(Some(FLOATING));
        assert_eq!(popper.state(), LifecycleState::Active);
        assert_eq!(popper.engine().creates(), 1);
        assert_eq!(popper.engine().schedules(), 1);

        // Reporting the same node again is not a transition.
        popper.set_floating_node(Some(FLOATING));
        assert_eq!(popper.engine().creates(), 1);
    }

    #[test]
    fn identical_offsets_publish_once() {
        let mut popper = active();
        let _ = popper.take_render_request();

        pass(&mut popper, snapshot(30.0));
        assert!(popper.take_render_request());
        let first = popper.snapshot().cloned();

        let mut same_offsets = snapshot(30.0).with_hide(true);
        same_offsets.placement = Placement::Top;
        pass(&mut popper, same_offsets);
        pass(&mut popper, snapshot(30.0));
        assert!(!popper.take_render_request());
        assert_eq!(popper.snapshot().cloned(), first);
    }

    #[test]
    fn repeated_nan_offsets_publish_once() {
        let mut popper = active();
        let _ = popper.take_render_request();

        pass(&mut popper, snapshot(f64::NAN));
        assert!(popper.take_render_request());
        pass(&mut popper, snapshot(f64::NAN));
        assert!(!popper.take_render_request());
    }

    #[test]
    fn differing_offsets_publish() {
        let mut popper = active();
        pass(&mut popper, snapshot(30.0));
        pass(&mut popper, snapshot(31.0));
        assert_eq!(popper.snapshot(), Some(&snapshot(31.0)));
    }

    #[test]
    fn style_is_pending_until_first_publish() {
        let mut popper = Popper::new(RecordingEngine::default(), options());
        assert_eq!(popper.projection().style, pending_style());
        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        assert_eq!(popper.projection().style, pending_style());

        pass(&mut popper, snapshot(30.0));
        assert_ne!(popper.projection().style, pending_style());
    }

    #[test]
    fn hide_toggles_the_marker() {
        let mut popper = active();
        pass(&mut popper, snapshot(30.0).with_hide(true));
        assert_eq!(popper.projection().out_of_boundaries, Some(OutOfBoundaries));
        pass(&mut popper, snapshot(32.0).with_hide(false));
        assert_eq!(popper.projection().out_of_boundaries, None);
    }

    #[test]
    fn placement_change_destroys_then_creates() {
        let mut popper = active();
        popper.engine_mut().calls.clear();

        let changes = popper.update(options().with_placement(Placement::Top), false);
        assert_eq!(changes, OptionChanges::PLACEMENT);
        assert_eq!(
            popper.engine().calls,
            [
                Call::Destroy(1),
                Call::Create {
                    id: 2,
                    target: TARGET,
                    floating: FLOATING,
                    placement: Placement::Top,
                    events_enabled: true,
                },
                Call::Schedule(2),
            ]
        );
    }

    #[test]
    fn events_change_recreates_the_instance() {
        let mut popper = active();
        popper.update(options().with_events_enabled(false), false);
        assert_eq!(popper.engine().destroys(), 1);
        assert_eq!(popper.engine().creates(), 2);
        assert!(matches!(
            popper.engine().calls[3],
            Call::Create {
                events_enabled: false,
                ..
            }
        ));
    }

    #[test]
    fn content_change_only_forwards_an_update() {
        let mut popper = active();
        popper.engine_mut().calls.clear();

        let mut next = options();
        next.passthrough.attributes.insert("class".into(), "menu".into());
        let changes = popper.update(next, true);
        assert_eq!(changes, OptionChanges::PASSTHROUGH | OptionChanges::CONTENT);
        assert_eq!(popper.engine().calls, [Call::Schedule(1)]);
    }

    #[test]
    fn modifier_change_waits_for_the_next_instance() {
        let mut popper = active();
        popper.engine_mut().calls.clear();
        let mut modifiers = Modifiers::new();
        modifiers.insert("flip".into(), ModifierConfig::disabled());
        let changes = popper.update(options().with_modifiers(modifiers), false);
        assert_eq!(changes, OptionChanges::MODIFIERS);
        assert!(popper.engine().calls.is_empty());
    }

    #[test]
    fn unmount_destroys_once_and_ignores_late_passes() {
        let mut popper = active();
        let epoch = popper.live_epoch().expect("live");
        pass(&mut popper, snapshot(30.0));

        popper.unmount();
        assert_eq!(popper.state(), LifecycleState::Unmounted);
        assert_eq!(popper.engine().destroys(), 1);
        assert_eq!(popper.floating_node(), None);
        assert_eq!(popper.snapshot(), None);
        let _ = popper.take_render_request();

        let late = snapshot(99.0);
        assert_eq!(popper.report_geometry(epoch, late.clone()), late);
        assert_eq!(popper.snapshot(), None);
        assert!(!popper.take_render_request());

        popper.unmount();
        assert_eq!(popper.engine().destroys(), 1, "unmount is idempotent");
    }

    #[test]
    fn passes_from_a_replaced_instance_are_ignored() {
        let mut popper = active();
        let old = popper.live_epoch().expect("live");
        popper.update(options().with_placement(Placement::Left), false);
        let new = popper.live_epoch().expect("live");
        assert_ne!(old, new);

        let _ = popper.report_geometry(old, snapshot(50.0));
        assert_eq!(popper.snapshot(), None);
        let _ = popper.report_geometry(new, snapshot(50.0));
        assert_eq!(popper.snapshot(), Some(&snapshot(50.0)));
    }

    #[test]
    fn missing_target_stays_pending_and_retries_on_update() {
        let mut popper = Popper::new(RecordingEngine::default(), PopperOptions::default());
        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        assert_eq!(popper.state(), LifecycleState::PendingEngine);
        assert_eq!(popper.last_error(), Some(MissingTargetError));
        assert_eq!(popper.engine().creates(), 0);
        assert_eq!(popper.projection().style, pending_style());

        // An unrelated update is the next natural cycle.
        popper.update(options(), false);
        assert_eq!(popper.state(), LifecycleState::Active);
        assert_eq!(popper.last_error(), None);
        assert_eq!(popper.engine().creates(), 1);
    }

    #[test]
    fn retry_with_content_change_schedules_once() {
        let mut popper = Popper::new(RecordingEngine::default(), PopperOptions::default());
        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        assert_eq!(popper.state(), LifecycleState::PendingEngine);

        popper.update(options(), true);
        assert_eq!(popper.state(), LifecycleState::Active);
        assert_eq!(popper.engine().creates(), 1);
        assert_eq!(popper.engine().schedules(), 1);
    }

    #[test]
    fn placement_and_content_change_schedules_once() {
        let mut popper = active();
        popper.engine_mut().calls.clear();

        popper.update(options().with_placement(Placement::Left), true);
        assert_eq!(popper.engine().destroys(), 1);
        assert_eq!(popper.engine().creates(), 1);
        assert_eq!(popper.engine().schedules(), 1);
    }

    #[test]
    fn resolver_supplies_the_target() {
        let manager = Rc::new(RefCell::new(Manager::new()));
        let resolver: Rc<dyn TargetResolver<u32>> = manager.clone();
        let mut popper = Popper::new(RecordingEngine::default(), PopperOptions::default())
            .with_target_resolver(resolver);
        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        assert_eq!(popper.last_error(), Some(MissingTargetError));

        manager.borrow_mut().set_target_node(Some(7));
        popper.update(PopperOptions::default(), false);
        assert!(matches!(
            popper.engine().calls[0],
            Call::Create { target: 7, .. }
        ));
    }

    #[test]
    fn explicit_target_wins_over_resolver() {
        let manager = Rc::new(RefCell::new(Manager::new()));
        manager.borrow_mut().set_target_node(Some(7));
        let resolver: Rc<dyn TargetResolver<u32>> = manager;
        let mut popper = Popper::new(RecordingEngine::default(), options())
            .with_target_resolver(resolver);
        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        assert!(matches!(
            popper.engine().calls[0],
            Call::Create { target: TARGET, .. }
        ));
    }

    #[test]
    fn injected_modifiers_reach_the_engine() {
        let mut modifiers = Modifiers::new();
        modifiers.insert(UPDATE_STATE.into(), ModifierConfig::disabled());
        let mut popper = Popper::new(
            RecordingEngine::default(),
            options().with_modifiers(modifiers),
        );
        popper.set_arrow_node(Some(30));
        popper.set_floating_node(Some(FLOATING));
        popper.mount();

        let epoch = popper.live_epoch().expect("live");
        let engine_options = popper.engine().last_options.as_ref().expect("created");
        assert!(matches!(
            engine_options.modifiers.get(UPDATE_STATE),
            Some(ModifierEntry::UpdateState { epoch: e, .. }) if *e == epoch
        ));
        assert_eq!(
            engine_options.modifiers.get(ARROW),
            Some(&ModifierEntry::Arrow { element: 30 })
        );
    }

    #[test]
    fn arrow_style_reads_the_published_snapshot() {
        let mut popper = active();
        pass(&mut popper, snapshot(30.0));
        assert!(popper.arrow_style().is_empty());

        let mut with_arrow = snapshot(30.0);
        with_arrow.offsets.arrow = Some(PartOffsets::sized(5.0, 10.0, 8.0, 8.0));
        pass(&mut popper, with_arrow);
        let arrow = popper.arrow_style();
        assert_eq!((arrow.top(), arrow.left()), (Some(5.0), Some(10.0)));
    }

    #[test]
    fn clearing_the_floating_node_tears_the_instance_down() {
        let mut popper = active();
        popper.set_floating_node(None);
        assert_eq!(popper.state(), LifecycleState::PendingEngine);
        assert_eq!(popper.engine().destroys(), 1);
        assert_eq!(popper.projection().style, pending_style());

        popper.set_floating_node(Some(21));
        assert_eq!(popper.state(), LifecycleState::Active);
        assert!(matches!(
            popper.engine().calls.last(),
            Some(Call::Schedule(2))
        ));
    }

    #[test]
    fn inner_ref_observes_every_report() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut popper = Popper::new(RecordingEngine::default(), options());
        popper.set_inner_ref(Some(Box::new(move |node: Option<&u32>| {
            sink.borrow_mut().push(node.copied());
        })));
        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        popper.unmount();
        assert_eq!(*seen.borrow(), [Some(FLOATING), None]);
    }

    #[test]
    fn scheduler_is_only_available_while_active() {
        let mut popper = Popper::new(RecordingEngine::default(), options());
        assert!(popper.scheduler().is_none());
        assert!(!popper.schedule_update());

        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        popper
            .scheduler()
            .expect("live")
            .schedule_update();
        assert_eq!(popper.engine().schedules(), 2);
    }

    #[test]
    fn remount_starts_fresh() {
        let mut popper = active();
        pass(&mut popper, snapshot(30.0));
        popper.unmount();

        popper.set_floating_node(Some(FLOATING));
        popper.mount();
        assert_eq!(popper.state(), LifecycleState::Active);
        assert_eq!(popper.snapshot(), None);
        assert_eq!(popper.projection().style, pending_style());
        assert_eq!(popper.engine().creates(), 2);
    }
}
