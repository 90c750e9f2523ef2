// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Understory Floating demos.
//!
//! [`SceneEngine`] is a toy positioning engine over a table of node rectangles. It places the
//! floating rectangle on the requested side of the target, flags it hidden once the target
//! leaves the viewport, and queues passes instead of listening to real layout events. It is
//! only meant to drive the controller in the demos.

use std::collections::HashMap;

use kurbo::{Rect, Vec2};
use understory_floating::{
    EngineOptions, Epoch, GeometrySnapshot, ModifierEntry, Offsets, PartOffsets, Placement,
    PositioningEngine, StyleMap, StyleValue, UPDATE_STATE,
};

/// One live instance of [`SceneEngine`].
#[derive(Clone, Debug)]
pub struct SceneInstance {
    target: u32,
    floating: u32,
    placement: Placement,
    epoch: Epoch,
}

/// Toy engine over a table of node rectangles.
#[derive(Debug, Default)]
pub struct SceneEngine {
    /// Node rectangles, in page coordinates.
    pub rects: HashMap<u32, Rect>,
    /// Visible page area.
    pub viewport: Rect,
    queued: Vec<SceneInstance>,
}

impl SceneEngine {
    /// An engine over `viewport` with no nodes.
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Drains queued passes as `(epoch, snapshot)` pairs, in the order they were queued.
    pub fn run_queued(&mut self) -> Vec<(Epoch, GeometrySnapshot)> {
        let queued = std::mem::take(&mut self.queued);
        queued
            .iter()
            .filter_map(|instance| Some((instance.epoch, self.compute(instance)?)))
            .collect()
    }

    fn compute(&self, instance: &SceneInstance) -> Option<GeometrySnapshot> {
        let target = *self.rects.get(&instance.target)?;
        let floating = *self.rects.get(&instance.floating)?;
        let (w, h) = (floating.width(), floating.height());
        let center = target.center();
        let origin = match instance.placement {
            Placement::Top | Placement::TopStart | Placement::TopEnd => {
                (center.x - w / 2.0, target.y0 - h)
            }
            Placement::Left | Placement::LeftStart | Placement::LeftEnd => {
                (target.x0 - w, center.y - h / 2.0)
            }
            Placement::Right | Placement::RightStart | Placement::RightEnd => {
                (target.x1, center.y - h / 2.0)
            }
            _ => (center.x - w / 2.0, target.y1),
        };
        let scroll = Vec2::new(self.viewport.x0, self.viewport.y0);
        let placed = Rect::from_origin_size(origin, (w, h)) - scroll;

        let mut styles = StyleMap::new();
        styles.insert(
            "transform".into(),
            StyleValue::keyword(format!("translate3d({}px, {}px, 0)", placed.x0, placed.y0)),
        );
        styles.insert("willChange".into(), StyleValue::keyword("transform"));

        let hide = self.viewport.intersect(target).area() == 0.0;
        Some(
            GeometrySnapshot::new(
                Offsets {
                    popper: PartOffsets::from(placed),
                    reference: PartOffsets::from(target),
                    arrow: None,
                },
                instance.placement,
            )
            .with_styles(styles)
            .with_hide(hide),
        )
    }
}

impl PositioningEngine<u32> for SceneEngine {
    type Instance = SceneInstance;

    fn create(&mut self, target: u32, floating: u32, options: EngineOptions<u32>) -> SceneInstance {
        let epoch = match options.modifiers.get(UPDATE_STATE) {
            Some(ModifierEntry::UpdateState { epoch, .. }) => *epoch,
            _ => Epoch::default(),
        };
        SceneInstance {
            target,
            floating,
            placement: options.placement,
            epoch,
        }
    }

    fn destroy(&mut self, instance: SceneInstance) {
        self.queued.retain(|q| q.epoch != instance.epoch);
    }

    fn schedule_update(&mut self, instance: &mut SceneInstance) {
        self.queued.push(instance.clone());
    }
}
