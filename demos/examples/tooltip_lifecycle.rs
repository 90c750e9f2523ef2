// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walk a tooltip through mount, scroll, placement change, and unmount.
//!
//! Run:
//! - `cargo run -p understory_demos --example tooltip_lifecycle`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use understory_demos::SceneEngine;
use understory_floating::{Manager, Placement, Popper, PopperOptions, TargetResolver};

const BUTTON: u32 = 1;
const TOOLTIP: u32 = 2;

fn pump(popper: &mut Popper<u32, SceneEngine>) {
    for (epoch, snapshot) in popper.engine_mut().run_queued() {
        let _ = popper.report_geometry(epoch, snapshot);
    }
    if popper.take_render_request() {
        let element = popper.render_element("Save changes");
        println!(
            "render <{} {:?}> style={:?}",
            element.kind.name(),
            element.attributes,
            element.style
        );
    } else {
        println!("no re-render needed");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut engine = SceneEngine::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    engine.rects.insert(BUTTON, Rect::new(100.0, 200.0, 180.0, 230.0));
    engine.rects.insert(TOOLTIP, Rect::new(0.0, 0.0, 120.0, 32.0));

    // The target registers itself with the manager; the tooltip finds it from there.
    let manager = Rc::new(RefCell::new(Manager::new()));
    let resolver: Rc<dyn TargetResolver<u32>> = manager.clone();
    let mut popper = Popper::new(engine, PopperOptions::default()).with_target_resolver(resolver);

    popper.set_floating_node(Some(TOOLTIP));
    popper.mount();
    println!("mounted without target: {:?}", popper.last_error());

    manager.borrow_mut().set_target_node(Some(BUTTON));
    popper.update(PopperOptions::default(), false);
    pump(&mut popper);

    // A scroll tick that does not move anything produces no re-render.
    popper.schedule_update();
    pump(&mut popper);

    // Scroll the page so the button moves up.
    popper.engine_mut().viewport = Rect::new(0.0, 150.0, 800.0, 750.0);
    popper.schedule_update();
    pump(&mut popper);

    popper.update(PopperOptions::default().with_placement(Placement::Top), false);
    pump(&mut popper);

    // Callback mode: the caller builds its own output.
    let summary = popper.render_callback(|args| {
        format!(
            "{:?} at {:?}, can reschedule: {}",
            args.positioning.placement,
            args.positioning.style,
            args.scheduler.is_some()
        )
    });
    println!("callback: {summary}");

    popper.unmount();
    println!("state after unmount: {:?}", popper.state());
}
