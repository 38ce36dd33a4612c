//! Test harness for a two-node canvas.
//!
//! Provides a complete setup with an edge model, a renderer and callback
//! tracking, plus helpers for simulating user interactions through
//! [`InputEvent`]s.
//!
//! Layout at zoom 1 and no pan:
//!
//! ```text
//! N1 at (100, 100): "0" at (100, 150), "output" at (250, 150)
//! N2 at (400, 200): "0" at (400, 250), "output" at (550, 250)
//! ```

#![allow(dead_code)]

use super::{init_logging, CallbackTracker};
use slint::VecModel;
use slint_node_canvas::{
    CanvasConfig, DropOutcome, Edge, EdgeRenderer, HandleRef, InputEvent, NodeCanvas, NodeId, NodeScope,
    PointerTarget, ScreenPoint, ScreenRect, Vector, WorldPoint,
};
use std::cell::RefCell;
use std::rc::Rc;

/// 10x10 anchor box centred on a screen point.
pub fn anchor_at(x: f32, y: f32) -> Rc<ScreenRect> {
    Rc::new(ScreenRect::new(x - 5.0, y - 5.0, 10.0, 10.0))
}

pub fn handle(node: &str, handle: &str) -> HandleRef {
    HandleRef::new(node, handle)
}

/// Test harness with nodes N1 and N2, each with an input `"0"` and an `"output"`.
pub struct CanvasHarness {
    pub canvas: NodeCanvas,
    pub edges: Rc<VecModel<Edge>>,
    pub renderer: RefCell<EdgeRenderer>,
    pub tracker: CallbackTracker,
    pub n1: NodeScope,
    pub n2: NodeScope,
}

impl CanvasHarness {
    /// Create a new test harness with the default configuration and no edges.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        init_logging();
        let canvas = NodeCanvas::with_config(config).unwrap();
        let tracker = CallbackTracker::new();

        let edges = Rc::new(VecModel::default());
        canvas.bind_edges(edges.clone());
        let renderer = RefCell::new(EdgeRenderer::new(edges.clone(), canvas.config().edge_style));

        canvas.on_node_moved({
            let tracker = tracker.clone();
            move |id, position| tracker.node_moved.borrow_mut().push((id.clone(), position))
        });
        canvas.on_link_drag({
            let tracker = tracker.clone();
            move |progress| tracker.link_drag.borrow_mut().push(progress.clone())
        });
        canvas.on_edge_committed({
            let tracker = tracker.clone();
            move |edge| tracker.edge_committed.borrow_mut().push(edge.clone())
        });
        canvas.on_viewport_changed({
            let tracker = tracker.clone();
            move |pan, zoom| tracker.viewport_changed.borrow_mut().push((pan, zoom))
        });

        let n1 = canvas.mount_node("N1", WorldPoint::new(100.0, 100.0));
        n1.mount_handle("0", anchor_at(100.0, 150.0)).unwrap();
        n1.mount_handle("output", anchor_at(250.0, 150.0)).unwrap();

        let n2 = canvas.mount_node("N2", WorldPoint::new(400.0, 200.0));
        n2.mount_handle("0", anchor_at(400.0, 250.0)).unwrap();
        n2.mount_handle("output", anchor_at(550.0, 250.0)).unwrap();

        Self {
            canvas,
            edges,
            renderer,
            tracker,
            n1,
            n2,
        }
    }

    /// All four handles of the harness.
    pub fn all_handles() -> Vec<HandleRef> {
        vec![
            handle("N1", "0"),
            handle("N1", "output"),
            handle("N2", "0"),
            handle("N2", "output"),
        ]
    }

    pub fn send(&self, event: InputEvent) {
        self.canvas.handle_event(&event);
    }

    /// Current screen position of a mounted handle.
    pub fn screen_of(&self, handle: &HandleRef) -> ScreenPoint {
        let world = self.canvas.handle_position(handle).unwrap();
        self.canvas.viewport().world_to_screen(world)
    }

    pub fn node_screen(&self, id: &str) -> ScreenPoint {
        let world = self.canvas.node_position(&NodeId::from(id)).unwrap();
        self.canvas.viewport().world_to_screen(world)
    }

    /// Press on `from`, move onto `to`, hover it and release there.
    pub fn drag_link(&self, from: &HandleRef, to: &HandleRef) -> Option<DropOutcome> {
        let start = self.screen_of(from);
        let end = self.screen_of(to);
        self.send(InputEvent::PointerDown {
            position: start,
            target: PointerTarget::Handle(from.clone()),
        });
        self.send(InputEvent::PointerMove { position: end });
        self.send(InputEvent::PointerEnter { handle: to.clone() });
        self.canvas.pointer_up(end, PointerTarget::Handle(to.clone()))
    }

    /// Drag a node by a screen-space delta.
    pub fn drag_node(&self, id: &str, delta: Vector) {
        let start = self.node_screen(id);
        let end = start.offset(delta);
        self.send(InputEvent::PointerDown {
            position: start,
            target: PointerTarget::Node(NodeId::from(id)),
        });
        self.send(InputEvent::PointerMove { position: end });
        self.send(InputEvent::PointerUp {
            position: end,
            target: PointerTarget::Node(NodeId::from(id)),
        });
    }

    /// Drag the canvas background by a screen-space delta.
    pub fn pan_by(&self, delta: Vector) {
        let start = ScreenPoint::new(10.0, 10.0);
        let end = start.offset(delta);
        self.send(InputEvent::PointerDown {
            position: start,
            target: PointerTarget::Canvas,
        });
        self.send(InputEvent::PointerMove { position: end });
        self.send(InputEvent::PointerUp {
            position: end,
            target: PointerTarget::Canvas,
        });
    }

    pub fn wheel(&self, position: ScreenPoint, delta_y: f32) -> bool {
        self.canvas.wheel(position, delta_y)
    }

    /// Re-resolve the edge model and return the number of rows written.
    pub fn refresh_edges(&self) -> usize {
        self.renderer.borrow_mut().refresh(&self.canvas)
    }
}
