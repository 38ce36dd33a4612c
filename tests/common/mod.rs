//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_node_canvas::{DragProgress, Edge, NodeId, Vector, WorldPoint};
use std::cell::RefCell;
use std::rc::Rc;

/// Install `env_logger` once; run with `RUST_LOG=slint_node_canvas=trace` to see canvas logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Tracks callback invocations for testing.
///
/// Each field records calls to the corresponding canvas callback with their arguments.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// (node_id, new world position)
    pub node_moved: Rc<RefCell<Vec<(NodeId, WorldPoint)>>>,
    pub link_drag: Rc<RefCell<Vec<DragProgress>>>,
    pub edge_committed: Rc<RefCell<Vec<Edge>>>,
    /// (pan, zoom)
    pub viewport_changed: Rc<RefCell<Vec<(Vector, f32)>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.node_moved.borrow_mut().clear();
        self.link_drag.borrow_mut().clear();
        self.edge_committed.borrow_mut().clear();
        self.viewport_changed.borrow_mut().clear();
    }
}
