//! High-level controller for node canvas applications.
//!
//! [`NodeCanvas`] owns the viewport, the scene graph registry, the link
//! connector and the pointer tracker, and routes host input to whichever of
//! them a drag belongs to:
//!
//! - a press on the canvas background pans the viewport,
//! - a press on a node moves the node,
//! - a press on a handle drags a new link out of it.
//!
//! Nodes and handles are mounted through scopes. A [`NodeScope`] can only
//! mount handles onto its own node, so a handle without a node is a setup
//! error rather than a runtime surprise.
//!
//! # Example
//!
//! ```
//! use slint::{Model, VecModel};
//! use slint_node_canvas::{Edge, HandleRef, NodeCanvas, PointerTarget, ScreenPoint, ScreenRect, WorldPoint};
//! use std::rc::Rc;
//!
//! let canvas = NodeCanvas::new();
//! let edges = Rc::new(VecModel::<Edge>::default());
//! canvas.bind_edges(edges.clone());
//!
//! let n1 = canvas.mount_node("n1", WorldPoint::new(0.0, 0.0));
//! let n2 = canvas.mount_node("n2", WorldPoint::new(200.0, 0.0));
//! n1.mount_handle("output", Rc::new(ScreenRect::new(95.0, 45.0, 10.0, 10.0)))?;
//! n2.mount_handle("0", Rc::new(ScreenRect::new(195.0, 45.0, 10.0, 10.0)))?;
//!
//! let from = HandleRef::new("n1", "output");
//! let to = HandleRef::new("n2", "0");
//! canvas.pointer_down(ScreenPoint::new(100.0, 50.0), PointerTarget::Handle(from.clone()));
//! canvas.pointer_move(ScreenPoint::new(180.0, 50.0));
//! canvas.pointer_enter(&to);
//! canvas.pointer_up(ScreenPoint::new(200.0, 50.0), PointerTarget::Handle(to.clone()));
//!
//! assert_eq!(edges.row_count(), 1);
//! assert_eq!(edges.row_data(0), Some(Edge::new(from, to)));
//! # Ok::<(), slint_node_canvas::CanvasError>(())
//! ```

use crate::config::CanvasConfig;
use crate::connection::{ConnectionState, Connector, DragProgress, DropOutcome};
use crate::error::CanvasError;
use crate::graph::{
    CompositeValidator, DirectionalValidator, Edge, HandleId, HandleRef, LinkValidator, NodeId,
    ValidationResult,
};
use crate::input::{InputEvent, PointerTarget};
use crate::links::EdgePath;
use crate::scene::{AnchorElement, SceneGraph};
use crate::tracking::{DragEnd, PointerTracker};
use crate::vector::{ScreenPoint, Vector, WorldPoint};
use crate::viewport::Viewport;
use slint::{Model, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

/// What the active pointer drag is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPurpose {
    /// Panning the canvas; deltas apply 1:1 to the pan offset.
    Pan { start_pan: Vector },
    /// Moving a node; deltas are divided by the zoom.
    Node { id: NodeId, start: WorldPoint },
    /// Dragging a new link out of a handle.
    Link { from: HandleRef },
}

type NodeMovedCallback = Rc<dyn Fn(&NodeId, WorldPoint)>;
type LinkDragCallback = Rc<dyn Fn(&DragProgress)>;
type EdgeCommittedCallback = Rc<dyn Fn(&Edge)>;
type ViewportChangedCallback = Rc<dyn Fn(Vector, f32)>;

#[derive(Default)]
struct Callbacks {
    node_moved: RefCell<Option<NodeMovedCallback>>,
    link_drag: RefCell<Option<LinkDragCallback>>,
    edge_committed: RefCell<Option<EdgeCommittedCallback>>,
    viewport_changed: RefCell<Option<ViewportChangedCallback>>,
}

/// Controller that owns canvas state and turns input into graph edits.
///
/// All state is world space except the pan offset and incoming pointer
/// positions, which are screen space. Clone this controller to share it
/// across host callbacks; clones refer to the same canvas.
#[derive(Clone)]
pub struct NodeCanvas {
    config: Rc<CanvasConfig>,
    viewport: Rc<RefCell<Viewport>>,
    scene: Rc<RefCell<SceneGraph>>,
    connector: Rc<RefCell<Connector>>,
    tracker: Rc<RefCell<PointerTracker<DragPurpose>>>,
    edges: Rc<RefCell<Option<Rc<VecModel<Edge>>>>>,
    callbacks: Rc<Callbacks>,
}

impl Default for NodeCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeCanvas {
    /// Create a canvas with the default configuration.
    pub fn new() -> Self {
        Self::build(CanvasConfig::default())
    }

    /// Create a canvas with a custom configuration.
    pub fn with_config(config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CanvasConfig) -> Self {
        let validator = CompositeValidator::new().add(DirectionalValidator::new(config.output_handle.clone()));
        Self {
            viewport: Rc::new(RefCell::new(Viewport::with_zoom_bounds(config.min_zoom, config.max_zoom))),
            scene: Rc::new(RefCell::new(SceneGraph::new())),
            connector: Rc::new(RefCell::new(Connector::new(validator))),
            tracker: Rc::new(RefCell::new(PointerTracker::new())),
            edges: Rc::new(RefCell::new(None)),
            callbacks: Rc::new(Callbacks::default()),
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Snapshot of the current viewport.
    pub fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    pub fn pan(&self) -> Vector {
        self.viewport.borrow().pan()
    }

    pub fn zoom(&self) -> f32 {
        self.viewport.borrow().zoom()
    }

    /// Set the pan offset programmatically.
    pub fn set_pan(&self, pan: Vector) {
        self.viewport.borrow_mut().set_pan(pan);
        self.notify_viewport_changed();
    }

    /// Set the zoom programmatically. Out-of-bounds values are rejected.
    pub fn set_zoom(&self, zoom: f32) -> bool {
        let applied = self.viewport.borrow_mut().set_zoom(zoom);
        if applied {
            self.notify_viewport_changed();
        }
        applied
    }

    /// Run `f` against the registry and viewport, e.g. to resolve edges.
    pub fn with_scene<R>(&self, f: impl FnOnce(&SceneGraph, &Viewport) -> R) -> R {
        let scene = self.scene.borrow();
        let viewport = self.viewport.borrow();
        f(&scene, &viewport)
    }

    // === Callbacks ===

    /// Called with the new world position whenever a node drag moves a node.
    pub fn on_node_moved(&self, callback: impl Fn(&NodeId, WorldPoint) + 'static) {
        *self.callbacks.node_moved.borrow_mut() = Some(Rc::new(callback));
    }

    /// Called on every link-drag move and whenever the hovered handle changes.
    pub fn on_link_drag(&self, callback: impl Fn(&DragProgress) + 'static) {
        *self.callbacks.link_drag.borrow_mut() = Some(Rc::new(callback));
    }

    /// Called once per committed edge, after it was pushed to the bound edge model.
    pub fn on_edge_committed(&self, callback: impl Fn(&Edge) + 'static) {
        *self.callbacks.edge_committed.borrow_mut() = Some(Rc::new(callback));
    }

    /// Called with `(pan, zoom)` after every pan or zoom change.
    pub fn on_viewport_changed(&self, callback: impl Fn(Vector, f32) + 'static) {
        *self.callbacks.viewport_changed.borrow_mut() = Some(Rc::new(callback));
    }

    // === Callback factories ===

    /// Returns a callback for a host `pointer-moved(x, y)` callback.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let canvas = self.clone();
        move |x, y| canvas.pointer_move(ScreenPoint::new(x, y))
    }

    /// Returns a callback for a host `scrolled(x, y, delta-y)` callback.
    pub fn wheel_callback(&self) -> impl Fn(f32, f32, f32) {
        let canvas = self.clone();
        move |x, y, delta_y| {
            canvas.wheel(ScreenPoint::new(x, y), delta_y);
        }
    }

    // === Mounting ===

    /// Register a node at a world position and return its scope.
    ///
    /// Mounting an already mounted node moves it and keeps its handles.
    pub fn mount_node(&self, id: impl Into<NodeId>, position: WorldPoint) -> NodeScope {
        let id = id.into();
        self.scene.borrow_mut().register_node(id.clone(), position);
        NodeScope {
            canvas: self.clone(),
            id,
        }
    }

    /// Scope of a node that is already mounted.
    pub fn node_scope(&self, id: impl Into<NodeId>) -> Result<NodeScope, CanvasError> {
        let id = id.into();
        if !self.scene.borrow().contains_node(&id) {
            return Err(CanvasError::NodeNotMounted(id));
        }
        Ok(NodeScope {
            canvas: self.clone(),
            id,
        })
    }

    /// Remove a node and its handles, cancelling any drag that involves them.
    pub fn unmount_node(&self, id: &NodeId) -> bool {
        let removed = {
            let mut scene = self.scene.borrow_mut();
            if !scene.contains_node(id) {
                return false;
            }
            scene.unregister_node(id)
        };
        for handle in &removed {
            self.forget_handle(handle);
        }
        let cancelled = self
            .tracker
            .borrow_mut()
            .cancel_if(|purpose| matches!(purpose, DragPurpose::Node { id: dragged, .. } if dragged == id));
        if cancelled.is_some() {
            log::debug!("node {id} unmounted mid-drag; drag cancelled");
        }
        true
    }

    /// Anchor a handle to its node, measuring `anchor` under the current viewport.
    pub fn mount_handle(&self, handle: &HandleRef, anchor: Rc<dyn AnchorElement>) -> Result<(), CanvasError> {
        let viewport = *self.viewport.borrow();
        self.scene.borrow_mut().register_handle(handle, anchor, &viewport)
    }

    /// Remove a handle. A link being dragged out of it is cancelled.
    pub fn unmount_handle(&self, handle: &HandleRef) -> bool {
        let removed = self.scene.borrow_mut().unregister_handle(handle);
        self.forget_handle(handle);
        removed
    }

    fn forget_handle(&self, handle: &HandleRef) {
        let was_dragging = self.connector.borrow_mut().handle_removed(handle);
        let cancelled = self
            .tracker
            .borrow_mut()
            .cancel_if(|purpose| matches!(purpose, DragPurpose::Link { from } if from == handle));
        if was_dragging || cancelled.is_some() {
            log::debug!("handle {handle} removed mid-drag; link drag cancelled");
        }
    }

    // === Registry queries ===

    /// Move a node programmatically. Does not fire the node-moved callback.
    pub fn set_node_position(&self, id: &NodeId, position: WorldPoint) -> bool {
        self.scene.borrow_mut().set_node_position(id, position)
    }

    pub fn node_position(&self, id: &NodeId) -> Option<WorldPoint> {
        self.scene.borrow().node_position(id)
    }

    /// World position of a handle, `None` while it is not mounted.
    pub fn handle_position(&self, handle: &HandleRef) -> Option<WorldPoint> {
        self.scene.borrow().position(handle)
    }

    /// Measure a handle's anchor element again after its node relaid out.
    pub fn remeasure(&self, handle: &HandleRef) -> bool {
        let viewport = *self.viewport.borrow();
        self.scene.borrow_mut().remeasure(handle, &viewport)
    }

    /// Remeasure every handle of a node. Returns how many were measured.
    pub fn remeasure_node(&self, id: &NodeId) -> usize {
        let viewport = *self.viewport.borrow();
        let mut scene = self.scene.borrow_mut();
        let handles: Vec<HandleRef> = scene.handles_of(id).collect();
        handles
            .iter()
            .filter(|handle| scene.remeasure(handle, &viewport))
            .count()
    }

    /// Find the handle under a screen position, within the configured hit
    /// radius in screen pixels.
    pub fn handle_at_screen(&self, position: ScreenPoint) -> Option<HandleRef> {
        let (world, radius) = {
            let viewport = self.viewport.borrow();
            (
                viewport.screen_to_world(position),
                self.config.handle_hit_radius / viewport.zoom(),
            )
        };
        self.scene.borrow().handle_at(world, radius)
    }

    // === Edges ===

    /// Bind the application edge model that committed edges are pushed to and
    /// that duplicate checks see.
    pub fn bind_edges(&self, edges: Rc<VecModel<Edge>>) {
        *self.edges.borrow_mut() = Some(edges);
    }

    pub fn edges(&self) -> Option<Rc<VecModel<Edge>>> {
        self.edges.borrow().clone()
    }

    fn edge_snapshot(&self) -> Vec<Edge> {
        self.edges
            .borrow()
            .as_ref()
            .map(|model| model.iter().collect())
            .unwrap_or_default()
    }

    /// Current geometry of an edge, `None` while an endpoint is unresolved.
    pub fn edge_path(&self, edge: &Edge) -> Option<EdgePath> {
        self.with_scene(|scene, viewport| EdgePath::resolve(edge, scene, viewport, &self.config.edge_style))
    }

    /// Add a link rule on top of the directional one.
    pub fn add_validator<V: LinkValidator + 'static>(&self, validator: V) {
        self.connector.borrow_mut().add_validator(validator);
    }

    /// Whether a link from `start` to `end` would be accepted right now.
    pub fn validate(&self, start: &HandleRef, end: &HandleRef) -> ValidationResult {
        let edges = self.edge_snapshot();
        self.connector.borrow().validate(start, end, &edges)
    }

    // === Interaction state ===

    pub fn connection_state(&self) -> ConnectionState {
        self.connector.borrow().state().clone()
    }

    pub fn dragging_handle(&self) -> Option<HandleRef> {
        self.connector.borrow().dragging_handle().cloned()
    }

    pub fn hovering_handle(&self) -> Option<HandleRef> {
        self.connector.borrow().hovering_handle().cloned()
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.borrow().is_active()
    }

    pub fn drag_purpose(&self) -> Option<DragPurpose> {
        self.tracker.borrow().purpose().cloned()
    }

    /// The in-progress link, snapped to the hovered handle when that pair is valid.
    pub fn preview_edge(&self) -> Option<Edge> {
        let edges = self.edge_snapshot();
        self.connector.borrow().preview(&edges)
    }

    /// Geometry of [`preview_edge`](Self::preview_edge).
    pub fn preview_path(&self) -> Option<EdgePath> {
        self.preview_edge().and_then(|edge| self.edge_path(&edge))
    }

    // === Input ===

    /// Dispatch one input event.
    pub fn handle_event(&self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { position, target } => self.pointer_down(*position, target.clone()),
            InputEvent::PointerMove { position } => self.pointer_move(*position),
            InputEvent::PointerUp { position, target } => {
                self.pointer_up(*position, target.clone());
            }
            InputEvent::PointerEnter { handle } => self.pointer_enter(handle),
            InputEvent::PointerLeave { handle } => self.pointer_leave(handle),
            InputEvent::Wheel { position, delta_y } => {
                self.wheel(*position, *delta_y);
            }
        }
    }

    /// Start a drag whose meaning depends on what was pressed.
    ///
    /// A press on a node or handle that is not mounted is ignored.
    pub fn pointer_down(&self, position: ScreenPoint, target: PointerTarget) {
        let previous = self.tracker.borrow_mut().cancel();
        if let Some(previous) = previous {
            log::warn!("pointer-down while a drag was active; previous drag cancelled");
            self.drag_cancelled(previous);
        }

        let purpose = match target {
            PointerTarget::Canvas => DragPurpose::Pan {
                start_pan: self.viewport.borrow().pan(),
            },
            PointerTarget::Node(id) => {
                let Some(start) = self.node_position(&id) else {
                    log::warn!("pointer-down on unmounted node {id}");
                    return;
                };
                DragPurpose::Node { id, start }
            }
            PointerTarget::Handle(handle) => {
                let Some(origin) = self.handle_position(&handle) else {
                    log::warn!("pointer-down on unmounted handle {handle}");
                    return;
                };
                self.connector.borrow_mut().start_drag(handle.clone(), origin);
                DragPurpose::Link { from: handle }
            }
        };
        log::debug!("drag started: {purpose:?}");
        self.tracker.borrow_mut().begin(position, purpose);
    }

    /// Advance the active drag. Ignored when nothing is being dragged.
    pub fn pointer_move(&self, position: ScreenPoint) {
        let motion = self
            .tracker
            .borrow_mut()
            .motion(position)
            .map(|(purpose, delta)| (purpose.clone(), delta));
        if let Some((purpose, delta)) = motion {
            self.apply_drag(purpose, delta);
        }
    }

    /// Finish the active drag.
    ///
    /// Releasing a link drag on a mounted handle drops the link there and
    /// returns the outcome; releasing it anywhere else cancels it. Other drags
    /// return `None`.
    pub fn pointer_up(&self, position: ScreenPoint, target: PointerTarget) -> Option<DropOutcome> {
        let last_delta = self.tracker.borrow().session().map(|session| session.last_delta());
        let end = self.tracker.borrow_mut().release(position);
        let Some(DragEnd::Released { purpose, delta }) = end else {
            log::trace!("pointer-up without an active drag");
            return None;
        };

        match purpose {
            DragPurpose::Link { from } => self.finish_link(&from, &target),
            purpose => {
                if last_delta != Some(delta) {
                    self.apply_drag(purpose, delta);
                }
                log::debug!("drag finished at delta {delta:?}");
                None
            }
        }
    }

    /// Pointer entered a handle. Only matters while a link is being dragged,
    /// and only for handles that are mounted.
    pub fn pointer_enter(&self, handle: &HandleRef) {
        if !self.connector.borrow().is_dragging() {
            return;
        }
        if !self.scene.borrow().contains_handle(handle) {
            log::warn!("pointer-enter on unmounted handle {handle}");
            return;
        }
        self.connector.borrow_mut().hover(handle);
        self.refresh_link_progress();
    }

    /// Pointer left a handle.
    pub fn pointer_leave(&self, handle: &HandleRef) {
        if self.connector.borrow().hovering_handle() != Some(handle) {
            return;
        }
        self.connector.borrow_mut().leave(handle);
        self.refresh_link_progress();
    }

    /// Zoom around `position` by `delta_y / wheel_step`.
    ///
    /// Returns `false` when the zoom would leave its bounds; nothing changes then.
    /// A canvas pan in progress continues from the zoomed view.
    pub fn wheel(&self, position: ScreenPoint, delta_y: f32) -> bool {
        let delta_zoom = delta_y / self.config.wheel_step;
        let applied = self.viewport.borrow_mut().zoom_at(position, delta_zoom);
        if applied {
            self.rebase_pan_drag();
            self.notify_viewport_changed();
        }
        applied
    }

    fn rebase_pan_drag(&self) {
        let pan = self.viewport.borrow().pan();
        let mut tracker = self.tracker.borrow_mut();
        let last_delta = tracker.session().map(|session| session.last_delta());
        if let (Some(DragPurpose::Pan { start_pan }), Some(last_delta)) = (tracker.purpose_mut(), last_delta) {
            *start_pan = pan - last_delta;
        }
    }

    /// Abandon the active drag, e.g. when the host lost pointer capture.
    pub fn cancel_drag(&self) -> bool {
        let end = self.tracker.borrow_mut().cancel();
        match end {
            Some(end) => {
                self.drag_cancelled(end);
                true
            }
            None => false,
        }
    }

    fn drag_cancelled(&self, end: DragEnd<DragPurpose>) {
        log::debug!("drag cancelled: {:?}", end.purpose());
        if let DragPurpose::Link { .. } = end.into_purpose() {
            self.connector.borrow_mut().cancel();
        }
    }

    fn apply_drag(&self, purpose: DragPurpose, delta: Vector) {
        match purpose {
            DragPurpose::Pan { start_pan } => {
                self.viewport.borrow_mut().set_pan(start_pan + delta);
                self.notify_viewport_changed();
            }
            DragPurpose::Node { id, start } => {
                let position = start.offset(self.viewport.borrow().screen_delta_to_world(delta));
                let moved = self.scene.borrow_mut().set_node_position(&id, position);
                if moved {
                    log::trace!("node {id} dragged to {position:?}");
                    let callback = self.callbacks.node_moved.borrow().clone();
                    if let Some(callback) = callback {
                        callback(&id, position);
                    }
                }
            }
            DragPurpose::Link { .. } => self.report_link_progress(delta),
        }
    }

    fn refresh_link_progress(&self) {
        let delta = self.tracker.borrow().session().map(|session| session.last_delta());
        if let Some(delta) = delta {
            self.report_link_progress(delta);
        }
    }

    fn report_link_progress(&self, delta: Vector) {
        let edges = self.edge_snapshot();
        let viewport = *self.viewport.borrow();
        let progress = self.connector.borrow_mut().move_by(delta, &viewport, &edges);
        let Some(progress) = progress else {
            return;
        };
        log::trace!("link drag at {:?}, snapped: {}", progress.pointer, progress.snapped);
        let callback = self.callbacks.link_drag.borrow().clone();
        if let Some(callback) = callback {
            callback(&progress);
        }
    }

    fn finish_link(&self, from: &HandleRef, target: &PointerTarget) -> Option<DropOutcome> {
        let Some(handle) = target.handle() else {
            log::debug!("link from {from} released off any handle");
            self.connector.borrow_mut().cancel();
            return None;
        };
        if !self.scene.borrow().contains_handle(handle) {
            log::warn!("link from {from} released on unmounted handle {handle}");
            self.connector.borrow_mut().cancel();
            return None;
        }

        let edges = self.edge_snapshot();
        let outcome = self.connector.borrow_mut().drop_on(handle, &edges);
        if let DropOutcome::Committed(edge) = &outcome {
            if let Some(model) = self.edges() {
                model.push(edge.clone());
            }
            let callback = self.callbacks.edge_committed.borrow().clone();
            if let Some(callback) = callback {
                callback(edge);
            }
        }
        Some(outcome)
    }

    fn notify_viewport_changed(&self) {
        let (pan, zoom) = {
            let viewport = self.viewport.borrow();
            (viewport.pan(), viewport.zoom())
        };
        log::trace!("viewport pan {pan:?} zoom {zoom}");
        let callback = self.callbacks.viewport_changed.borrow().clone();
        if let Some(callback) = callback {
            callback(pan, zoom);
        }
    }
}

/// Capability to mount handles onto one node.
///
/// Dropping a scope leaves the node mounted; call [`unmount`](Self::unmount).
#[derive(Clone)]
pub struct NodeScope {
    canvas: NodeCanvas,
    id: NodeId,
}

impl NodeScope {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn canvas(&self) -> &NodeCanvas {
        &self.canvas
    }

    pub fn position(&self) -> Option<WorldPoint> {
        self.canvas.node_position(&self.id)
    }

    pub fn set_position(&self, position: WorldPoint) -> bool {
        self.canvas.set_node_position(&self.id, position)
    }

    /// Mount a handle on this node.
    ///
    /// Fails with [`CanvasError::NodeNotMounted`] once the node was unmounted.
    pub fn mount_handle(
        &self,
        handle_id: impl Into<HandleId>,
        anchor: Rc<dyn AnchorElement>,
    ) -> Result<HandleScope, CanvasError> {
        let handle = HandleRef {
            node_id: self.id.clone(),
            handle_id: handle_id.into(),
        };
        self.canvas.mount_handle(&handle, anchor)?;
        Ok(HandleScope {
            canvas: self.canvas.clone(),
            handle,
        })
    }

    pub fn unmount(&self) -> bool {
        self.canvas.unmount_node(&self.id)
    }
}

/// A mounted handle. Dropping it leaves the handle mounted.
#[derive(Clone)]
pub struct HandleScope {
    canvas: NodeCanvas,
    handle: HandleRef,
}

impl HandleScope {
    pub fn handle_ref(&self) -> &HandleRef {
        &self.handle
    }

    pub fn position(&self) -> Option<WorldPoint> {
        self.canvas.handle_position(&self.handle)
    }

    pub fn remeasure(&self) -> bool {
        self.canvas.remeasure(&self.handle)
    }

    pub fn unmount(&self) -> bool {
        self.canvas.unmount_handle(&self.handle)
    }
}
