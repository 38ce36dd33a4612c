//! Scene graph registry: node world positions and the handle anchors bound to them.
//!
//! Handles are measured once, when they register: the centre of the anchor
//! element's on-screen box is converted to world space and stored as an offset
//! from the owning node. From then on a handle's position is
//! `node position + offset`, memoized per node revision, so moving a node moves
//! all of its handles without touching the anchor elements again.

use crate::error::CanvasError;
use crate::graph::{HandleId, HandleRef, NodeId};
use crate::vector::{ScreenRect, Vector, WorldPoint};
use crate::viewport::Viewport;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// A rendered element a handle is anchored to.
///
/// The host implements this for whatever it renders handles with; the
/// registry only ever asks for the current on-screen box.
pub trait AnchorElement {
    fn bounding_box(&self) -> ScreenRect;
}

/// A fixed box, for hosts that report geometry rather than expose elements.
impl AnchorElement for ScreenRect {
    fn bounding_box(&self) -> ScreenRect {
        *self
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeEntry {
    position: WorldPoint,
    revision: u64,
}

struct HandleAnchor {
    element: Rc<dyn AnchorElement>,
    offset: Vector,
    memo: Cell<Option<(u64, WorldPoint)>>,
}

/// Registry of mounted nodes and handle anchors.
#[derive(Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, NodeEntry>,
    anchors: HashMap<NodeId, HashMap<HandleId, HandleAnchor>>,
    revision: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    // === Nodes ===

    /// Register a node at a world position, replacing any previous entry.
    ///
    /// Handles already anchored to the node keep their offsets.
    pub fn register_node(&mut self, id: NodeId, position: WorldPoint) {
        let revision = self.next_revision();
        log::debug!("register node {id} at {position:?}");
        self.nodes.insert(id, NodeEntry { position, revision });
    }

    /// Move a node. Returns `false` if the node is not registered.
    pub fn set_node_position(&mut self, id: &NodeId, position: WorldPoint) -> bool {
        let revision = self.next_revision();
        match self.nodes.get_mut(id) {
            Some(entry) => {
                entry.position = position;
                entry.revision = revision;
                true
            }
            None => false,
        }
    }

    pub fn node_position(&self, id: &NodeId) -> Option<WorldPoint> {
        self.nodes.get(id).map(|entry| entry.position)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Remove a node together with its handles. Returns the removed handles.
    pub fn unregister_node(&mut self, id: &NodeId) -> Vec<HandleRef> {
        if self.nodes.remove(id).is_none() {
            return Vec::new();
        }
        log::debug!("unregister node {id}");
        self.anchors
            .remove(id)
            .map(|handles| {
                handles
                    .into_keys()
                    .map(|handle_id| HandleRef {
                        node_id: id.clone(),
                        handle_id,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.keys()
    }

    // === Handles ===

    /// Anchor a handle to its node, measuring the element now.
    ///
    /// Registering an existing key replaces it.
    pub fn register_handle(
        &mut self,
        handle: &HandleRef,
        element: Rc<dyn AnchorElement>,
        viewport: &Viewport,
    ) -> Result<(), CanvasError> {
        let node = self
            .nodes
            .get(&handle.node_id)
            .ok_or_else(|| CanvasError::NodeNotMounted(handle.node_id.clone()))?;
        let offset = measure_offset(element.as_ref(), node.position, viewport);
        log::debug!("register handle {handle} at offset {offset:?}");
        self.anchors.entry(handle.node_id.clone()).or_default().insert(
            handle.handle_id.clone(),
            HandleAnchor {
                element,
                offset,
                memo: Cell::new(None),
            },
        );
        Ok(())
    }

    /// Remove a handle. Removing an absent handle is a no-op returning `false`.
    pub fn unregister_handle(&mut self, handle: &HandleRef) -> bool {
        let Some(handles) = self.anchors.get_mut(&handle.node_id) else {
            return false;
        };
        let removed = handles.remove(&handle.handle_id).is_some();
        if handles.is_empty() {
            self.anchors.remove(&handle.node_id);
        }
        if removed {
            log::debug!("unregister handle {handle}");
        }
        removed
    }

    pub fn contains_handle(&self, handle: &HandleRef) -> bool {
        self.anchor(handle).is_some()
    }

    /// World position of a handle, or `None` while it is not registered.
    pub fn position(&self, handle: &HandleRef) -> Option<WorldPoint> {
        let node = self.nodes.get(&handle.node_id)?;
        let anchor = self.anchor(handle)?;
        if let Some((revision, position)) = anchor.memo.get() {
            if revision == node.revision {
                return Some(position);
            }
        }
        let position = node.position.offset(anchor.offset);
        anchor.memo.set(Some((node.revision, position)));
        Some(position)
    }

    /// Offset of a handle from its node's position.
    pub fn handle_offset(&self, handle: &HandleRef) -> Option<Vector> {
        self.anchor(handle).map(|anchor| anchor.offset)
    }

    /// Measure a handle's anchor element again, e.g. after the node relaid out.
    pub fn remeasure(&mut self, handle: &HandleRef, viewport: &Viewport) -> bool {
        let Some(node_position) = self.node_position(&handle.node_id) else {
            return false;
        };
        let Some(anchor) = self
            .anchors
            .get_mut(&handle.node_id)
            .and_then(|handles| handles.get_mut(&handle.handle_id))
        else {
            return false;
        };
        anchor.offset = measure_offset(anchor.element.as_ref(), node_position, viewport);
        anchor.memo.set(None);
        true
    }

    /// All registered handles.
    pub fn handles(&self) -> impl Iterator<Item = HandleRef> + '_ {
        self.anchors.iter().flat_map(|(node_id, handles)| {
            handles.keys().map(move |handle_id| HandleRef {
                node_id: node_id.clone(),
                handle_id: handle_id.clone(),
            })
        })
    }

    pub fn handles_of<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = HandleRef> + 'a {
        self.anchors
            .get(node_id)
            .into_iter()
            .flat_map(move |handles| {
                handles.keys().map(move |handle_id| HandleRef {
                    node_id: node_id.clone(),
                    handle_id: handle_id.clone(),
                })
            })
    }

    pub fn handle_count(&self) -> usize {
        self.anchors.values().map(HashMap::len).sum()
    }

    /// Closest handle within `radius` world units of `point`.
    pub fn handle_at(&self, point: WorldPoint, radius: f32) -> Option<HandleRef> {
        let radius_sq = radius * radius;
        let mut closest: Option<(f32, HandleRef)> = None;

        for handle in self.handles() {
            let Some(position) = self.position(&handle) else {
                continue;
            };
            let dist_sq = position.delta_from(point).length_sq();
            if dist_sq <= radius_sq && closest.as_ref().map_or(true, |(best, _)| dist_sq < *best) {
                closest = Some((dist_sq, handle));
            }
        }

        closest.map(|(_, handle)| handle)
    }

    /// Drop every node and handle.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.anchors.clear();
    }

    fn anchor(&self, handle: &HandleRef) -> Option<&HandleAnchor> {
        self.anchors.get(&handle.node_id)?.get(&handle.handle_id)
    }
}

fn measure_offset(element: &dyn AnchorElement, node_position: WorldPoint, viewport: &Viewport) -> Vector {
    let center = element.bounding_box().center();
    viewport.screen_to_world(center).delta_from(node_position)
}
