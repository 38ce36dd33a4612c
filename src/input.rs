//! Input abstraction layer.
//!
//! Normalizes host pointer and wheel events into an [`InputEvent`] consumed
//! by [`NodeCanvas::handle_event`](crate::NodeCanvas::handle_event). Positions
//! are always screen space; the host resolves which element was hit and
//! passes it along as a [`PointerTarget`].

use crate::graph::{HandleRef, NodeId};
use crate::vector::ScreenPoint;

/// Element a pointer press or release landed on.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PointerTarget {
    /// Empty canvas background.
    #[default]
    Canvas,
    /// Body of a node.
    Node(NodeId),
    /// A handle on a node.
    Handle(HandleRef),
}

impl PointerTarget {
    pub fn handle(&self) -> Option<&HandleRef> {
        match self {
            PointerTarget::Handle(handle) => Some(handle),
            _ => None,
        }
    }
}

impl From<NodeId> for PointerTarget {
    fn from(id: NodeId) -> Self {
        PointerTarget::Node(id)
    }
}

impl From<HandleRef> for PointerTarget {
    fn from(handle: HandleRef) -> Self {
        PointerTarget::Handle(handle)
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown { position: ScreenPoint, target: PointerTarget },

    /// Pointer moved, with or without a button held.
    PointerMove { position: ScreenPoint },

    /// Primary button released.
    PointerUp { position: ScreenPoint, target: PointerTarget },

    /// Pointer entered a handle.
    PointerEnter { handle: HandleRef },

    /// Pointer left a handle.
    PointerLeave { handle: HandleRef },

    /// Wheel scrolled over the canvas at `position`.
    Wheel { position: ScreenPoint, delta_y: f32 },
}

impl InputEvent {
    /// Extract position if this is a pointer or wheel event.
    pub fn position(&self) -> Option<ScreenPoint> {
        match self {
            Self::PointerDown { position, .. }
            | Self::PointerMove { position }
            | Self::PointerUp { position, .. }
            | Self::Wheel { position, .. } => Some(*position),
            Self::PointerEnter { .. } | Self::PointerLeave { .. } => None,
        }
    }
}
