//! # Slint Node Canvas
//!
//! The interaction core of a node-link diagram editor: an infinite pannable,
//! zoomable canvas with draggable nodes, typed connection handles, validated
//! link dragging, and edge geometry that stays bound to live handle positions.
//!
//! Rendering is left to the host. The crate keeps world-space state and
//! exposes it through Slint models (`VecModel` / `ModelRc`), so any Slint UI
//! can bind edges, edge paths, and overlay content directly.
//!
//! ## Core Pieces
//!
//! - [`NodeCanvas`] - Controller that routes pointer input to panning, node
//!   moves and link drags
//! - [`Viewport`] - Pan/zoom state, screen↔world conversion, zoom-at-cursor
//! - [`SceneGraph`] - Registry of node positions and handle anchors
//! - [`Connector`] - Link-drag state machine with pluggable validation
//! - [`PointerTracker`] - Press-relative drag deltas, resolved exactly once
//! - [`EdgeRenderer`] - Keeps drawable edge paths in sync with an edge model
//! - [`Compositor`] - Overlay content registered in world space
//!
//! Screen and world coordinates are distinct types ([`ScreenPoint`],
//! [`WorldPoint`]); they only convert through a [`Viewport`].

pub mod compositor;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod graph;
pub mod input;
pub mod links;
pub mod path;
pub mod scene;
pub mod tracking;
pub mod vector;
pub mod viewport;

pub use compositor::{Compositor, ContentKey};
pub use config::CanvasConfig;
pub use connection::{ConnectionState, Connector, DragProgress, DropOutcome};
pub use controller::{DragPurpose, HandleScope, NodeCanvas, NodeScope};
pub use error::CanvasError;
pub use graph::{
    CompositeValidator, DirectionalValidator, Edge, Endpoint, HandleId, HandleRef, LinkValidator,
    NoDuplicatesValidator, NodeId, ValidationError, ValidationResult, validate_link,
};
pub use input::{InputEvent, PointerTarget};
pub use links::{EdgePath, EdgeRenderer, RenderedEdge};
pub use path::{generate_bezier_path, generate_step_path, CubicBezier, EdgeStyle};
pub use scene::{AnchorElement, SceneGraph};
pub use tracking::{DragEnd, DragSession, PointerTracker};
pub use vector::{ScreenPoint, ScreenRect, Vector, WorldPoint};
pub use viewport::Viewport;
