//! Edge geometry: resolving endpoints and keeping rendered paths in sync.
//!
//! [`EdgePath::resolve`] looks endpoints up every time it is called, so an
//! edge bound to a handle always follows the handle's node. [`EdgeRenderer`]
//! does the same for a whole application edge model and mirrors the result
//! into a Slint `VecModel`, touching only rows whose geometry changed.
//!
//! # Example
//!
//! ```
//! use slint::{Model, VecModel};
//! use slint_node_canvas::{Edge, EdgeRenderer, EdgeStyle, HandleRef, NodeCanvas, ScreenRect, WorldPoint};
//! use std::rc::Rc;
//!
//! let canvas = NodeCanvas::new();
//! let n1 = canvas.mount_node("n1", WorldPoint::new(0.0, 0.0));
//! let n2 = canvas.mount_node("n2", WorldPoint::new(200.0, 200.0));
//! n1.mount_handle("output", Rc::new(ScreenRect::new(45.0, 95.0, 10.0, 10.0))).unwrap();
//! n2.mount_handle("0", Rc::new(ScreenRect::new(195.0, 195.0, 10.0, 10.0))).unwrap();
//!
//! let edges = Rc::new(VecModel::from(vec![Edge::new(
//!     HandleRef::new("n1", "output"),
//!     HandleRef::new("n2", "0"),
//! )]));
//! let mut renderer = EdgeRenderer::new(edges, EdgeStyle::Step);
//! renderer.refresh(&canvas);
//!
//! let row = renderer.model().row_data(0).unwrap();
//! assert_eq!(row.path.commands.as_str(), "M 50 100 L 50 150 200 150 200 200");
//! ```

use crate::controller::NodeCanvas;
use crate::graph::{Edge, Endpoint};
use crate::path::EdgeStyle;
use crate::scene::SceneGraph;
use crate::vector::WorldPoint;
use crate::viewport::Viewport;
use slint::{Model, ModelRc, SharedString, VecModel};
use std::rc::Rc;

/// Resolve one endpoint to world space.
///
/// Handle endpoints resolve through the registry and are `None` while the
/// handle is not registered. Screen points go through the inverse viewport
/// transform.
pub fn resolve_endpoint(endpoint: &Endpoint, scene: &SceneGraph, viewport: &Viewport) -> Option<WorldPoint> {
    match endpoint {
        Endpoint::Handle(handle) => scene.position(handle),
        Endpoint::Screen(point) => Some(viewport.screen_to_world(*point)),
        Endpoint::World(point) => Some(*point),
    }
}

/// Drawable geometry of one edge, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    /// SVG path commands, to be drawn under the viewport transform.
    pub commands: SharedString,
    pub start: WorldPoint,
    pub end: WorldPoint,
    /// Label anchor halfway along the path.
    pub middle: WorldPoint,
}

impl EdgePath {
    /// Build the path between two world points.
    pub fn between(start: WorldPoint, end: WorldPoint, style: &EdgeStyle) -> Self {
        Self {
            commands: style.path_commands(start.vector(), end.vector(), 1.0).into(),
            start,
            end,
            middle: WorldPoint(style.midpoint(start.vector(), end.vector(), 1.0)),
        }
    }

    /// Resolve both endpoints of `edge` and build its path.
    ///
    /// Returns `None` when either endpoint is unresolved; such an edge is not drawn.
    pub fn resolve(edge: &Edge, scene: &SceneGraph, viewport: &Viewport, style: &EdgeStyle) -> Option<Self> {
        let start = resolve_endpoint(&edge.start, scene, viewport)?;
        let end = resolve_endpoint(&edge.end, scene, viewport)?;
        Some(Self::between(start, end, style))
    }

    /// The same path in screen coordinates, for hosts that draw without the
    /// viewport transform.
    pub fn screen_commands(&self, viewport: &Viewport, style: &EdgeStyle) -> SharedString {
        let start = viewport.world_to_screen(self.start);
        let end = viewport.world_to_screen(self.end);
        style
            .path_commands(start.vector(), end.vector(), viewport.zoom())
            .into()
    }
}

/// One row of the rendered edge model.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEdge {
    /// Row index of the edge in the application edge model.
    pub index: usize,
    pub path: EdgePath,
}

/// Mirrors an application edge model into a model of drawable paths.
pub struct EdgeRenderer {
    edges: Rc<VecModel<Edge>>,
    rendered: Rc<VecModel<RenderedEdge>>,
    style: EdgeStyle,
    /// Last geometry per edge row, reused while endpoints are unchanged.
    resolved: Vec<Option<EdgePath>>,
}

impl EdgeRenderer {
    pub fn new(edges: Rc<VecModel<Edge>>, style: EdgeStyle) -> Self {
        Self {
            edges,
            rendered: Rc::new(VecModel::default()),
            style,
            resolved: Vec::new(),
        }
    }

    pub fn edges(&self) -> Rc<VecModel<Edge>> {
        self.edges.clone()
    }

    /// The rendered rows, for binding to a Slint property.
    pub fn model(&self) -> ModelRc<RenderedEdge> {
        ModelRc::from(self.rendered.clone())
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    /// Change the edge shape. Every path is rebuilt on the next refresh.
    pub fn set_style(&mut self, style: EdgeStyle) {
        if self.style != style {
            self.style = style;
            self.resolved.clear();
        }
    }

    /// Re-resolve every edge against the canvas' registry and viewport.
    ///
    /// Returns the number of rendered rows that were written.
    pub fn refresh(&mut self, canvas: &NodeCanvas) -> usize {
        canvas.with_scene(|scene, viewport| self.refresh_with(scene, viewport))
    }

    /// [`refresh`](Self::refresh) against an explicit registry and viewport.
    pub fn refresh_with(&mut self, scene: &SceneGraph, viewport: &Viewport) -> usize {
        let count = self.edges.row_count();
        self.resolved.resize(count, None);

        let mut rows = Vec::with_capacity(count);
        for index in 0..count {
            let Some(edge) = self.edges.row_data(index) else {
                self.resolved[index] = None;
                continue;
            };
            let endpoints = resolve_endpoint(&edge.start, scene, viewport)
                .zip(resolve_endpoint(&edge.end, scene, viewport));
            let path = match (endpoints, &self.resolved[index]) {
                (None, _) => None,
                (Some((start, end)), Some(previous)) if previous.start == start && previous.end == end => {
                    Some(previous.clone())
                }
                (Some((start, end)), _) => Some(EdgePath::between(start, end, &self.style)),
            };
            if let Some(path) = &path {
                rows.push(RenderedEdge {
                    index,
                    path: path.clone(),
                });
            }
            self.resolved[index] = path;
        }

        let written = sync_rows(&self.rendered, rows);
        log::trace!("edge refresh: {count} edges, {written} rows written");
        written
    }
}

/// Update `model` in place to hold exactly `rows`, skipping unchanged rows.
fn sync_rows<T: Clone + PartialEq + 'static>(model: &VecModel<T>, rows: Vec<T>) -> usize {
    let mut written = 0;
    let len = rows.len();
    for (i, row) in rows.into_iter().enumerate() {
        if i < model.row_count() {
            if model.row_data(i).as_ref() != Some(&row) {
                model.set_row_data(i, row);
                written += 1;
            }
        } else {
            model.push(row);
            written += 1;
        }
    }
    while model.row_count() > len {
        model.remove(model.row_count() - 1);
        written += 1;
    }
    written
}
