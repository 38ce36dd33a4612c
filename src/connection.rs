//! Link-drag state machine.
//!
//! ```text
//! Idle --start_drag--> Dragging { from, hovering, pointer } --drop / cancel--> Idle
//! ```
//!
//! While dragging, the preview edge runs from the dragged handle to either the
//! free pointer position or, when the hovered handle forms a valid pair with
//! the dragged one, snaps to the hovered handle.

use crate::graph::{
    CompositeValidator, DirectionalValidator, Edge, Endpoint, HandleRef, LinkValidator,
    ValidationError, ValidationResult,
};
use crate::vector::{Vector, WorldPoint};
use crate::viewport::Viewport;

/// Interaction state of link dragging.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Dragging {
        from: HandleRef,
        /// World position of `from` when the drag started.
        origin: WorldPoint,
        /// Free end of the link under the pointer.
        pointer: WorldPoint,
        hovering: Option<HandleRef>,
    },
}

/// Snapshot reported on every drag move.
#[derive(Debug, Clone, PartialEq)]
pub struct DragProgress {
    pub from: HandleRef,
    pub pointer: WorldPoint,
    pub hovering: Option<HandleRef>,
    /// True when the preview end is attached to `hovering`.
    pub snapped: bool,
}

/// Result of dropping a dragged link on a handle.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The pair validated; the edge should be added to the edge collection.
    Committed(Edge),
    /// The pair failed validation; nothing is created.
    Rejected(ValidationError),
    /// No link drag was in progress.
    NotDragging,
}

/// Drives [`ConnectionState`] and applies link validation.
pub struct Connector {
    state: ConnectionState,
    validator: CompositeValidator,
}

impl Default for Connector {
    fn default() -> Self {
        Self::new(CompositeValidator::new().add(DirectionalValidator::default()))
    }
}

impl Connector {
    pub fn new(validator: CompositeValidator) -> Self {
        Self {
            state: ConnectionState::Idle,
            validator,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ConnectionState::Dragging { .. })
    }

    pub fn dragging_handle(&self) -> Option<&HandleRef> {
        match &self.state {
            ConnectionState::Dragging { from, .. } => Some(from),
            ConnectionState::Idle => None,
        }
    }

    pub fn hovering_handle(&self) -> Option<&HandleRef> {
        match &self.state {
            ConnectionState::Dragging { hovering, .. } => hovering.as_ref(),
            ConnectionState::Idle => None,
        }
    }

    /// Add a rule on top of the current ones.
    pub fn add_validator<V: LinkValidator + 'static>(&mut self, validator: V) {
        self.validator.push(validator);
    }

    pub fn validate(&self, start: &HandleRef, end: &HandleRef, edges: &[Edge]) -> ValidationResult {
        self.validator.validate(start, end, edges)
    }

    /// Begin dragging a link out of `handle`, whose current world position is `origin`.
    pub fn start_drag(&mut self, handle: HandleRef, origin: WorldPoint) {
        log::debug!("link drag started from {handle}");
        self.state = ConnectionState::Dragging {
            from: handle,
            origin,
            pointer: origin,
            hovering: None,
        };
    }

    /// Pointer entered `handle`. Ignored when idle or when it is the dragged handle.
    pub fn hover(&mut self, handle: &HandleRef) {
        if let ConnectionState::Dragging { from, hovering, .. } = &mut self.state {
            if from != handle {
                *hovering = Some(handle.clone());
            }
        }
    }

    /// Pointer left `handle`. Only clears the hover if it is `handle`.
    pub fn leave(&mut self, handle: &HandleRef) {
        if let ConnectionState::Dragging { hovering, .. } = &mut self.state {
            if hovering.as_ref() == Some(handle) {
                *hovering = None;
            }
        }
    }

    /// Update the free end from a screen-space drag delta.
    pub fn move_by(&mut self, screen_delta: Vector, viewport: &Viewport, edges: &[Edge]) -> Option<DragProgress> {
        let ConnectionState::Dragging {
            from,
            origin,
            pointer,
            hovering,
        } = &mut self.state
        else {
            return None;
        };
        *pointer = origin.offset(viewport.screen_delta_to_world(screen_delta));
        let snapped = hovering
            .as_ref()
            .is_some_and(|target| self.validator.validate(from, target, edges).is_valid());
        Some(DragProgress {
            from: from.clone(),
            pointer: *pointer,
            hovering: hovering.clone(),
            snapped,
        })
    }

    /// The in-progress edge, if a link is being dragged.
    pub fn preview(&self, edges: &[Edge]) -> Option<Edge> {
        let ConnectionState::Dragging {
            from,
            pointer,
            hovering,
            ..
        } = &self.state
        else {
            return None;
        };
        let end = match hovering {
            Some(target) if self.validator.validate(from, target, edges).is_valid() => {
                Endpoint::Handle(target.clone())
            }
            _ => Endpoint::World(*pointer),
        };
        Some(Edge {
            start: Endpoint::Handle(from.clone()),
            end,
        })
    }

    /// Release the dragged link on `target`. Always returns to idle.
    pub fn drop_on(&mut self, target: &HandleRef, edges: &[Edge]) -> DropOutcome {
        let ConnectionState::Dragging { from, .. } = std::mem::take(&mut self.state) else {
            return DropOutcome::NotDragging;
        };
        match self.validator.validate(&from, target, edges) {
            ValidationResult::Valid => {
                log::debug!("link {from} -> {target} committed");
                DropOutcome::Committed(Edge::new(from, target.clone()))
            }
            ValidationResult::Invalid(reason) => {
                log::debug!("link {from} -> {target} rejected: {reason}");
                DropOutcome::Rejected(reason)
            }
        }
    }

    /// Abandon any drag. Returns `true` if one was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            log::debug!("link drag cancelled");
        }
        self.state = ConnectionState::Idle;
        was_dragging
    }

    /// A handle went away. Cancels the drag if it was the dragged handle,
    /// or clears the hover if it was hovered. Returns `true` if the drag was cancelled.
    pub fn handle_removed(&mut self, handle: &HandleRef) -> bool {
        if self.dragging_handle() == Some(handle) {
            return self.cancel();
        }
        self.leave(handle);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NoDuplicatesValidator;

    fn handle(node: &str, handle: &str) -> HandleRef {
        HandleRef::new(node, handle)
    }

    fn dragging_from(h: HandleRef) -> Connector {
        let mut c = Connector::default();
        c.start_drag(h, WorldPoint::new(100.0, 100.0));
        c
    }

    #[test]
    fn test_starts_idle() {
        let c = Connector::default();
        assert_eq!(c.state(), &ConnectionState::Idle);
        assert!(c.dragging_handle().is_none());
        assert!(c.hovering_handle().is_none());
    }

    #[test]
    fn test_hover_ignored_while_idle() {
        let mut c = Connector::default();
        c.hover(&handle("n2", "0"));
        assert!(c.hovering_handle().is_none());
    }

    #[test]
    fn test_hover_ignores_dragged_handle() {
        let mut c = dragging_from(handle("n1", "output"));
        c.hover(&handle("n1", "output"));
        assert!(c.hovering_handle().is_none());
        c.hover(&handle("n2", "0"));
        assert_eq!(c.hovering_handle(), Some(&handle("n2", "0")));
    }

    #[test]
    fn test_leave_only_clears_matching_hover() {
        let mut c = dragging_from(handle("n1", "output"));
        c.hover(&handle("n2", "0"));
        c.leave(&handle("n3", "0"));
        assert_eq!(c.hovering_handle(), Some(&handle("n2", "0")));
        c.leave(&handle("n2", "0"));
        assert!(c.hovering_handle().is_none());
    }

    #[test]
    fn test_move_scales_delta_by_zoom() {
        let mut c = dragging_from(handle("n1", "output"));
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);

        let progress = c.move_by(Vector::new(40.0, -20.0), &viewport, &[]).unwrap();
        assert_eq!(progress.pointer, WorldPoint::new(120.0, 90.0));
        assert!(!progress.snapped);

        // relative to the start, not the previous move
        let progress = c.move_by(Vector::new(40.0, -20.0), &viewport, &[]).unwrap();
        assert_eq!(progress.pointer, WorldPoint::new(120.0, 90.0));
    }

    #[test]
    fn test_move_while_idle_reports_nothing() {
        let mut c = Connector::default();
        assert!(c.move_by(Vector::new(1.0, 1.0), &Viewport::new(), &[]).is_none());
    }

    #[test]
    fn test_preview_snaps_to_valid_hover() {
        let mut c = dragging_from(handle("n1", "output"));
        c.move_by(Vector::new(5.0, 5.0), &Viewport::new(), &[]);

        let free = c.preview(&[]).unwrap();
        assert_eq!(free.end, Endpoint::World(WorldPoint::new(105.0, 105.0)));

        c.hover(&handle("n2", "0"));
        let snapped = c.preview(&[]).unwrap();
        assert_eq!(snapped.start, Endpoint::Handle(handle("n1", "output")));
        assert_eq!(snapped.end, Endpoint::Handle(handle("n2", "0")));
        assert!(c.move_by(Vector::new(6.0, 6.0), &Viewport::new(), &[]).unwrap().snapped);
    }

    #[test]
    fn test_preview_does_not_snap_to_invalid_hover() {
        let mut c = dragging_from(handle("n1", "output"));
        c.hover(&handle("n2", "output"));
        let preview = c.preview(&[]).unwrap();
        assert_eq!(preview.end, Endpoint::World(WorldPoint::new(100.0, 100.0)));
        let progress = c.move_by(Vector::ZERO, &Viewport::new(), &[]).unwrap();
        assert_eq!(progress.hovering, Some(handle("n2", "output")));
        assert!(!progress.snapped);
    }

    #[test]
    fn test_valid_drop_commits_one_edge() {
        let mut c = dragging_from(handle("N1", "output"));
        let outcome = c.drop_on(&handle("N2", "0"), &[]);
        assert_eq!(
            outcome,
            DropOutcome::Committed(Edge::new(handle("N1", "output"), handle("N2", "0")))
        );
        assert_eq!(c.state(), &ConnectionState::Idle);
    }

    #[test]
    fn test_drop_on_same_node_is_rejected() {
        let mut c = dragging_from(handle("N1", "output"));
        let outcome = c.drop_on(&handle("N1", "anything"), &[]);
        assert_eq!(outcome, DropOutcome::Rejected(ValidationError::SameNode));
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_drop_while_idle() {
        let mut c = Connector::default();
        assert_eq!(c.drop_on(&handle("n2", "0"), &[]), DropOutcome::NotDragging);
    }

    #[test]
    fn test_cancel_clears_both_handles() {
        let mut c = dragging_from(handle("n1", "output"));
        c.hover(&handle("n2", "0"));
        assert!(c.cancel());
        assert!(c.dragging_handle().is_none());
        assert!(c.hovering_handle().is_none());
        assert!(!c.cancel());
    }

    #[test]
    fn test_removing_dragged_handle_cancels() {
        let mut c = dragging_from(handle("n1", "output"));
        c.hover(&handle("n2", "0"));
        assert!(c.handle_removed(&handle("n1", "output")));
        assert_eq!(c.state(), &ConnectionState::Idle);
    }

    #[test]
    fn test_removing_hovered_handle_keeps_drag() {
        let mut c = dragging_from(handle("n1", "output"));
        c.hover(&handle("n2", "0"));
        assert!(!c.handle_removed(&handle("n2", "0")));
        assert!(c.is_dragging());
        assert!(c.hovering_handle().is_none());
    }

    #[test]
    fn test_added_validator_applies_to_drop() {
        let mut c = Connector::default();
        c.add_validator(NoDuplicatesValidator);
        let edges = vec![Edge::new(handle("n1", "output"), handle("n2", "0"))];

        c.start_drag(handle("n2", "0"), WorldPoint::new(0.0, 0.0));
        assert_eq!(
            c.drop_on(&handle("n1", "output"), &edges),
            DropOutcome::Rejected(ValidationError::DuplicateLink)
        );
    }
}
