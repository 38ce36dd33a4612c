//! Pointer-drag tracking.
//!
//! [`PointerTracker`] turns a pointer-down into a stream of deltas relative to
//! the press position, until the pointer is released or the session is
//! cancelled. It does not know what a drag *means*: the session carries an
//! opaque purpose tag `P` and the owner interprets the deltas.
//!
//! # Example
//!
//! ```
//! use slint_node_canvas::tracking::{DragEnd, PointerTracker};
//! use slint_node_canvas::{ScreenPoint, Vector};
//!
//! #[derive(Debug, PartialEq)]
//! enum Purpose { Pan }
//!
//! let mut tracker = PointerTracker::new();
//! tracker.begin(ScreenPoint::new(10.0, 10.0), Purpose::Pan);
//!
//! let (_, delta) = tracker.motion(ScreenPoint::new(15.0, 30.0)).unwrap();
//! assert_eq!(delta, Vector::new(5.0, 20.0));
//!
//! let end = tracker.release(ScreenPoint::new(20.0, 10.0));
//! assert_eq!(end, Some(DragEnd::Released { purpose: Purpose::Pan, delta: Vector::new(10.0, 0.0) }));
//!
//! // Resolved exactly once; later events are ignored.
//! assert!(tracker.motion(ScreenPoint::new(0.0, 0.0)).is_none());
//! assert!(tracker.release(ScreenPoint::new(0.0, 0.0)).is_none());
//! ```

use crate::vector::{ScreenPoint, Vector};

/// An in-progress drag, alive between pointer-down and its resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<P> {
    purpose: P,
    origin: ScreenPoint,
    last_delta: Vector,
}

impl<P> DragSession<P> {
    pub fn purpose(&self) -> &P {
        &self.purpose
    }

    /// Pointer position at pointer-down.
    pub fn origin(&self) -> ScreenPoint {
        self.origin
    }

    /// Delta reported by the most recent move, zero before the first move.
    pub fn last_delta(&self) -> Vector {
        self.last_delta
    }
}

/// How a drag session was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEnd<P> {
    /// Pointer released; `delta` is relative to the press position.
    Released { purpose: P, delta: Vector },
    /// Session abandoned before release (element removed, superseded).
    Cancelled { purpose: P },
}

impl<P> DragEnd<P> {
    pub fn purpose(&self) -> &P {
        match self {
            DragEnd::Released { purpose, .. } | DragEnd::Cancelled { purpose } => purpose,
        }
    }

    pub fn into_purpose(self) -> P {
        match self {
            DragEnd::Released { purpose, .. } | DragEnd::Cancelled { purpose } => purpose,
        }
    }
}

/// Tracks at most one drag session for a single pointer.
#[derive(Debug)]
pub struct PointerTracker<P> {
    session: Option<DragSession<P>>,
}

impl<P> Default for PointerTracker<P> {
    fn default() -> Self {
        Self { session: None }
    }
}

impl<P> PointerTracker<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession<P>> {
        self.session.as_ref()
    }

    pub fn purpose(&self) -> Option<&P> {
        self.session.as_ref().map(DragSession::purpose)
    }

    /// Mutable access to the active purpose, for re-basing a drag mid-session.
    pub fn purpose_mut(&mut self) -> Option<&mut P> {
        self.session.as_mut().map(|session| &mut session.purpose)
    }

    /// Start a new session at `origin`.
    ///
    /// A session that is still active is resolved as cancelled and returned,
    /// so only one session ever exists per pointer.
    pub fn begin(&mut self, origin: ScreenPoint, purpose: P) -> Option<DragEnd<P>> {
        let previous = self.cancel();
        if previous.is_some() {
            log::warn!("pointer-down while a drag was active; previous session cancelled");
        }
        self.session = Some(DragSession {
            purpose,
            origin,
            last_delta: Vector::ZERO,
        });
        previous
    }

    /// Report a pointer move. Returns the session purpose and the delta from
    /// the press position, or `None` when no session is active.
    pub fn motion(&mut self, position: ScreenPoint) -> Option<(&P, Vector)> {
        let session = self.session.as_mut()?;
        let delta = position.delta_from(session.origin);
        session.last_delta = delta;
        log::trace!("drag motion {:?}", delta);
        Some((&session.purpose, delta))
    }

    /// Resolve the session on pointer-up.
    pub fn release(&mut self, position: ScreenPoint) -> Option<DragEnd<P>> {
        let session = self.session.take()?;
        Some(DragEnd::Released {
            delta: position.delta_from(session.origin),
            purpose: session.purpose,
        })
    }

    /// Abandon the active session, if any.
    pub fn cancel(&mut self) -> Option<DragEnd<P>> {
        self.session
            .take()
            .map(|session| DragEnd::Cancelled { purpose: session.purpose })
    }

    /// Cancel the active session only if its purpose matches `predicate`.
    pub fn cancel_if(&mut self, predicate: impl FnOnce(&P) -> bool) -> Option<DragEnd<P>> {
        if self.session.as_ref().is_some_and(|s| predicate(&s.purpose)) {
            self.cancel()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Purpose {
        Pan,
        Node(u32),
    }

    #[test]
    fn test_new_tracker_is_idle() {
        let mut tracker: PointerTracker<Purpose> = PointerTracker::new();
        assert!(!tracker.is_active());
        assert!(tracker.motion(ScreenPoint::new(1.0, 1.0)).is_none());
        assert!(tracker.release(ScreenPoint::new(1.0, 1.0)).is_none());
        assert!(tracker.cancel().is_none());
    }

    #[test]
    fn test_deltas_are_relative_to_press_not_previous_move() {
        let mut tracker = PointerTracker::new();
        tracker.begin(ScreenPoint::new(100.0, 100.0), Purpose::Pan);

        let (_, d1) = tracker.motion(ScreenPoint::new(110.0, 100.0)).unwrap();
        assert_eq!(d1, Vector::new(10.0, 0.0));
        let (_, d2) = tracker.motion(ScreenPoint::new(120.0, 90.0)).unwrap();
        assert_eq!(d2, Vector::new(20.0, -10.0));
        assert_eq!(tracker.session().unwrap().last_delta(), Vector::new(20.0, -10.0));
    }

    #[test]
    fn test_release_resolves_once() {
        let mut tracker = PointerTracker::new();
        tracker.begin(ScreenPoint::new(0.0, 0.0), Purpose::Node(7));

        let end = tracker.release(ScreenPoint::new(3.0, 4.0));
        assert_eq!(
            end,
            Some(DragEnd::Released {
                purpose: Purpose::Node(7),
                delta: Vector::new(3.0, 4.0)
            })
        );
        assert!(tracker.release(ScreenPoint::new(3.0, 4.0)).is_none());
        assert!(tracker.cancel().is_none());
        assert!(tracker.motion(ScreenPoint::new(9.0, 9.0)).is_none());
    }

    #[test]
    fn test_begin_supersedes_active_session() {
        let mut tracker = PointerTracker::new();
        tracker.begin(ScreenPoint::new(0.0, 0.0), Purpose::Pan);
        let previous = tracker.begin(ScreenPoint::new(5.0, 5.0), Purpose::Node(1));

        assert_eq!(previous, Some(DragEnd::Cancelled { purpose: Purpose::Pan }));
        assert_eq!(tracker.purpose(), Some(&Purpose::Node(1)));
        assert_eq!(tracker.session().unwrap().origin(), ScreenPoint::new(5.0, 5.0));
    }

    #[test]
    fn test_cancel_if_matches_purpose() {
        let mut tracker = PointerTracker::new();
        tracker.begin(ScreenPoint::new(0.0, 0.0), Purpose::Node(3));

        assert!(tracker.cancel_if(|p| *p == Purpose::Node(4)).is_none());
        assert!(tracker.is_active());

        let end = tracker.cancel_if(|p| *p == Purpose::Node(3)).unwrap();
        assert_eq!(end.into_purpose(), Purpose::Node(3));
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_purpose_can_be_rebased_mid_session() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.purpose_mut().is_none());
        tracker.begin(ScreenPoint::new(0.0, 0.0), Purpose::Node(1));
        tracker.motion(ScreenPoint::new(4.0, 0.0));

        if let Some(purpose) = tracker.purpose_mut() {
            *purpose = Purpose::Node(2);
        }

        let (purpose, delta) = tracker.motion(ScreenPoint::new(6.0, 0.0)).unwrap();
        assert_eq!(*purpose, Purpose::Node(2));
        assert_eq!(delta, Vector::new(6.0, 0.0));
    }
}
