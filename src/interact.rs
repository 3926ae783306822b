//! Pointer interaction with the diagram.
//!
//! Dragging a state gives that state exclusive pointer capture until the
//! drag ends, writing the dragged position straight into the position
//! overrides. All coordinates here are layout-canvas coordinates; the
//! host converts from screen space before calling in.

use egui::{Pos2, Vec2};

use crate::automaton::State;
use crate::layout::{Positions, STATE_RADIUS};

#[derive(Debug, Default)]
pub struct DragController {
    captured: Option<Capture>,
}

#[derive(Debug)]
struct Capture {
    state_id: String,
    /// Offset from the pointer to the state center at grab time, so the
    /// state does not jump under the cursor.
    grab_offset: Vec2,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.captured.is_some()
    }

    pub fn dragged_state(&self) -> Option<&str> {
        self.captured.as_ref().map(|c| c.state_id.as_str())
    }

    /// Hit-test the pointer against the states and capture the topmost hit.
    /// Later states in the slice draw on top, so they win the hit-test.
    /// Returns true when a drag started.
    pub fn begin(&mut self, pointer: Pos2, states: &[State], positions: &Positions) -> bool {
        if self.captured.is_some() {
            return false;
        }
        for state in states.iter().rev() {
            if let Some(center) = positions.get(&state.id) {
                if (pointer - center).length() <= STATE_RADIUS {
                    self.captured = Some(Capture {
                        state_id: state.id.clone(),
                        grab_offset: center - pointer,
                    });
                    return true;
                }
            }
        }
        false
    }

    /// Move the captured state under the pointer. No-op without a capture.
    pub fn update(&mut self, pointer: Pos2, positions: &mut Positions) {
        if let Some(capture) = &self.captured {
            positions.set(&capture.state_id, pointer + capture.grab_offset);
        }
    }

    /// Release the capture, returning the id of the state that was dragged.
    pub fn end(&mut self) -> Option<String> {
        self.captured.take().map(|c| c.state_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::State;

    fn states() -> Vec<State> {
        vec![State::new("S0"), State::new("S1")]
    }

    fn positions() -> Positions {
        let mut p = Positions::default();
        p.set("S0", Pos2::new(100.0, 100.0));
        p.set("S1", Pos2::new(300.0, 100.0));
        p
    }

    #[test]
    fn test_begin_hits_state_within_radius() {
        let mut drag = DragController::new();
        assert!(drag.begin(Pos2::new(110.0, 95.0), &states(), &positions()));
        assert_eq!(drag.dragged_state(), Some("S0"));
    }

    #[test]
    fn test_begin_misses_outside_radius() {
        let mut drag = DragController::new();
        assert!(!drag.begin(Pos2::new(200.0, 100.0), &states(), &positions()));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_preserves_grab_offset() {
        let mut drag = DragController::new();
        let mut pos = positions();
        // Grab 10px right of center, move the pointer 50px down.
        assert!(drag.begin(Pos2::new(110.0, 100.0), &states(), &pos));
        drag.update(Pos2::new(110.0, 150.0), &mut pos);
        let moved = pos.get("S0").unwrap();
        assert_eq!(moved, Pos2::new(100.0, 150.0));
    }

    #[test]
    fn test_capture_is_exclusive() {
        let mut drag = DragController::new();
        let mut pos = positions();
        assert!(drag.begin(Pos2::new(100.0, 100.0), &states(), &pos));
        // A second begin over another state must not steal the capture.
        assert!(!drag.begin(Pos2::new(300.0, 100.0), &states(), &pos));
        drag.update(Pos2::new(300.0, 100.0), &mut pos);
        assert_eq!(pos.get("S0").unwrap(), Pos2::new(300.0, 100.0));
        assert_eq!(pos.get("S1").unwrap(), Pos2::new(300.0, 100.0));
        assert_eq!(drag.end().as_deref(), Some("S0"));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_update_without_capture_is_noop() {
        let mut drag = DragController::new();
        let mut pos = positions();
        drag.update(Pos2::new(0.0, 0.0), &mut pos);
        assert_eq!(pos.get("S0").unwrap(), Pos2::new(100.0, 100.0));
        assert!(drag.end().is_none());
    }

    #[test]
    fn test_overlapping_states_topmost_wins() {
        let mut drag = DragController::new();
        let mut pos = positions();
        pos.set("S1", Pos2::new(110.0, 100.0));
        assert!(drag.begin(Pos2::new(105.0, 100.0), &states(), &pos));
        assert_eq!(drag.dragged_state(), Some("S1"));
    }
}
