use glam::Vec2;

use crate::action::{ChartAction, DragButton};

/// Client pixel position to normalized device coordinates. Y flips so that
/// the top of the viewport is +1.
pub fn client_to_ndc(client: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        client.x / viewport.x * 2.0 - 1.0,
        -(client.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Latest pointer position in NDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    ndc: Vec2,
}

impl Default for PointerState {
    /// Bottom-left corner, until the pointer first moves.
    fn default() -> Self {
        Self {
            ndc: Vec2::new(-1.0, -1.0),
        }
    }
}

impl PointerState {
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Record a client pixel position. Ignored for an empty viewport.
    pub fn set_client(&mut self, client: Vec2, viewport: Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        self.ndc = client_to_ndc(client, viewport);
    }
}

/// Turns button state plus cursor motion into chart actions.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    rotating: bool,
    panning: bool,
    last: Option<Vec2>,
}

impl DragTracker {
    pub fn button(&mut self, button: DragButton, pressed: bool) {
        match button {
            DragButton::Primary => self.rotating = pressed,
            DragButton::Secondary => self.panning = pressed,
        }
    }

    /// Actions for a cursor move to `client`: always a pointer move, plus a
    /// rotate or pan by the distance since the previous move while a drag
    /// button is held.
    pub fn cursor_moved(&mut self, client: Vec2) -> Vec<ChartAction> {
        let mut actions = vec![ChartAction::PointerMoved(client)];
        if let Some(last) = self.last {
            let delta = client - last;
            if delta != Vec2::ZERO {
                if self.rotating {
                    actions.push(ChartAction::Rotate(delta));
                }
                if self.panning {
                    actions.push(ChartAction::Pan(delta));
                }
            }
        }
        self.last = Some(client);
        actions
    }

    /// Forget the last cursor position, e.g. when the cursor leaves the window.
    pub fn reset(&mut self) {
        self.last = None;
        self.rotating = false;
        self.panning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(client_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(client_to_ndc(viewport, viewport), Vec2::new(1.0, -1.0));
        assert_eq!(client_to_ndc(viewport / 2.0, viewport), Vec2::ZERO);
    }

    #[test]
    fn initial_pointer_is_bottom_left() {
        assert_eq!(PointerState::default().ndc(), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn last_write_wins() {
        let mut pointer = PointerState::default();
        let viewport = Vec2::new(100.0, 100.0);
        pointer.set_client(Vec2::new(10.0, 10.0), viewport);
        pointer.set_client(Vec2::new(75.0, 25.0), viewport);
        assert_eq!(pointer.ndc(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn empty_viewport_is_ignored() {
        let mut pointer = PointerState::default();
        pointer.set_client(Vec2::new(10.0, 10.0), Vec2::ZERO);
        assert_eq!(pointer.ndc(), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn moves_without_buttons_only_point() {
        let mut drag = DragTracker::default();
        drag.cursor_moved(Vec2::new(10.0, 10.0));
        let actions = drag.cursor_moved(Vec2::new(15.0, 12.0));
        assert_eq!(actions, vec![ChartAction::PointerMoved(Vec2::new(15.0, 12.0))]);
    }

    #[test]
    fn held_buttons_produce_drags() {
        let mut drag = DragTracker::default();
        drag.cursor_moved(Vec2::new(10.0, 10.0));
        drag.button(DragButton::Primary, true);
        let actions = drag.cursor_moved(Vec2::new(15.0, 12.0));
        assert_eq!(actions[1], ChartAction::Rotate(Vec2::new(5.0, 2.0)));

        drag.button(DragButton::Primary, false);
        drag.button(DragButton::Secondary, true);
        let actions = drag.cursor_moved(Vec2::new(14.0, 12.0));
        assert_eq!(actions[1], ChartAction::Pan(Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn first_move_after_reset_has_no_delta() {
        let mut drag = DragTracker::default();
        drag.button(DragButton::Primary, true);
        drag.cursor_moved(Vec2::new(10.0, 10.0));
        drag.reset();
        drag.button(DragButton::Primary, true);
        let actions = drag.cursor_moved(Vec2::new(50.0, 50.0));
        assert_eq!(actions.len(), 1);
        let actions = drag.cursor_moved(Vec2::new(52.0, 50.0));
        assert_eq!(actions[1], ChartAction::Rotate(Vec2::new(2.0, 0.0)));
    }
}
