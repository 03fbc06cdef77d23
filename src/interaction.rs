//! Pointer gestures that move and resize the grid.
//!
//! A plain drag moves the origin. A drag with the modifier key held stretches
//! the cells: the number of cells between the origin and the pointer is
//! fixed when the drag starts, and every move afterwards resizes the cells so
//! that this many of them span the pointer distance.

use crate::geometry::{round_half_up, GeometryState, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingOrigin,
    /// Cell count per axis captured on pointer-down.
    DraggingSize { cells: Vec2 },
}

/// Pointer position as reported by the display surface, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Resize modifier (shift) held.
    pub modifier: bool,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, modifier: bool) -> Self {
        Self { x, y, modifier }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: DragState,
}

/// Cells of size `prior` between `origin` and `pointer`, at least one.
fn cell_count(delta: f64, prior: f64) -> f64 {
    round_half_up((delta / prior).abs()).max(1.0)
}

fn stretched(delta: f64, cells: f64) -> f64 {
    (delta / cells).abs().max(1.0)
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Starts a drag. Always changes the geometry.
    pub fn pointer_down(&mut self, event: PointerEvent, geometry: &mut GeometryState) -> bool {
        let pos = geometry.to_image_space(event.x, event.y);
        if !event.modifier {
            geometry.set_origin(pos.x, pos.y);
            self.state = DragState::DraggingOrigin;
            return true;
        }

        let origin = geometry.origin();
        let prior = geometry.cell_size();
        let cells = Vec2::new(
            cell_count(pos.x - origin.x, prior.x),
            cell_count(pos.y - origin.y, prior.y),
        );
        geometry.set_cell_size(
            stretched(pos.x - origin.x, cells.x),
            stretched(pos.y - origin.y, cells.y),
        );
        self.state = DragState::DraggingSize { cells };
        true
    }

    /// Continues the current drag. Returns `false` when idle.
    pub fn pointer_move(&mut self, event: PointerEvent, geometry: &mut GeometryState) -> bool {
        let pos = geometry.to_image_space(event.x, event.y);
        match self.state {
            DragState::Idle => false,
            DragState::DraggingOrigin => {
                geometry.set_origin(pos.x, pos.y);
                true
            }
            DragState::DraggingSize { cells } => {
                let origin = geometry.origin();
                geometry.set_cell_size(
                    stretched(pos.x - origin.x, cells.x),
                    stretched(pos.y - origin.y, cells.y),
                );
                true
            }
        }
    }

    /// Ends any drag and forgets the captured cell count.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(origin: (f64, f64), cell: (f64, f64), scale: f64) -> GeometryState {
        GeometryState::new(Vec2::new(origin.0, origin.1), Vec2::new(cell.0, cell.1), scale)
    }

    #[test]
    fn drag_moves_origin() {
        let mut g = at((0.0, 0.0), (8.0, 8.0), 2.0);
        let mut c = InteractionController::new();

        assert!(c.pointer_down(PointerEvent::new(10.0, 20.0, false), &mut g));
        assert_eq!(c.state(), DragState::DraggingOrigin);
        assert_eq!(g.origin(), Vec2::new(5.0, 10.0));

        assert!(c.pointer_move(PointerEvent::new(30.0, 4.0, false), &mut g));
        assert_eq!(g.origin(), Vec2::new(15.0, 2.0));
        assert_eq!(g.cell_size(), Vec2::new(8.0, 8.0));

        c.pointer_up();
        assert_eq!(c.state(), DragState::Idle);
        assert!(!c.pointer_move(PointerEvent::new(0.0, 0.0, false), &mut g));
        assert_eq!(g.origin(), Vec2::new(15.0, 2.0));
    }

    #[test]
    fn resize_keeps_cell_count() {
        let mut g = at((10.0, 10.0), (5.0, 5.0), 1.0);
        let mut c = InteractionController::new();

        c.pointer_down(PointerEvent::new(20.0, 20.0, true), &mut g);
        assert_eq!(c.state(), DragState::DraggingSize { cells: Vec2::new(2.0, 2.0) });
        assert_eq!(g.cell_size(), Vec2::new(5.0, 5.0));

        c.pointer_move(PointerEvent::new(30.0, 20.0, true), &mut g);
        assert_eq!(g.cell_size(), Vec2::new(10.0, 5.0));
        assert_eq!(g.origin(), Vec2::new(10.0, 10.0));

        // modifier state during the move does not matter
        c.pointer_move(PointerEvent::new(50.0, 30.0, false), &mut g);
        assert_eq!(g.cell_size(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn resize_at_origin_floors_to_one() {
        let mut g = at((10.0, 10.0), (5.0, 5.0), 1.0);
        let mut c = InteractionController::new();

        c.pointer_down(PointerEvent::new(10.0, 10.0, true), &mut g);
        assert_eq!(c.state(), DragState::DraggingSize { cells: Vec2::new(1.0, 1.0) });
        assert_eq!(g.cell_size(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn resize_left_of_origin_uses_distance() {
        let mut g = at((40.0, 40.0), (10.0, 10.0), 2.0);
        let mut c = InteractionController::new();

        // image space (10, 40): three cells to the left, zero rows
        c.pointer_down(PointerEvent::new(20.0, 80.0, true), &mut g);
        assert_eq!(c.state(), DragState::DraggingSize { cells: Vec2::new(3.0, 1.0) });
        assert_eq!(g.cell_size(), Vec2::new(10.0, 1.0));
    }

    #[test]
    fn pointer_up_discards_count() {
        let mut g = at((0.0, 0.0), (4.0, 4.0), 1.0);
        let mut c = InteractionController::new();
        c.pointer_down(PointerEvent::new(8.0, 8.0, true), &mut g);
        c.pointer_up();
        assert_eq!(c.state(), DragState::Idle);

        // a fresh resize recounts with the new cell size
        c.pointer_down(PointerEvent::new(12.0, 12.0, true), &mut g);
        assert_eq!(c.state(), DragState::DraggingSize { cells: Vec2::new(3.0, 3.0) });
    }
}
