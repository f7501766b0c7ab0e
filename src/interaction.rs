use crate::store::{MarkerId, MarkerStore};
use egui::Pos2;
use tracing::{debug, trace};

// Pointer input in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Pos2, target: Option<MarkerId> },
    Move { position: Pos2 },
    Up,
}

// Captured once, when the drag begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub marker: MarkerId,
    pub pointer_origin: Pos2,
    pub marker_origin: Pos2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragAnchor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created(MarkerId),
    Moved(MarkerId),
}

impl Mutation {
    pub fn marker(self) -> MarkerId {
        match self {
            Mutation::Created(marker) | Mutation::Moved(marker) => marker,
        }
    }
}

#[derive(Default)]
pub struct GestureController {
    gesture: Gesture,
}

impl GestureController {
    #[cfg(test)]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging(_))
    }

    pub fn handle(&mut self, event: PointerEvent, store: &mut MarkerStore) -> Option<Mutation> {
        match (self.gesture, event) {
            (Gesture::Idle, PointerEvent::Down { position, target: Some(marker) }) => {
                self.begin_drag(marker, position, store);
                None
            }
            (Gesture::Idle, PointerEvent::Down { position, target: None }) => {
                if store.check_overlap(position) {
                    debug!(x = position.x, y = position.y, "press overlaps a marker, nothing created");
                    return None;
                }
                match store.create(position) {
                    Ok(id) => Some(Mutation::Created(id)),
                    Err(err) => {
                        debug!("marker not created: {err}");
                        None
                    }
                }
            }
            (Gesture::Dragging(anchor), PointerEvent::Move { position }) => {
                let delta = position - anchor.pointer_origin;
                store
                    .move_marker(anchor.marker, anchor.marker_origin, delta)
                    .then_some(Mutation::Moved(anchor.marker))
            }
            (Gesture::Dragging(anchor), PointerEvent::Up) => {
                self.end_drag(anchor);
                None
            }
            // The release was never seen (it happened off the canvas or
            // outside the window). Drop the stale drag and start over.
            (Gesture::Dragging(anchor), PointerEvent::Down { .. }) => {
                self.end_drag(anchor);
                self.handle(event, store)
            }
            (Gesture::Idle, PointerEvent::Move { .. } | PointerEvent::Up) => None,
        }
    }

    fn begin_drag(&mut self, marker: MarkerId, pointer: Pos2, store: &MarkerStore) {
        let Some(found) = store.get(marker) else {
            trace!(index = marker.index(), "press on a stale marker handle");
            return;
        };
        let anchor = DragAnchor {
            marker,
            pointer_origin: pointer,
            marker_origin: found.position,
        };
        debug!(index = marker.index(), "drag started");
        self.gesture = Gesture::Dragging(anchor);
    }

    fn end_drag(&mut self, anchor: DragAnchor) {
        debug!(index = anchor.marker.index(), "drag finished");
        self.gesture = Gesture::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_marker_at(x: f32, y: f32) -> MarkerStore {
        let mut store = MarkerStore::new(20.0);
        store.create(Pos2::new(x, y)).unwrap();
        store
    }

    fn down(x: f32, y: f32, target: Option<usize>) -> PointerEvent {
        PointerEvent::Down {
            position: Pos2::new(x, y),
            target: target.map(MarkerId::new),
        }
    }

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move {
            position: Pos2::new(x, y),
        }
    }

    #[test]
    fn press_on_empty_canvas_creates() {
        let mut store = MarkerStore::new(20.0);
        let mut controller = GestureController::default();
        let result = controller.handle(down(50.0, 50.0, None), &mut store);
        assert_eq!(result, Some(Mutation::Created(MarkerId::new(0))));
        assert_eq!(controller.gesture(), Gesture::Idle);
    }

    #[test]
    fn press_on_overlapping_spot_is_ignored() {
        let mut store = store_with_marker_at(50.0, 50.0);
        let mut controller = GestureController::default();
        assert_eq!(controller.handle(down(55.0, 50.0, None), &mut store), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn press_on_marker_drags_instead_of_creating() {
        let mut store = store_with_marker_at(10.0, 10.0);
        let mut controller = GestureController::default();
        assert_eq!(controller.handle(down(10.0, 10.0, Some(0)), &mut store), None);
        assert!(controller.is_dragging());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn drag_delta_is_measured_from_the_gesture_origin() {
        let mut store = store_with_marker_at(10.0, 10.0);
        let mut controller = GestureController::default();

        controller.handle(down(10.0, 10.0, Some(0)), &mut store);
        assert_eq!(
            controller.handle(moved(10.0, 40.0), &mut store),
            Some(Mutation::Moved(MarkerId::new(0)))
        );
        controller.handle(moved(40.0, 40.0), &mut store);
        controller.handle(PointerEvent::Up, &mut store);

        assert_eq!(store.get(MarkerId::new(0)).unwrap().position, Pos2::new(40.0, 40.0));
        assert_eq!(controller.gesture(), Gesture::Idle);
    }

    #[test]
    fn grab_offset_is_preserved() {
        let mut store = store_with_marker_at(100.0, 100.0);
        let mut controller = GestureController::default();

        controller.handle(down(110.0, 95.0, Some(0)), &mut store);
        controller.handle(moved(130.0, 95.0), &mut store);

        assert_eq!(store.get(MarkerId::new(0)).unwrap().position, Pos2::new(120.0, 100.0));
    }

    #[test]
    fn moves_after_release_are_ignored() {
        let mut store = store_with_marker_at(10.0, 10.0);
        let mut controller = GestureController::default();

        controller.handle(down(10.0, 10.0, Some(0)), &mut store);
        controller.handle(moved(20.0, 10.0), &mut store);
        controller.handle(PointerEvent::Up, &mut store);
        assert_eq!(controller.handle(moved(300.0, 300.0), &mut store), None);

        assert_eq!(store.get(MarkerId::new(0)).unwrap().position, Pos2::new(20.0, 10.0));
    }

    #[test]
    fn a_new_gesture_captures_fresh_anchors() {
        let mut store = store_with_marker_at(10.0, 10.0);
        let mut controller = GestureController::default();

        controller.handle(down(10.0, 10.0, Some(0)), &mut store);
        controller.handle(moved(30.0, 10.0), &mut store);
        controller.handle(PointerEvent::Up, &mut store);

        controller.handle(down(30.0, 10.0, Some(0)), &mut store);
        controller.handle(moved(30.0, 50.0), &mut store);
        controller.handle(PointerEvent::Up, &mut store);

        assert_eq!(store.get(MarkerId::new(0)).unwrap().position, Pos2::new(30.0, 50.0));
    }

    #[test]
    fn drag_may_end_on_top_of_another_marker() {
        let mut store = MarkerStore::new(20.0);
        store.create(Pos2::new(10.0, 10.0)).unwrap();
        store.create(Pos2::new(100.0, 10.0)).unwrap();
        let mut controller = GestureController::default();

        controller.handle(down(100.0, 10.0, Some(1)), &mut store);
        controller.handle(moved(15.0, 10.0), &mut store);
        controller.handle(PointerEvent::Up, &mut store);

        assert_eq!(store.get(MarkerId::new(1)).unwrap().position, Pos2::new(15.0, 10.0));
    }

    #[test]
    fn press_without_release_ends_the_stale_drag() {
        let mut store = store_with_marker_at(10.0, 10.0);
        let mut controller = GestureController::default();

        controller.handle(down(10.0, 10.0, Some(0)), &mut store);
        controller.handle(moved(20.0, 10.0), &mut store);
        assert_eq!(
            controller.handle(down(200.0, 200.0, None), &mut store),
            Some(Mutation::Created(MarkerId::new(1)))
        );
        assert_eq!(controller.gesture(), Gesture::Idle);

        // Later moves no longer belong to the abandoned drag.
        assert_eq!(controller.handle(moved(300.0, 300.0), &mut store), None);
        assert_eq!(store.get(MarkerId::new(0)).unwrap().position, Pos2::new(20.0, 10.0));
    }

    #[test]
    fn press_without_release_can_grab_another_marker() {
        let mut store = MarkerStore::new(20.0);
        store.create(Pos2::new(10.0, 10.0)).unwrap();
        store.create(Pos2::new(100.0, 10.0)).unwrap();
        let mut controller = GestureController::default();

        controller.handle(down(10.0, 10.0, Some(0)), &mut store);
        assert_eq!(controller.handle(down(100.0, 10.0, Some(1)), &mut store), None);
        controller.handle(moved(100.0, 50.0), &mut store);

        assert_eq!(store.get(MarkerId::new(0)).unwrap().position, Pos2::new(10.0, 10.0));
        assert_eq!(store.get(MarkerId::new(1)).unwrap().position, Pos2::new(100.0, 50.0));
    }

    #[test]
    fn mutation_names_its_marker() {
        assert_eq!(Mutation::Moved(MarkerId::new(3)).marker(), MarkerId::new(3));
    }

    #[test]
    fn stale_target_does_not_start_a_drag() {
        let mut store = MarkerStore::new(20.0);
        let mut controller = GestureController::default();
        assert_eq!(controller.handle(down(10.0, 10.0, Some(4)), &mut store), None);
        assert_eq!(controller.gesture(), Gesture::Idle);
        assert!(store.is_empty());
    }
}
