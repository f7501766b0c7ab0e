use crate::marker::{AttributeKey, Marker};
use egui::{Pos2, Vec2};
use tracing::{debug, trace};

// A marker's position in the collection. Deleting a marker shifts every
// later id down by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(usize);

impl MarkerId {
    #[cfg(test)]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("({x}, {y}) overlaps marker {index}", index = .existing.index())]
pub struct OverlapError {
    pub x: f32,
    pub y: f32,
    pub existing: MarkerId,
}

pub struct MarkerStore {
    markers: Vec<Marker>,
    radius: f32,
}

impl MarkerStore {
    pub fn new(radius: f32) -> Self {
        Self {
            markers: Vec::new(),
            radius,
        }
    }

    // Restored markers are taken as-is, overlaps included.
    pub fn with_markers(radius: f32, markers: Vec<Marker>) -> Self {
        Self { markers, radius }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.index())
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &Marker)> {
        self.markers
            .iter()
            .enumerate()
            .map(|(index, marker)| (MarkerId(index), marker))
    }

    pub fn overlapping(&self, position: Pos2) -> Option<MarkerId> {
        self.markers
            .iter()
            .position(|marker| marker.contains(position))
            .map(MarkerId)
    }

    pub fn check_overlap(&self, position: Pos2) -> bool {
        self.overlapping(position).is_some()
    }

    /// Appends a marker with empty attributes, unless it would overlap an
    /// existing one.
    pub fn create(&mut self, position: Pos2) -> Result<MarkerId, OverlapError> {
        if let Some(existing) = self.overlapping(position) {
            return Err(OverlapError {
                x: position.x,
                y: position.y,
                existing,
            });
        }

        self.markers.push(Marker::new(position, self.radius));
        let id = MarkerId(self.markers.len() - 1);
        debug!(index = id.index(), x = position.x, y = position.y, "marker created");
        Ok(id)
    }

    /// Places the marker at `origin + delta`, where `origin` is where it sat
    /// when the current gesture began. Overlap is not re-checked.
    pub fn move_marker(&mut self, id: MarkerId, origin: Pos2, delta: Vec2) -> bool {
        let Some(marker) = self.markers.get_mut(id.index()) else {
            trace!(index = id.index(), "move ignored, no such marker");
            return false;
        };
        marker.position = origin + delta;
        trace!(index = id.index(), x = marker.position.x, y = marker.position.y, "marker moved");
        true
    }

    pub fn update_attribute(&mut self, id: MarkerId, key: AttributeKey, value: String) -> bool {
        let Some(marker) = self.markers.get_mut(id.index()) else {
            trace!(index = id.index(), key = key.label(), "edit ignored, no such marker");
            return false;
        };
        marker.attributes.set(key, value);
        true
    }

    pub fn delete(&mut self, id: MarkerId) -> Option<Marker> {
        if id.index() >= self.markers.len() {
            trace!(index = id.index(), "delete ignored, no such marker");
            return None;
        }
        let removed = self.markers.remove(id.index());
        debug!(index = id.index(), remaining = self.markers.len(), "marker deleted");
        Some(removed)
    }

    pub fn clear(&mut self) {
        debug!(removed = self.markers.len(), "markers cleared");
        self.markers.clear();
    }

    pub fn replace(&mut self, markers: Vec<Marker>) {
        debug!(count = markers.len(), "markers replaced");
        self.markers = markers;
    }
}
