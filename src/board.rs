// Every mutation is written through to storage before the views are rebuilt.

use crate::config::BoardConfig;
use crate::interaction::{GestureController, PointerEvent};
use crate::marker::Marker;
use crate::persistence::Snapshot;
use crate::store::{MarkerId, MarkerStore};
use crate::view::{Scene, TableAction, TableView};
use eframe::Storage;
use egui::{Pos2, Ui};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Pointer(PointerEvent),
    Table(TableAction),
    Clear,
    Import(Vec<Marker>),
}

pub struct Board {
    store: MarkerStore,
    gestures: GestureController,
    scene: Scene,
    table: TableView,
    snapshot: Snapshot,
}

impl Board {
    /// Restores the saved markers, if any, and renders them once.
    pub fn open(config: &BoardConfig, storage: &dyn Storage) -> Self {
        let snapshot = Snapshot::new(config.storage_key.clone());
        let markers = snapshot.load(storage);
        let mut board = Self {
            store: MarkerStore::with_markers(config.radius, markers),
            gestures: GestureController::default(),
            scene: Scene::default(),
            table: TableView::default(),
            snapshot,
        };
        board.render();
        board
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    /// The marker a press at `position` would land on.
    pub fn hit_test(&self, position: Pos2) -> Option<MarkerId> {
        self.scene.hit_test(position)
    }

    pub fn show_table(&mut self, ui: &mut Ui) -> Vec<BoardEvent> {
        self.table
            .show(ui)
            .into_iter()
            .map(BoardEvent::Table)
            .collect()
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        self.snapshot.save(storage, self.store.markers());
    }

    pub fn apply(&mut self, event: BoardEvent, storage: &mut dyn Storage) {
        self.commit_drafts(storage);

        match event {
            BoardEvent::Pointer(pointer) => {
                if let Some(mutation) = self.gestures.handle(pointer, &mut self.store) {
                    debug!(index = mutation.marker().index(), ?mutation, "pointer changed the store");
                    self.commit(storage);
                }
            }
            BoardEvent::Table(TableAction::Edit { marker, key, value }) => {
                // The row already shows the new text; no rebuild needed.
                if self.store.update_attribute(marker, key, value) {
                    self.save(storage);
                }
            }
            BoardEvent::Table(TableAction::Delete(marker)) => {
                if self.store.delete(marker).is_some() {
                    self.commit(storage);
                }
            }
            BoardEvent::Clear => {
                if !self.store.is_empty() {
                    self.store.clear();
                    self.commit(storage);
                }
            }
            BoardEvent::Import(markers) => {
                info!(count = markers.len(), "importing markers");
                self.store.replace(markers);
                self.commit(storage);
            }
        }
    }

    // A price still being typed belongs to the row it was typed in, which a
    // rebuild would throw away.
    fn commit_drafts(&mut self, storage: &mut dyn Storage) {
        let drafts = self.table.take_drafts();
        if drafts.is_empty() {
            return;
        }
        for draft in drafts {
            if let TableAction::Edit { marker, key, value } = draft {
                self.store.update_attribute(marker, key, value);
            }
        }
        self.save(storage);
    }

    fn commit(&mut self, storage: &mut dyn Storage) {
        self.save(storage);
        self.render();
    }

    fn render(&mut self) {
        self.scene.rebuild(&self.store);
        self.table.rebuild(&self.store);
    }
}
