// Circles and table rows are rebuilt from the store after every mutation, in
// store order, so row `i` and circle `i` always describe marker `i`.

use crate::canvas::Canvas;
use crate::marker::AttributeKey;
use crate::store::{MarkerId, MarkerStore};
use egui::{Color32, Id, Painter, Pos2, Rect, Ui};
use egui_extras::{Column, TableBuilder};

// On-screen stand-in for a marker, valid until the next rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualHandle {
    pub marker: MarkerId,
    pub center: Pos2,
    pub radius: f32,
}

#[derive(Default)]
pub struct Scene {
    handles: Vec<VisualHandle>,
}

impl Scene {
    pub fn rebuild(&mut self, store: &MarkerStore) {
        self.handles.clear();
        self.handles.extend(store.iter().map(|(marker, found)| VisualHandle {
            marker,
            center: found.position,
            radius: found.radius,
        }));
    }

    #[cfg(test)]
    pub fn handles(&self) -> &[VisualHandle] {
        &self.handles
    }

    /// Topmost circle under `position`. Later circles are painted over
    /// earlier ones, so they win.
    pub fn hit_test(&self, position: Pos2) -> Option<MarkerId> {
        self.handles
            .iter()
            .rev()
            .find(|handle| handle.center.distance(position) <= handle.radius)
            .map(|handle| handle.marker)
    }

    pub fn paint(&self, painter: &Painter, canvas: &Canvas, view_rect: Rect, fill: Color32) {
        for handle in &self.handles {
            let center = canvas.canvas_to_screen_pos(handle.center, view_rect);
            painter.circle_filled(center, handle.radius, fill);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    Edit {
        marker: MarkerId,
        key: AttributeKey,
        value: String,
    },
    Delete(MarkerId),
}

pub fn field_id(row: usize, key: AttributeKey) -> Id {
    Id::new(("marker_field", row, key))
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRow {
    pub marker: MarkerId,
    pub label: String,
    // Text shown in each cell, indexed by `AttributeKey as usize`.
    drafts: [String; 5],
    committed: [String; 5],
}

impl MarkerRow {
    pub fn value(&self, key: AttributeKey) -> &str {
        &self.drafts[key as usize]
    }

    pub fn value_mut(&mut self, key: AttributeKey) -> &mut String {
        &mut self.drafts[key as usize]
    }

    /// Reports the cell's text as an edit, unless the store already has it.
    pub fn commit(&mut self, key: AttributeKey) -> Option<TableAction> {
        let slot = key as usize;
        if self.drafts[slot] == self.committed[slot] {
            return None;
        }
        self.committed[slot] = self.drafts[slot].clone();
        Some(TableAction::Edit {
            marker: self.marker,
            key,
            value: self.drafts[slot].clone(),
        })
    }
}

#[derive(Default)]
pub struct TableView {
    rows: Vec<MarkerRow>,
}

impl TableView {
    pub fn rebuild(&mut self, store: &MarkerStore) {
        self.rows.clear();
        self.rows.extend(store.iter().map(|(marker, found)| {
            let values = AttributeKey::ALL.map(|key| found.attributes.get(key).to_owned());
            MarkerRow {
                marker,
                label: format!(
                    "{}-{}-{}",
                    marker.index(),
                    found.position.x.round() as i32,
                    found.position.y.round() as i32
                ),
                drafts: values.clone(),
                committed: values,
            }
        }));
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[MarkerRow] {
        &self.rows
    }

    #[cfg(test)]
    pub fn rows_mut(&mut self) -> &mut [MarkerRow] {
        &mut self.rows
    }

    // Edits typed into a field that has not lost focus yet. They must reach
    // the store before anything rebuilds the rows.
    pub fn take_drafts(&mut self) -> Vec<TableAction> {
        self.rows
            .iter_mut()
            .flat_map(|row| {
                AttributeKey::ALL
                    .into_iter()
                    .filter_map(|key| row.commit(key))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Draws the table and reports what the user did. A delete, if any, is
    /// reported last so earlier edits still address the right markers.
    pub fn show(&mut self, ui: &mut Ui) -> Vec<TableAction> {
        let mut actions = Vec::new();
        let mut delete = None;

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(70.0))
            .column(Column::initial(110.0).resizable(true))
            .column(Column::auto().at_least(50.0))
            .column(Column::initial(70.0).resizable(true))
            .column(Column::auto().at_least(50.0))
            .column(Column::auto())
            .header(20.0, |mut header| {
                for title in ["Marker", "Name", "Type", "Price", "Status", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (index, row) in self.rows.iter_mut().enumerate() {
                    body.row(24.0, |mut cells| {
                        cells.col(|ui| {
                            ui.label(row.label.as_str());
                        });
                        cells.col(|ui| {
                            let response = ui.add(
                                egui::TextEdit::singleline(row.value_mut(AttributeKey::Name))
                                    .id(field_id(index, AttributeKey::Name)),
                            );
                            // Name goes to the store on every keystroke.
                            if response.changed() {
                                actions.extend(row.commit(AttributeKey::Name));
                            }
                        });
                        cells.col(|ui| {
                            ui.label(row.value(AttributeKey::Kind));
                        });
                        cells.col(|ui| {
                            let response = ui.add(
                                egui::TextEdit::singleline(row.value_mut(AttributeKey::Price))
                                    .id(field_id(index, AttributeKey::Price)),
                            );
                            if response.lost_focus() {
                                actions.extend(row.commit(AttributeKey::Price));
                            }
                        });
                        cells.col(|ui| {
                            ui.label(row.value(AttributeKey::Status));
                        });
                        cells.col(|ui| {
                            if ui.button("delete").clicked() {
                                delete = Some(row.marker);
                            }
                        });
                    });
                }
            });

        actions.extend(delete.map(TableAction::Delete));
        actions
    }
}
