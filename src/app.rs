use crate::board::{Board, BoardEvent};
use crate::canvas::Canvas;
use crate::config::BoardConfig;
use crate::interaction::PointerEvent;
use crate::persistence::{self, MemoryStorage};
use clipboard::ClipboardContext;
use clipboard::ClipboardProvider;
use eframe::Storage;
use egui::{Color32, Context, Stroke, Ui, Vec2};
use tracing::{error, info, warn};

pub struct MarkerBoardApp {
    board: Board,
    canvas: Canvas,
    config: BoardConfig,
    // Stands in when eframe has no durable storage to hand out.
    fallback_storage: MemoryStorage,
    clipboard: Option<ClipboardContext>,
    status: Option<String>,
}

impl MarkerBoardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: BoardConfig) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        cc.egui_ctx.set_style(style);

        let fallback_storage = MemoryStorage::default();
        let board = match cc.storage {
            Some(storage) => Board::open(&config, storage),
            None => {
                warn!("no durable storage available, markers will be lost on exit");
                Board::open(&config, &fallback_storage)
            }
        };

        Self {
            board,
            canvas: Canvas::new(config.canvas_size.x, config.canvas_size.y),
            config,
            fallback_storage,
            clipboard: ClipboardProvider::new().ok(),
            status: None,
        }
    }

    pub fn copy_to_clipboard(&mut self, text: String) -> bool {
        if let Some(clipboard) = &mut self.clipboard {
            clipboard.set_contents(text).is_ok()
        } else {
            false
        }
    }

    fn copy_snapshot(&mut self) {
        match persistence::encode(self.board.store().markers()) {
            Ok(text) => {
                self.status = if self.copy_to_clipboard(text) {
                    Some("Snapshot copied".to_string())
                } else {
                    Some("Clipboard unavailable".to_string())
                };
            }
            Err(err) => {
                error!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn export_snapshot(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("markers.json")
            .save_file()
        else {
            return;
        };

        match persistence::write_file(&path, self.board.store().markers()) {
            Ok(()) => {
                info!(path = %path.display(), "markers exported");
                self.status = Some(format!("Exported to {}", path.display()));
            }
            Err(err) => {
                error!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn import_snapshot(&mut self) -> Option<BoardEvent> {
        let path = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()?;

        match persistence::read_file(&path) {
            Ok(markers) => {
                self.status = Some(format!("Imported {} markers", markers.len()));
                Some(BoardEvent::Import(markers))
            }
            Err(err) => {
                error!("{err}");
                self.status = Some(err.to_string());
                None
            }
        }
    }

    fn draw_canvas(&self, ui: &mut Ui) -> egui::Response {
        let (response, painter) =
            ui.allocate_painter(self.canvas.get_size(), egui::Sense::click_and_drag());
        let canvas_rect = self.canvas.get_screen_rect(response.rect);

        painter.rect_filled(canvas_rect, 0.0, Color32::from_rgb(240, 240, 240));
        painter.rect_stroke(canvas_rect, 0.0, Stroke::new(2.0, Color32::from_rgb(100, 100, 100)));
        self.board
            .scene()
            .paint(&painter, &self.canvas, response.rect, self.config.fill);

        if self.board.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if let Some(hover) = response.hover_pos() {
            let position = self.canvas.screen_to_canvas_pos(hover, response.rect);
            if self.board.hit_test(position).is_some() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
        }

        response
    }

    fn apply_events(&mut self, events: Vec<BoardEvent>, frame: &mut eframe::Frame) {
        if events.is_empty() {
            return;
        }

        let storage: &mut (dyn Storage + 'static) = match frame.storage_mut() {
            Some(storage) => storage,
            None => &mut self.fallback_storage,
        };
        for event in events {
            self.board.apply(event, storage);
        }
    }
}

// Translate this frame's primary-button input into gesture events. Moves and
// releases are only forwarded while a gesture is live.
pub fn pointer_events(
    ui: &Ui,
    response: &egui::Response,
    canvas: &Canvas,
    board: &Board,
) -> Vec<BoardEvent> {
    let canvas_rect = response.rect;
    let (pressed, released, press_origin, latest, delta) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.press_origin(),
            i.pointer.interact_pos(),
            i.pointer.delta(),
        )
    });

    let mut events = Vec::new();

    if pressed && response.hovered() {
        if let Some(screen_pos) = press_origin {
            let position = canvas.screen_to_canvas_pos(screen_pos, canvas_rect);
            if canvas.contains(position) {
                events.push(BoardEvent::Pointer(PointerEvent::Down {
                    position,
                    target: board.hit_test(position),
                }));
            }
        }
    }

    let live = board.is_dragging() || !events.is_empty();
    if live && delta != Vec2::ZERO {
        if let Some(screen_pos) = latest {
            let position = canvas.screen_to_canvas_pos(screen_pos, canvas_rect);
            events.push(BoardEvent::Pointer(PointerEvent::Move { position }));
        }
    }
    if live && released {
        events.push(BoardEvent::Pointer(PointerEvent::Up));
    }

    events
}

impl eframe::App for MarkerBoardApp {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Marker Board");
                ui.separator();
                if ui.button("Clear Markers").clicked() {
                    events.push(BoardEvent::Clear);
                }
                if ui.button("Copy Snapshot").clicked() {
                    self.copy_snapshot();
                }
                if ui.button("Export…").clicked() {
                    self.export_snapshot();
                }
                if ui.button("Import…").clicked() {
                    events.extend(self.import_snapshot());
                }
                ui.separator();
                ui.label(format!("Markers: {}", self.board.store().len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status.as_str());
                }
            });
        });

        egui::SidePanel::right("marker_table")
            .resizable(true)
            .default_width(480.0)
            .show(ctx, |ui| {
                ui.heading("Markers");
                ui.separator();
                egui::ScrollArea::horizontal().show(ui, |ui| {
                    events.extend(self.board.show_table(ui));
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.draw_canvas(ui);
            events.extend(pointer_events(ui, &response, &self.canvas, &self.board));
        });

        self.apply_events(events, frame);
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        self.board.save(storage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MarkerId;
    use crate::view::headless;
    use egui::{Event, Modifiers, PointerButton, Pos2, Rect, Sense};

    struct Harness {
        ctx: Context,
        board: Board,
        canvas: Canvas,
        storage: MemoryStorage,
        origin: Pos2,
    }

    impl Harness {
        fn new() -> Self {
            let storage = MemoryStorage::default();
            let config = BoardConfig::default();
            let mut harness = Self {
                ctx: Context::default(),
                board: Board::open(&config, &storage),
                canvas: Canvas::new(config.canvas_size.x, config.canvas_size.y),
                storage,
                origin: Pos2::ZERO,
            };
            let (events, rect) = harness.frame(vec![]);
            assert!(events.is_empty());
            harness.origin = rect.min;
            harness
        }

        // Runs one frame over the canvas and applies what it produced.
        fn frame(&mut self, input: Vec<Event>) -> (Vec<BoardEvent>, Rect) {
            let mut out = (Vec::new(), Rect::NOTHING);
            let (board, canvas) = (&self.board, &self.canvas);
            headless::frame(&self.ctx, input, |ui| {
                let (response, _painter) =
                    ui.allocate_painter(canvas.get_size(), Sense::click_and_drag());
                out = (pointer_events(ui, &response, canvas, board), response.rect);
            });
            for event in out.0.clone() {
                self.board.apply(event, &mut self.storage);
            }
            out
        }

        fn at(&self, x: f32, y: f32) -> Pos2 {
            self.origin + egui::vec2(x, y)
        }

        fn hover(&mut self, x: f32, y: f32) -> Vec<BoardEvent> {
            let pos = self.at(x, y);
            self.frame(vec![Event::PointerMoved(pos)]).0
        }

        fn button(&mut self, x: f32, y: f32, pressed: bool) -> Vec<BoardEvent> {
            let pos = self.at(x, y);
            self.frame(vec![Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers: Modifiers::NONE,
            }])
            .0
        }
    }

    fn down(x: f32, y: f32, target: Option<usize>) -> BoardEvent {
        BoardEvent::Pointer(PointerEvent::Down {
            position: Pos2::new(x, y),
            target: target.map(MarkerId::new),
        })
    }

    fn moved(x: f32, y: f32) -> BoardEvent {
        BoardEvent::Pointer(PointerEvent::Move {
            position: Pos2::new(x, y),
        })
    }

    #[test]
    fn press_on_empty_canvas_becomes_a_down_without_target() {
        let mut harness = Harness::new();
        assert!(harness.hover(50.0, 50.0).is_empty());
        assert_eq!(harness.button(50.0, 50.0, true), vec![down(50.0, 50.0, None)]);
        assert_eq!(harness.board.store().len(), 1);

        // No gesture is live, so the release is not forwarded.
        assert!(harness.button(50.0, 50.0, false).is_empty());
    }

    #[test]
    fn drag_forwards_moves_and_release_until_the_gesture_ends() {
        let mut harness = Harness::new();
        harness.hover(50.0, 50.0);
        harness.button(50.0, 50.0, true);
        harness.button(50.0, 50.0, false);

        harness.hover(55.0, 50.0);
        assert_eq!(harness.button(55.0, 50.0, true), vec![down(55.0, 50.0, Some(0))]);
        assert!(harness.board.is_dragging());
        assert_eq!(harness.hover(55.0, 80.0), vec![moved(55.0, 80.0)]);
        assert_eq!(
            harness.button(55.0, 80.0, false),
            vec![BoardEvent::Pointer(PointerEvent::Up)]
        );

        assert!(!harness.board.is_dragging());
        assert_eq!(harness.board.store().markers()[0].position, Pos2::new(50.0, 80.0));
        assert!(harness.hover(300.0, 300.0).is_empty());
    }

    #[test]
    fn moves_without_a_gesture_are_dropped() {
        let mut harness = Harness::new();
        assert!(harness.hover(10.0, 10.0).is_empty());
        assert!(harness.hover(40.0, 40.0).is_empty());
        assert!(harness.board.store().is_empty());
    }
}
