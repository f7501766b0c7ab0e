use egui::{Pos2, Rect, Vec2};

/// Fixed-size drawing surface pinned to the top-left of its panel. Canvas
/// coordinates are offsets from that corner.
pub struct Canvas {
    width: f32,
    height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn get_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn get_screen_rect(&self, view_rect: Rect) -> Rect {
        Rect::from_min_size(view_rect.min, self.get_size())
    }

    pub fn contains(&self, canvas_pos: Pos2) -> bool {
        (0.0..=self.width).contains(&canvas_pos.x) && (0.0..=self.height).contains(&canvas_pos.y)
    }

    pub fn screen_to_canvas_pos(&self, screen_pos: Pos2, view_rect: Rect) -> Pos2 {
        (screen_pos - view_rect.min).to_pos2()
    }

    pub fn canvas_to_screen_pos(&self, canvas_pos: Pos2, view_rect: Rect) -> Pos2 {
        view_rect.min + canvas_pos.to_vec2()
    }
}
