use crate::persistence::STORAGE_KEY;
use egui::{Color32, Vec2};
use tracing::warn;

pub const RADIUS_ENV: &str = "MARKER_BOARD_RADIUS";
pub const STORAGE_KEY_ENV: &str = "MARKER_BOARD_STORAGE_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub radius: f32,
    pub fill: Color32,
    pub canvas_size: Vec2,
    pub storage_key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            fill: Color32::from_rgb(0, 0, 255),
            canvas_size: Vec2::new(800.0, 600.0),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

impl BoardConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(RADIUS_ENV).ok().as_deref(),
            std::env::var(STORAGE_KEY_ENV).ok().as_deref(),
        )
    }

    /// Applies the raw override values; anything unusable is logged and
    /// skipped.
    pub fn with_overrides(mut self, radius: Option<&str>, storage_key: Option<&str>) -> Self {
        if let Some(raw) = radius {
            match raw.trim().parse::<f32>() {
                Ok(value) if value.is_finite() && value > 0.0 => self.radius = value,
                _ => warn!("ignoring {RADIUS_ENV}=`{raw}`, expected a positive number"),
            }
        }

        if let Some(raw) = storage_key {
            let key = raw.trim();
            if key.is_empty() {
                warn!("ignoring empty {STORAGE_KEY_ENV}");
            } else {
                self.storage_key = key.to_string();
            }
        }

        self
    }
}
