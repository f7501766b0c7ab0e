use egui::Pos2;
use serde::{Deserialize, Deserializer, Serialize};

// Free-text fields attached to a marker, stored as the `datas` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub price: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Name,
    Kind,
    Color,
    Price,
    Status,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 5] = [
        AttributeKey::Name,
        AttributeKey::Kind,
        AttributeKey::Color,
        AttributeKey::Price,
        AttributeKey::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AttributeKey::Name => "name",
            AttributeKey::Kind => "type",
            AttributeKey::Color => "color",
            AttributeKey::Price => "price",
            AttributeKey::Status => "status",
        }
    }
}

impl Attributes {
    pub fn get(&self, key: AttributeKey) -> &str {
        match key {
            AttributeKey::Name => &self.name,
            AttributeKey::Kind => &self.kind,
            AttributeKey::Color => &self.color,
            AttributeKey::Price => &self.price,
            AttributeKey::Status => &self.status,
        }
    }

    pub fn set(&mut self, key: AttributeKey, value: String) {
        let slot = match key {
            AttributeKey::Name => &mut self.name,
            AttributeKey::Kind => &mut self.kind,
            AttributeKey::Color => &mut self.color,
            AttributeKey::Price => &mut self.price,
            AttributeKey::Status => &mut self.status,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MarkerRecord", into = "MarkerRecord")]
pub struct Marker {
    pub position: Pos2, // Center in canvas coordinates
    pub radius: f32,
    pub attributes: Attributes,
}

impl Marker {
    pub fn new(position: Pos2, radius: f32) -> Self {
        Self {
            position,
            radius,
            attributes: Attributes::default(),
        }
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.position.distance(point) <= self.radius
    }
}

// Stored shape: {x, y, radius, datas: {name, type, color, price, status}}
#[derive(Serialize, Deserialize)]
struct MarkerRecord {
    x: f32,
    y: f32,
    #[serde(deserialize_with = "number_or_text")]
    radius: f32,
    #[serde(default)]
    datas: Attributes,
}

impl From<MarkerRecord> for Marker {
    fn from(record: MarkerRecord) -> Self {
        Self {
            position: Pos2::new(record.x, record.y),
            radius: record.radius,
            attributes: record.datas,
        }
    }
}

impl From<Marker> for MarkerRecord {
    fn from(marker: Marker) -> Self {
        Self {
            x: marker.position.x,
            y: marker.position.y,
            radius: marker.radius,
            datas: marker.attributes,
        }
    }
}

// Older snapshots wrote the radius as a string ("20").
fn number_or_text<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Radius {
        Number(f32),
        Text(String),
    }

    match Radius::deserialize(deserializer)? {
        Radius::Number(value) => Ok(value),
        Radius::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid radius `{text}`"))),
    }
}
