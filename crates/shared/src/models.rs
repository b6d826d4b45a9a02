use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A map position. Field order follows the map widget convention (lat first),
/// which is the reverse of GeoJSON storage order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// One uploaded point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// GeoJSON order: `[longitude, latitude]`.
    pub coordinates: [f64; 2],
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    pub fn new(coordinates: [f64; 2]) -> Self {
        Feature {
            coordinates,
            properties: serde_json::Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// The feature location as a map position (`coordinates[1]`, `coordinates[0]`).
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude(), self.longitude())
    }

    pub fn name(&self) -> String {
        self.text_property("name")
    }

    pub fn address(&self) -> String {
        self.text_property("address")
    }

    /// Read a property as display text. Strings are returned as-is, other JSON
    /// values in their compact form, missing keys as an empty string.
    pub fn text_property(&self, key: &str) -> String {
        match self.properties.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// The features of the most recent successful upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    features: Vec<Feature>,
}

impl Dataset {
    pub fn new(features: Vec<Feature>) -> Self {
        Dataset { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }
}

/// A drawn lasso ring. The last vertex implicitly connects back to the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<LatLng>,
}

impl Polygon {
    pub fn new(vertices: Vec<LatLng>) -> Self {
        Polygon { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Fewer than three vertices cannot enclose anything.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolPath {
    Circle,
    ForwardClosedArrow,
    ForwardOpenArrow,
    BackwardClosedArrow,
    BackwardOpenArrow,
}

impl SymbolPath {
    /// Outline of the symbol in unit space, centred on the anchor point with
    /// y growing downwards. Multiply by the style scale to get pixels.
    pub fn outline(&self) -> &'static [(f64, f64)] {
        match self {
            SymbolPath::Circle => &[],
            SymbolPath::ForwardClosedArrow | SymbolPath::ForwardOpenArrow => {
                &[(-2.0, 2.0), (0.0, -2.0), (2.0, 2.0)]
            }
            SymbolPath::BackwardClosedArrow | SymbolPath::BackwardOpenArrow => {
                &[(-2.0, -2.0), (0.0, 2.0), (2.0, -2.0)]
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        !matches!(
            self,
            SymbolPath::ForwardOpenArrow | SymbolPath::BackwardOpenArrow
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerStyle {
    pub path: SymbolPath,
    pub stroke_color: String,
    pub stroke_weight: u32,
    pub scale: f64,
    pub clickable: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            path: SymbolPath::BackwardClosedArrow,
            stroke_color: "#ff0000".to_string(),
            stroke_weight: 6,
            scale: 5.0,
            clickable: true,
        }
    }
}

/// The one marker style of a session. The map surface keeps a clone of this
/// handle and reads through it, so the pointee must never be swapped out.
pub type SharedStyle = Rc<RefCell<MarkerStyle>>;

/// Content of the popup shown when a marker is clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoContent {
    pub name: String,
    pub address: String,
}

impl From<&Feature> for InfoContent {
    fn from(feature: &Feature) -> Self {
        InfoContent {
            name: feature.name(),
            address: feature.address(),
        }
    }
}

/// One row of the selection results listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRow {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Feature> for SelectionRow {
    fn from(feature: &Feature) -> Self {
        SelectionRow {
            address: feature.address(),
            latitude: feature.latitude(),
            longitude: feature.longitude(),
        }
    }
}
