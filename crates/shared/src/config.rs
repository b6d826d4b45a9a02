use serde::{Deserialize, Serialize};

use crate::error::{GeopalError, Result};
use crate::models::{LatLng, MarkerStyle};

/// Initial map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub location: LatLng,
    pub zoom: u8,
}

impl Default for MapConfig {
    // Dublin city centre
    fn default() -> Self {
        MapConfig {
            location: LatLng::new(53.3443322, -6.26301),
            zoom: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuLabels {
    pub upload_btn: String,
    pub selection_btn: String,
    pub change_btn: String,
}

impl Default for MenuLabels {
    fn default() -> Self {
        MenuLabels {
            upload_btn: "Upload file".to_string(),
            selection_btn: "Selection tool".to_string(),
            change_btn: "Change icon color".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLabels {
    pub upload: String,
    pub cancel: String,
    pub close: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        ButtonLabels {
            upload: "Upload".to_string(),
            cancel: "Cancel".to_string(),
            close: "Close".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleLabels {
    pub error: String,
    pub upload_geo_json: String,
    pub selection_results: String,
    pub change_marker_icon: String,
}

impl Default for TitleLabels {
    fn default() -> Self {
        TitleLabels {
            error: "Error!".to_string(),
            upload_geo_json: "Upload GeoJSON".to_string(),
            selection_results: "Selection result details".to_string(),
            change_marker_icon: "Change marker icon".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub menu: MenuLabels,
    pub buttons: ButtonLabels,
    pub titles: TitleLabels,
}

/// Options accepted by `Session::init`. Everything but `container` has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppOptions {
    /// Id of the element hosting the map surface.
    pub container: Option<String>,
    pub map: MapConfig,
    pub marker_style: MarkerStyle,
    pub labels: Labels,
}

impl AppOptions {
    pub fn with_container(container: impl Into<String>) -> Self {
        AppOptions {
            container: Some(container.into()),
            ..AppOptions::default()
        }
    }

    /// Check the options that have no sensible default.
    pub fn validate(&self) -> Result<&str> {
        let container = self
            .container
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GeopalError::Configuration("a map container is required".to_string()))?;

        let loc = self.map.location;
        if !(-90.0..=90.0).contains(&loc.lat) || !(-180.0..=180.0).contains(&loc.lng) {
            return Err(GeopalError::Configuration(format!(
                "initial location out of range: {}, {}",
                loc.lat, loc.lng
            )));
        }
        Ok(container)
    }
}

/// An RGB colour as produced by a colour picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn to_hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb {
    type Err = String;

    /// Accepts `#rgb`, `#rrggbb` and `rgb(r, g, b)`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<_>>()
                .ok_or_else(|| format!("Invalid hex colour: {s}"))?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Rgb::new(r * 17, g * 17, b * 17)),
                [r1, r2, g1, g2, b1, b2] => {
                    Ok(Rgb::new(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2))
                }
                _ => Err(format!("Invalid hex colour: {s}")),
            };
        }

        let inner = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("Unrecognised colour: {s}"))?;
        let channels: Vec<u8> = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| format!("Invalid rgb channel in {s}: {e}"))?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
            _ => Err(format!("Expected three channels in {s}")),
        }
    }
}
