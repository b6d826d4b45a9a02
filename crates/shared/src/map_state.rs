use crate::config::{AppOptions, MapConfig, Rgb};
use crate::dataset::parse_dataset;
use crate::error::{GeopalError, Result};
use crate::models::{Dataset, InfoContent, Polygon};
use crate::style::StyleController;
use crate::surface::{EventKind, MapSurface, OverlayId, INFO_WINDOW_OFFSET};

/// The lasso polygon currently shown on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub overlay: OverlayId,
    pub polygon: Polygon,
}

/// Owns the map surface and everything rendered on it.
pub struct MapState<S> {
    surface: S,
    dataset: Option<Dataset>,
    style: StyleController,
    selection: Option<Selection>,
}

impl<S: MapSurface> MapState<S> {
    /// Validate `options`, then build the surface with `build(container, view)`.
    /// On invalid options `build` is never called.
    pub fn init(options: &AppOptions, build: impl FnOnce(&str, &MapConfig) -> S) -> Result<Self> {
        let container = options.validate()?;
        let mut surface = build(container, &options.map);

        let style = StyleController::new(options.marker_style.clone());
        style.apply(&mut surface);
        surface.subscribe(EventKind::FeatureClick);

        tracing::info!(
            container,
            lat = options.map.location.lat,
            lng = options.map.location.lng,
            zoom = options.map.zoom,
            "Map surface initialised"
        );

        Ok(MapState {
            surface,
            dataset: None,
            style,
            selection: None,
        })
    }

    /// Validate `raw` and make it the active dataset. On error the previous
    /// dataset stays active and nothing reaches the surface.
    pub fn load_dataset(&mut self, raw: &str) -> Result<usize> {
        let dataset = parse_dataset(raw).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected dataset");
        })?;
        self.replace_dataset(dataset)
    }

    pub fn replace_dataset(&mut self, dataset: Dataset) -> Result<usize> {
        self.surface
            .render_dataset(&dataset)
            .map_err(GeopalError::MalformedDataset)?;
        let count = dataset.len();
        self.dataset = Some(dataset);
        tracing::info!(features = count, "Dataset loaded");
        Ok(count)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Take ownership of a completed polygon, replacing any previous one.
    pub fn set_selection(&mut self, overlay: OverlayId, polygon: Polygon) {
        self.clear_selection();
        self.selection = Some(Selection { overlay, polygon });
    }

    /// Remove the selection overlay from the surface. Returns whether there was one.
    pub fn clear_selection(&mut self) -> bool {
        match self.selection.take() {
            Some(selection) => {
                self.surface.remove_overlay(selection.overlay);
                true
            }
            None => false,
        }
    }

    /// Open the popup for the feature at `index`.
    pub fn show_feature_info(&mut self, index: usize) -> bool {
        if !self.style.shared().borrow().clickable {
            return false;
        }
        let Some(feature) = self.dataset.as_ref().and_then(|d| d.get(index)) else {
            tracing::debug!(index, "Click on unknown feature");
            return false;
        };
        let anchor = feature.position();
        let content = InfoContent::from(feature);

        self.surface.close_info_window();
        self.surface
            .open_info_window(anchor, INFO_WINDOW_OFFSET, content);
        true
    }

    pub fn set_symbol_color(&mut self, color: Rgb) -> String {
        self.style.set_symbol_color(&mut self.surface, color)
    }

    pub fn style(&self) -> &StyleController {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
