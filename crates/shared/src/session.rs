//! The per-page controller tying map state, lasso mode and dialogs together.

use crate::config::{AppOptions, Labels, MapConfig, Rgb};
use crate::drawing::{DrawingController, DrawingState, SelectionOutcome};
use crate::error::{GeopalError, Result};
use crate::map_state::MapState;
use crate::models::{MarkerStyle, SelectionRow};
use crate::surface::{EventKind, MapEvent, MapSurface, NotificationSink};
use crate::upload::{interpret_upload, UploadResponse};

pub struct Session<S, N> {
    map: MapState<S>,
    drawing: DrawingController,
    sink: N,
    labels: Labels,
}

impl<S: MapSurface, N: NotificationSink> Session<S, N> {
    /// Fails with [`GeopalError::Configuration`] before anything is built.
    pub fn init(
        options: AppOptions,
        sink: N,
        build: impl FnOnce(&str, &MapConfig) -> S,
    ) -> Result<Self> {
        let map = MapState::init(&options, build)?;
        Ok(Session {
            map,
            drawing: DrawingController::new(),
            sink,
            labels: options.labels,
        })
    }

    /// Load a raw GeoJSON document. Failures are reported to the sink and the
    /// previous dataset stays active.
    pub fn load_dataset(&mut self, raw: &str) -> Option<usize> {
        match self.map.load_dataset(raw) {
            Ok(count) => Some(count),
            Err(e) => {
                self.report_error(&e);
                None
            }
        }
    }

    pub fn handle_upload_response(&mut self, response: &UploadResponse) -> Option<usize> {
        tracing::debug!(status = response.status, bytes = response.body.len(), "Upload response");
        let loaded = interpret_upload(response).and_then(|dataset| self.map.replace_dataset(dataset));
        match loaded {
            Ok(count) => Some(count),
            Err(e) => {
                self.report_error(&e);
                None
            }
        }
    }

    /// The request never produced a response (network failure, aborted, ...).
    pub fn report_upload_failure(&mut self, reason: &str) {
        tracing::warn!(reason, "Upload failed");
        self.report_error(&GeopalError::upload_rejected(0));
    }

    pub fn report_error(&mut self, error: &GeopalError) {
        tracing::warn!(error = %error, "Reporting error");
        self.sink
            .error(&self.labels.titles.error, &error.user_message());
    }

    pub fn enable_lasso_mode(&mut self) {
        self.drawing.enable_lasso_mode(&mut self.map);
    }

    pub fn disable_lasso_mode(&mut self) {
        self.drawing.disable_lasso_mode(&mut self.map);
    }

    /// Single entry point for surface and dialog events.
    pub fn dispatch(&mut self, event: MapEvent) {
        match event {
            MapEvent::CancelGesture => {
                if self.drawing.handles(EventKind::CancelGesture) {
                    self.disable_lasso_mode();
                }
            }
            MapEvent::PolygonComplete { overlay, polygon } => {
                match self.drawing.on_selection_complete(&mut self.map, overlay, polygon) {
                    SelectionOutcome::Selected(features) => {
                        let rows: Vec<SelectionRow> = features.iter().map(SelectionRow::from).collect();
                        self.sink
                            .selection(&self.labels.titles.selection_results, &rows);
                    }
                    SelectionOutcome::Empty | SelectionOutcome::Ignored => {}
                }
            }
            MapEvent::FeatureClick { index } => {
                self.map.show_feature_info(index);
            }
            MapEvent::ResultsClosed => self.disable_lasso_mode(),
        }
    }

    pub fn set_symbol_color(&mut self, color: Rgb) -> String {
        self.map.set_symbol_color(color)
    }

    pub fn drawing_state(&self) -> DrawingState {
        self.drawing.state()
    }

    pub fn marker_style(&self) -> MarkerStyle {
        self.map.style().snapshot()
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn map(&self) -> &MapState<S> {
        &self.map
    }

    pub fn surface(&self) -> &S {
        self.map.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.map.surface_mut()
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }
}
