//! Retained map scene behind the SVG map view.
//!
//! The core drives it through [`MapSurface`]; the view reads it back to draw
//! and feeds pointer gestures in, receiving the [`MapEvent`]s that have a
//! subscribed listener.

use std::collections::BTreeMap;

use geopal_shared::config::MapConfig;
use geopal_shared::models::{Dataset, InfoContent, LatLng, MarkerStyle, Polygon, SharedStyle};
use geopal_shared::session::Session;
use geopal_shared::surface::{EventKind, ListenerId, MapEvent, MapSurface, OverlayId, ToolId};

use crate::notices::NoticeBoard;
use crate::projection::Viewport;

pub type AppSession = Session<SceneSurface, NoticeBoard>;

/// Initial container size used until the element has been measured.
pub const DEFAULT_SIZE: (f64, f64) = (960.0, 640.0);

#[derive(Debug, Clone, PartialEq)]
pub struct InfoWindow {
    pub anchor: LatLng,
    pub offset: (i32, i32),
    pub content: InfoContent,
}

#[derive(Debug, Default)]
struct LassoTool {
    draft: Vec<LatLng>,
}

pub struct SceneSurface {
    container: String,
    next_id: u64,
    pub viewport: Viewport,
    dataset: Option<Dataset>,
    style: Option<SharedStyle>,
    tools: BTreeMap<ToolId, LassoTool>,
    attached: Option<ToolId>,
    listeners: BTreeMap<ListenerId, EventKind>,
    overlays: BTreeMap<OverlayId, Polygon>,
    info: Option<InfoWindow>,
}

impl SceneSurface {
    pub fn new(container: &str, view: &MapConfig) -> Self {
        let (width, height) = DEFAULT_SIZE;
        SceneSurface {
            container: container.to_string(),
            next_id: 0,
            viewport: Viewport::new(view.location, f64::from(view.zoom), width, height),
            dataset: None,
            style: None,
            tools: BTreeMap::new(),
            attached: None,
            listeners: BTreeMap::new(),
            overlays: BTreeMap::new(),
            info: None,
        }
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn is_subscribed(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// The style as currently held, read through the shared handle.
    pub fn marker_style(&self) -> MarkerStyle {
        self.style
            .as_ref()
            .map(|s| s.borrow().clone())
            .unwrap_or_default()
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Polygon> {
        self.overlays.values()
    }

    pub fn info(&self) -> Option<&InfoWindow> {
        self.info.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.attached.is_some()
    }

    /// The in-progress stroke of the attached tool.
    pub fn draft(&self) -> &[LatLng] {
        self.attached
            .and_then(|tool| self.tools.get(&tool))
            .map(|t| t.draft.as_slice())
            .unwrap_or(&[])
    }

    pub fn begin_stroke(&mut self, at: LatLng) -> bool {
        let Some(tool) = self.attached.and_then(|id| self.tools.get_mut(&id)) else {
            return false;
        };
        tool.draft.clear();
        tool.draft.push(at);
        true
    }

    pub fn extend_stroke(&mut self, at: LatLng) {
        if let Some(tool) = self.attached.and_then(|id| self.tools.get_mut(&id)) {
            if !tool.draft.is_empty() {
                tool.draft.push(at);
            }
        }
    }

    /// Close the stroke into an overlay. Strokes too short to enclose
    /// anything are dropped.
    pub fn finish_stroke(&mut self) -> Option<MapEvent> {
        let tool = self.attached.and_then(|id| self.tools.get_mut(&id))?;
        let vertices = std::mem::take(&mut tool.draft);
        let polygon = Polygon::new(vertices);
        if polygon.is_degenerate() || !self.is_subscribed(EventKind::PolygonComplete) {
            return None;
        }
        let overlay = OverlayId(self.next());
        self.overlays.insert(overlay, polygon.clone());
        Some(MapEvent::PolygonComplete { overlay, polygon })
    }

    /// Right click: drop any in-progress stroke.
    pub fn cancel_gesture(&mut self) -> Option<MapEvent> {
        if let Some(tool) = self.attached.and_then(|id| self.tools.get_mut(&id)) {
            tool.draft.clear();
        }
        self.is_subscribed(EventKind::CancelGesture)
            .then_some(MapEvent::CancelGesture)
    }

    pub fn click_feature(&self, index: usize) -> Option<MapEvent> {
        self.is_subscribed(EventKind::FeatureClick)
            .then_some(MapEvent::FeatureClick { index })
    }
}

impl MapSurface for SceneSurface {
    fn render_dataset(&mut self, dataset: &Dataset) -> Result<(), String> {
        self.dataset = Some(dataset.clone());
        self.info = None;
        Ok(())
    }

    fn set_style(&mut self, style: &SharedStyle) {
        self.style = Some(style.clone());
    }

    fn create_drawing_tool(&mut self) -> ToolId {
        let id = ToolId(self.next());
        self.tools.insert(id, LassoTool::default());
        id
    }

    fn attach_tool(&mut self, tool: ToolId) {
        if self.tools.contains_key(&tool) {
            self.attached = Some(tool);
        }
    }

    fn detach_tool(&mut self, tool: ToolId) {
        if self.attached == Some(tool) {
            self.attached = None;
        }
        self.tools.remove(&tool);
    }

    fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        self.overlays.remove(&overlay);
    }

    fn close_info_window(&mut self) {
        self.info = None;
    }

    fn open_info_window(&mut self, anchor: LatLng, offset: (i32, i32), content: InfoContent) {
        self.info = Some(InfoWindow {
            anchor,
            offset,
            content,
        });
    }
}
