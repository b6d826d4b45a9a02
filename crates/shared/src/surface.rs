//! Seams to the outside world: the map widget and the dialog layer.

use crate::models::{Dataset, InfoContent, LatLng, Polygon, SelectionRow, SharedStyle};

/// Pixel offset applied to info popups so they sit above the marker glyph.
pub const INFO_WINDOW_OFFSET: (i32, i32) = (0, -30);

/// Handle of a drawing tool created by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolId(pub u64);

/// Handle of a listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Handle of a drawn overlay (a completed lasso polygon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

/// Event kinds a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Right click on the map while a tool is attached.
    CancelGesture,
    /// The attached drawing tool closed a polygon.
    PolygonComplete,
    /// A dataset marker was clicked.
    FeatureClick,
}

/// Events fed into `Session::dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    CancelGesture,
    PolygonComplete { overlay: OverlayId, polygon: Polygon },
    FeatureClick { index: usize },
    /// The selection results view was dismissed.
    ResultsClosed,
}

impl MapEvent {
    /// The listener kind that must be registered for this event to be handled.
    /// `ResultsClosed` comes from the dialog layer and needs none.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            MapEvent::CancelGesture => Some(EventKind::CancelGesture),
            MapEvent::PolygonComplete { .. } => Some(EventKind::PolygonComplete),
            MapEvent::FeatureClick { .. } => Some(EventKind::FeatureClick),
            MapEvent::ResultsClosed => None,
        }
    }
}

/// The map widget: owns rendering of the dataset layer, drawing tools,
/// overlays and popups.
pub trait MapSurface {
    /// Replace the dataset layer. The dataset has already been validated.
    fn render_dataset(&mut self, dataset: &Dataset) -> Result<(), String>;

    /// Apply a style to the dataset layer. The surface keeps the handle and
    /// reads through it on every render.
    fn set_style(&mut self, style: &SharedStyle);

    /// Construct a fresh polygon drawing tool. Not attached yet.
    fn create_drawing_tool(&mut self) -> ToolId;

    fn attach_tool(&mut self, tool: ToolId);

    /// Detach and forget `tool`.
    fn detach_tool(&mut self, tool: ToolId);

    fn subscribe(&mut self, kind: EventKind) -> ListenerId;

    fn unsubscribe(&mut self, listener: ListenerId);

    fn remove_overlay(&mut self, overlay: OverlayId);

    fn close_info_window(&mut self);

    fn open_info_window(&mut self, anchor: LatLng, offset: (i32, i32), content: InfoContent);
}

/// The dialog layer.
pub trait NotificationSink {
    fn error(&mut self, title: &str, message: &str);

    fn selection(&mut self, title: &str, rows: &[SelectionRow]);
}
