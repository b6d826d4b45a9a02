//! Recording fakes for the surface and the dialog layer.

use std::collections::BTreeMap;

use crate::models::{Dataset, InfoContent, LatLng, SelectionRow, SharedStyle};
use crate::surface::{EventKind, ListenerId, MapSurface, NotificationSink, OverlayId, ToolId};

#[derive(Default)]
pub struct RecordingSurface {
    next_id: u64,
    pub created_tools: Vec<ToolId>,
    pub attached_tools: Vec<ToolId>,
    pub listeners: BTreeMap<ListenerId, EventKind>,
    pub removed_overlays: Vec<OverlayId>,
    pub rendered: Option<Dataset>,
    pub render_calls: usize,
    pub fail_render: Option<String>,
    pub style: Option<SharedStyle>,
    pub style_applications: usize,
    pub info: Option<(LatLng, (i32, i32), InfoContent)>,
    pub info_closes: usize,
}

impl RecordingSurface {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }
}

impl MapSurface for RecordingSurface {
    fn render_dataset(&mut self, dataset: &Dataset) -> Result<(), String> {
        self.render_calls += 1;
        if let Some(message) = &self.fail_render {
            return Err(message.clone());
        }
        self.rendered = Some(dataset.clone());
        Ok(())
    }

    fn set_style(&mut self, style: &SharedStyle) {
        self.style = Some(style.clone());
        self.style_applications += 1;
    }

    fn create_drawing_tool(&mut self) -> ToolId {
        let tool = ToolId(self.next());
        self.created_tools.push(tool);
        tool
    }

    fn attach_tool(&mut self, tool: ToolId) {
        self.attached_tools.push(tool);
    }

    fn detach_tool(&mut self, tool: ToolId) {
        self.attached_tools.retain(|t| *t != tool);
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
        self.removed_overlays.push(overlay);
    }

    fn close_info_window(&mut self) {
        self.info_closes += 1;
        self.info = None;
    }

    fn open_info_window(&mut self, anchor: LatLng, offset: (i32, i32), content: InfoContent) {
        self.info = Some((anchor, offset, content));
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub errors: Vec<(String, String)>,
    pub selections: Vec<(String, Vec<SelectionRow>)>,
}

impl NotificationSink for RecordingSink {
    fn error(&mut self, title: &str, message: &str) {
        self.errors.push((title.to_string(), message.to_string()));
    }

    fn selection(&mut self, title: &str, rows: &[SelectionRow]) {
        self.selections.push((title.to_string(), rows.to_vec()));
    }
}
