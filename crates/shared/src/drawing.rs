//! Lasso drawing mode.
//!
//! ```text
//! Idle --enable--> Drawing
//! Drawing --cancel gesture | empty result | results closed--> Idle
//! Drawing --polygon complete (non-empty)--> Drawing, awaiting results close
//! ```

use crate::map_state::MapState;
use crate::models::{Feature, Polygon};
use crate::selection::compute_selection;
use crate::surface::{EventKind, ListenerId, MapSurface, OverlayId, ToolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingState {
    Idle,
    Drawing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveTool {
    tool: ToolId,
    on_cancel: ListenerId,
    on_complete: ListenerId,
}

/// What a completed polygon turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// Features inside the polygon; the selection stays on the map.
    Selected(Vec<Feature>),
    /// Nothing inside; the selection was torn down and the controller is idle.
    Empty,
    /// No drawing tool was active, the overlay was discarded.
    Ignored,
}

#[derive(Debug, Default)]
pub struct DrawingController {
    active: Option<ActiveTool>,
}

impl DrawingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawingState {
        match self.active {
            Some(_) => DrawingState::Drawing,
            None => DrawingState::Idle,
        }
    }

    #[cfg(test)]
    pub fn tool(&self) -> Option<ToolId> {
        self.active.map(|a| a.tool)
    }

    /// Whether events of `kind` currently have a listener owned by this controller.
    pub fn handles(&self, kind: EventKind) -> bool {
        match (self.active, kind) {
            (Some(_), EventKind::CancelGesture | EventKind::PolygonComplete) => true,
            _ => false,
        }
    }

    pub fn enable_lasso_mode<S: MapSurface>(&mut self, map: &mut MapState<S>) {
        if self.active.is_some() {
            self.disable_lasso_mode(map);
        }

        // Always construct a fresh tool. The map widget keeps incomplete
        // polygons of a detached tool alive and shows them again on reattach.
        let surface = map.surface_mut();
        let tool = surface.create_drawing_tool();
        surface.attach_tool(tool);
        let on_cancel = surface.subscribe(EventKind::CancelGesture);
        let on_complete = surface.subscribe(EventKind::PolygonComplete);

        self.active = Some(ActiveTool {
            tool,
            on_cancel,
            on_complete,
        });
        tracing::debug!(tool = tool.0, "Lasso mode enabled");
    }

    /// Detach the tool, drop the selection and every listener attached for it.
    /// Safe to call in any state.
    pub fn disable_lasso_mode<S: MapSurface>(&mut self, map: &mut MapState<S>) {
        if let Some(active) = self.active.take() {
            let surface = map.surface_mut();
            surface.detach_tool(active.tool);
            surface.unsubscribe(active.on_cancel);
            surface.unsubscribe(active.on_complete);
            tracing::debug!(tool = active.tool.0, "Lasso mode disabled");
        }
        map.clear_selection();
    }

    pub fn on_selection_complete<S: MapSurface>(
        &mut self,
        map: &mut MapState<S>,
        overlay: OverlayId,
        polygon: Polygon,
    ) -> SelectionOutcome {
        if self.active.is_none() {
            map.surface_mut().remove_overlay(overlay);
            return SelectionOutcome::Ignored;
        }

        let features = compute_selection(map.dataset(), &polygon);
        map.set_selection(overlay, polygon);
        tracing::debug!(selected = features.len(), "Lasso selection complete");

        if features.is_empty() {
            self.disable_lasso_mode(map);
            SelectionOutcome::Empty
        } else {
            SelectionOutcome::Selected(features)
        }
    }
}
