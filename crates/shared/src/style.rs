use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Rgb;
use crate::models::{MarkerStyle, SharedStyle};
use crate::surface::MapSurface;

/// Owns the session's single marker style and pushes changes to the surface.
#[derive(Debug)]
pub struct StyleController {
    style: SharedStyle,
}

impl StyleController {
    pub fn new(initial: MarkerStyle) -> Self {
        StyleController {
            style: Rc::new(RefCell::new(initial)),
        }
    }

    pub fn shared(&self) -> &SharedStyle {
        &self.style
    }

    pub fn snapshot(&self) -> MarkerStyle {
        self.style.borrow().clone()
    }

    pub fn apply<S: MapSurface>(&self, surface: &mut S) {
        surface.set_style(&self.style);
    }

    /// Update the stroke colour in place and re-apply the same style instance.
    /// Returns the hex string that was stored.
    pub fn set_symbol_color<S: MapSurface>(&self, surface: &mut S, color: Rgb) -> String {
        let hex = color.to_hex_string();
        self.style.borrow_mut().stroke_color = hex.clone();
        tracing::debug!(color = %hex, "Marker colour changed");
        self.apply(surface);
        hex
    }
}
