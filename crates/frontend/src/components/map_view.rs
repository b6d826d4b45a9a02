use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use geopal_shared::models::{LatLng, MarkerStyle};
use geopal_shared::surface::{MapEvent, MapSurface};

use crate::projection::{client_to_container, Viewport};
use crate::surface::{AppSession, SceneSurface};

/// Container id used when the page embeds no init options.
pub const MAP_CONTAINER_ID: &str = "geopal-map";

/// Drag threshold in pixels: movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Minimum screen distance between two recorded lasso vertices.
const STROKE_STEP: f64 = 4.0;

/// Click distance (screen pixels) within which a marker counts as hit.
const HIT_RADIUS: f64 = 16.0;

/// Zoom levels per wheel notch.
const ZOOM_STEP: f64 = 0.25;

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Get the bounding client rect of the map container element.
fn container_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Match the viewport to the live container size and return the
/// container-relative position of a client point.
fn sync_viewport(surface: &mut SceneSurface, client_x: f64, client_y: f64) -> (f64, f64) {
    match container_rect(surface.container()) {
        Some(rect) => {
            surface.viewport.width = rect.width();
            surface.viewport.height = rect.height();
            client_to_container(client_x, client_y, rect.left(), rect.top())
        }
        None => (client_x, client_y),
    }
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Find the index of the nearest position within `threshold` (Euclidean distance).
fn find_nearest(positions: &[(f64, f64)], click: (f64, f64), threshold: f64) -> Option<usize> {
    let mut best_idx = None;
    let mut best_dist = threshold;
    for (i, pos) in positions.iter().enumerate() {
        let d = point_distance(*pos, click);
        if d < best_dist {
            best_dist = d;
            best_idx = Some(i);
        }
    }
    best_idx
}

/// Screen positions of every dataset feature, in dataset order.
fn feature_positions(surface: &SceneSurface, view: &Viewport) -> Vec<(f64, f64)> {
    surface
        .dataset()
        .map(|d| d.features().iter().map(|f| view.to_screen(f.position())).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// SVG builder
// ---------------------------------------------------------------------------

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn build_svg_content(surface: &SceneSurface, view: &Viewport) -> String {
    let mut svg = String::with_capacity(8192);
    build_graticule(&mut svg, view);
    for polygon in surface.overlays() {
        build_ring(&mut svg, &polygon.vertices, view, true);
    }
    build_ring(&mut svg, surface.draft(), view, false);
    build_markers(&mut svg, &feature_positions(surface, view), &surface.marker_style());
    svg
}

fn build_graticule(svg: &mut String, view: &Viewport) {
    let step = view.graticule_step();
    let top_left = view.to_latlng(0.0, 0.0);
    let bottom_right = view.to_latlng(view.width, view.height);
    let (w, h) = (view.width, view.height);

    let mut lng = (top_left.lng / step).floor() * step;
    while lng <= bottom_right.lng {
        let (x, _) = view.to_screen(LatLng::new(top_left.lat, lng));
        svg.push_str(&format!(
            r##"<line x1="{x}" y1="0" x2="{x}" y2="{h}" stroke="rgba(0,0,0,0.08)" stroke-width="1"/>"##
        ));
        lng += step;
    }
    let mut lat = (bottom_right.lat / step).floor() * step;
    while lat <= top_left.lat {
        let (_, y) = view.to_screen(LatLng::new(lat, top_left.lng));
        svg.push_str(&format!(
            r##"<line x1="0" y1="{y}" x2="{w}" y2="{y}" stroke="rgba(0,0,0,0.08)" stroke-width="1"/>"##
        ));
        lat += step;
    }
}

fn build_ring(svg: &mut String, vertices: &[LatLng], view: &Viewport, closed: bool) {
    if vertices.len() < 2 {
        return;
    }
    let points: Vec<String> = vertices
        .iter()
        .map(|v| {
            let (x, y) = view.to_screen(*v);
            format!("{x:.1},{y:.1}")
        })
        .collect();
    let points = points.join(" ");
    if closed {
        svg.push_str(&format!(
            r##"<polygon points="{points}" fill="rgba(30,144,255,0.18)" stroke="#1e90ff" stroke-width="2"/>"##
        ));
    } else {
        svg.push_str(&format!(
            r##"<polyline points="{points}" fill="none" stroke="#1e90ff" stroke-width="2" stroke-dasharray="6 4"/>"##
        ));
    }
}

fn build_markers(svg: &mut String, positions: &[(f64, f64)], style: &MarkerStyle) {
    let color = escape_attr(&style.stroke_color);
    let sw = style.stroke_weight;
    let scale = style.scale;
    let outline = style.path.outline();

    for &(x, y) in positions {
        if outline.is_empty() {
            svg.push_str(&format!(
                r##"<circle cx="{x:.1}" cy="{y:.1}" r="{scale}" fill="none" stroke="{color}" stroke-width="{sw}"/>"##
            ));
            continue;
        }
        let points: Vec<String> = outline
            .iter()
            .map(|(ux, uy)| format!("{:.1},{:.1}", x + ux * scale, y + uy * scale))
            .collect();
        let points = points.join(" ");
        let tag = if style.path.is_closed() { "polygon" } else { "polyline" };
        svg.push_str(&format!(
            r##"<{tag} points="{points}" fill="none" stroke="{color}" stroke-width="{sw}" stroke-linejoin="round"/>"##
        ));
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(session: Signal<Option<AppSession>>) -> Element {
    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut is_stroking = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut last_pos = use_signal(|| (0.0_f64, 0.0_f64));

    let guard = session.read();
    let Some(app) = guard.as_ref() else {
        return rsx! {};
    };
    let surface = app.surface();
    let mut view = surface.viewport;
    let container_id = surface.container().to_string();
    if let Some(rect) = container_rect(&container_id) {
        view.width = rect.width();
        view.height = rect.height();
    }
    let svg_content = build_svg_content(surface, &view);
    let svg_html = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" style="position:absolute;top:0;left:0;pointer-events:none;">{svg_content}</svg>"#
    );
    let popup = surface.info().map(|info| {
        let (x, y) = view.to_screen(info.anchor);
        (
            x + f64::from(info.offset.0),
            y + f64::from(info.offset.1),
            info.content.clone(),
        )
    });
    let container_class = if surface.is_drawing() {
        "map-container lasso-mode"
    } else if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else {
        "map-container"
    };
    drop(guard);

    rsx! {
        div {
            id: "{container_id}",
            class: "{container_class}",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let delta_y = wheel_delta_y(evt.data().delta());
                let client = evt.data().client_coordinates();
                let mut guard = session.write();
                let Some(app) = guard.as_mut() else { return };
                let surface = app.surface_mut();
                let (cx, cy) = sync_viewport(surface, client.x, client.y);
                let view = &mut surface.viewport;
                let step = if delta_y < 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
                let zoom = view.zoom + step;
                view.zoom_at(cx, cy, zoom);
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                let mut guard = session.write();
                let Some(app) = guard.as_mut() else { return };
                let surface = app.surface_mut();
                let pos = sync_viewport(surface, client.x, client.y);
                drag_start.set(pos);
                last_pos.set(pos);

                if surface.is_drawing() {
                    let at = surface.viewport.to_latlng(pos.0, pos.1);
                    is_stroking.set(surface.begin_stroke(at));
                } else {
                    is_dragging.set(true);
                    did_drag.set(false);
                }
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() && !*is_stroking.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let mut guard = session.write();
                let Some(app) = guard.as_mut() else { return };
                let surface = app.surface_mut();
                let pos = sync_viewport(surface, client.x, client.y);
                let last = *last_pos.read();

                if *is_stroking.read() {
                    if point_distance(pos, last) >= STROKE_STEP {
                        let at = surface.viewport.to_latlng(pos.0, pos.1);
                        surface.extend_stroke(at);
                        last_pos.set(pos);
                    }
                    return;
                }

                if !*did_drag.read() && point_distance(pos, *drag_start.read()) > DRAG_THRESHOLD {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    surface.viewport.pan_by(pos.0 - last.0, pos.1 - last.1);
                    last_pos.set(pos);
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                let was_stroking = *is_stroking.read();
                is_dragging.set(false);
                is_stroking.set(false);

                let client = evt.client_coordinates();
                let mut guard = session.write();
                let Some(app) = guard.as_mut() else { return };

                let event = if was_stroking {
                    app.surface_mut().finish_stroke()
                } else if was_dragging && !was_drag {
                    // A mouseup without drag movement = a click
                    let surface = app.surface_mut();
                    let click = sync_viewport(surface, client.x, client.y);
                    let view = surface.viewport;
                    let positions = feature_positions(surface, &view);
                    find_nearest(&positions, click, HIT_RADIUS)
                        .and_then(|index| surface.click_feature(index))
                } else {
                    None
                };
                if let Some(event) = event {
                    app.dispatch(event);
                }
            },

            oncontextmenu: move |evt: Event<MouseData>| {
                evt.prevent_default();
                is_stroking.set(false);
                let mut guard = session.write();
                let Some(app) = guard.as_mut() else { return };
                if let Some(event) = app.surface_mut().cancel_gesture() {
                    app.dispatch(event);
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            div {
                class: "map-overlay",
                dangerous_inner_html: "{svg_html}",
            }

            if let Some((x, y, content)) = popup {
                div {
                    class: "info-window",
                    style: "left: {x}px; top: {y}px;",
                    onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                    onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
                    button {
                        class: "info-close",
                        onclick: move |_| {
                            if let Some(app) = session.write().as_mut() {
                                app.surface_mut().close_info_window();
                            }
                        },
                        "×"
                    }
                    div { class: "info-name", "{content.name}" }
                    div { class: "info-address", "{content.address}" }
                }
            }
        }
    }
}

/// Dispatch an event that did not originate on the map surface.
pub fn dispatch(mut session: Signal<Option<AppSession>>, event: MapEvent) {
    if let Some(app) = session.write().as_mut() {
        app.dispatch(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopal_shared::config::MapConfig;
    use geopal_shared::models::{Dataset, Feature, SymbolPath};
    use geopal_shared::surface::{EventKind, OverlayId};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view() -> Viewport {
        Viewport::new(LatLng::new(0.0, 0.0), 10.0, 800.0, 600.0)
    }

    #[test]
    fn test_find_nearest_within_threshold() {
        let positions = vec![(100.0, 100.0), (200.0, 200.0)];
        assert_eq!(find_nearest(&positions, (101.0, 101.0), 16.0), Some(0));
        assert_eq!(find_nearest(&positions, (199.0, 199.0), 16.0), Some(1));
    }

    #[test]
    fn test_find_nearest_outside_threshold() {
        let positions = vec![(100.0, 100.0)];
        assert_eq!(find_nearest(&positions, (200.0, 200.0), 16.0), None);
    }

    #[test]
    fn test_find_nearest_picks_closest() {
        let positions = vec![(100.0, 100.0), (110.0, 110.0)];
        assert_eq!(find_nearest(&positions, (108.0, 108.0), 30.0), Some(1));
        assert_eq!(find_nearest(&positions, (102.0, 102.0), 30.0), Some(0));
    }

    #[test]
    fn test_markers_follow_style() {
        let mut svg = String::new();
        let style = MarkerStyle::default();
        build_markers(&mut svg, &[(400.0, 300.0)], &style);
        assert!(svg.starts_with("<polygon"));
        assert!(svg.contains(r##"stroke="#ff0000""##));
        assert!(svg.contains(r#"stroke-width="6""#));
        // Backward arrow tip points down: (0, 2) * scale 5
        assert!(svg.contains("400.0,310.0"));
    }

    #[test]
    fn test_circle_and_open_markers() {
        let mut svg = String::new();
        let mut style = MarkerStyle {
            path: SymbolPath::Circle,
            ..MarkerStyle::default()
        };
        build_markers(&mut svg, &[(10.0, 10.0)], &style);
        assert!(svg.starts_with("<circle"));

        svg.clear();
        style.path = SymbolPath::ForwardOpenArrow;
        build_markers(&mut svg, &[(10.0, 10.0)], &style);
        assert!(svg.starts_with("<polyline"));
    }

    #[test]
    fn test_stroke_color_is_escaped() {
        let mut svg = String::new();
        let style = MarkerStyle {
            stroke_color: r#"red"/><script>"#.to_string(),
            ..MarkerStyle::default()
        };
        build_markers(&mut svg, &[(0.0, 0.0)], &style);
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn test_ring_needs_two_vertices() {
        let mut svg = String::new();
        build_ring(&mut svg, &[LatLng::new(0.0, 0.0)], &view(), false);
        assert!(svg.is_empty());
        build_ring(&mut svg, &[LatLng::new(0.0, 0.0), LatLng::new(0.1, 0.1)], &view(), false);
        assert!(svg.starts_with("<polyline"));
    }

    #[test]
    fn test_scene_svg_includes_overlay_and_markers() {
        let mut surface = SceneSurface::new("map", &MapConfig::default());
        surface
            .render_dataset(&Dataset::new(vec![Feature::new([-6.26301, 53.3443322])]))
            .unwrap();
        surface.set_style(&Rc::new(RefCell::new(MarkerStyle::default())));
        let tool = surface.create_drawing_tool();
        surface.attach_tool(tool);
        let _ = surface.subscribe(EventKind::PolygonComplete);
        let center = surface.viewport.center;
        surface.begin_stroke(LatLng::new(center.lat - 0.001, center.lng - 0.001));
        surface.extend_stroke(LatLng::new(center.lat - 0.001, center.lng + 0.001));
        surface.extend_stroke(LatLng::new(center.lat + 0.001, center.lng + 0.001));
        let event = surface.finish_stroke();
        assert!(matches!(event, Some(MapEvent::PolygonComplete { overlay: OverlayId(_), .. })));

        let view = surface.viewport;
        let svg = build_svg_content(&surface, &view);
        assert!(svg.contains("<polygon points=") && svg.contains("rgba(30,144,255,0.18)"));
        assert_eq!(feature_positions(&surface, &view).len(), 1);
    }

    #[test]
    fn test_feature_positions_centre_feature() {
        let mut surface = SceneSurface::new("map", &MapConfig::default());
        surface
            .render_dataset(&Dataset::new(vec![Feature::new([-6.26301, 53.3443322])]))
            .unwrap();
        let positions = feature_positions(&surface, &surface.viewport);
        let (x, y) = positions[0];
        assert!((x - 480.0).abs() < 1e-6);
        assert!((y - 320.0).abs() < 1e-6);
    }
}
