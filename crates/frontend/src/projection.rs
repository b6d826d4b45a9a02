use std::f64::consts::PI;

use geopal_shared::models::LatLng;

/// Width of the projected world at zoom 0, in pixels.
pub const TILE_SIZE: f64 = 256.0;
/// Latitude at which Web-Mercator turns the world into a square.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

pub const ZOOM_MIN: f64 = 2.0;
pub const ZOOM_MAX: f64 = 20.0;

pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Web-Mercator world pixel coordinates of `p` at `zoom`.
pub fn project(p: LatLng, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (p.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

pub fn unproject(x: f64, y: f64, zoom: f64) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    LatLng::new(n.sinh().atan().to_degrees(), lng)
}

fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// What part of the world the map container shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Viewport {
            center,
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
            width,
            height,
        }
    }

    /// Container pixel position of `p`.
    pub fn to_screen(&self, p: LatLng) -> (f64, f64) {
        let (cx, cy) = project(self.center, self.zoom);
        let (x, y) = project(p, self.zoom);
        (x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    pub fn to_latlng(&self, screen_x: f64, screen_y: f64) -> LatLng {
        let (cx, cy) = project(self.center, self.zoom);
        unproject(
            cx + screen_x - self.width / 2.0,
            cy + screen_y - self.height / 2.0,
            self.zoom,
        )
    }

    /// Move the map content by a screen delta (drag direction).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = project(self.center, self.zoom);
        let center = unproject(cx - dx, cy - dy, self.zoom);
        self.center = LatLng::new(center.lat, wrap_lng(center.lng));
    }

    /// Change zoom keeping the point under the cursor fixed on screen.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, new_zoom: f64) {
        let new_zoom = new_zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        if (new_zoom - self.zoom).abs() < 1e-9 {
            return;
        }
        let anchor = self.to_latlng(screen_x, screen_y);
        self.zoom = new_zoom;
        let (ax, ay) = self.to_screen(anchor);
        self.pan_by(screen_x - ax, screen_y - ay);
    }

    /// Spacing in degrees of the background graticule, at least 100px apart.
    pub fn graticule_step(&self) -> f64 {
        let px_per_degree = world_size(self.zoom) / 360.0;
        GRATICULE_STEPS
            .iter()
            .copied()
            .find(|step| step * px_per_degree >= 100.0)
            .unwrap_or(30.0)
    }
}

const GRATICULE_STEPS: [f64; 15] = [
    0.0001, 0.0002, 0.0005, 0.001, 0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 5.0, 10.0,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_client_to_container_offset() {
        let (x, y) = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!(close(x, 130.0));
        assert!(close(y, 300.0));
    }

    #[test]
    fn test_origin_projects_to_world_centre() {
        let (x, y) = project(LatLng::new(0.0, 0.0), 0.0);
        assert!(close(x, 128.0));
        assert!(close(y, 128.0));
    }

    #[test]
    fn test_project_unproject_dublin() {
        let dublin = LatLng::new(53.3443322, -6.26301);
        let (x, y) = project(dublin, 15.0);
        let back = unproject(x, y, 15.0);
        assert!(close(back.lat, dublin.lat));
        assert!(close(back.lng, dublin.lng));
    }

    #[test]
    fn test_north_is_up() {
        let (_, y_north) = project(LatLng::new(10.0, 0.0), 3.0);
        let (_, y_south) = project(LatLng::new(-10.0, 0.0), 3.0);
        assert!(y_north < y_south);
    }

    #[test]
    fn test_center_is_middle_of_container() {
        let view = Viewport::new(LatLng::new(53.34, -6.26), 15.0, 800.0, 600.0);
        let (x, y) = view.to_screen(view.center);
        assert!(close(x, 400.0));
        assert!(close(y, 300.0));
        let back = view.to_latlng(400.0, 300.0);
        assert!(close(back.lat, 53.34));
    }

    #[test]
    fn test_pan_moves_content_with_drag() {
        let mut view = Viewport::new(LatLng::new(0.0, 0.0), 5.0, 800.0, 600.0);
        let p = view.to_latlng(100.0, 100.0);
        view.pan_by(50.0, -20.0);
        let (x, y) = view.to_screen(p);
        assert!(close(x, 150.0));
        assert!(close(y, 80.0));
    }

    #[test]
    fn test_zoom_at_keeps_cursor_point() {
        let mut view = Viewport::new(LatLng::new(53.34, -6.26), 12.0, 800.0, 600.0);
        let under_cursor = view.to_latlng(650.0, 120.0);
        view.zoom_at(650.0, 120.0, 13.5);
        let (x, y) = view.to_screen(under_cursor);
        assert!((x - 650.0).abs() < 1e-3);
        assert!((y - 120.0).abs() < 1e-3);
        assert!(close(view.zoom, 13.5));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = Viewport::new(LatLng::new(0.0, 0.0), 30.0, 800.0, 600.0);
        assert!(close(view.zoom, ZOOM_MAX));
        view.zoom_at(0.0, 0.0, -4.0);
        assert!(close(view.zoom, ZOOM_MIN));
    }

    #[test]
    fn test_pan_wraps_longitude() {
        let mut view = Viewport::new(LatLng::new(0.0, 179.0), 2.0, 800.0, 600.0);
        view.pan_by(-world_size(2.0) / 360.0 * 4.0, 0.0);
        assert!(close(view.center.lng, -177.0));
    }

    #[test]
    fn test_graticule_step_shrinks_with_zoom() {
        let far = Viewport::new(LatLng::new(0.0, 0.0), 3.0, 800.0, 600.0);
        let near = Viewport::new(LatLng::new(0.0, 0.0), 15.0, 800.0, 600.0);
        assert!(near.graticule_step() < far.graticule_step());
        let px = near.graticule_step() * world_size(15.0) / 360.0;
        assert!(px >= 100.0, "{px}");
    }
}
