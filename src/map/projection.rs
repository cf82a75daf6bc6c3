use std::f64::consts::PI;

/// Zoom level that frames lower Manhattan and the bridges on a typical terminal
pub const CITY_ZOOM: f64 = 1800.0;
const MIN_ZOOM: f64 = 200.0;
const MAX_ZOOM: f64 = 40_000.0;
const ZOOM_STEP: f64 = 1.5;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level: canvas widths per full 360° of longitude
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Default city view centered on `center` (lon, lat)
    pub fn city(center: (f64, f64), width: usize, height: usize) -> Self {
        Self::new(center.0, center.1, CITY_ZOOM, width, height)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let (lon, lat) = self.unproject(
            self.width as i32 / 2 + dx,
            self.height as i32 / 2 + dy,
        );
        self.center_lon = lon;
        self.center_lat = lat.clamp(-85.0, 85.0);

        // Wrap longitude
        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom by factor, keeping the geographic point under (px, py) fixed
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);

        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width.max(1) as f64
    }

    /// Center in normalized Web Mercator coordinates
    fn center_xy(&self) -> (f64, f64) {
        mercator(self.center_lon, self.center_lat)
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.scale();
        let (center_x, center_y) = self.center_xy();

        let x = (px as f64 - self.width as f64 / 2.0) / scale + center_x;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + center_y;

        let lon = x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

        (lon, lat)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (x, y) = mercator(lon, lat);
        let (center_x, center_y) = self.center_xy();
        let scale = self.scale();

        let px = ((x - center_x) * scale + self.width as f64 / 2.0).round() as i32;
        let py = ((y - center_y) * scale + self.height as f64 / 2.0).round() as i32;

        (px, py)
    }

    /// Check if a projected point is visible in the viewport (with margin
    /// so partially visible bubbles still draw)
    pub fn is_visible(&self, px: i32, py: i32, margin: i32) -> bool {
        px >= -margin
            && px < self.width as i32 + margin
            && py >= -margin
            && py < self.height as i32 + margin
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0
            && min_x < self.width as i32
            && max_y >= 0
            && min_y < self.height as i32
    }
}

/// Web Mercator, normalized to [0, 1] on both axes
fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::city((-73.985, 40.758), 100, 80);
        assert_eq!(vp.project(-73.985, 40.758), (50, 40));
    }

    #[test]
    fn test_roundtrip_near_center() {
        let vp = Viewport::city((-73.985, 40.758), 200, 160);
        let (px, py) = vp.project(-73.99635, 40.70563);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon + 73.99635).abs() < 0.005);
        assert!((lat - 40.70563).abs() < 0.005);
    }

    #[test]
    fn test_east_is_right_north_is_up() {
        let vp = Viewport::city((-73.985, 40.758), 200, 160);
        let (cx, cy) = vp.project(-73.985, 40.758);
        let (ex, _) = vp.project(-73.95, 40.758);
        let (_, ny) = vp.project(-73.985, 40.80);
        assert!(ex > cx);
        assert!(ny < cy);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::city((-73.985, 40.758), 200, 160);
        vp.pan(10, 0);
        assert!(vp.center_lon > -73.985);
        vp.pan(0, 10);
        assert!(vp.center_lat < 40.758);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut vp = Viewport::city((-73.985, 40.758), 200, 160);
        let before = vp.unproject(30, 20);
        vp.zoom_in_at(30, 20);
        let after = vp.unproject(30, 20);
        assert!((before.0 - after.0).abs() < 0.01);
        assert!((before.1 - after.1).abs() < 0.01);
        assert!(vp.zoom > CITY_ZOOM);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::city((-73.985, 40.758), 200, 160);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
    }
}
