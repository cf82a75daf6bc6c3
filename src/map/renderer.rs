use crate::braille::BrailleCanvas;
use crate::map::colormap::Rgb;
use crate::map::geometry::{draw_circle, draw_line, draw_marker};
use crate::map::heat::HeatGrid;
use crate::map::projection::Viewport;
use serde::Serialize;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Heat splat radius in character columns
const HEAT_RADIUS: i32 = 6;
const MARKER_COLOR: Rgb = (49, 135, 212);

/// Circle drawn for a point in the bubble view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bubble {
    /// Radius in braille pixels
    pub radius: u32,
    pub color: Rgb,
}

/// A weighted point to place on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub label: String,
    pub lon: f64,
    pub lat: f64,
    pub weight: u64,
    /// Text shown next to the point when labels are on
    pub popup: Option<String>,
    pub bubble: Option<Bubble>,
}

/// Point layers drawn over the basemap
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    /// Weighted density layer
    pub heat: bool,
    /// Cross marker at every point
    pub markers: bool,
    pub points: Vec<MapPoint>,
}

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_basemap: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_basemap: true,
            show_labels: true,
        }
    }
}

/// Everything the UI needs to paint one map frame
pub struct MapLayers {
    pub basemap: BrailleCanvas,
    /// Colored bubbles and markers
    pub shapes: BrailleCanvas,
    pub heat: Option<HeatGrid>,
    /// (column, row, text) in character coordinates
    pub labels: Vec<(u16, u16, String)>,
}

/// Map renderer: basemap outlines plus a point overlay
pub struct MapRenderer {
    pub basemap: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            basemap: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    /// Render basemap and overlay for a `width` x `height` character area
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport, overlay: &Overlay) -> MapLayers {
        let mut layers = MapLayers {
            basemap: BrailleCanvas::new(width, height),
            shapes: BrailleCanvas::new(width, height),
            heat: None,
            labels: Vec::new(),
        };

        if self.settings.show_basemap {
            for line in &self.basemap {
                draw_linestring(&mut layers.basemap, line, viewport);
            }
        }

        if overlay.heat {
            let mut grid = HeatGrid::new(width, height);
            for point in &overlay.points {
                let (px, py) = viewport.project(point.lon, point.lat);
                grid.splat(px / 2, py / 4, point.weight as f64, HEAT_RADIUS);
            }
            layers.heat = Some(grid);
        }

        for point in &overlay.points {
            let (px, py) = viewport.project(point.lon, point.lat);
            let reach = point.bubble.map_or(4, |b| b.radius as i32);
            if !viewport.is_visible(px, py, reach) {
                continue;
            }

            if let Some(bubble) = point.bubble {
                draw_circle(&mut layers.shapes, px, py, bubble.radius as i32, bubble.color);
            }
            if overlay.markers {
                draw_marker(&mut layers.shapes, px, py, 2, MARKER_COLOR);
            }

            // Label sits two cells right of the point
            if self.settings.show_labels && px >= 0 && py >= 0 {
                if let Some(text) = &point.popup {
                    let char_x = (px / 2) as u16;
                    let char_y = (py / 4) as u16;
                    if let Some(label_x) = char_x.checked_add(2) {
                        layers.labels.push((label_x, char_y, text.clone()));
                    }
                }
            }
        }

        layers
    }

    /// Add a basemap line
    pub fn add_line(&mut self, line: LineString) {
        self.basemap.push(line);
    }

    /// Check if any basemap data is loaded
    pub fn has_data(&self) -> bool {
        !self.basemap.is_empty()
    }

    pub fn toggle_basemap(&mut self) {
        self.settings.show_basemap = !self.settings.show_basemap;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            if viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}
