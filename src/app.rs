use crate::data::EntryTable;
use crate::geocode::MAP_CENTER;
use crate::map::{MapRenderer, Viewport, CITY_ZOOM};
use crate::present::{Figure, Section, Selection};
use crate::ui;
use ratatui::layout::Rect;

/// Application state
pub struct App {
    /// Working table every view is computed from
    pub table: EntryTable,
    pub selection: Selection,
    /// Figure for the current selection
    pub figure: Figure,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    /// Insights panel drawn over the figure
    pub show_insights: bool,
    pub insights_scroll: u16,
    /// Terminal size
    screen: Rect,
}

impl App {
    pub fn new(table: EntryTable, selection: Selection, width: u16, height: u16) -> Self {
        let screen = Rect::new(0, 0, width, height);
        let map = ui::figure_inner(screen);
        // Braille gives 2x4 resolution per character
        let viewport = Viewport::city(MAP_CENTER, map.width as usize * 2, map.height as usize * 4);
        let figure = selection.build(&table);

        Self {
            table,
            selection,
            figure,
            viewport,
            map_renderer: MapRenderer::new(),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            show_insights: false,
            insights_scroll: 0,
            screen,
        }
    }

    pub fn with_basemap(mut self, renderer: MapRenderer) -> Self {
        self.map_renderer = renderer;
        self
    }

    /// Rebuild the figure after the selection changed
    fn recompute(&mut self) {
        self.figure = self.selection.build(&self.table);
        self.insights_scroll = 0;
    }

    pub fn select_section(&mut self, section: Section) {
        if section != self.selection.section {
            self.selection.select_section(section);
            self.recompute();
        }
    }

    pub fn next_section(&mut self) {
        self.select_section(self.selection.section.next());
    }

    pub fn prev_section(&mut self) {
        self.select_section(self.selection.section.prev());
    }

    pub fn next_view(&mut self) {
        let before = self.selection;
        self.selection.next_view();
        if self.selection != before {
            self.recompute();
        }
    }

    pub fn prev_view(&mut self) {
        let before = self.selection;
        self.selection.prev_view();
        if self.selection != before {
            self.recompute();
        }
    }

    /// True when the current figure is a map, so pan/zoom apply
    pub fn is_map(&self) -> bool {
        matches!(self.figure, Figure::Map(_))
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        let map = ui::figure_inner(self.screen);
        self.viewport.width = map.width as usize * 2;
        self.viewport.height = map.height as usize * 4;
    }

    /// Pan the map
    pub fn pan(&mut self, dx: i32, dy: i32) {
        if self.is_map() {
            self.viewport.pan(dx, dy);
        }
    }

    pub fn zoom_in(&mut self) {
        if self.is_map() {
            self.viewport.zoom_in();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.is_map() {
            self.viewport.zoom_out();
        }
    }

    /// Convert a terminal cell to braille pixel coordinates inside the map,
    /// or None when the cell is outside it
    fn to_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        if !self.is_map() {
            return None;
        }
        let map = ui::figure_inner(self.screen);
        if col < map.x || row < map.y || col >= map.right() || row >= map.bottom() {
            return None;
        }
        // Each terminal cell is 2 braille pixels wide, 4 tall
        Some(((col - map.x) as i32 * 2, (row - map.y) as i32 * 4))
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.to_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.to_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Back to the default city view
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::city(MAP_CENTER, self.viewport.width, self.viewport.height);
    }

    pub fn toggle_insights(&mut self) {
        self.show_insights = !self.show_insights;
        self.insights_scroll = 0;
    }

    /// Scroll the insights panel by `delta` lines, never above the top
    pub fn scroll_insights(&mut self, delta: i32) {
        self.insights_scroll = (self.insights_scroll as i32 + delta).clamp(0, u16::MAX as i32) as u16;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level relative to the default view
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom / CITY_ZOOM)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.3}°{}, {:.3}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Left click: select a section from the sidebar, or start a map drag
    pub fn click(&mut self, col: u16, row: u16) {
        let sidebar = ui::layout(self.screen).sidebar;
        if col >= sidebar.x && col < sidebar.right() && row > sidebar.y {
            if let Some(section) = Section::from_number((row - sidebar.y) as usize) {
                self.select_section(section);
            }
            return;
        }
        self.last_mouse = Some((col, row));
    }

    /// Handle mouse drag: the map follows the pointer
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            self.pan(dx * 2, dy * 4);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Get mouse position in braille pixel coordinates (for rendering marker)
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.and_then(|(col, row)| self.to_pixel(col, row))
    }
}
