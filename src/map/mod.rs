mod colormap;
mod geometry;
mod heat;
mod projection;
mod renderer;

pub use colormap::{bubble_radius, heat_color, LinearColormap, Rgb};
pub use heat::HeatGrid;
pub use projection::{Viewport, CITY_ZOOM};
pub use renderer::{Bubble, LineString, MapLayers, MapPoint, MapRenderer, Overlay};
