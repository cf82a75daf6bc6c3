use crate::aggregate::TableOverview;
use crate::map::{LinearColormap, Overlay, Rgb};

/// Chart-ready description of one view. Pure data: the UI decides how to
/// paint it, tests inspect it directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Overview(TableOverview),
    WordCloud(WordCloud),
    Map(MapFigure),
    Bars(BarFigure),
    Lines(LineFigure),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Figure::Overview(_) => "Project Overview",
            Figure::WordCloud(w) => &w.title,
            Figure::Map(m) => &m.title,
            Figure::Bars(b) => &b.title,
            Figure::Lines(l) => &l.title,
        }
    }

    /// True when there is nothing to plot
    pub fn is_empty(&self) -> bool {
        match self {
            Figure::Overview(o) => o.rows == 0,
            Figure::WordCloud(w) => w.words.is_empty(),
            Figure::Map(m) => m.overlay.points.is_empty(),
            Figure::Bars(b) => b.categories.is_empty(),
            Figure::Lines(l) => l.series.iter().all(|s| s.points.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub weight: u64,
    /// Relative size class, 1 (smallest) to 5
    pub size: u8,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordCloud {
    pub title: String,
    /// Heaviest first
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapFigure {
    pub title: String,
    pub overlay: Overlay,
    /// Color scale shown next to the map
    pub legend: Option<LinearColormap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One color channel binding: a named series
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Rgb,
}

/// One position on the categorical axis
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub label: String,
    /// Parallel to `BarFigure::series`; None where the group has no value
    pub values: Vec<Option<f64>>,
    /// Overrides the series color (one color per category charts)
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarFigure {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub orientation: Orientation,
    /// Series stacked on top of each other rather than side by side
    pub stacked: bool,
    pub series: Vec<Series>,
    /// In display order
    pub categories: Vec<Category>,
    /// Decimal places for value labels
    pub precision: usize,
}

impl BarFigure {
    /// Value of `series` at category `idx`
    pub fn value(&self, idx: usize, series: &str) -> Option<f64> {
        let s = self.series.iter().position(|s| s.name == series)?;
        self.categories.get(idx)?.values.get(s).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

/// Shaded vertical span behind the lines
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x0: f64,
    pub x1: f64,
    pub color: Rgb,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineFigure {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub x_bounds: [f64; 2],
    /// Evenly spaced across `x_bounds`
    pub x_labels: Vec<String>,
    pub series: Vec<LineSeries>,
    pub bands: Vec<Band>,
    pub note: Option<String>,
    /// Draw point markers on top of the lines
    pub markers: bool,
}

impl LineFigure {
    /// Largest y across all series, 0 when empty
    pub fn y_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .fold(0.0, f64::max)
    }
}
