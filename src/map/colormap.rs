/// 24-bit color as (r, g, b)
pub type Rgb = (u8, u8, u8);

pub const BLUE: Rgb = (0, 0, 255);
pub const PURPLE: Rgb = (128, 0, 128);
pub const ORANGE: Rgb = (255, 165, 0);
pub const RED: Rgb = (255, 0, 0);

/// Piecewise-linear gradient through evenly spaced color stops,
/// scaled to the value range `[vmin, vmax]`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearColormap {
    pub stops: Vec<Rgb>,
    pub vmin: f64,
    pub vmax: f64,
}

impl LinearColormap {
    pub fn new(stops: Vec<Rgb>, vmin: f64, vmax: f64) -> Self {
        Self { stops, vmin, vmax }
    }

    /// Bubble-map gradient: blue -> purple -> orange -> red
    pub fn bubbles(vmin: f64, vmax: f64) -> Self {
        Self::new(vec![BLUE, PURPLE, ORANGE, RED], vmin, vmax)
    }

    /// Normalized position of `value` in the range, clamped to [0, 1].
    /// A degenerate range maps everything to 0.
    pub fn position(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }

    /// Interpolated color for `value`
    pub fn color(&self, value: f64) -> Rgb {
        match self.stops.len() {
            0 => (0, 0, 0),
            1 => self.stops[0],
            n => {
                let scaled = self.position(value) * (n - 1) as f64;
                let idx = (scaled.floor() as usize).min(n - 2);
                let t = scaled - idx as f64;
                lerp(self.stops[idx], self.stops[idx + 1], t)
            }
        }
    }
}

/// Heat overlay gradient, low to high intensity
pub const HEAT_STOPS: [(f64, Rgb); 5] = [
    (0.4, (0, 0, 255)),
    (0.6, (0, 255, 255)),
    (0.7, (0, 255, 0)),
    (0.8, (255, 255, 0)),
    (1.0, (255, 0, 0)),
];

/// Color for a heat intensity in [0, 1]; values below the first stop use it
pub fn heat_color(intensity: f64) -> Rgb {
    let v = intensity.clamp(0.0, 1.0);
    let mut prev = HEAT_STOPS[0];
    if v <= prev.0 {
        return prev.1;
    }
    for &stop in &HEAT_STOPS[1..] {
        if v <= stop.0 {
            let t = (v - prev.0) / (stop.0 - prev.0);
            return lerp(prev.1, stop.1, t);
        }
        prev = stop;
    }
    prev.1
}

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Bubble radius in pixels for an entry count: `floor(sqrt(count) / 35)`
pub fn bubble_radius(count: u64) -> u32 {
    ((count as f64).sqrt() / 35.0) as u32
}
