/// Character-cell heat accumulator for the density overlay.
/// Each point is splatted with a smooth radial falloff; intensities are read
/// back normalized to the hottest cell.
pub struct HeatGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl HeatGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    /// Add `weight` around (col, row). `radius` is in columns; the vertical
    /// radius is halved since terminal cells are about twice as tall as wide.
    pub fn splat(&mut self, col: i32, row: i32, weight: f64, radius: i32) {
        let rx = radius.max(1);
        let ry = (radius / 2).max(1);

        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let (x, y) = (col + dx, row + dy);
                if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                    continue;
                }
                let nx = dx as f64 / rx as f64;
                let ny = dy as f64 / ry as f64;
                let d2 = nx * nx + ny * ny;
                if d2 > 1.0 {
                    continue;
                }
                let falloff = (1.0 - d2) * (1.0 - d2);
                self.cells[y as usize * self.width + x as usize] += weight * falloff;
            }
        }
    }

    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }

    /// Cells at or above `threshold` as (col, row, intensity in 0..=1)
    pub fn iter_hot(&self, threshold: f64) -> impl Iterator<Item = (u16, u16, f64)> + '_ {
        let max = self.max();
        self.cells.iter().enumerate().filter_map(move |(idx, &heat)| {
            if max <= 0.0 {
                return None;
            }
            let intensity = heat / max;
            if intensity >= threshold && intensity > 0.0 {
                Some(((idx % self.width) as u16, (idx / self.width) as u16, intensity))
            } else {
                None
            }
        })
    }
}
