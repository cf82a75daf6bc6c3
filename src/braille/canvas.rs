use crate::map::Rgb;

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots) and may carry
/// its own color, so several colored shapes can share one canvas.
/// Unicode Braille patterns: U+2800 to U+28FF
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    dots: Vec<u8>,           // Bit pattern per char, row-major
    tints: Vec<Option<Rgb>>, // Last color written per char
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0u8; width * height],
            tints: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Map a pixel to (cell index, dot bit), or None when off-canvas.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    fn locate(&self, x: usize, y: usize) -> Option<(usize, u8)> {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return None;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            _ => 0x80,
        };

        Some((cy * self.width + cx, bit))
    }

    /// Set a pixel at the given coordinates.
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        if let Some((idx, bit)) = self.locate(x, y) {
            self.dots[idx] |= bit;
        }
    }

    /// Set a pixel and color its character cell
    pub fn set_pixel_tinted(&mut self, x: usize, y: usize, color: Rgb) {
        if let Some((idx, bit)) = self.locate(x, y) {
            self.dots[idx] |= bit;
            self.tints[idx] = Some(color);
        }
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Option<Rgb>) {
        if x < 0 || y < 0 {
            return;
        }
        match color {
            Some(c) => self.set_pixel_tinted(x as usize, y as usize, c),
            None => self.set_pixel(x as usize, y as usize),
        }
    }

    /// Character and color at a cell; blank cells are U+2800
    pub fn cell(&self, col: usize, row: usize) -> (char, Option<Rgb>) {
        if col >= self.width || row >= self.height {
            return ('\u{2800}', None);
        }
        let idx = row * self.width + col;
        (braille_char(self.dots[idx]), self.tints[idx])
    }

    /// Convert the canvas to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.rows().collect::<Vec<_>>().join("\n")
    }

    /// Get a specific row as a string (for line-by-line rendering)
    pub fn row_to_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.dots[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|&b| braille_char(b))
            .collect()
    }

    /// Get all rows as an iterator of strings
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|i| self.row_to_string(i))
    }
}

fn braille_char(bits: u8) -> char {
    char::from_u32(0x2800 + bits as u32).unwrap_or(' ')
}
