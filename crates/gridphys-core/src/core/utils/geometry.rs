//! Integer geometry on the grid.

/// A displacement between two grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub const fn squared_length(self) -> i64 {
        (self.dx as i64) * (self.dx as i64) + (self.dy as i64) * (self.dy as i64)
    }
}

/// Squared Euclidean distance between two grid points.
#[inline]
pub fn squared_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> i64 {
    Offset::new(x1 - x2, y1 - y2).squared_length()
}

/// An axis-aligned rectangle of cells, `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn translated(&self, offset: Offset) -> Rect {
        Rect::new(self.x + offset.dx, self.y + offset.dy, self.width, self.height)
    }

    /// The smallest rectangle containing every point, or `None` for no points.
    pub fn bounding(points: impl IntoIterator<Item = (i32, i32)>) -> Option<Rect> {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for (x, y) in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Every non-empty rectangle lying inside this one, in row-major order of origin.
    ///
    /// A `w × h` rectangle has `w(w+1)/2 · h(h+1)/2` sub-rectangles, so this is only meant for
    /// the bounding boxes of modestly sized molecules.
    pub fn sub_rects(&self) -> Vec<Rect> {
        if self.is_empty() {
            return Vec::new();
        }
        let w = self.width as usize;
        let h = self.height as usize;
        let mut rects = Vec::with_capacity(w * (w + 1) / 2 * h * (h + 1) / 2);
        for y in self.y..self.y + self.height {
            for x in self.x..self.x + self.width {
                for height in 1..=(self.y + self.height - y) {
                    for width in 1..=(self.x + self.width - x) {
                        rects.push(Rect::new(x, y, width, height));
                    }
                }
            }
        }
        rects
    }
}
