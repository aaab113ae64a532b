//! Jittered point grids used to lay hearts over the playfield.
//!
//! Both generators re-sample the jitter on every call, so two layouts for the
//! same viewport never line up exactly.

/// A point in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box, same shape as a DOMRect.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Point at fractional offsets `(fx, fy)` inside the box.
    pub fn at(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.left + self.width * fx, self.top + self.height * fy)
    }

    /// Half-open containment (right/bottom edges excluded).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }

    /// Grow by `pad` on every side. Left/top are clamped at the viewport origin
    /// while the size still grows by the full `2 * pad`.
    pub fn padded(&self, pad: f64) -> Rect {
        Rect {
            left: (self.left - pad).max(0.0),
            top: (self.top - pad).max(0.0),
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }
}

/// Generated point set plus the lattice it was jittered from.
#[derive(Clone, Debug)]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
    pub spacing: f64,
    /// Maximum per-axis jitter applied to each point.
    pub jitter: f64,
    origin: Point,
    /// Row-major, `columns * rows` entries.
    pub points: Vec<Point>,
}

impl Grid {
    /// Unjittered position of `points[index]`.
    pub fn ideal(&self, index: usize) -> Point {
        let col = (index % self.columns) as f64;
        let row = (index / self.columns) as f64;
        Point::new(
            self.origin.x + col * self.spacing,
            self.origin.y + row * self.spacing,
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub(crate) fn random_between(rng: &mut fastrand::Rng, min: f64, max: f64) -> f64 {
    rng.f64() * (max - min) + min
}

fn jittered(
    rng: &mut fastrand::Rng,
    columns: usize,
    rows: usize,
    spacing: f64,
    jitter: f64,
    origin: Point,
) -> Grid {
    let mut points = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let x = origin.x + col as f64 * spacing + random_between(rng, -jitter, jitter);
            let y = origin.y + row as f64 * spacing + random_between(rng, -jitter, jitter);
            points.push(Point::new(x, y));
        }
    }
    Grid {
        columns,
        rows,
        spacing,
        jitter,
        origin,
        points,
    }
}

/// Lattice dimensions of a full-viewport grid. One extra row and column so
/// jitter never leaves a bare strip along the right/bottom edges.
pub fn grid_dims(viewport: Size, spacing: f64) -> (usize, usize) {
    let columns = (viewport.width / spacing).ceil().max(0.0) as usize + 1;
    let rows = (viewport.height / spacing).ceil().max(0.0) as usize + 1;
    (columns, rows)
}

/// Lattice dimensions of a rectangle grid.
pub fn rect_dims(rect: Rect, spacing: f64) -> (usize, usize) {
    let columns = ((rect.width + spacing) / spacing).ceil().max(0.0) as usize;
    let rows = ((rect.height + spacing) / spacing).ceil().max(0.0) as usize;
    (columns, rows)
}

/// Full-viewport grid. Points are shifted back by half a spacing so the
/// hearts (positioned by their top-left corner) straddle the lattice.
pub fn grid_positions(
    rng: &mut fastrand::Rng,
    viewport: Size,
    spacing: f64,
    jitter_fraction: f64,
    offset: Point,
) -> Grid {
    let (columns, rows) = grid_dims(viewport, spacing);
    let origin = Point::new(offset.x - spacing * 0.5, offset.y - spacing * 0.5);
    jittered(rng, columns, rows, spacing, spacing * jitter_fraction, origin)
}

/// Dense grid over an arbitrary rectangle, anchored at its top-left corner.
pub fn rect_positions(
    rng: &mut fastrand::Rng,
    rect: Rect,
    spacing: f64,
    jitter_fraction: f64,
) -> Grid {
    let (columns, rows) = rect_dims(rect, spacing);
    let origin = Point::new(rect.left, rect.top);
    jittered(rng, columns, rows, spacing, spacing * jitter_fraction, origin)
}
