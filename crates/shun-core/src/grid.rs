//! The [`Grid`] type — a fixed-size 2D container addressed by [`Point`].
//!
//! A `Grid` owns its cells in a row-major buffer. Every lookup is bounds
//! checked: reads outside the grid yield `None` and writes are ignored, so
//! callers never have to guard against out-of-range coordinates themselves.
//!
//! A grid also carries a [`WorldLayout`] describing where it sits in the host
//! scene, so positions can be converted between world space and grid indices.

use crate::geom::{Point, Range, WorldPos};

// ---------------------------------------------------------------------------
// WorldLayout
// ---------------------------------------------------------------------------

/// Placement of a grid in world space: the world position of cell (0, 0) and
/// the size of one cell along each axis.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldLayout {
    pub origin: WorldPos,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self {
            origin: WorldPos::default(),
            cell_width: 1.0,
            cell_height: 1.0,
        }
    }
}

impl WorldLayout {
    /// Create a layout with the given origin and cell size.
    pub const fn new(origin: WorldPos, cell_width: f32, cell_height: f32) -> Self {
        Self {
            origin,
            cell_width,
            cell_height,
        }
    }

    /// Grid index of the cell nearest to `pos`. The result may lie outside
    /// any particular grid.
    #[inline]
    pub fn index_of(&self, pos: WorldPos) -> Point {
        let rel = pos - self.origin;
        Point::new(
            (rel.x / self.cell_width).round() as i32,
            (rel.y / self.cell_height).round() as i32,
        )
    }

    /// World position of the cell at `p`.
    #[inline]
    pub fn world_of(&self, p: Point) -> WorldPos {
        WorldPos::new(
            p.x as f32 * self.cell_width,
            p.y as f32 * self.cell_height,
            0.0,
        ) + self.origin
    }

    /// World position of the cell nearest to `pos`.
    #[inline]
    pub fn snap(&self, pos: WorldPos) -> WorldPos {
        self.world_of(self.index_of(pos))
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A rectangular 2D grid of `T` values indexed by `(x, y)`.
///
/// With the `serde` feature, deserialization rejects a cell buffer whose
/// length is not `width * height`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid<T> {
    cells: Vec<T>,
    width: i32,
    height: i32,
    layout: WorldLayout,
}

/// Unchecked wire form of a [`Grid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid<T> {
    cells: Vec<T>,
    width: i32,
    height: i32,
    #[serde(default)]
    layout: WorldLayout,
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Grid<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let raw = <RawGrid<T> as serde::Deserialize>::deserialize(deserializer)?;
        if raw.width < 0 || raw.height < 0 {
            return Err(D::Error::custom(format!(
                "negative grid dimensions {}x{}",
                raw.width, raw.height
            )));
        }
        let expected = raw.width as usize * raw.height as usize;
        if raw.cells.len() != expected {
            return Err(D::Error::custom(format!(
                "a {}x{} grid needs {expected} cells, found {}",
                raw.width,
                raw.height,
                raw.cells.len()
            )));
        }
        Ok(Self {
            cells: raw.cells,
            width: raw.width,
            height: raw.height,
            layout: raw.layout,
        })
    }
}

impl<T: Default> Grid<T> {
    /// Create a new grid of the given dimensions, filled with default values.
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_fn(width, height, |_| T::default())
    }
}

impl<T> Grid<T> {
    /// Create a new grid whose cell at `p` is `f(p)`. Negative dimensions
    /// are clamped to zero.
    pub fn from_fn(width: i32, height: i32, f: impl FnMut(Point) -> T) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = Range::new(0, 0, width, height).iter().map(f).collect();
        Self {
            cells,
            width,
            height,
            layout: WorldLayout::default(),
        }
    }

    /// Set the world layout (builder).
    pub fn with_layout(mut self, layout: WorldLayout) -> Self {
        self.layout = layout;
        self
    }

    /// The world layout of this grid.
    #[inline]
    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Replace the world layout.
    #[inline]
    pub fn set_layout(&mut self, layout: WorldLayout) {
        self.layout = layout;
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Size of the grid as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// The bounding range `[(0, 0), (width, height))`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Whether `p` is a valid index.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some(p.y as usize * self.width as usize + p.x as usize)
        } else {
            None
        }
    }

    /// The cell at `p`, or `None` if `p` is outside the grid.
    #[inline]
    pub fn get(&self, p: Point) -> Option<&T> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `p`, or `None` if `p` is outside the grid.
    #[inline]
    pub fn get_mut(&mut self, p: Point) -> Option<&mut T> {
        self.index(p).map(|i| &mut self.cells[i])
    }

    /// Mutable access to two distinct cells at once. Returns `None` if either
    /// point is outside the grid or `a == b`.
    pub fn get_pair_mut(&mut self, a: Point, b: Point) -> Option<(&mut T, &mut T)> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.cells.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.cells.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    /// Set the cell at `p`. No-op if `p` is outside the grid.
    pub fn set(&mut self, p: Point, value: T) {
        if let Some(i) = self.index(p) {
            self.cells[i] = value;
        }
    }

    /// Apply `f` to every cell in the grid.
    pub fn map_cells(&mut self, mut f: impl FnMut(Point, &mut T)) {
        let width = self.width.max(1) as usize;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let p = Point::new((i % width) as i32, (i / width) as i32);
            f(p, cell);
        }
    }

    /// Row-major iterator over `(Point, &T)` pairs.
    pub fn iter(&self) -> GridIter<'_, T> {
        GridIter {
            grid: self,
            inner: self.bounds().iter(),
        }
    }

    // -----------------------------------------------------------------------
    // World-space helpers
    // -----------------------------------------------------------------------

    /// Grid index nearest to a world position (possibly out of bounds).
    #[inline]
    pub fn index_of(&self, pos: WorldPos) -> Point {
        self.layout.index_of(pos)
    }

    /// World position of the cell at `p`.
    #[inline]
    pub fn world_of(&self, p: Point) -> WorldPos {
        self.layout.world_of(p)
    }

    /// World position of the cell nearest to `pos`.
    #[inline]
    pub fn snap(&self, pos: WorldPos) -> WorldPos {
        self.layout.snap(pos)
    }

    /// Whether the cell nearest to `pos` lies inside the grid.
    #[inline]
    pub fn contains_world(&self, pos: WorldPos) -> bool {
        self.contains(self.index_of(pos))
    }

    /// The cell nearest to a world position, if inside the grid.
    #[inline]
    pub fn get_world(&self, pos: WorldPos) -> Option<&T> {
        self.get(self.index_of(pos))
    }

    /// Set the cell nearest to a world position. No-op outside the grid.
    pub fn set_world(&mut self, pos: WorldPos, value: T) {
        self.set(self.index_of(pos), value);
    }
}

impl<T: Clone> Grid<T> {
    /// Fill every cell in the grid with `value`.
    pub fn fill(&mut self, value: T) {
        for c in self.cells.iter_mut() {
            *c = value.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// GridIter
// ---------------------------------------------------------------------------

/// Iterator over `(Point, &T)` pairs in a [`Grid`].
pub struct GridIter<'a, T> {
    grid: &'a Grid<T>,
    inner: crate::geom::RangeIter,
}

impl<'a, T> Iterator for GridIter<'a, T> {
    type Item = (Point, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let p = self.inner.next()?;
        self.grid.get(p).map(|c| (p, c))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        let mut g: Grid<u8> = Grid::new(3, 2);
        g.set(Point::new(1, 1), 4);
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn grid_rejects_mismatched_cell_count() {
        let short = r#"{"cells":[1,2],"width":3,"height":3}"#;
        let err = serde_json::from_str::<Grid<u8>>(short).unwrap_err();
        assert!(err.to_string().contains("needs 9 cells"), "{err}");
        let negative = r#"{"cells":[],"width":-1,"height":3}"#;
        assert!(serde_json::from_str::<Grid<u8>>(negative).is_err());

        let ok = r#"{"cells":[0,0,0,0,0,0,0,0,7],"width":3,"height":3}"#;
        let g: Grid<u8> = serde_json::from_str(ok).unwrap();
        assert_eq!(g.get(Point::new(2, 2)), Some(&7));
        assert_eq!(g.layout(), &WorldLayout::default());
    }
}
