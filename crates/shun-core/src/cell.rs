//! The [`GridCell`] type — a grid vertex with an obstacle flag, a payload and
//! directed adjacency.
//!
//! Adjacency is stored on both endpoints: an out-edge on the source and an
//! in-edge on the target. Undirected links are simply a pair of zero-cost
//! directed edges. Edges are edited only through the grid-level methods on
//! `Grid<GridCell<T>>`, which keep both endpoints consistent.

use crate::geom::Point;
use crate::grid::Grid;

/// A directed edge to `to`, with a traversal cost added on top of the
/// distance metric.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub to: Point,
    pub extra_cost: f64,
}

/// A cell of a pathfinding grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell<T> {
    pos: Point,
    pub item: T,
    pub obstacle: bool,
    out_edges: Vec<Edge>,
    in_edges: Vec<Point>,
}

impl<T> GridCell<T> {
    /// Create an unlinked, passable cell at `pos`.
    pub fn new(pos: Point, item: T) -> Self {
        Self {
            pos,
            item,
            obstacle: false,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }
    }

    /// Mark the cell as an obstacle (builder).
    pub fn with_obstacle(mut self, obstacle: bool) -> Self {
        self.obstacle = obstacle;
        self
    }

    /// The cell's coordinate, which is also its identity.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Outgoing edges, in insertion order.
    #[inline]
    pub fn out_edges(&self) -> &[Edge] {
        &self.out_edges
    }

    /// Sources of incoming edges, in insertion order.
    #[inline]
    pub fn in_edges(&self) -> &[Point] {
        &self.in_edges
    }

    /// Targets of outgoing edges, in insertion order.
    pub fn successors(&self) -> impl Iterator<Item = Point> + '_ {
        self.out_edges.iter().map(|e| e.to)
    }

    /// Whether there is an edge from this cell to `to`.
    pub fn has_edge_to(&self, to: Point) -> bool {
        self.out_edges.iter().any(|e| e.to == to)
    }

    /// Additional cost of the edge to `to`, or 0 if there is no such edge.
    pub fn extra_cost_to(&self, to: Point) -> f64 {
        self.out_edges
            .iter()
            .find(|e| e.to == to)
            .map_or(0.0, |e| e.extra_cost)
    }
}

impl<T: Default> GridCell<T> {
    /// Create an unlinked, passable cell at `pos` with a default payload.
    pub fn at(pos: Point) -> Self {
        Self::new(pos, T::default())
    }
}

// ---------------------------------------------------------------------------
// Adjacency editing
// ---------------------------------------------------------------------------

impl<T: Default> Grid<GridCell<T>> {
    /// Create a grid of unlinked, passable cells with default payloads.
    pub fn with_cells(width: i32, height: i32) -> Self {
        Grid::from_fn(width, height, GridCell::at)
    }
}

impl<T> Grid<GridCell<T>> {
    /// Add a directed edge `from → to` with an additional traversal cost.
    ///
    /// Returns `false` (and changes nothing) if either point is outside the
    /// grid, the points are equal, the edge already exists, or `extra_cost`
    /// is negative or not finite.
    pub fn link_directed(&mut self, from: Point, to: Point, extra_cost: f64) -> bool {
        if !(extra_cost.is_finite() && extra_cost >= 0.0) {
            return false;
        }
        let Some((src, dst)) = self.get_pair_mut(from, to) else {
            return false;
        };
        if src.has_edge_to(to) {
            return false;
        }
        src.out_edges.push(Edge { to, extra_cost });
        dst.in_edges.push(from);
        true
    }

    /// Link `a` and `b` in both directions with no additional cost.
    ///
    /// Returns `true` if at least one direction was added.
    pub fn link(&mut self, a: Point, b: Point) -> bool {
        let ab = self.link_directed(a, b, 0.0);
        let ba = self.link_directed(b, a, 0.0);
        ab || ba
    }

    /// Remove the directed edge `from → to`. Returns whether it existed.
    pub fn unlink_directed(&mut self, from: Point, to: Point) -> bool {
        let Some((src, dst)) = self.get_pair_mut(from, to) else {
            return false;
        };
        let before = src.out_edges.len();
        src.out_edges.retain(|e| e.to != to);
        dst.in_edges.retain(|&p| p != from);
        src.out_edges.len() != before
    }

    /// Remove both directions between `a` and `b`.
    pub fn unlink(&mut self, a: Point, b: Point) -> bool {
        let ab = self.unlink_directed(a, b);
        let ba = self.unlink_directed(b, a);
        ab || ba
    }

    /// Additional cost of the edge `from → to`, or 0 if there is none.
    pub fn extra_cost(&self, from: Point, to: Point) -> f64 {
        self.get(from).map_or(0.0, |c| c.extra_cost_to(to))
    }

    /// Link every cell with its in-bounds cardinal neighbours, in the order
    /// up, right, down, left.
    pub fn connect_cardinal(&mut self) {
        for p in self.bounds() {
            for n in p.neighbors_4() {
                self.link_directed(p, n, 0.0);
            }
        }
    }

    /// Link every cell with all eight in-bounds neighbours, clockwise from up.
    pub fn connect_all(&mut self) {
        for p in self.bounds() {
            for n in p.neighbors_8() {
                self.link_directed(p, n, 0.0);
            }
        }
    }

    /// Set the obstacle flag of the cell at `p`. No-op outside the grid.
    pub fn set_obstacle(&mut self, p: Point, obstacle: bool) {
        if let Some(c) = self.get_mut(p) {
            c.obstacle = obstacle;
        }
    }

    /// Whether the cell at `p` is an obstacle. Points outside the grid are
    /// reported as obstacles.
    pub fn is_obstacle(&self, p: Point) -> bool {
        self.get(p).is_none_or(|c| c.obstacle)
    }
}
