use std::fmt::Debug;
use std::hash::Hash;

use shun_core::{Grid, GridCell, Point};

use crate::distance::DistanceCost;

/// Graph capabilities needed by the searches.
///
/// Searches never store anything on the graph: all per-node scratch state is
/// kept by the search instance, keyed by [`Graph::Node`].
pub trait Graph {
    /// Node identity. For grids this is the cell coordinate.
    type Node: Copy + Eq + Hash + Debug;

    /// Whether `node` belongs to the graph. Searches return no path when an
    /// endpoint is not part of the graph.
    fn contains(&self, _node: Self::Node) -> bool {
        true
    }

    /// Append the successors of `node` (targets of its out-edges) into `buf`.
    /// The caller clears `buf` before calling. The enumeration order must be
    /// deterministic.
    fn neighbors(&self, node: Self::Node, buf: &mut Vec<Self::Node>);

    /// Append the predecessors of `node` (sources of its in-edges) into `buf`.
    /// Defaults to [`neighbors`](Graph::neighbors) for undirected graphs.
    fn predecessors(&self, node: Self::Node, buf: &mut Vec<Self::Node>) {
        self.neighbors(node, buf);
    }

    /// Whether traversal through `node` is forbidden.
    fn is_blocked(&self, node: Self::Node) -> bool;

    /// Absolute per-axis index difference between two nodes, fed to the
    /// distance metric.
    fn span(&self, from: Self::Node, to: Self::Node) -> (u32, u32);

    /// Cost added on top of the metric when moving along `from → to`.
    fn extra_cost(&self, _from: Self::Node, _to: Self::Node) -> f64 {
        0.0
    }

    /// Cost of moving along the edge `from → to` under `metric`.
    #[inline]
    fn edge_cost<C: DistanceCost + ?Sized>(
        &self,
        metric: &C,
        from: Self::Node,
        to: Self::Node,
    ) -> f64 {
        let (dx, dy) = self.span(from, to);
        metric.cost(dx, dy) + self.extra_cost(from, to)
    }

    /// Heuristic estimate of the cost between two arbitrary nodes.
    #[inline]
    fn estimate<C: DistanceCost + ?Sized>(
        &self,
        metric: &C,
        from: Self::Node,
        to: Self::Node,
    ) -> f64 {
        let (dx, dy) = self.span(from, to);
        metric.cost(dx, dy)
    }
}

impl<T> Graph for Grid<GridCell<T>> {
    type Node = Point;

    #[inline]
    fn contains(&self, p: Point) -> bool {
        Grid::contains(self, p)
    }

    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        if let Some(cell) = self.get(p) {
            buf.extend(cell.successors());
        }
    }

    fn predecessors(&self, p: Point, buf: &mut Vec<Point>) {
        if let Some(cell) = self.get(p) {
            buf.extend_from_slice(cell.in_edges());
        }
    }

    #[inline]
    fn is_blocked(&self, p: Point) -> bool {
        self.is_obstacle(p)
    }

    #[inline]
    fn span(&self, from: Point, to: Point) -> (u32, u32) {
        from.abs_diff(to)
    }

    #[inline]
    fn extra_cost(&self, from: Point, to: Point) -> f64 {
        Grid::extra_cost(self, from, to)
    }
}

/// Total cost of walking `path` under `metric`. Empty and single-node paths
/// cost nothing.
pub fn path_cost<G, C>(graph: &G, metric: &C, path: &[G::Node]) -> f64
where
    G: Graph,
    C: DistanceCost + ?Sized,
{
    path.windows(2)
        .map(|w| graph.edge_cost(metric, w[0], w[1]))
        .sum()
}
