//! A* shortest-path search.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::distance::{CostFunction, DistanceCost};
use crate::heap::{IndexedHeap, Key};
use crate::pathfinder::PathfindingAlgorithm;
use crate::traits::Graph;

/// Per-node scratch record of an A* run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AstarNode<N> {
    /// Best known cost from the start.
    pub g: f64,
    /// Heuristic estimate to the goal.
    pub h: f64,
    /// Priority, `g + h`.
    pub f: f64,
    /// Predecessor on the best known path.
    pub parent: Option<N>,
}

/// One-shot optimal search from a start to a goal.
///
/// Scratch state is owned by the instance and cleared at the start of every
/// run, so one instance can serve any number of searches over any number of
/// graphs. After a run the scratch can be inspected with [`AStar::node`].
///
/// Through [`PathfindingAlgorithm`], A* remembers the goal of the last
/// first-time search and replans from scratch when obstacles are reported.
pub struct AStar<N> {
    metric: Box<dyn DistanceCost>,
    nodes: HashMap<N, AstarNode<N>>,
    open: IndexedHeap<N>,
    closed: HashSet<N>,
    known_obstacles: HashSet<N>,
    goal: Option<N>,
    expanded: usize,
    nbuf: Vec<N>,
}

impl<N> Default for AStar<N> {
    fn default() -> Self {
        Self::with_metric(CostFunction::default())
    }
}

impl<N> AStar<N> {
    /// Create an A* search using `metric` for both step costs and the
    /// heuristic.
    pub fn with_metric(metric: impl DistanceCost + 'static) -> Self {
        Self {
            metric: Box::new(metric),
            nodes: HashMap::new(),
            open: IndexedHeap::default(),
            closed: HashSet::new(),
            known_obstacles: HashSet::new(),
            goal: None,
            expanded: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The distance metric in use.
    pub fn metric(&self) -> &dyn DistanceCost {
        self.metric.as_ref()
    }

    /// Number of nodes expanded by the last run.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Goal of the last first-time search.
    pub fn goal(&self) -> Option<N>
    where
        N: Copy,
    {
        self.goal
    }
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug> AStar<N> {
    /// Scratch record of `node` from the last run, if it was reached.
    pub fn node(&self, node: N) -> Option<&AstarNode<N>> {
        self.nodes.get(&node)
    }

    /// Best cost from the start to `node` found by the last run.
    pub fn g(&self, node: N) -> Option<f64> {
        self.nodes.get(&node).map(|n| n.g)
    }

    /// Obstacles reported through
    /// [`update_path_with_dynamic_obstacle`](PathfindingAlgorithm::update_path_with_dynamic_obstacle)
    /// since the last first-time search.
    pub fn known_obstacles(&self) -> &HashSet<N> {
        &self.known_obstacles
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.closed.clear();
        self.expanded = 0;
    }

    #[inline]
    fn blocked<G: Graph<Node = N>>(&self, graph: &G, node: N) -> bool {
        graph.is_blocked(node) || self.known_obstacles.contains(&node)
    }

    /// Compute the shortest path from `start` to `goal`.
    ///
    /// Returns the full path (including both endpoints) or `None` if the goal
    /// cannot be reached, an endpoint is blocked, or an endpoint is not part
    /// of the graph.
    pub fn find_path<G>(&mut self, graph: &G, start: N, goal: N) -> Option<Vec<N>>
    where
        G: Graph<Node = N>,
    {
        self.reset();

        if !graph.contains(start) || !graph.contains(goal) {
            return None;
        }
        if self.blocked(graph, start) || self.blocked(graph, goal) {
            debug!("astar: endpoint blocked ({start:?} -> {goal:?})");
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        let h0 = graph.estimate(self.metric.as_ref(), start, goal);
        self.nodes.insert(
            start,
            AstarNode {
                g: 0.0,
                h: h0,
                f: h0,
                parent: None,
            },
        );
        self.open.push(start, Key::new(h0, h0));

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some((current, _)) = self.open.pop() else {
                break 'search false;
            };
            self.closed.insert(current);

            if current == goal {
                break 'search true;
            }

            self.expanded += 1;
            let current_g = self.nodes.get(&current).map_or(f64::INFINITY, |n| n.g);
            trace!("astar: expand {current:?} g={current_g}");

            nbuf.clear();
            graph.neighbors(current, &mut nbuf);

            for &next in nbuf.iter() {
                if self.closed.contains(&next) || self.blocked(graph, next) {
                    continue;
                }
                let tentative_g = current_g + graph.edge_cost(self.metric.as_ref(), current, next);
                let known_g = self.nodes.get(&next).map_or(f64::INFINITY, |n| n.g);
                if tentative_g < known_g || !self.open.contains(&next) {
                    let h = graph.estimate(self.metric.as_ref(), next, goal);
                    let f = tentative_g + h;
                    self.nodes.insert(
                        next,
                        AstarNode {
                            g: tentative_g,
                            h,
                            f,
                            parent: Some(current),
                        },
                    );
                    self.open.push(next, Key::new(f, h));
                }
            }
        };

        self.nbuf = nbuf;

        if !found {
            debug!(
                "astar: no path {start:?} -> {goal:?} after {} expansions",
                self.expanded
            );
            return None;
        }

        // Reconstruct path.
        let mut path = vec![goal];
        let mut cur = goal;
        while let Some(parent) = self.nodes.get(&cur).and_then(|n| n.parent) {
            path.push(parent);
            cur = parent;
        }
        path.reverse();
        debug!(
            "astar: path {start:?} -> {goal:?} with {} cells after {} expansions",
            path.len(),
            self.expanded
        );
        Some(path)
    }
}

impl<G> PathfindingAlgorithm<G> for AStar<G::Node>
where
    G: Graph,
{
    fn name(&self) -> &'static str {
        "astar"
    }

    fn first_time_find_path(
        &mut self,
        graph: &G,
        start: G::Node,
        goal: G::Node,
    ) -> Option<Vec<G::Node>> {
        self.goal = Some(goal);
        self.known_obstacles.clear();
        self.find_path(graph, start, goal)
    }

    fn update_path_with_dynamic_obstacle(
        &mut self,
        graph: &G,
        current_start: G::Node,
        discovered: &[G::Node],
    ) -> Option<Vec<G::Node>> {
        let goal = self.goal?;
        self.known_obstacles.extend(discovered.iter().copied());
        self.find_path(graph, current_start, goal)
    }
}
