//! D* Lite incremental replanning.
//!
//! D* Lite searches backwards from the goal. Every node carries `g`, the cost
//! to the goal settled so far, and `rhs`, a one-step lookahead
//! `min(g(s') + c(u, s'))` over its successors. A node is *consistent* when
//! `g == rhs`; inconsistent nodes sit in the queue keyed by
//!
//! ```text
//! k1 = min(g, rhs) + h(node, start) + km
//! k2 = min(g, rhs)
//! ```
//!
//! `km` grows by `h(last_start, start)` whenever the agent moves, so keys
//! computed before the move stay comparable with keys computed after it.
//!
//! Once the start is consistent, a path is read off by walking from the start
//! to the successor with the lowest `c(u, s') + g(s')`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::distance::{CostFunction, DistanceCost};
use crate::error::PathError;
use crate::heap::{IndexedHeap, Key};
use crate::pathfinder::PathfindingAlgorithm;
use crate::traits::Graph;

/// How [`DStarLite`] reacts to newly discovered obstacles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReplanMode {
    /// Reseed `g`/`rhs` for the current start and goal and search again,
    /// keeping only the set of known obstacles.
    #[default]
    Restart,
    /// Keep all search state, bump `km` by the distance moved and repair
    /// only the nodes whose outgoing edges changed.
    Incremental,
}

impl ReplanMode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::Incremental => "incremental",
        }
    }
}

impl fmt::Display for ReplanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplanMode {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restart" | "reset" => Ok(Self::Restart),
            "incremental" | "repair" => Ok(Self::Incremental),
            _ => Err(PathError::invalid("replan mode", s)),
        }
    }
}

/// Start and goal of the current planning episode.
#[derive(Copy, Clone, Debug)]
struct Episode<N> {
    start: N,
    goal: N,
    last_start: N,
}

/// Incremental planner for a fixed goal and a moving start.
///
/// Call [`first_time_find_path`](PathfindingAlgorithm::first_time_find_path)
/// once per goal, then
/// [`update_path_with_dynamic_obstacle`](PathfindingAlgorithm::update_path_with_dynamic_obstacle)
/// each time the agent has moved and sensed new obstacles.
pub struct DStarLite<N> {
    metric: Box<dyn DistanceCost>,
    mode: ReplanMode,
    g: HashMap<N, f64>,
    rhs: HashMap<N, f64>,
    next_hop: HashMap<N, N>,
    known_obstacles: HashSet<N>,
    open: IndexedHeap<N>,
    km: f64,
    episode: Option<Episode<N>>,
    expanded: usize,
    sbuf: Vec<N>,
    pbuf: Vec<N>,
}

impl<N> Default for DStarLite<N> {
    fn default() -> Self {
        Self::with_metric(CostFunction::default())
    }
}

impl<N> DStarLite<N> {
    /// Create a planner using `metric` for both step costs and the heuristic.
    pub fn with_metric(metric: impl DistanceCost + 'static) -> Self {
        Self {
            metric: Box::new(metric),
            mode: ReplanMode::default(),
            g: HashMap::new(),
            rhs: HashMap::new(),
            next_hop: HashMap::new(),
            known_obstacles: HashSet::new(),
            open: IndexedHeap::default(),
            km: 0.0,
            episode: None,
            expanded: 0,
            sbuf: Vec::with_capacity(8),
            pbuf: Vec::with_capacity(8),
        }
    }

    /// Set the replanning mode (builder).
    pub fn with_mode(mut self, mode: ReplanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ReplanMode {
        self.mode
    }

    /// The distance metric in use.
    pub fn metric(&self) -> &dyn DistanceCost {
        self.metric.as_ref()
    }

    /// Current heuristic offset.
    pub fn km(&self) -> f64 {
        self.km
    }

    /// Nodes popped from the queue since the last first-time search.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug> DStarLite<N> {
    /// Settled cost from `node` to the goal (`+∞` if unknown).
    pub fn g(&self, node: N) -> f64 {
        self.g.get(&node).copied().unwrap_or(f64::INFINITY)
    }

    /// One-step lookahead cost from `node` to the goal (`+∞` if unknown).
    pub fn rhs(&self, node: N) -> f64 {
        self.rhs.get(&node).copied().unwrap_or(f64::INFINITY)
    }

    /// Successor through which `node` currently reaches the goal.
    pub fn next_hop(&self, node: N) -> Option<N> {
        self.next_hop.get(&node).copied()
    }

    /// Obstacles reported since the last first-time search.
    pub fn known_obstacles(&self) -> &HashSet<N> {
        &self.known_obstacles
    }

    /// Goal of the current episode.
    pub fn goal(&self) -> Option<N> {
        self.episode.map(|e| e.goal)
    }

    /// Start the current plan was computed for.
    pub fn start(&self) -> Option<N> {
        self.episode.map(|e| e.start)
    }

    #[inline]
    fn blocked<G: Graph<Node = N>>(&self, graph: &G, node: N) -> bool {
        graph.is_blocked(node) || self.known_obstacles.contains(&node)
    }

    fn calculate_key<G: Graph<Node = N>>(&self, graph: &G, node: N, start: N) -> Key {
        let m = self.g(node).min(self.rhs(node));
        Key::new(
            m + graph.estimate(self.metric.as_ref(), node, start) + self.km,
            m,
        )
    }

    /// Clear `g`, `rhs`, next hops, the queue and `km`, and seed the queue
    /// with the goal. Known obstacles are left alone.
    fn reseed<G: Graph<Node = N>>(&mut self, graph: &G, start: N, goal: N) {
        self.g.clear();
        self.rhs.clear();
        self.next_hop.clear();
        self.open.clear();
        self.km = 0.0;
        self.episode = Some(Episode {
            start,
            goal,
            last_start: start,
        });
        self.rhs.insert(goal, 0.0);
        let key = self.calculate_key(graph, goal, start);
        self.open.push(goal, key);
    }

    /// Recompute `rhs(node)` from its successors and requeue it if it is
    /// inconsistent.
    fn update_vertex<G: Graph<Node = N>>(&mut self, graph: &G, node: N, ep: Episode<N>) {
        if node != ep.goal {
            let mut best = f64::INFINITY;
            let mut hop = None;
            if !self.blocked(graph, node) {
                let mut sbuf = std::mem::take(&mut self.sbuf);
                sbuf.clear();
                graph.neighbors(node, &mut sbuf);
                for &s in sbuf.iter() {
                    if self.blocked(graph, s) {
                        continue;
                    }
                    let v = self.g(s) + graph.edge_cost(self.metric.as_ref(), node, s);
                    if v < best {
                        best = v;
                        hop = Some(s);
                    }
                }
                self.sbuf = sbuf;
            }
            self.rhs.insert(node, best);
            match hop {
                Some(s) => self.next_hop.insert(node, s),
                None => self.next_hop.remove(&node),
            };
        }

        self.open.remove(&node);
        if self.g(node) != self.rhs(node) {
            let key = self.calculate_key(graph, node, ep.start);
            self.open.push(node, key);
        }
    }

    fn compute_shortest_path<G: Graph<Node = N>>(&mut self, graph: &G, ep: Episode<N>) {
        let mut pbuf = std::mem::take(&mut self.pbuf);

        while let Some((_, top)) = self.open.peek() {
            let start_key = self.calculate_key(graph, ep.start, ep.start);
            if top >= start_key && self.rhs(ep.start) == self.g(ep.start) {
                break;
            }
            let Some((u, k_old)) = self.open.pop() else {
                break;
            };
            self.expanded += 1;

            let k_new = self.calculate_key(graph, u, ep.start);
            if k_old < k_new {
                trace!("dstar: requeue stale {u:?}");
                self.open.push(u, k_new);
                continue;
            }

            let (g_u, rhs_u) = (self.g(u), self.rhs(u));
            if g_u > rhs_u {
                trace!("dstar: settle {u:?} g={rhs_u}");
                self.g.insert(u, rhs_u);
            } else {
                trace!("dstar: raise {u:?}");
                self.g.insert(u, f64::INFINITY);
                self.update_vertex(graph, u, ep);
            }

            pbuf.clear();
            graph.predecessors(u, &mut pbuf);
            for &p in pbuf.iter() {
                if !self.blocked(graph, p) {
                    self.update_vertex(graph, p, ep);
                }
            }
        }

        self.pbuf = pbuf;
    }

    /// Walk from the start to the goal, always stepping to the unvisited,
    /// unblocked successor `s` minimising `c(current, s) + g(s)`. The first
    /// successor in enumeration order wins ties.
    fn extract_path<G: Graph<Node = N>>(&mut self, graph: &G, ep: Episode<N>) -> Option<Vec<N>> {
        if ep.start == ep.goal {
            return Some(vec![ep.start]);
        }
        if self.g(ep.start).is_infinite() {
            return None;
        }

        let mut path = vec![ep.start];
        let mut visited = HashSet::from([ep.start]);
        let mut current = ep.start;
        let mut sbuf = std::mem::take(&mut self.sbuf);

        while current != ep.goal {
            sbuf.clear();
            graph.neighbors(current, &mut sbuf);
            let mut next = None;
            let mut best = f64::INFINITY;
            for &s in sbuf.iter() {
                if self.blocked(graph, s) || visited.contains(&s) {
                    continue;
                }
                let via = self.g(s) + graph.edge_cost(self.metric.as_ref(), current, s);
                if via < best {
                    best = via;
                    next = Some(s);
                }
            }
            let Some(step) = next else {
                self.sbuf = sbuf;
                return None;
            };
            path.push(step);
            visited.insert(step);
            current = step;
        }

        self.sbuf = sbuf;
        Some(path)
    }

    fn plan<G: Graph<Node = N>>(&mut self, graph: &G, ep: Episode<N>) -> Option<Vec<N>> {
        if self.blocked(graph, ep.start) || self.blocked(graph, ep.goal) {
            debug!("dstar: endpoint blocked ({:?} -> {:?})", ep.start, ep.goal);
            return None;
        }
        self.compute_shortest_path(graph, ep);
        let path = self.extract_path(graph, ep);
        match &path {
            Some(p) => debug!(
                "dstar: path {:?} -> {:?} with {} cells, {} expansions, km={}",
                ep.start,
                ep.goal,
                p.len(),
                self.expanded,
                self.km
            ),
            None => debug!(
                "dstar: no path {:?} -> {:?} after {} expansions",
                ep.start, ep.goal, self.expanded
            ),
        }
        path
    }

    /// Plan from `start` to `goal` from a clean slate, forgetting every
    /// previously reported obstacle.
    pub fn find_path<G>(&mut self, graph: &G, start: N, goal: N) -> Option<Vec<N>>
    where
        G: Graph<Node = N>,
    {
        if !graph.contains(start) || !graph.contains(goal) {
            self.episode = None;
            return None;
        }
        self.known_obstacles.clear();
        self.expanded = 0;
        self.reseed(graph, start, goal);
        let ep = self.episode?;
        self.plan(graph, ep)
    }

    /// Record newly observed obstacles and replan from `current_start` to the
    /// goal of the current episode. Returns `None` when no episode is active.
    pub fn replan<G>(&mut self, graph: &G, current_start: N, discovered: &[N]) -> Option<Vec<N>>
    where
        G: Graph<Node = N>,
    {
        let ep = self.episode?;
        if !graph.contains(current_start) {
            return None;
        }

        let fresh: Vec<N> = discovered
            .iter()
            .copied()
            .filter(|&o| self.known_obstacles.insert(o))
            .collect();
        debug!(
            "dstar: replan from {current_start:?} ({} new obstacles, mode {})",
            fresh.len(),
            self.mode
        );

        match self.mode {
            ReplanMode::Restart => {
                self.reseed(graph, current_start, ep.goal);
            }
            ReplanMode::Incremental => {
                self.km += graph.estimate(self.metric.as_ref(), ep.last_start, current_start);
                let ep = Episode {
                    start: current_start,
                    goal: ep.goal,
                    last_start: current_start,
                };
                self.episode = Some(ep);

                let mut pbuf = std::mem::take(&mut self.pbuf);
                for &o in fresh.iter() {
                    self.update_vertex(graph, o, ep);
                    pbuf.clear();
                    graph.predecessors(o, &mut pbuf);
                    for &p in pbuf.iter() {
                        if !self.blocked(graph, p) {
                            self.update_vertex(graph, p, ep);
                        }
                    }
                }
                self.pbuf = pbuf;
            }
        }

        let ep = self.episode?;
        self.plan(graph, ep)
    }
}

impl<G> PathfindingAlgorithm<G> for DStarLite<G::Node>
where
    G: Graph,
{
    fn name(&self) -> &'static str {
        "dstarlite"
    }

    fn first_time_find_path(
        &mut self,
        graph: &G,
        start: G::Node,
        goal: G::Node,
    ) -> Option<Vec<G::Node>> {
        self.find_path(graph, start, goal)
    }

    fn update_path_with_dynamic_obstacle(
        &mut self,
        graph: &G,
        current_start: G::Node,
        discovered: &[G::Node],
    ) -> Option<Vec<G::Node>> {
        self.replan(graph, current_start, discovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::AStar;
    use crate::traits::path_cost;
    use proptest::prelude::*;
    use shun_core::{Grid, GridCell, Point};

    type Map = Grid<GridCell<()>>;

    fn open_grid(w: i32, h: i32) -> Map {
        let mut g = Grid::with_cells(w, h);
        g.connect_cardinal();
        g
    }

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn planner(mode: ReplanMode) -> DStarLite<Point> {
        DStarLite::default().with_mode(mode)
    }

    fn cost(g: &Map, path: &[Point]) -> f64 {
        path_cost(g, &CostFunction::Manhattan, path)
    }

    fn assert_walkable(g: &Map, path: &[Point], avoid: &[Point]) {
        for w in path.windows(2) {
            let (dx, dy) = w[0].abs_diff(w[1]);
            assert_eq!(dx + dy, 1, "{} -> {} is not a single step", w[0], w[1]);
        }
        for c in path {
            assert!(!g.is_obstacle(*c), "{c} is an obstacle");
            assert!(!avoid.contains(c), "{c} should have been avoided");
        }
    }

    #[test]
    fn open_grid_5x5_corner_to_corner() {
        let g = open_grid(5, 5);
        let mut d = planner(ReplanMode::Restart);
        let path = d.find_path(&g, p(0, 0), p(4, 4)).unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.first(), Some(&p(0, 0)));
        assert_eq!(path.last(), Some(&p(4, 4)));
        assert_walkable(&g, &path, &[]);
        assert_eq!(cost(&g, &path), 8.0);
        assert_eq!(d.g(p(0, 0)), 8.0);
        assert_eq!(d.g(p(4, 4)), 0.0);
    }

    #[test]
    fn wall_with_gap() {
        let mut g = open_grid(5, 5);
        for y in 0..4 {
            g.set_obstacle(p(2, y), true);
        }
        let mut d = planner(ReplanMode::Restart);
        let path = d.find_path(&g, p(0, 0), p(4, 4)).unwrap();
        assert!(path.contains(&p(2, 4)));
        assert_walkable(&g, &path, &[]);
        assert_eq!(cost(&g, &path), 8.0);
    }

    #[test]
    fn start_equals_goal() {
        let g = open_grid(3, 3);
        let mut d = planner(ReplanMode::Restart);
        assert_eq!(d.find_path(&g, p(2, 1), p(2, 1)), Some(vec![p(2, 1)]));
    }

    #[test]
    fn walled_off_goal_is_unreachable() {
        let mut g = open_grid(6, 6);
        for q in [p(4, 5), p(4, 4), p(5, 4)] {
            g.set_obstacle(q, true);
        }
        let mut d = planner(ReplanMode::Restart);
        assert_eq!(d.find_path(&g, p(0, 0), p(5, 5)), None);
        assert!(d.g(p(0, 0)).is_infinite());
    }

    #[test]
    fn blocked_or_out_of_bounds_endpoints() {
        let mut g = open_grid(3, 3);
        let mut d = planner(ReplanMode::Restart);
        assert_eq!(d.find_path(&g, p(0, 0), p(5, 5)), None);
        assert_eq!(d.goal(), None);
        g.set_obstacle(p(0, 0), true);
        assert_eq!(d.find_path(&g, p(0, 0), p(2, 2)), None);
    }

    #[test]
    fn replan_before_first_search_is_none() {
        let g = open_grid(3, 3);
        let mut d = planner(ReplanMode::Incremental);
        assert_eq!(d.replan(&g, p(0, 0), &[p(1, 1)]), None);
    }

    #[test]
    fn first_time_search_is_idempotent() {
        let mut g = open_grid(7, 7);
        for x in 1..6 {
            g.set_obstacle(p(x, 3), true);
        }
        let mut d = planner(ReplanMode::Restart);
        let a = d.find_path(&g, p(3, 0), p(3, 6)).unwrap();
        let b = d.find_path(&g, p(3, 0), p(3, 6)).unwrap();
        assert_eq!(cost(&g, &a), cost(&g, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn matches_astar_on_static_obstacles() {
        let mut g = open_grid(9, 7);
        for y in 0..6 {
            g.set_obstacle(p(2, y), true);
        }
        for y in 1..7 {
            g.set_obstacle(p(5, y), true);
        }
        g.set_obstacle(p(7, 2), true);
        let mut d = planner(ReplanMode::Restart);
        let mut a = AStar::<Point>::default();
        let dp = d.find_path(&g, p(0, 0), p(8, 6)).unwrap();
        let ap = a.find_path(&g, p(0, 0), p(8, 6)).unwrap();
        assert_walkable(&g, &dp, &[]);
        assert_eq!(cost(&g, &dp), cost(&g, &ap));
    }

    fn dynamic_repair(mode: ReplanMode) {
        let g = open_grid(7, 7);
        let mut d = planner(mode);
        let p1 = d.find_path(&g, p(0, 3), p(6, 3)).unwrap();
        // Manhattan distance 6 on an open grid forces the straight row.
        assert_eq!(p1.len(), 7);
        let x = p(3, 3);
        assert!(p1.contains(&x));

        // The agent has walked two steps before seeing the obstacle.
        let here = p1[2];
        let p2 = d.replan(&g, here, &[x]).unwrap();
        assert_eq!(p2.first(), Some(&here));
        assert_eq!(p2.last(), Some(&p(6, 3)));
        assert_walkable(&g, &p2, &[x]);
        assert!(cost(&g, &p2) >= cost(&g, &p1[2..]));
        assert_eq!(cost(&g, &p2), 6.0);
        assert!(d.known_obstacles().contains(&x));
    }

    #[test]
    fn dynamic_repair_restart() {
        dynamic_repair(ReplanMode::Restart);
    }

    #[test]
    fn dynamic_repair_incremental() {
        dynamic_repair(ReplanMode::Incremental);
    }

    #[test]
    fn incremental_mode_accumulates_km() {
        let g = open_grid(6, 6);
        let mut d = planner(ReplanMode::Incremental);
        let path = d.find_path(&g, p(0, 0), p(5, 5)).unwrap();
        assert_eq!(d.km(), 0.0);
        d.replan(&g, path[1], &[]).unwrap();
        assert_eq!(d.km(), 1.0);
        d.replan(&g, p(1, 1), &[]).unwrap();
        assert_eq!(d.km(), 2.0);
        assert_eq!(d.start(), Some(p(1, 1)));
    }

    #[test]
    fn restart_mode_keeps_earlier_obstacles() {
        let g = open_grid(5, 3);
        let mut d = planner(ReplanMode::Restart);
        d.find_path(&g, p(0, 1), p(4, 1)).unwrap();
        let a = d.replan(&g, p(0, 1), &[p(2, 1)]).unwrap();
        assert!(!a.contains(&p(2, 1)));
        let b = d.replan(&g, p(0, 1), &[p(2, 0)]).unwrap();
        assert_walkable(&g, &b, &[p(2, 1), p(2, 0)]);
        assert!(b.contains(&p(2, 2)));
        assert_eq!(d.km(), 0.0);
    }

    #[test]
    fn discovered_wall_cuts_off_goal() {
        let g = open_grid(5, 5);
        for mode in [ReplanMode::Restart, ReplanMode::Incremental] {
            let mut d = planner(mode);
            d.find_path(&g, p(0, 0), p(4, 4)).unwrap();
            let wall = [p(3, 4), p(4, 3)];
            assert_eq!(d.replan(&g, p(0, 0), &wall), None, "{mode}");
            // A fresh search forgets what was reported.
            assert!(d.find_path(&g, p(0, 0), p(4, 4)).is_some(), "{mode}");
            assert!(d.known_obstacles().is_empty());
        }
    }

    #[test]
    fn directed_graph_uses_in_edges_for_propagation() {
        // One-way ring: 0,0 -> 1,0 -> 1,1 -> 0,1 -> 0,0.
        let mut g: Map = Grid::with_cells(2, 2);
        g.link_directed(p(0, 0), p(1, 0), 0.0);
        g.link_directed(p(1, 0), p(1, 1), 0.0);
        g.link_directed(p(1, 1), p(0, 1), 0.0);
        g.link_directed(p(0, 1), p(0, 0), 0.0);
        let mut d = planner(ReplanMode::Restart);
        let path = d.find_path(&g, p(0, 0), p(0, 1)).unwrap();
        assert_eq!(path, vec![p(0, 0), p(1, 0), p(1, 1), p(0, 1)]);
        assert_eq!(d.next_hop(p(0, 0)), Some(p(1, 0)));
    }

    #[test]
    fn path_follows_edge_costs_not_just_g() {
        // The direct hop (0,0) -> (1,0) carries a toll of 5; the detour
        // through the bottom row costs 4.
        let mut g = open_grid(3, 2);
        g.unlink_directed(p(0, 0), p(1, 0));
        g.link_directed(p(0, 0), p(1, 0), 5.0);
        for mode in [ReplanMode::Restart, ReplanMode::Incremental] {
            let mut d = planner(mode);
            let path = d.find_path(&g, p(0, 0), p(2, 0)).unwrap();
            assert_eq!(path[1], p(0, 1));
            assert!(!path.windows(2).any(|w| w == [p(0, 0), p(1, 0)]));
            assert_eq!(cost(&g, &path), 4.0);
            assert_eq!(d.g(p(0, 0)), 4.0);

            let mut a = AStar::<Point>::default();
            let ap = a.find_path(&g, p(0, 0), p(2, 0)).unwrap();
            assert_eq!(cost(&g, &ap), cost(&g, &path));
        }
    }

    #[test]
    fn parse_replan_modes() {
        assert_eq!("restart".parse::<ReplanMode>(), Ok(ReplanMode::Restart));
        assert_eq!("Incremental".parse::<ReplanMode>(), Ok(ReplanMode::Incremental));
        assert!("lazy".parse::<ReplanMode>().is_err());
    }

    /// Random obstacle layout on a small open grid, encoded row-major.
    fn grid_from_mask(w: i32, h: i32, mask: &[bool], diagonal: bool) -> Map {
        let mut g: Map = Grid::with_cells(w, h);
        if diagonal {
            g.connect_all();
        } else {
            g.connect_cardinal();
        }
        for (i, &blocked) in mask.iter().enumerate() {
            let q = p(i as i32 % w, i as i32 / w);
            if q != p(0, 0) && q != p(w - 1, h - 1) {
                g.set_obstacle(q, blocked);
            }
        }
        g
    }

    proptest! {
        #[test]
        fn same_cost_as_astar(mask in proptest::collection::vec(prop::bool::weighted(0.3), 48)) {
            let g = grid_from_mask(8, 6, &mask, false);
            let (s, t) = (p(0, 0), p(7, 5));
            let mut a = AStar::<Point>::default();
            let mut d = planner(ReplanMode::Restart);
            let ap = a.find_path(&g, s, t);
            let dp = d.find_path(&g, s, t);
            prop_assert_eq!(ap.is_some(), dp.is_some());
            if let (Some(ap), Some(dp)) = (ap, dp) {
                prop_assert_eq!(cost(&g, &ap), cost(&g, &dp));
            }
        }

        #[test]
        fn same_cost_as_astar_octile(mask in proptest::collection::vec(prop::bool::weighted(0.3), 48)) {
            let g = grid_from_mask(8, 6, &mask, true);
            let (s, t) = (p(0, 0), p(7, 5));
            let mut a = AStar::<Point>::with_metric(CostFunction::Octile);
            let mut d = DStarLite::<Point>::with_metric(CostFunction::Octile);
            let ap = a.find_path(&g, s, t);
            let dp = d.find_path(&g, s, t);
            prop_assert_eq!(ap.is_some(), dp.is_some());
            if let (Some(ap), Some(dp)) = (ap, dp) {
                let ac = path_cost(&g, &CostFunction::Octile, &ap);
                let dc = path_cost(&g, &CostFunction::Octile, &dp);
                prop_assert!((ac - dc).abs() < 1e-9, "astar {} dstar {}", ac, dc);
                prop_assert!((dc - d.g(s)).abs() < 1e-9);
            }
        }

        #[test]
        fn incremental_and_restart_agree(
            mask in proptest::collection::vec(prop::bool::weighted(0.2), 48),
            reveal in proptest::collection::vec((0i32..8, 0i32..6), 1..6),
        ) {
            let g = grid_from_mask(8, 6, &mask, false);
            let (s, t) = (p(0, 0), p(7, 5));
            let mut restart = planner(ReplanMode::Restart);
            let mut incremental = planner(ReplanMode::Incremental);
            let Some(first) = restart.find_path(&g, s, t) else {
                return Ok(());
            };
            incremental.find_path(&g, s, t);

            let here = first[1.min(first.len() - 1)];
            let found: Vec<Point> = reveal
                .into_iter()
                .map(|(x, y)| p(x, y))
                .filter(|&q| q != here && q != t)
                .collect();
            let r = restart.replan(&g, here, &found);
            let i = incremental.replan(&g, here, &found);
            prop_assert_eq!(r.is_some(), i.is_some());
            if let (Some(r), Some(i)) = (r, i) {
                prop_assert_eq!(cost(&g, &r), cost(&g, &i));
                prop_assert!(cost(&g, &r) >= cost(&g, &first[1.min(first.len() - 1)..]));
                for q in &found {
                    prop_assert!(!r.contains(q));
                    prop_assert!(!i.contains(q));
                }
            }
        }
    }
}
