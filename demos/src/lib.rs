//! A sensing agent walking through a partially known map.
//!
//! The map is drawn in ASCII. Walls (`#`) are known up front; hidden
//! obstacles (`x`) are only reported to the planner once the agent gets within
//! its sensor radius. The agent always takes the first step of its current
//! plan and replans whenever it senses something new.

use std::collections::HashSet;
use std::fmt;

use log::debug;
use shun_core::{Grid, GridCell, Point, Range};
use shun_paths::PathfindingAlgorithm;

pub type Map = Grid<GridCell<()>>;

/// The built-in scenario: a wall with a single gap, and hidden obstacles on
/// both sides of it.
pub const DEFAULT_MAP: &str = "\
S.......#.......
........#.......
..xxxx..#..x....
.....x.....x....
.....x..#..x....
..xxxx..#..xxx..
........#.....x.
........#....xG.
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    Empty,
    RaggedRow { row: usize, expected: usize, found: usize },
    UnknownTile { tile: char, at: Point },
    MissingStart,
    MissingGoal,
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map is empty"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} tiles, expected {expected}"),
            Self::UnknownTile { tile, at } => write!(f, "unknown tile '{tile}' at {at}"),
            Self::MissingStart => write!(f, "map has no start tile 'S'"),
            Self::MissingGoal => write!(f, "map has no goal tile 'G'"),
        }
    }
}

impl std::error::Error for ScenarioError {}

/// A parsed map: the graph the planner sees plus the obstacles it does not.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub grid: Map,
    pub hidden: HashSet<Point>,
    pub start: Point,
    pub goal: Point,
}

impl Scenario {
    /// Parse an ASCII map. Cells are linked to their four neighbours, or to
    /// all eight when `diagonal` is set.
    pub fn parse(map: &str, diagonal: bool) -> Result<Self, ScenarioError> {
        let rows: Vec<&str> = map.lines().filter(|l| !l.trim().is_empty()).collect();
        let width = rows.first().ok_or(ScenarioError::Empty)?.chars().count();
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ScenarioError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        let mut grid: Map = Grid::with_cells(width as i32, rows.len() as i32);
        let mut hidden = HashSet::new();
        let (mut start, mut goal) = (None, None);
        for (y, line) in rows.iter().enumerate() {
            for (x, tile) in line.chars().enumerate() {
                let at = Point::new(x as i32, y as i32);
                match tile {
                    '.' => {}
                    '#' => grid.set_obstacle(at, true),
                    'x' => {
                        hidden.insert(at);
                    }
                    'S' => start = Some(at),
                    'G' => goal = Some(at),
                    _ => return Err(ScenarioError::UnknownTile { tile, at }),
                }
            }
        }

        if diagonal {
            grid.connect_all();
        } else {
            grid.connect_cardinal();
        }

        Ok(Self {
            grid,
            hidden,
            start: start.ok_or(ScenarioError::MissingStart)?,
            goal: goal.ok_or(ScenarioError::MissingGoal)?,
        })
    }

    /// Hidden obstacles within Chebyshev distance `radius` of `pos` that are
    /// not yet in `known`. They are added to `known` and returned in
    /// row-major order.
    pub fn sense(&self, pos: Point, radius: i32, known: &mut HashSet<Point>) -> Vec<Point> {
        let area = Range::new(
            pos.x - radius,
            pos.y - radius,
            pos.x + radius + 1,
            pos.y + radius + 1,
        )
        .intersect(self.grid.bounds());
        area.iter()
            .filter(|p| self.hidden.contains(p) && known.insert(*p))
            .collect()
    }

    /// Draw the map with the agent at `pos`, its current `path` and the
    /// hidden obstacles it knows about.
    pub fn render(&self, pos: Point, path: &[Point], known: &HashSet<Point>) -> String {
        let on_path: HashSet<Point> = path.iter().copied().collect();
        let (w, h) = self.grid.dimensions();
        let mut out = String::with_capacity(((w + 1) * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(x, y);
                let tile = if p == pos {
                    '@'
                } else if p == self.goal {
                    'G'
                } else if self.grid.is_obstacle(p) {
                    '#'
                } else if known.contains(&p) {
                    'X'
                } else if self.hidden.contains(&p) {
                    'x'
                } else if on_path.contains(&p) {
                    '*'
                } else {
                    '.'
                };
                out.push(tile);
            }
            out.push('\n');
        }
        out
    }
}

/// What the agent saw and planned at one position.
#[derive(Debug)]
pub struct Step<'a> {
    pub pos: Point,
    pub path: &'a [Point],
    pub discovered: &'a [Point],
    pub known: &'a HashSet<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Arrived { steps: usize, replans: usize },
    Unreachable { at: Point, steps: usize, replans: usize },
    GaveUp { at: Point, steps: usize },
}

/// Walk an agent from the scenario's start to its goal, replanning with
/// `planner` whenever the sensor reveals hidden obstacles. `observe` is
/// called once per position with the plan the agent is about to follow.
pub fn walk<F>(
    scenario: &Scenario,
    planner: &mut dyn PathfindingAlgorithm<Map>,
    radius: i32,
    max_steps: usize,
    mut observe: F,
) -> Outcome
where
    F: FnMut(&Step<'_>),
{
    let radius = radius.max(1);
    let mut pos = scenario.start;
    let mut known = HashSet::new();
    let (mut steps, mut replans) = (0, 0);

    let Some(mut path) = planner.first_time_find_path(&scenario.grid, pos, scenario.goal) else {
        return Outcome::Unreachable {
            at: pos,
            steps,
            replans,
        };
    };

    loop {
        let discovered = scenario.sense(pos, radius, &mut known);
        if !discovered.is_empty() {
            replans += 1;
            debug!(
                "{}: {} obstacles sensed at {pos}, replanning",
                planner.name(),
                discovered.len()
            );
            match planner.update_path_with_dynamic_obstacle(&scenario.grid, pos, &discovered) {
                Some(p) => path = p,
                None => {
                    return Outcome::Unreachable {
                        at: pos,
                        steps,
                        replans,
                    };
                }
            }
        }

        observe(&Step {
            pos,
            path: &path,
            discovered: &discovered,
            known: &known,
        });

        if pos == scenario.goal {
            return Outcome::Arrived { steps, replans };
        }
        if steps >= max_steps {
            return Outcome::GaveUp { at: pos, steps };
        }
        let Some(&next) = path.get(1) else {
            return Outcome::Unreachable {
                at: pos,
                steps,
                replans,
            };
        };
        path.remove(0);
        pos = next;
        steps += 1;
    }
}
