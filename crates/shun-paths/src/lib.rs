//! Shortest-path planning on grid graphs with obstacles discovered on the way.
//!
//! Two planners are provided behind the common [`PathfindingAlgorithm`]
//! interface:
//!
//! - **A\*** ([`AStar`]) searches from scratch every time it is asked.
//! - **D\* Lite** ([`DStarLite`]) searches backwards from the goal and keeps
//!   its state between calls, so that newly discovered obstacles only cost a
//!   local repair ([`ReplanMode::Incremental`]) or a reseeded search that
//!   remembers them ([`ReplanMode::Restart`]).
//!
//! Planners own all of their per-node scratch state. The graph is only read,
//! through the [`Graph`] capability trait, which `shun_core`'s
//! `Grid<GridCell<T>>` implements.
//!
//! Step costs and heuristics come from a [`DistanceCost`], normally one of the
//! built-in [`CostFunction`]s. [`PathfinderConfig`] picks a planner and a
//! metric from selector strings such as `"d*lite"` and `"octile"`.
//!
//! ```
//! use shun_core::{Grid, GridCell, Point};
//! use shun_paths::{PathfinderConfig, PathfindingAlgorithm};
//!
//! let mut grid: Grid<GridCell<()>> = Grid::with_cells(5, 5);
//! grid.connect_cardinal();
//!
//! let mut planner = PathfinderConfig::from_selectors("dstar", "manhattan")
//!     .unwrap()
//!     .build::<Grid<GridCell<()>>>();
//! let path = planner
//!     .first_time_find_path(&grid, Point::new(0, 0), Point::new(4, 4))
//!     .unwrap();
//! assert_eq!(path.len(), 9);
//!
//! let path = planner
//!     .update_path_with_dynamic_obstacle(&grid, path[1], &[path[2]])
//!     .unwrap();
//! assert!(path.len() >= 8);
//! ```

mod astar;
mod distance;
mod dstar;
mod error;
mod heap;
mod pathfinder;
mod traits;

pub use astar::{AStar, AstarNode};
pub use distance::{CostFunction, DistanceCost, chebyshev, euclidean, manhattan, octile};
pub use dstar::{DStarLite, ReplanMode};
pub use error::PathError;
pub use heap::{IndexedHeap, Key};
pub use pathfinder::{Algorithm, PathfinderConfig, PathfindingAlgorithm};
pub use traits::{Graph, path_cost};
