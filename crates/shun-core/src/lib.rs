//! **shun-core** — grid and geometry types for the *shun* pathfinding engine.
//!
//! This crate provides the topology side of the engine: integer grid indices,
//! a fixed-size [`Grid`] container with world-space layout, and
//! [`GridCell`] vertices carrying obstacle flags and directed adjacency.
//! Search algorithms live in `shun-paths`.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{Edge, GridCell};
pub use geom::{Point, Range, RangeIter, WorldPos};
pub use grid::{Grid, GridIter, WorldLayout};
