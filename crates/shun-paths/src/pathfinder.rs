//! The common planner interface and string-selectable configuration.

use std::fmt;
use std::str::FromStr;

use crate::astar::AStar;
use crate::distance::CostFunction;
use crate::dstar::{DStarLite, ReplanMode};
use crate::error::PathError;
use crate::traits::Graph;

/// A planner that computes an initial path and repairs it as an agent moves
/// and discovers obstacles the graph did not report.
///
/// Paths run from the start to the goal inclusive; `None` means the goal is
/// unreachable.
pub trait PathfindingAlgorithm<G: Graph> {
    /// Short selector-style name, e.g. `"astar"`.
    fn name(&self) -> &'static str;

    /// Begin a new episode: forget previously discovered obstacles and plan
    /// from `start` to `goal`.
    fn first_time_find_path(
        &mut self,
        graph: &G,
        start: G::Node,
        goal: G::Node,
    ) -> Option<Vec<G::Node>>;

    /// Treat every node in `discovered` as blocked from now on and replan
    /// from `current_start` to the episode's goal.
    ///
    /// Returns `None` if no episode has been started.
    fn update_path_with_dynamic_obstacle(
        &mut self,
        graph: &G,
        current_start: G::Node,
        discovered: &[G::Node],
    ) -> Option<Vec<G::Node>>;
}

/// Available planners.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    AStar,
    #[default]
    DStarLite,
}

impl Algorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Self::AStar => "astar",
            Self::DStarLite => "dstarlite",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "astar" | "a*" => Ok(Self::AStar),
            "dstar" | "dstarlite" | "d*" | "d*lite" => Ok(Self::DStarLite),
            _ => Err(PathError::invalid("algorithm", s)),
        }
    }
}

/// Planner selection: which algorithm, which metric and, for D* Lite, how to
/// replan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    pub algorithm: Algorithm,
    pub cost: CostFunction,
    pub replan: ReplanMode,
}

impl PathfinderConfig {
    /// Parse the algorithm and cost function selectors, keeping the default
    /// replan mode.
    pub fn from_selectors(algorithm: &str, cost: &str) -> Result<Self, PathError> {
        Ok(Self {
            algorithm: algorithm.parse()?,
            cost: cost.parse()?,
            replan: ReplanMode::default(),
        })
    }

    /// Set the replan mode (builder).
    pub fn with_replan(mut self, replan: ReplanMode) -> Self {
        self.replan = replan;
        self
    }

    /// Instantiate the configured planner for graphs of type `G`.
    pub fn build<G>(&self) -> Box<dyn PathfindingAlgorithm<G>>
    where
        G: Graph,
        G::Node: 'static,
    {
        match self.algorithm {
            Algorithm::AStar => Box::new(AStar::<G::Node>::with_metric(self.cost)),
            Algorithm::DStarLite => {
                Box::new(DStarLite::<G::Node>::with_metric(self.cost).with_mode(self.replan))
            }
        }
    }
}
