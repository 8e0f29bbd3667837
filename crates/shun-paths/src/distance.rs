//! Distance metrics used both as heuristics and as per-step movement costs.
//!
//! Every metric takes the absolute index differences `(dx, dy)` between two
//! cells. For A* to return optimal paths the metric must be admissible and
//! consistent with the grid's movement model; that is up to the caller.

use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// Manhattan (L1) distance.
#[inline]
pub fn manhattan(dx: u32, dy: u32) -> f64 {
    f64::from(dx) + f64::from(dy)
}

/// Euclidean (L2) distance.
#[inline]
pub fn euclidean(dx: u32, dy: u32) -> f64 {
    f64::from(dx).hypot(f64::from(dy))
}

/// Octile distance: diagonal steps cost √2, straight steps cost 1.
#[inline]
pub fn octile(dx: u32, dy: u32) -> f64 {
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    f64::from(hi) + (SQRT_2 - 1.0) * f64::from(lo)
}

/// Chebyshev (L∞) distance.
#[inline]
pub fn chebyshev(dx: u32, dy: u32) -> f64 {
    f64::from(dx.max(dy))
}

/// A pluggable distance metric over absolute index deltas.
///
/// Implemented by [`CostFunction`] and by any `Fn(u32, u32) -> f64`.
pub trait DistanceCost: Send + Sync {
    fn cost(&self, dx: u32, dy: u32) -> f64;
}

impl<F> DistanceCost for F
where
    F: Fn(u32, u32) -> f64 + Send + Sync,
{
    #[inline]
    fn cost(&self, dx: u32, dy: u32) -> f64 {
        self(dx, dy)
    }
}

/// The built-in metrics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CostFunction {
    #[default]
    Manhattan,
    Euclidean,
    Octile,
    Chebyshev,
}

impl CostFunction {
    pub const ALL: [CostFunction; 4] = [
        CostFunction::Manhattan,
        CostFunction::Euclidean,
        CostFunction::Octile,
        CostFunction::Chebyshev,
    ];

    /// Lowercase selector name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
            Self::Octile => "octile",
            Self::Chebyshev => "chebyshev",
        }
    }
}

impl DistanceCost for CostFunction {
    #[inline]
    fn cost(&self, dx: u32, dy: u32) -> f64 {
        match self {
            Self::Manhattan => manhattan(dx, dy),
            Self::Euclidean => euclidean(dx, dy),
            Self::Octile => octile(dx, dy),
            Self::Chebyshev => chebyshev(dx, dy),
        }
    }
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CostFunction {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PathError::invalid("cost function", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn metric_values() {
        assert_eq!(manhattan(3, 4), 7.0);
        assert!(close(euclidean(3, 4), 5.0));
        assert!(close(octile(3, 4), 4.0 + (SQRT_2 - 1.0) * 3.0));
        assert!(close(octile(4, 3), octile(3, 4)));
        assert_eq!(chebyshev(3, 4), 4.0);
    }

    #[test]
    fn metrics_agree_on_straight_lines() {
        for c in CostFunction::ALL {
            assert!(close(c.cost(5, 0), 5.0), "{c}");
            assert!(close(c.cost(0, 2), 2.0), "{c}");
            assert_eq!(c.cost(0, 0), 0.0, "{c}");
        }
    }

    #[test]
    fn metric_ordering_on_diagonal() {
        // chebyshev <= octile, euclidean <= manhattan for any delta.
        for dx in 0..6 {
            for dy in 0..6 {
                let ch = chebyshev(dx, dy);
                let oc = octile(dx, dy);
                let eu = euclidean(dx, dy);
                let ma = manhattan(dx, dy);
                assert!(ch <= oc + 1e-9);
                assert!(eu <= oc + 1e-9);
                assert!(oc <= ma + 1e-9);
            }
        }
    }

    #[test]
    fn parse_selectors() {
        assert_eq!("manhattan".parse::<CostFunction>(), Ok(CostFunction::Manhattan));
        assert_eq!(" Octile ".parse::<CostFunction>(), Ok(CostFunction::Octile));
        assert_eq!("CHEBYSHEV".parse::<CostFunction>(), Ok(CostFunction::Chebyshev));
        for c in CostFunction::ALL {
            assert_eq!(c.to_string().parse::<CostFunction>(), Ok(c));
        }
    }

    #[test]
    fn parse_rejects_unknown_selector() {
        let err = "taxicab".parse::<CostFunction>().unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidConfiguration {
                what: "cost function",
                value: "taxicab".into()
            }
        );
    }

    #[test]
    fn closures_are_metrics() {
        let doubled = |dx: u32, dy: u32| 2.0 * manhattan(dx, dy);
        assert_eq!(doubled.cost(1, 2), 6.0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn cost_function_uses_lowercase_names() {
        let json = serde_json::to_string(&CostFunction::Octile).unwrap();
        assert_eq!(json, "\"octile\"");
        let back: CostFunction = serde_json::from_str("\"euclidean\"").unwrap();
        assert_eq!(back, CostFunction::Euclidean);
    }
}
