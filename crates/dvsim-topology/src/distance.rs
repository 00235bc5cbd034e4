//! Path cost with an explicit "unreachable" sentinel.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// Best-known cost from one node to another.
///
/// Every finite distance orders below [`Distance::Infinite`]. Addition
/// saturates and anything plus `Infinite` stays `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Distance {
    /// A known path cost
    Finite(i64),
    /// No known path
    Infinite,
}

impl Distance {
    /// Distance from a node to itself.
    pub const ZERO: Self = Distance::Finite(0);

    /// Whether a path is known.
    pub const fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// The finite cost, if any.
    pub const fn value(&self) -> Option<i64> {
        match self {
            Distance::Finite(cost) => Some(*cost),
            Distance::Infinite => None,
        }
    }
}

impl From<i64> for Distance {
    fn from(cost: i64) -> Self {
        Distance::Finite(cost)
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Distance::Finite(a), Distance::Finite(b)) => a.cmp(b),
            (Distance::Finite(_), Distance::Infinite) => Ordering::Less,
            (Distance::Infinite, Distance::Finite(_)) => Ordering::Greater,
            (Distance::Infinite, Distance::Infinite) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        match (self, rhs) {
            (Distance::Finite(a), Distance::Finite(b)) => Distance::Finite(a.saturating_add(b)),
            _ => Distance::Infinite,
        }
    }
}

impl Add<i64> for Distance {
    type Output = Distance;

    fn add(self, rhs: i64) -> Distance {
        self + Distance::Finite(rhs)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(cost) => write!(f, "{}", cost),
            Distance::Infinite => f.write_str("∞"),
        }
    }
}
