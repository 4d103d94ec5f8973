use derive_more::Display;
use ordered_float::OrderedFloat;

use crate::cost::Cost;

/// The ranking tuple for priority frontiers.
///
/// We prefer lower priorities, and tie break on insertion order so that
/// entries with equal priority come out first-in-first-out regardless of
/// how the heap shuffles them.
///
/// ```
/// use statespace::rank::Rank;
///
/// assert!(Rank::new(1.0, 7) < Rank::new(2.0, 0));
/// assert!(Rank::new(1.0, 0) < Rank::new(1.0, 1));
/// ```
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{priority}#{sequence}")]
pub struct Rank {
    priority: OrderedFloat<Cost>,
    sequence: u64,
}

impl Rank {
    #[inline(always)]
    #[must_use]
    pub fn new(priority: Cost, sequence: u64) -> Self {
        Self {
            priority: OrderedFloat(priority),
            sequence,
        }
    }

    #[inline(always)]
    pub fn priority(&self) -> Cost {
        self.priority.into_inner()
    }
    #[inline(always)]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}
