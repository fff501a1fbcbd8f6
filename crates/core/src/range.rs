//! Bar-range resolution.
//!
//! Turns raw endpoint input into a canonical contiguous bar-index range
//! restricted to non-gap bars. Both overlay paths resolve their range
//! through here every render, so extend-to-last requests pick up newly
//! arrived bars automatically.

use serde::{Deserialize, Serialize};

use crate::types::{BarIndex, BarSeries};

/// Inclusive, ordered bar-index range with valid bars at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarRange {
    /// First bar index (non-gap).
    pub from: BarIndex,
    /// Last bar index (non-gap), >= `from`.
    pub to: BarIndex,
}

impl BarRange {
    /// Number of slots covered, gaps included.
    pub fn len(&self) -> usize {
        self.to - self.from + 1
    }

    /// Iterate the covered indices in ascending order.
    pub fn indices(&self) -> std::ops::RangeInclusive<BarIndex> {
        self.from..=self.to
    }

    /// Whether `index` falls inside the range.
    pub fn contains(&self, index: BarIndex) -> bool {
        self.from <= index && index <= self.to
    }
}

/// Raw endpoint input for range resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeEndpoints {
    /// Two explicit endpoints, in either order.
    Fixed { a: BarIndex, b: BarIndex },
    /// One endpoint, extended to the last available bar.
    ExtendToLast { from: BarIndex },
}

/// Resolve raw endpoints into a canonical [`BarRange`].
///
/// Endpoints are ordered, clamped to the series, and snapped across gaps:
/// the lower endpoint to the nearest valid bar at/after it, the upper to
/// the nearest valid bar at/before it. Returns `None` when fewer than two
/// valid bars survive; callers skip computation in that case.
pub fn resolve<S: BarSeries + ?Sized>(series: &S, endpoints: RangeEndpoints) -> Option<BarRange> {
    let last = series.last_index()?;

    let (mut from, mut to) = match endpoints {
        RangeEndpoints::Fixed { a, b } => {
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        }
        RangeEndpoints::ExtendToLast { from } => (from, last),
    };
    from = from.min(last);
    to = to.min(last);

    // Snap across gap bars at both ends. Both endpoints are valid bars
    // afterwards, so `from < to` implies at least two valid bars.
    while from <= to && series.bar(from).is_none() {
        from += 1;
    }
    while to > from && series.bar(to).is_none() {
        to -= 1;
    }
    if from >= to {
        return None;
    }

    Some(BarRange { from, to })
}
