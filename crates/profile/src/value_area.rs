//! Point of control and value area resolution.
//!
//! The value area grows outward from the highest-volume bin one bin per
//! step, always taking the larger neighbor, until it covers the target
//! share of total volume. The expansion order is an observable output
//! (each bin's in/out flag is rendered), so it is fixed here and covered
//! by tests; greedy growth is not guaranteed globally volume-optimal.

use serde::{Deserialize, Serialize};

use crate::histogram::Histogram;

/// Resolved value area over a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueArea {
    /// Point of control: bin with the greatest total volume.
    pub poc: usize,
    /// Value area low boundary bin, <= `poc`.
    pub val: usize,
    /// Value area high boundary bin, >= `poc`.
    pub vah: usize,
}

impl ValueArea {
    /// Whether `bin_index` lies inside the value area.
    #[inline]
    pub fn contains(&self, bin_index: usize) -> bool {
        self.val <= bin_index && bin_index <= self.vah
    }
}

/// Resolve the point of control and value area for `target_percent`
/// (0–100) of the histogram's total volume.
///
/// The POC scan runs ascending and keeps the first bin on ties, so the
/// lowest-priced of equally heavy bins wins. When both candidate
/// neighbors hold equal volume, expansion goes downward; an exhausted
/// boundary routes expansion to the other side. Returns `None` for an
/// empty histogram.
pub fn resolve_value_area(histogram: &Histogram, target_percent: f64) -> Option<ValueArea> {
    if histogram.is_empty() {
        return None;
    }
    let bins = &histogram.bins;

    let mut poc = 0;
    for (index, bin) in bins.iter().enumerate() {
        if bin.total() > bins[poc].total() {
            poc = index;
        }
    }

    let threshold = histogram.total_volume() * target_percent / 100.0;
    let mut accumulated = bins[poc].total();
    let mut val = poc;
    let mut vah = poc;

    while accumulated < threshold {
        let below = val.checked_sub(1);
        let above = (vah + 1 < bins.len()).then_some(vah + 1);

        let expand_down = match (below, above) {
            (Some(b), Some(a)) => bins[b].total() >= bins[a].total(),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        if expand_down {
            val -= 1;
            accumulated += bins[val].total();
        } else {
            vah += 1;
            accumulated += bins[vah].total();
        }
    }

    Some(ValueArea { poc, val, vah })
}
