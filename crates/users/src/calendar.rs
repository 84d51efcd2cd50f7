use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day event counter.
///
/// Days without an entry count as zero. Entries never hold zero: a day whose
/// count drops to zero is removed, so an all-zero calendar is `Calendar::empty()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Calendar {
    counts: BTreeMap<NaiveDate, u32>,
}

impl Calendar {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Count one more event on `date`. Saturates at `u32::MAX`.
    pub fn increment_event_count(&mut self, date: NaiveDate) {
        let count = self.counts.entry(date).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Count one event less on `date`, clamping at zero.
    pub fn decrement_event_count(&mut self, date: NaiveDate) {
        match self.counts.get_mut(&date) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.counts.remove(&date);
            }
            None => {
                tracing::warn!(%date, "decrement on a day without events; clamped at zero");
            }
        }
    }

    pub fn num_events_on_day(&self, date: NaiveDate) -> u32 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Days with at least one event, in date order.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.counts.iter().map(|(date, count)| (*date, *count))
    }
}

impl FromIterator<(NaiveDate, u32)> for Calendar {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u32)>>(iter: I) -> Self {
        let counts = iter.into_iter().filter(|(_, count)| *count > 0).collect();
        Self { counts }
    }
}
