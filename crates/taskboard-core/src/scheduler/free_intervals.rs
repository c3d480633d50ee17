//! Unallocated time tracking for a single day.
//!
//! Free time is kept as a sorted list of disjoint half-open `[start, end)`
//! intervals. Busy ranges are carved out with [`FreeIntervals::subtract`],
//! the only mutator.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` span of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the two spans share any instant.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Restrict to `[lower, upper]`. May produce an empty interval.
    pub fn clamp(&self, lower: NaiveDateTime, upper: NaiveDateTime) -> Interval {
        Interval::new(self.start.max(lower), self.end.min(upper))
    }
}

/// Gap to keep clear on each side of a busy range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub before: Duration,
    pub after: Duration,
}

impl Padding {
    pub fn none() -> Self {
        Self::symmetric(Duration::zero())
    }

    /// Same gap on both sides, used for immovable events.
    pub fn symmetric(gap: Duration) -> Self {
        Self {
            before: gap,
            after: gap,
        }
    }

    /// Gap after the range only, used between sequential task blocks.
    pub fn trailing(gap: Duration) -> Self {
        Self {
            before: Duration::zero(),
            after: gap,
        }
    }
}

/// Sorted, disjoint free intervals of the day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeIntervals {
    intervals: Vec<Interval>,
}

impl FreeIntervals {
    /// Start with the whole `[start, end)` window free. An empty or inverted
    /// window yields no free time at all.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let window = Interval::new(start, end);
        let intervals = if window.is_empty() {
            Vec::new()
        } else {
            vec![window]
        };
        Self { intervals }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total free time remaining.
    pub fn total(&self) -> Duration {
        self.intervals
            .iter()
            .fold(Duration::zero(), |acc, i| acc + i.duration())
    }

    /// Remove `busy` from every free interval it overlaps.
    ///
    /// Each overlapped interval is replaced by at most two remainders:
    /// `[start, busy.start - before)` and `[busy.end + after, end)`, each kept
    /// only if non-empty. Intervals that do not overlap the unpadded busy
    /// range are left untouched.
    pub fn subtract(&mut self, busy: Interval, padding: Padding) {
        let mut remaining = Vec::with_capacity(self.intervals.len() + 1);

        for free in self.intervals.drain(..) {
            if !free.overlaps(&busy) {
                remaining.push(free);
                continue;
            }

            let head_end = busy.start - padding.before;
            if free.start < head_end {
                remaining.push(Interval::new(free.start, head_end));
            }

            let tail_start = busy.end + padding.after;
            if tail_start < free.end {
                remaining.push(Interval::new(tail_start, free.end));
            }
        }

        remaining.sort_by_key(|i| i.start);
        tracing::trace!(
            busy_start = %busy.start,
            busy_end = %busy.end,
            free_intervals = remaining.len(),
            "free intervals updated"
        );
        self.intervals = remaining;
    }
}
