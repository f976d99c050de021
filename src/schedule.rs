// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Schedule Validation

use chrono::NaiveDateTime;

use crate::error::InputError;
use crate::types::{DutyPeriod, SleepPeriod};

/// Validate a trip and return its duty periods sorted by start time.
///
/// Indexes in `InvalidDutyPeriod` refer to the caller's ordering, indexes in
/// `OverlappingDutyPeriods` to the sorted ordering.
pub fn validate_schedule(duty_periods: &[DutyPeriod]) -> Result<Vec<DutyPeriod>, InputError> {
    if duty_periods.is_empty() {
        return Err(InputError::EmptySchedule);
    }
    if let Some((index, duty)) = duty_periods.iter().enumerate().find(|(_, d)| d.end <= d.start) {
        return Err(InputError::InvalidDutyPeriod {
            index,
            start: duty.start,
            end: duty.end,
        });
    }

    let mut sorted = duty_periods.to_vec();
    sorted.sort_by_key(|d| (d.start, d.end));

    for (index, pair) in sorted.windows(2).enumerate() {
        if pair[1].start < pair[0].end {
            return Err(InputError::OverlappingDutyPeriods {
                index: index + 1,
                previous_end: pair[0].end,
                start: pair[1].start,
            });
        }
    }
    Ok(sorted)
}

/// Validate a recorded sleep list against an already validated trip and
/// return it sorted by start time.
///
/// Indexes follow the same convention as [`validate_schedule`].
pub fn validate_sleep(sleep_periods: &[SleepPeriod], duties: &[DutyPeriod]) -> Result<Vec<SleepPeriod>, InputError> {
    if let Some((index, sleep)) = sleep_periods.iter().enumerate().find(|(_, s)| s.end <= s.start) {
        return Err(InputError::InvalidSleepPeriod {
            index,
            start: sleep.start,
            end: sleep.end,
        });
    }

    let mut sorted = sleep_periods.to_vec();
    sorted.sort_by_key(|s| (s.start, s.end));

    for (index, pair) in sorted.windows(2).enumerate() {
        if pair[1].start < pair[0].end {
            return Err(InputError::OverlappingSleepPeriods {
                index: index + 1,
                previous_end: pair[0].end,
                start: pair[1].start,
            });
        }
    }
    if let Some((index, sleep)) = sorted
        .iter()
        .enumerate()
        .find(|(_, s)| duties.iter().any(|d| s.overlaps(d)))
    {
        return Err(InputError::SleepDuringDuty {
            index,
            start: sleep.start,
            end: sleep.end,
        });
    }
    Ok(sorted)
}

// ---------------------------------------------------------------------------
// Interval cursor
// ---------------------------------------------------------------------------

/// Anything with a half-open `[start, end)` span.
pub trait Interval {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime);
}

impl Interval for DutyPeriod {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.start, self.end)
    }
}

impl Interval for SleepPeriod {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.start, self.end)
    }
}

/// Forward-only membership test over sorted, non-overlapping intervals.
///
/// Queries must be non-decreasing in time; each interval is visited once.
pub struct IntervalCursor<'a, T> {
    intervals: &'a [T],
    next: usize,
}

impl<'a, T: Interval> IntervalCursor<'a, T> {
    pub fn new(intervals: &'a [T]) -> Self {
        Self { intervals, next: 0 }
    }

    pub fn contains(&mut self, t: NaiveDateTime) -> bool {
        while let Some(interval) = self.intervals.get(self.next) {
            let (start, end) = interval.span();
            if t >= end {
                self.next += 1;
                continue;
            }
            return t >= start;
        }
        false
    }
}
