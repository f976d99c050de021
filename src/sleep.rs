// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Sleep Opportunity Predictor

//! Heuristic sleep placement between duty periods.
//!
//! Each gap gets at most one pre-duty sleep, placed by the forbidden-zone
//! rule. Layovers of a day or more also get one anchored sleep per night
//! outside that pre-duty sleep. The gap before the first duty period is
//! synthetic: the crew member is assumed to have had a normal night at home.
//! A final pass caps total sleep per calendar date.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::{debug, warn};

use crate::model::SleepParams;
use crate::types::{DutyPeriod, SleepPeriod};

/// Predict sleep opportunities for duty periods sorted by start time.
///
/// Never fails: gaps too short for a sleep simply produce none.
pub fn predict_sleep(duty_periods: &[DutyPeriod], params: &SleepParams) -> Vec<SleepPeriod> {
    let Some(first) = duty_periods.first() else {
        return Vec::new();
    };

    let mut sleeps = Vec::new();

    let wake = wake_time(first, params);
    let gap = Gap {
        start: wake - Duration::hours(24),
        wake,
        kind: GapKind::PreTrip,
    };
    if let Some(sleep) = gap.pre_duty_sleep(params) {
        debug!(start = %sleep.start, end = %sleep.end, "pre-trip sleep");
        sleeps.push(sleep);
    }

    for (index, pair) in duty_periods.windows(2).enumerate() {
        let gap = Gap {
            start: pair[0].end + Duration::minutes(params.commute_minutes),
            wake: wake_time(&pair[1], params),
            kind: GapKind::Layover,
        };
        if gap.wake <= gap.start {
            warn!(index, duty_end = %pair[0].end, next_start = %pair[1].start, "gap shorter than commute and prep, no sleep");
            continue;
        }

        let main = gap.pre_duty_sleep(params);
        let nightly = if gap.wake - gap.start >= Duration::hours(24) {
            let (lo, hi) = gap.free_window(main.as_ref(), params);
            nightly_sleeps(gap.start, lo, hi, params)
        } else {
            Vec::new()
        };

        debug!(
            index,
            gap_start = %gap.start,
            wake = %gap.wake,
            nightly = nightly.len(),
            placed = main.is_some(),
            "layover sleep"
        );
        if main.is_none() && nightly.is_empty() {
            warn!(index, gap_start = %gap.start, wake = %gap.wake, "no sleep opportunity above minimum");
        }

        sleeps.extend(nightly);
        sleeps.extend(main);
    }

    sleeps.sort_by_key(|s| s.start);
    cap_per_day(sleeps, params)
}

/// Latest wake time that still leaves room for prep and commute.
fn wake_time(duty: &DutyPeriod, params: &SleepParams) -> NaiveDateTime {
    duty.start - Duration::minutes(params.commute_minutes + params.prep_minutes)
}

/// 23:00 (or the configured anchor) on `date_of`'s date, shifted by `days`.
fn anchor_on(date_of: NaiveDateTime, days: i64, params: &SleepParams) -> NaiveDateTime {
    let anchor = NaiveTime::from_hms_opt(params.anchor_hour, 0, 0).unwrap_or_default();
    date_of.date().and_time(anchor) + Duration::days(days)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GapKind {
    /// Synthetic night at home before the first report.
    PreTrip,
    /// Between two duty periods.
    Layover,
}

/// Rest window: `[start, wake)`.
struct Gap {
    start: NaiveDateTime,
    wake: NaiveDateTime,
    kind: GapKind,
}

impl Gap {
    fn is_morning_wake(&self, params: &SleepParams) -> bool {
        self.wake.hour() < params.morning_cutoff_hour
    }

    /// The sleep that ends the gap, placed by the forbidden-zone rule.
    ///
    /// Morning wakes sleep as soon as the previous duty is over. The
    /// synthetic pre-trip gap has no previous duty, so its sleep ends at the
    /// wake time instead.
    fn pre_duty_sleep(&self, params: &SleepParams) -> Option<SleepPeriod> {
        if self.wake <= self.start {
            return None;
        }
        let max_sleep = Duration::minutes(params.max_sleep_minutes);

        let start = match (self.is_morning_wake(params), self.kind) {
            (true, GapKind::Layover) => self.start,
            (true, GapKind::PreTrip) => self.start.max(self.wake - max_sleep),
            (false, _) => self.start.max(anchor_on(self.wake, -1, params)),
        };
        let end = (start + max_sleep).min(self.wake);

        clipped(start, end, params)
    }

    /// Part of the gap left for nightly sleeps once `main` is placed.
    fn free_window(&self, main: Option<&SleepPeriod>, params: &SleepParams) -> (NaiveDateTime, NaiveDateTime) {
        match main {
            None => (self.start, self.wake),
            Some(main) if self.is_morning_wake(params) => (main.end, self.wake),
            Some(main) => (self.start, main.start),
        }
    }
}

/// One anchored sleep per night inside `[lo, hi)`.
fn nightly_sleeps(
    gap_start: NaiveDateTime,
    lo: NaiveDateTime,
    hi: NaiveDateTime,
    params: &SleepParams,
) -> Vec<SleepPeriod> {
    let max_sleep = Duration::minutes(params.max_sleep_minutes);
    let mut nights = Vec::new();
    let mut anchor = anchor_on(gap_start, -1, params);
    while anchor < hi {
        nights.extend(clipped(anchor.max(lo), (anchor + max_sleep).min(hi), params));
        anchor += Duration::days(1);
    }
    nights
}

fn clipped(start: NaiveDateTime, end: NaiveDateTime, params: &SleepParams) -> Option<SleepPeriod> {
    if (end - start).num_minutes() < params.min_sleep_minutes {
        return None;
    }
    Some(SleepPeriod { start, end })
}

// ---------------------------------------------------------------------------
// Calendar-day cap
// ---------------------------------------------------------------------------

fn next_midnight(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_time(NaiveTime::default()) + Duration::days(1)
}

/// Split `[start, end)` at midnights into `(date, minutes)` pieces.
fn minutes_per_date(start: NaiveDateTime, end: NaiveDateTime) -> Vec<(NaiveDate, i64)> {
    let mut pieces = Vec::new();
    let mut t = start;
    while t < end {
        let piece_end = next_midnight(t).min(end);
        pieces.push((t.date(), (piece_end - t).num_minutes()));
        t = piece_end;
    }
    pieces
}

/// Trim sorted sleeps so no calendar date holds more than the maximum.
///
/// A sleep starting on a full date moves to the next midnight. A sleep that
/// runs a date over its budget ends where the budget does. Leftovers under
/// the minimum are dropped.
fn cap_per_day(sleeps: Vec<SleepPeriod>, params: &SleepParams) -> Vec<SleepPeriod> {
    let mut used: HashMap<NaiveDate, i64> = HashMap::new();
    let mut kept = Vec::with_capacity(sleeps.len());

    for sleep in sleeps {
        let mut start = None;
        let mut end = sleep.start;
        let mut t = sleep.start;
        while t < sleep.end {
            let piece_end = next_midnight(t).min(sleep.end);
            let left = params.max_sleep_minutes - used.get(&t.date()).copied().unwrap_or(0);
            if left <= 0 {
                if start.is_some() {
                    break;
                }
                t = piece_end;
                continue;
            }
            if start.is_none() {
                start = Some(t);
            }
            end = (t + Duration::minutes(left)).min(piece_end);
            if end < piece_end {
                break;
            }
            t = piece_end;
        }

        let trimmed = start.and_then(|start| clipped(start, end, params));
        match trimmed {
            Some(trimmed) => {
                if trimmed != sleep {
                    debug!(start = %trimmed.start, end = %trimmed.end, "sleep trimmed to daily maximum");
                }
                for (date, minutes) in minutes_per_date(trimmed.start, trimmed.end) {
                    *used.entry(date).or_insert(0) += minutes;
                }
                kept.push(trimmed);
            }
            None => debug!(start = %sleep.start, end = %sleep.end, "sleep dropped, date already at maximum"),
        }
    }
    kept
}
