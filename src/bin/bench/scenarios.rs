// Trip Scenario Definitions — canonical duty patterns for sensitivity runs
// Every trip is expressed in local wall-clock time starting on 2024-03-04

use chrono::{NaiveDate, NaiveDateTime};
use fatigue_engine::DutyPeriod;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub trip: fn() -> Vec<DutyPeriod>,
    pub criteria: PassCriteria,
}

/// Bounds on a run's outcome. `None` leaves a bound unchecked.
#[derive(Default)]
pub struct PassCriteria {
    /// Lowest on-duty effectiveness must stay at or above this
    pub min_lowest_effectiveness: Option<f64>,
    /// Lowest on-duty effectiveness must fall below this (fatigue expected)
    pub max_lowest_effectiveness: Option<f64>,
    /// Peak effectiveness anywhere in the window must reach this
    pub min_peak_effectiveness: Option<f64>,
}

impl PassCriteria {
    pub fn check(&self, lowest: f64, peak: f64) -> bool {
        self.min_lowest_effectiveness.map_or(true, |min| lowest >= min)
            && self.max_lowest_effectiveness.map_or(true, |max| lowest < max)
            && self.min_peak_effectiveness.map_or(true, |min| peak >= min)
    }
}

// ─── Trip Builders ──────────────────────────────────────────────────────────

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("scenario table holds valid March 2024 dates")
}

fn duty(day: u32, hour: u32, end_day: u32, end_hour: u32) -> DutyPeriod {
    DutyPeriod::new(at(day, hour), at(end_day, end_hour))
}

fn red_eye() -> Vec<DutyPeriod> {
    vec![duty(4, 23, 5, 7)]
}

fn day_trip() -> Vec<DutyPeriod> {
    vec![duty(4, 8, 4, 16)]
}

fn long_layover() -> Vec<DutyPeriod> {
    // 50-hour layover between legs
    vec![duty(4, 10, 4, 18), duty(6, 20, 7, 4)]
}

fn back_to_back_early() -> Vec<DutyPeriod> {
    (4..8).map(|day| duty(day, 5, day, 13)).collect()
}

fn midnight_rollover() -> Vec<DutyPeriod> {
    (4..7).map(|day| duty(day, 22, day + 1, 6)).collect()
}

fn minimum_rest() -> Vec<DutyPeriod> {
    // 10 hours release-to-report
    vec![duty(4, 6, 4, 18), duty(5, 4, 5, 16)]
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "RED_EYE",
            label: "Red-eye 23:00-07:00",
            category: "night",
            trip: red_eye,
            criteria: PassCriteria {
                min_lowest_effectiveness: Some(55.0),
                max_lowest_effectiveness: Some(75.0),
                ..Default::default()
            },
        },
        Scenario {
            name: "DAY_TRIP",
            label: "Day trip 08:00-16:00",
            category: "day",
            trip: day_trip,
            criteria: PassCriteria {
                min_lowest_effectiveness: Some(82.0),
                ..Default::default()
            },
        },
        Scenario {
            name: "LONG_LAYOVER",
            label: "50h layover recovery",
            category: "layover",
            trip: long_layover,
            criteria: PassCriteria {
                min_lowest_effectiveness: Some(55.0),
                min_peak_effectiveness: Some(95.0),
                ..Default::default()
            },
        },
        Scenario {
            name: "BACK_TO_BACK_EARLY",
            label: "4x early report 05:00",
            category: "day",
            trip: back_to_back_early,
            criteria: PassCriteria {
                min_lowest_effectiveness: Some(75.0),
                ..Default::default()
            },
        },
        Scenario {
            name: "MIDNIGHT_ROLLOVER",
            label: "3x night 22:00-06:00",
            category: "night",
            trip: midnight_rollover,
            criteria: PassCriteria {
                min_lowest_effectiveness: Some(55.0),
                max_lowest_effectiveness: Some(75.0),
                ..Default::default()
            },
        },
        Scenario {
            name: "MINIMUM_REST",
            label: "10h minimum rest",
            category: "rest",
            trip: minimum_rest,
            criteria: PassCriteria {
                min_lowest_effectiveness: Some(75.0),
                ..Default::default()
            },
        },
    ]
}
