//! Biomathematical model: circadian oscillator, homeostatic reservoir,
//! sleep inertia and effectiveness. Every function here is pure.

pub mod circadian;
pub mod effectiveness;
pub mod inertia;
pub mod params;
pub mod reservoir;

pub use circadian::{circadian, time_of_day_hours};
pub use effectiveness::{effectiveness, performance_rhythm};
pub use inertia::{sleep_inertia, InertiaProcess};
pub use params::{
    CircadianParams, InertiaParams, ModelParams, PerformanceParams, ReservoirParams, ScoringParams,
    SeverityThresholds, SleepParams, WindowParams,
};
pub use reservoir::{next_reservoir, sleep_accumulation_rate, sleep_intensity};
