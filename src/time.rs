//! Simulated-clock instants and durations.
//!
//! Release times, deadlines, and section durations are all plain `f64`
//! quantities in the task-set description, so a single total-ordered
//! newtype serves both as a map key (the event index) and as an
//! arithmetic value.

use std::cmp::Ordering;
use std::ops::{Add, Sub};

pub type Duration = f64;

/// Tolerance for "section/remaining time reached zero" comparisons.
pub const EPS: Duration = 1e-9;

#[derive(Clone, Copy, Debug, Default)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}
impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;
    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl Sub for SimTime {
    type Output = Duration;
    fn sub(self, rhs: SimTime) -> Duration {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(value: f64) -> Self {
        SimTime(value)
    }
}
