//! Live score counter fed by session deltas

use serde::{Deserialize, Serialize};

/// Which deltas reach the visible counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportPolicy {
    /// Only gains are shown; the counter never goes down
    #[default]
    PositiveOnly,
    /// Gains and penalties are both applied
    AllDeltas,
}

/// Receives in-round point changes from the host
pub trait ScoreReporter {
    fn report_delta(&mut self, points: i32);

    /// Called when a new round starts
    fn reset(&mut self);

    /// Policy for the round about to start
    fn set_policy(&mut self, _policy: ReportPolicy) {}
}

/// Default reporter: a running total the HUD reads from
#[derive(Debug, Clone, Default)]
pub struct ScoreCounter {
    policy: ReportPolicy,
    total: i64,
    /// Sum of every positive delta seen this round
    gained: i64,
}

impl ScoreCounter {
    pub fn new(policy: ReportPolicy) -> Self {
        Self {
            policy,
            total: 0,
            gained: 0,
        }
    }

    /// Value shown to the player
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn gained(&self) -> i64 {
        self.gained
    }

    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }
}

impl ScoreReporter for ScoreCounter {
    fn report_delta(&mut self, points: i32) {
        if points > 0 {
            self.gained += points as i64;
            self.total += points as i64;
        } else if points < 0 && self.policy == ReportPolicy::AllDeltas {
            self.total += points as i64;
        }
    }

    fn reset(&mut self) {
        self.total = 0;
        self.gained = 0;
    }

    fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }
}
