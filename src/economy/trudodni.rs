//! Trudodni - labour-day accounting
//!
//! Assigned workers add their efficiency as labour units every tick; the
//! requirement grows by `min_trudodni_per_worker` per working-age citizen.
//! The ledger closes at year end into a labour-plan verdict.

use serde::{Deserialize, Serialize};

/// Ratio at which the labour plan counts as exceeded
pub const EXCEEDED_RATIO: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabourPlan {
    Missed,
    Met,
    Exceeded,
}

impl LabourPlan {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= EXCEEDED_RATIO {
            LabourPlan::Exceeded
        } else if ratio >= 1.0 {
            LabourPlan::Met
        } else {
            LabourPlan::Missed
        }
    }

    pub fn is_met(&self) -> bool {
        !matches!(self, LabourPlan::Missed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrudodniLedger {
    contributed: f64,
    required: f64,
}

impl TrudodniLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, contributed: f64, working_age: usize, min_per_worker: f32) {
        self.contributed += contributed.max(0.0);
        self.required += working_age as f64 * min_per_worker as f64;
    }

    pub fn contributed(&self) -> f64 {
        self.contributed
    }

    pub fn required(&self) -> f64 {
        self.required
    }

    /// Contributed over required; 0 when nothing was required
    pub fn ratio(&self) -> f64 {
        if self.required <= 0.0 {
            0.0
        } else {
            self.contributed / self.required
        }
    }

    /// Close the year and reset
    pub fn close_year(&mut self) -> LabourPlan {
        let plan = LabourPlan::from_ratio(self.ratio());
        *self = Self::default();
        plan
    }
}
