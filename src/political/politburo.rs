//! The politburo: who sits in Moscow and how patient they are

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::economy::doctrine::Doctrine;
use crate::economy::quota::QuotaOutcome;

pub const PATIENCE_ON_QUOTA_MET: f32 = 5.0;
pub const PATIENCE_ON_QUOTA_FAILED: f32 = -10.0;
/// Below this patience the KGB spawns investigations more eagerly
pub const IMPATIENT_BELOW: f32 = 25.0;
pub const IMPATIENT_PRESSURE: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Politburo {
    secretary: String,
    patience: f32,
}

impl Politburo {
    pub fn new(doctrine: Doctrine, patience: f32) -> Self {
        Self {
            secretary: doctrine.general_secretary().to_string(),
            patience: patience.clamp(0.0, 100.0),
        }
    }

    pub fn secretary(&self) -> &str {
        &self.secretary
    }

    pub fn patience(&self) -> f32 {
        self.patience
    }

    /// Seat the doctrine's secretary; patience carries over
    pub fn follow_doctrine(&mut self, doctrine: Doctrine) {
        let secretary = doctrine.general_secretary();
        if self.secretary != secretary {
            info!(from = %self.secretary, to = secretary, "new general secretary");
            self.secretary = secretary.to_string();
        }
    }

    pub fn record_quota(&mut self, outcome: QuotaOutcome) {
        let delta = match outcome {
            QuotaOutcome::Met { .. } => PATIENCE_ON_QUOTA_MET,
            QuotaOutcome::Failed => PATIENCE_ON_QUOTA_FAILED,
        };
        self.patience = (self.patience + delta).clamp(0.0, 100.0);
    }

    /// Multiplier on the KGB spawn chance
    pub fn kgb_pressure(&self) -> f32 {
        if self.patience < IMPATIENT_BELOW {
            IMPATIENT_PRESSURE
        } else {
            1.0
        }
    }
}
