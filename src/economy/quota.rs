//! Five-year-plan quotas

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::economy::doctrine::Doctrine;
use crate::economy::resources::ResourceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    pub resource: ResourceKind,
    pub target: f64,
    pub progress: f64,
    pub deadline_year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaOutcome {
    Met { exceeded: bool },
    Failed,
}

/// Which resource the plan demands under a doctrine
pub fn quota_resource(doctrine: Doctrine) -> ResourceKind {
    match doctrine {
        Doctrine::Industrialization | Doctrine::Thaw => ResourceKind::Timber,
        _ => ResourceKind::Food,
    }
}

impl Quota {
    pub fn new(resource: ResourceKind, target: f64, deadline_year: u32) -> Self {
        Self {
            resource,
            target,
            progress: 0.0,
            deadline_year,
        }
    }

    pub fn add_progress(&mut self, amount: f64) {
        if amount > 0.0 {
            self.progress += amount;
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.progress >= self.target
    }

    pub fn fraction(&self) -> f64 {
        if self.target <= 0.0 {
            1.0
        } else {
            (self.progress / self.target).min(1.0)
        }
    }

    /// Check fulfilment or expiry for `year`. On either outcome the quota is
    /// replaced with the next plan: target x escalation, fresh deadline.
    pub fn evaluate(&mut self, year: u32, doctrine: Doctrine, plan_years: u32) -> Option<QuotaOutcome> {
        let outcome = if self.is_fulfilled() {
            QuotaOutcome::Met {
                exceeded: self.deadline_year >= year + 1,
            }
        } else if year > self.deadline_year {
            QuotaOutcome::Failed
        } else {
            return None;
        };

        let next_target = self.target * doctrine.quota_escalation();
        info!(
            resource = self.resource.label(),
            target = self.target,
            progress = self.progress,
            ?outcome,
            "quota closed"
        );
        *self = Quota::new(quota_resource(doctrine), next_target, year + plan_years);
        Some(outcome)
    }
}
