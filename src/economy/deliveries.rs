//! Compulsory deliveries and the remainder split

use serde::{Deserialize, Serialize};

use crate::city::production::ProductionReport;
use crate::economy::doctrine::DeliveryRates;
use crate::economy::resources::{ResourceKind, ResourceStore, ShortageSource};

/// Share of the post-delivery food surplus earmarked for rations; the rest
/// goes to the strategic reserve
pub const RATION_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLine {
    pub resource: ResourceKind,
    pub owed: f64,
    pub delivered: f64,
}

impl DeliveryLine {
    pub fn shortfall(&self) -> f64 {
        (self.owed - self.delivered).max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub lines: Vec<DeliveryLine>,
}

impl DeliveryReport {
    pub fn delivered(&self, kind: ResourceKind) -> f64 {
        self.lines
            .iter()
            .filter(|l| l.resource == kind)
            .map(|l| l.delivered)
            .sum()
    }

    pub fn total_shortfall(&self) -> f64 {
        self.lines.iter().map(|l| l.shortfall()).sum()
    }
}

/// Take the state's share of this tick's gross output
pub fn collect_deliveries(
    rates: DeliveryRates,
    production: &ProductionReport,
    store: &mut ResourceStore,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for (kind, rate) in [
        (ResourceKind::Food, rates.food),
        (ResourceKind::Vodka, rates.vodka),
        (ResourceKind::Money, rates.money),
    ] {
        let owed = production.gross_of(kind) * rate as f64;
        if owed <= 0.0 {
            continue;
        }
        let delivered = store.withdraw(kind, owed, ShortageSource::Deliveries);
        report.lines.push(DeliveryLine {
            resource: kind,
            owed,
            delivered,
        });
    }
    report
}

/// Food surplus after deliveries split into rations and reserve
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RemainderSplit {
    pub rations: f64,
    pub reserve: f64,
}

impl RemainderSplit {
    pub fn of(produced: f64, delivered: f64) -> Self {
        let surplus = (produced - delivered).max(0.0);
        Self {
            rations: surplus * RATION_SHARE,
            reserve: surplus * (1.0 - RATION_SHARE),
        }
    }
}
