//! Building efficiency and overstaffing curves
//!
//! Efficiency is a display-facing percentage; production uses the same
//! factors but with effective workers instead of the staffing ratio so that
//! overstaffing can still add (a little) output.

use serde::{Deserialize, Serialize};

/// Morale below which the morale factor applies
pub const LOW_MORALE: f32 = 50.0;

/// Why a building is not running at full efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EfficiencyReason {
    NoWorkers,
    NoPower,
    Understaffed,
    Damaged,
    LowMorale,
}

impl EfficiencyReason {
    pub fn label(&self) -> &'static str {
        match self {
            EfficiencyReason::NoWorkers => "No workers assigned",
            EfficiencyReason::NoPower => "No power",
            EfficiencyReason::Understaffed => "Understaffed",
            EfficiencyReason::Damaged => "Structural damage",
            EfficiencyReason::LowMorale => "Low morale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Efficiency {
    /// 0-100
    pub percent: f32,
    pub reason: Option<EfficiencyReason>,
}

/// Inputs to the efficiency formula for one building
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyInputs {
    pub workers: u32,
    pub capacity: u32,
    /// Structural health 0-100
    pub health: f32,
    pub requires_power: bool,
    pub powered: bool,
    /// Average morale of the building's workers
    pub morale: f32,
}

/// Power factor: 0 when power is required and missing
pub fn power_factor(requires_power: bool, powered: bool) -> f32 {
    if requires_power && !powered {
        0.0
    } else {
        1.0
    }
}

/// Morale factor: 0.5 + morale/100, only below `LOW_MORALE`
pub fn morale_factor(morale: f32) -> f32 {
    if morale < LOW_MORALE {
        0.5 + morale.max(0.0) / 100.0
    } else {
        1.0
    }
}

/// Health x power x morale, without staffing
pub fn operating_factor(inputs: &EfficiencyInputs) -> f32 {
    (inputs.health.clamp(0.0, 100.0) / 100.0)
        * power_factor(inputs.requires_power, inputs.powered)
        * morale_factor(inputs.morale)
}

/// Efficiency of one building.
///
/// base 1.0 x staffing ratio x health/100 x power factor x morale factor,
/// clamped to 0-100%.
pub fn building_efficiency(inputs: &EfficiencyInputs) -> Efficiency {
    let staffing = if inputs.workers == 0 || inputs.capacity == 0 {
        0.0
    } else {
        inputs.workers as f32 / inputs.capacity as f32
    };
    let value = 1.0 * staffing * operating_factor(inputs);
    let percent = (value * 100.0).clamp(0.0, 100.0);

    let reason = if staffing == 0.0 {
        Some(EfficiencyReason::NoWorkers)
    } else if power_factor(inputs.requires_power, inputs.powered) == 0.0 {
        Some(EfficiencyReason::NoPower)
    } else if inputs.health < 50.0 {
        Some(EfficiencyReason::Damaged)
    } else if inputs.morale < LOW_MORALE {
        Some(EfficiencyReason::LowMorale)
    } else if staffing < 1.0 {
        Some(EfficiencyReason::Understaffed)
    } else {
        None
    };

    Efficiency { percent, reason }
}

/// Effective worker count with diminishing returns above capacity.
///
/// Below capacity every worker counts fully. Above it, extra workers add
/// `cap * bonus * (1 - e^{-(raw - cap)/cap})`, which is concave and never
/// reaches `cap * (1 + bonus)`.
pub fn effective_workers(raw: u32, capacity: u32, bonus: f32) -> f32 {
    if raw <= capacity || capacity == 0 {
        return raw.min(capacity) as f32;
    }
    let cap = capacity as f32;
    let excess = (raw - capacity) as f32;
    cap + cap * bonus * (1.0 - (-excess / cap).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(workers: u32) -> EfficiencyInputs {
        EfficiencyInputs {
            workers,
            capacity: 10,
            health: 100.0,
            requires_power: true,
            powered: true,
            morale: 70.0,
        }
    }

    #[test]
    fn test_empty_building_reports_no_workers() {
        let eff = building_efficiency(&inputs(0));
        assert_eq!(eff.percent, 0.0);
        assert_eq!(eff.reason, Some(EfficiencyReason::NoWorkers));
        assert_eq!(eff.reason.unwrap().label(), "No workers assigned");
    }

    #[test]
    fn test_fully_staffed_is_hundred_percent() {
        let eff = building_efficiency(&inputs(10));
        assert_eq!(eff.percent, 100.0);
        assert_eq!(eff.reason, None);
    }

    #[test]
    fn test_overstaffed_clamps_to_hundred() {
        let eff = building_efficiency(&inputs(14));
        assert_eq!(eff.percent, 100.0);
    }

    #[test]
    fn test_unpowered_is_zero() {
        let mut i = inputs(10);
        i.powered = false;
        let eff = building_efficiency(&i);
        assert_eq!(eff.percent, 0.0);
        assert_eq!(eff.reason, Some(EfficiencyReason::NoPower));
    }

    #[test]
    fn test_factors_multiply() {
        let mut i = inputs(5);
        i.health = 80.0;
        i.morale = 30.0;
        // 0.5 * 0.8 * (0.5 + 0.3) = 0.32
        let eff = building_efficiency(&i);
        assert!((eff.percent - 32.0).abs() < 1e-3);
        assert_eq!(eff.reason, Some(EfficiencyReason::LowMorale));
    }

    #[test]
    fn test_morale_factor_only_below_fifty() {
        assert_eq!(morale_factor(50.0), 1.0);
        assert!((morale_factor(20.0) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_effective_workers_is_concave_and_bounded() {
        assert_eq!(effective_workers(4, 10, 0.2), 4.0);
        assert_eq!(effective_workers(10, 10, 0.2), 10.0);
        let a = effective_workers(12, 10, 0.2);
        let b = effective_workers(14, 10, 0.2);
        let c = effective_workers(100, 10, 0.2);
        assert!(a > 10.0 && b > a);
        // diminishing: second pair of extra workers adds less than the first
        assert!(b - a < a - 10.0);
        assert!(c < 12.0);
    }
}
