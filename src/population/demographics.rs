//! Births, deaths, disease and ageing
//!
//! Runs monthly (births, deaths, disease) and yearly (ageing). Removed
//! citizens are handed back to the caller so their jobs can be released.

use rand::Rng;
use tracing::{debug, info};

use crate::population::citizen::{Citizen, CitizenClass, Gender};
use crate::population::registry::CitizenRegistry;

const BIRTH_CHANCE: f32 = 0.04;
const STARVATION_DEATH_CHANCE: f32 = 0.1;
const STARVATION_HUNGER: f32 = 90.0;
const DISEASE_DEATH_CHANCE: f32 = 0.03;
const TREATED_DISEASE_DEATH_CHANCE: f32 = 0.01;
const RECOVERY_CHANCE: f32 = 0.1;
const TREATED_RECOVERY_CHANCE: f32 = 0.25;
/// Monthly chance of falling ill when well fed
const DISEASE_ONSET_CHANCE: f32 = 0.01;
/// Extra monthly onset chance at full hunger
const HUNGER_DISEASE_CHANCE: f32 = 0.05;
/// A polyclinic halves onset
const TREATED_ONSET_FACTOR: f32 = 0.5;
const OLD_AGE: u32 = 65;
const OLD_AGE_DEATH_PER_YEAR: f32 = 0.01;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemographicsReport {
    pub births: u32,
    pub deaths: Vec<Citizen>,
    pub recoveries: u32,
    pub fell_ill: u32,
}

/// Monthly chance that a healthy citizen falls ill
pub fn disease_onset_chance(hunger: f32, has_polyclinic: bool) -> f32 {
    let chance = DISEASE_ONSET_CHANCE + hunger.clamp(0.0, 100.0) / 100.0 * HUNGER_DISEASE_CHANCE;
    if has_polyclinic {
        chance * TREATED_ONSET_FACTOR
    } else {
        chance
    }
}

/// Monthly births, deaths and disease progression.
///
/// The sick may die or recover; the healthy may fall ill, more often when
/// hungry and less often with a polyclinic.
pub fn monthly_demographics<R: Rng + ?Sized>(
    registry: &mut CitizenRegistry,
    food_level: f32,
    has_polyclinic: bool,
    housing_capacity: u32,
    rng: &mut R,
) -> DemographicsReport {
    let mut report = DemographicsReport::default();

    // Deaths first, so the dead do not count against housing for births
    let mut dying = Vec::new();
    for citizen in registry.iter_mut() {
        let mut death_chance = 0.0;
        if citizen.hunger >= STARVATION_HUNGER {
            death_chance += STARVATION_DEATH_CHANCE;
        }
        if citizen.diseased {
            death_chance += if has_polyclinic {
                TREATED_DISEASE_DEATH_CHANCE
            } else {
                DISEASE_DEATH_CHANCE
            };
        }
        if citizen.age > OLD_AGE {
            death_chance += (citizen.age - OLD_AGE) as f32 * OLD_AGE_DEATH_PER_YEAR;
        }
        if death_chance > 0.0 && rng.gen::<f32>() < death_chance {
            dying.push(citizen.id);
            continue;
        }

        if citizen.diseased {
            let recovery = if has_polyclinic { TREATED_RECOVERY_CHANCE } else { RECOVERY_CHANCE };
            if rng.gen::<f32>() < recovery {
                citizen.diseased = false;
                report.recoveries += 1;
            }
        } else if rng.gen::<f32>() < disease_onset_chance(citizen.hunger, has_polyclinic) {
            citizen.diseased = true;
            report.fell_ill += 1;
            debug!(citizen = citizen.id.0, hunger = citizen.hunger, "citizen fell ill");
        }
    }
    for id in dying {
        if let Some(c) = registry.remove(id) {
            debug!(citizen = c.id.0, age = c.age, hunger = c.hunger, diseased = c.diseased, "citizen died");
            report.deaths.push(c);
        }
    }

    if food_level >= 1.0 {
        births(registry, housing_capacity, &mut report, rng);
    }

    if report.births > 0 || !report.deaths.is_empty() || report.fell_ill > 0 {
        info!(
            births = report.births,
            deaths = report.deaths.len(),
            fell_ill = report.fell_ill,
            recoveries = report.recoveries,
            population = registry.len(),
            "monthly demographics"
        );
    }
    report
}

/// One birth chance per household with a couple of childbearing age
fn births<R: Rng + ?Sized>(
    registry: &mut CitizenRegistry,
    housing_capacity: u32,
    report: &mut DemographicsReport,
    rng: &mut R,
) {
    let mut room = housing_capacity.saturating_sub(registry.len() as u32);
    let candidates: Vec<_> = registry
        .households()
        .values()
        .filter(|d| {
            let members: Vec<_> = d.members.iter().filter_map(|id| registry.get(*id)).collect();
            members.iter().any(|c| c.gender == Gender::Female && (18..=40).contains(&c.age))
                && members.iter().any(|c| c.gender == Gender::Male && c.age >= 18)
        })
        .map(|d| d.id)
        .collect();

    for dvor in candidates {
        if room == 0 {
            break;
        }
        if rng.gen::<f32>() >= BIRTH_CHANCE {
            continue;
        }
        let gender = if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female };
        let name = registry.next_citizen_name(dvor, gender, rng);
        let class = registry
            .household(dvor)
            .and_then(|d| d.members.first())
            .and_then(|id| registry.get(*id))
            .map(|c| c.class.inherited())
            .unwrap_or(CitizenClass::Worker);
        if let Some(id) = registry.spawn(dvor, name, class, 0, gender) {
            debug!(citizen = id.0, dvor = dvor.0, "citizen born");
            report.births += 1;
            room -= 1;
        }
    }
}

/// Yearly ageing
pub fn age_population(registry: &mut CitizenRegistry) {
    for citizen in registry.iter_mut() {
        citizen.age += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn young_couple() -> CitizenRegistry {
        let mut registry = CitizenRegistry::new();
        let dvor = registry.add_household("Dvor Sokolov".into(), 60.0);
        registry.spawn(dvor, "Ivan Sokolov".into(), CitizenClass::Farmer, 25, Gender::Male);
        registry.spawn(dvor, "Anna Sokolova".into(), CitizenClass::Farmer, 24, Gender::Female);
        registry
    }

    #[test]
    fn test_no_births_without_food() {
        let mut registry = young_couple();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let report = monthly_demographics(&mut registry, 0.5, false, 100, &mut rng);
            assert_eq!(report.births, 0);
        }
    }

    #[test]
    fn test_births_respect_housing() {
        let mut registry = young_couple();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            monthly_demographics(&mut registry, 1.0, false, 3, &mut rng);
        }
        assert!(registry.len() <= 3);
    }

    #[test]
    fn test_fed_couple_eventually_has_child() {
        let mut registry = young_couple();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut births = 0;
        for _ in 0..200 {
            births += monthly_demographics(&mut registry, 1.0, false, 100, &mut rng).births;
        }
        assert!(births > 0);
    }

    #[test]
    fn test_starving_citizens_die() {
        let mut registry = young_couple();
        for c in registry.iter_mut() {
            c.hunger = 100.0;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut deaths = 0;
        for _ in 0..100 {
            deaths += monthly_demographics(&mut registry, 0.0, false, 100, &mut rng).deaths.len();
        }
        assert_eq!(deaths, 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_hunger_and_care_shape_disease_onset() {
        assert!(disease_onset_chance(100.0, false) > disease_onset_chance(0.0, false));
        assert!(disease_onset_chance(50.0, true) < disease_onset_chance(50.0, false));
        assert!((disease_onset_chance(0.0, false) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_hungry_village_falls_ill() {
        let mut registry = CitizenRegistry::new();
        let dvor = registry.add_household("Dvor Morozov".into(), 60.0);
        for i in 0..50 {
            registry.spawn(dvor, format!("Citizen {}", i), CitizenClass::Farmer, 30, Gender::Male);
        }
        for c in registry.iter_mut() {
            c.hunger = 60.0;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut fell_ill = 0;
        for _ in 0..12 {
            fell_ill += monthly_demographics(&mut registry, 0.5, false, 100, &mut rng).fell_ill;
        }
        assert!(fell_ill > 0);
    }

    #[test]
    fn test_ageing() {
        let mut registry = young_couple();
        age_population(&mut registry);
        let ages: Vec<u32> = registry.iter().map(|c| c.age).collect();
        assert_eq!(ages, vec![26, 25]);
    }
}
