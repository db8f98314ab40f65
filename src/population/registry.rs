//! Citizen and household registry
//!
//! Records are kept in ordered maps so iteration (and therefore every
//! probabilistic roll that walks the registry) is deterministic.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{CitizenId, DvorId, IdAllocator};
use crate::population::citizen::{Citizen, CitizenClass, Gender};
use crate::population::dvor::Dvor;

const MALE_NAMES: &[&str] = &[
    "Ivan", "Pyotr", "Sergei", "Nikolai", "Mikhail", "Aleksei", "Dmitri", "Yuri", "Boris", "Grigori",
];
const FEMALE_NAMES: &[&str] = &[
    "Anna", "Olga", "Tatiana", "Natalia", "Yelena", "Irina", "Svetlana", "Galina", "Vera", "Lyudmila",
];
const SURNAMES: &[&str] = &[
    "Ivanov", "Petrov", "Sidorov", "Kuznetsov", "Popov", "Sokolov", "Lebedev", "Kozlov", "Novikov",
    "Morozov", "Volkov", "Pavlov",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitizenRegistry {
    citizens: BTreeMap<CitizenId, Citizen>,
    households: BTreeMap<DvorId, Dvor>,
    ids: IdAllocator,
}

impl CitizenRegistry {
    pub fn new() -> Self {
        Self {
            citizens: BTreeMap::new(),
            households: BTreeMap::new(),
            ids: IdAllocator::new(),
        }
    }

    /// Found `count` households of `size` members each.
    ///
    /// Every household gets a working-age couple; remaining members are
    /// children or elders.
    pub fn found_households<R: Rng + ?Sized>(&mut self, count: u32, size: u32, rng: &mut R) {
        for _ in 0..count {
            let surname = SURNAMES.choose(rng).copied().unwrap_or("Ivanov");
            let dvor = self.add_household(format!("Dvor {}", surname), rng.gen_range(50.0..70.0));

            for member in 0..size {
                let (gender, age) = match member {
                    0 => (Gender::Male, rng.gen_range(20..45)),
                    1 => (Gender::Female, rng.gen_range(20..45)),
                    _ if rng.gen_bool(0.75) => (random_gender(rng), rng.gen_range(0..16)),
                    _ => (random_gender(rng), rng.gen_range(61..72)),
                };
                let class = match rng.gen_range(0..20) {
                    0..=8 => CitizenClass::Farmer,
                    9..=17 => CitizenClass::Worker,
                    _ => CitizenClass::Engineer,
                };
                let name = random_name(gender, surname, rng);
                if let Some(id) = self.spawn(dvor, name, class, age, gender) {
                    if let Some(c) = self.citizens.get_mut(&id) {
                        c.skill = rng.gen_range(20.0..60.0);
                        c.morale = rng.gen_range(50.0..70.0);
                        c.loyalty = rng.gen_range(50.0..70.0);
                        c.vodka_dependency = rng.gen_range(0.0..30.0);
                    }
                }
            }
        }
    }

    pub fn add_household(&mut self, name: String, loyalty: f32) -> DvorId {
        let id = self.ids.dvor();
        self.households.insert(id, Dvor::new(id, name, loyalty));
        id
    }

    /// Create a citizen inside an existing household
    pub fn spawn(
        &mut self,
        dvor: DvorId,
        name: String,
        class: CitizenClass,
        age: u32,
        gender: Gender,
    ) -> Option<CitizenId> {
        let household = self.households.get_mut(&dvor)?;
        let id = self.ids.citizen();
        household.members.push(id);
        self.citizens.insert(id, Citizen::new(id, name, class, age, gender, dvor));
        Some(id)
    }

    /// Re-insert a citizen that was temporarily removed (returning conscripts).
    /// If their household no longer exists they found a new one.
    pub fn readmit(&mut self, mut citizen: Citizen) {
        if !self.households.contains_key(&citizen.dvor) {
            let dvor = self.add_household(format!("Dvor of {}", citizen.name), 50.0);
            citizen.dvor = dvor;
        }
        if let Some(household) = self.households.get_mut(&citizen.dvor) {
            household.members.push(citizen.id);
        }
        citizen.assignment = Default::default();
        citizen.efficiency = 0.0;
        self.citizens.insert(citizen.id, citizen);
    }

    /// Remove a citizen; empty households dissolve
    pub fn remove(&mut self, id: CitizenId) -> Option<Citizen> {
        let citizen = self.citizens.remove(&id)?;
        if let Some(household) = self.households.get_mut(&citizen.dvor) {
            household.members.retain(|m| *m != id);
            if household.members.is_empty() {
                self.households.remove(&citizen.dvor);
            }
        }
        Some(citizen)
    }

    /// Remove a whole household and its members
    pub fn remove_household(&mut self, dvor: DvorId) -> Vec<Citizen> {
        let Some(household) = self.households.remove(&dvor) else {
            return Vec::new();
        };
        household
            .members
            .iter()
            .filter_map(|id| self.citizens.remove(id))
            .collect()
    }

    pub fn get(&self, id: CitizenId) -> Option<&Citizen> {
        self.citizens.get(&id)
    }

    pub fn get_mut(&mut self, id: CitizenId) -> Option<&mut Citizen> {
        self.citizens.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Citizen> {
        self.citizens.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Citizen> {
        self.citizens.values_mut()
    }

    pub fn len(&self) -> usize {
        self.citizens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citizens.is_empty()
    }

    pub fn households(&self) -> &BTreeMap<DvorId, Dvor> {
        &self.households
    }

    pub fn households_mut(&mut self) -> &mut BTreeMap<DvorId, Dvor> {
        &mut self.households
    }

    pub fn household(&self, id: DvorId) -> Option<&Dvor> {
        self.households.get(&id)
    }

    /// Loyalty of the citizen's household, 50 when unknown
    pub fn dvor_loyalty(&self, id: CitizenId) -> f32 {
        self.citizens
            .get(&id)
            .and_then(|c| self.households.get(&c.dvor))
            .map(|d| d.loyalty_to_collective)
            .unwrap_or(50.0)
    }

    /// Promote the most loyal working-age civilian to `class`.
    ///
    /// Idle citizens go first so production keeps its staff; the governor
    /// releases an employed appointee whose new class cannot hold the job.
    pub fn appoint(&mut self, class: CitizenClass, min_age: u32, max_age: u32) -> Option<CitizenId> {
        let id = self
            .citizens
            .values()
            .filter(|c| c.class.is_civilian() && c.is_working_age(min_age, max_age))
            .min_by_key(|c| (!c.assignment.is_idle(), Reverse(OrderedFloat(c.loyalty)), c.id))
            .map(|c| c.id)?;
        let citizen = self.citizens.get_mut(&id)?;
        citizen.class = class;
        Some(id)
    }

    pub fn working_age_count(&self, min_age: u32, max_age: u32) -> usize {
        self.citizens
            .values()
            .filter(|c| c.is_working_age(min_age, max_age))
            .count()
    }

    pub fn average_morale(&self) -> f32 {
        if self.citizens.is_empty() {
            return 50.0;
        }
        self.citizens.values().map(|c| c.morale).sum::<f32>() / self.citizens.len() as f32
    }

    pub fn next_citizen_name<R: Rng + ?Sized>(&self, dvor: DvorId, gender: Gender, rng: &mut R) -> String {
        let surname = self
            .households
            .get(&dvor)
            .and_then(|d| d.name.strip_prefix("Dvor "))
            .unwrap_or("Novikov")
            .to_string();
        random_name(gender, &surname, rng)
    }
}

fn random_gender<R: Rng + ?Sized>(rng: &mut R) -> Gender {
    if rng.gen_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    }
}

fn random_name<R: Rng + ?Sized>(gender: Gender, surname: &str, rng: &mut R) -> String {
    let pool = match gender {
        Gender::Male => MALE_NAMES,
        Gender::Female => FEMALE_NAMES,
    };
    let first = pool.choose(rng).copied().unwrap_or("Comrade");
    match gender {
        Gender::Male => format!("{} {}", first, surname),
        Gender::Female => format!("{} {}a", first, surname),
    }
}
