//! Citizen records

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingRole;
use crate::core::types::{clamp_gauge, BuildingId, CitizenId, DvorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CitizenClass {
    Worker,
    Engineer,
    Farmer,
    PartyOfficial,
    Soldier,
    Prisoner,
}

impl CitizenClass {
    pub const ALL: [CitizenClass; 6] = [
        CitizenClass::Worker,
        CitizenClass::Engineer,
        CitizenClass::Farmer,
        CitizenClass::PartyOfficial,
        CitizenClass::Soldier,
        CitizenClass::Prisoner,
    ];

    /// Whether a citizen of this class may fill a slot of the given role.
    ///
    /// Administration is staffed only by party officials and military posts
    /// only by soldiers; those two classes staff nothing else.
    pub fn can_staff(&self, role: BuildingRole) -> bool {
        match (self, role) {
            (CitizenClass::PartyOfficial, BuildingRole::Administration) => true,
            (CitizenClass::Soldier, BuildingRole::Military) => true,
            (CitizenClass::PartyOfficial | CitizenClass::Soldier, _) => false,
            (_, BuildingRole::Administration | BuildingRole::Military) => false,
            (CitizenClass::Prisoner, BuildingRole::Education | BuildingRole::Medical) => false,
            _ => true,
        }
    }

    /// Class a newborn takes from this parent. Appointments, service and
    /// sentences are not inherited.
    pub fn inherited(&self) -> CitizenClass {
        match self {
            CitizenClass::PartyOfficial | CitizenClass::Soldier | CitizenClass::Prisoner => CitizenClass::Worker,
            other => *other,
        }
    }

    /// Ordinary labour that may be promoted or reassigned
    pub fn is_civilian(&self) -> bool {
        matches!(self, CitizenClass::Worker | CitizenClass::Engineer | CitizenClass::Farmer)
    }

    /// Extra output when working in the class's home role
    pub fn role_bonus(&self, role: BuildingRole) -> f32 {
        match (self, role) {
            (CitizenClass::Farmer, BuildingRole::Agriculture) => 1.2,
            (CitizenClass::Engineer, BuildingRole::Industry | BuildingRole::Power) => 1.25,
            (CitizenClass::Worker, BuildingRole::Construction | BuildingRole::Industry) => 1.1,
            (CitizenClass::Prisoner, _) => 0.8,
            _ => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CitizenClass::Worker => "worker",
            CitizenClass::Engineer => "engineer",
            CitizenClass::Farmer => "farmer",
            CitizenClass::PartyOfficial => "party official",
            CitizenClass::Soldier => "soldier",
            CitizenClass::Prisoner => "prisoner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Current job of a citizen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Assignment {
    #[default]
    Idle,
    Job(BuildingId),
}

impl Assignment {
    pub fn building(&self) -> Option<BuildingId> {
        match self {
            Assignment::Idle => None,
            Assignment::Job(id) => Some(*id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Assignment::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
    pub id: CitizenId,
    pub name: String,
    pub class: CitizenClass,
    pub age: u32,
    pub gender: Gender,
    /// 0-100
    pub morale: f32,
    /// 0-100
    pub loyalty: f32,
    /// 0-100
    pub skill: f32,
    /// 0 = fed, 100 = starving
    pub hunger: f32,
    /// 0-100
    pub vodka_dependency: f32,
    pub diseased: bool,
    pub dvor: DvorId,
    pub assignment: Assignment,
    /// Production efficiency this tick (0-1), set by the governor
    pub efficiency: f32,
}

impl Citizen {
    pub fn new(id: CitizenId, name: String, class: CitizenClass, age: u32, gender: Gender, dvor: DvorId) -> Self {
        Self {
            id,
            name,
            class,
            age,
            gender,
            morale: 60.0,
            loyalty: 60.0,
            skill: 30.0,
            hunger: 0.0,
            vodka_dependency: 0.0,
            diseased: false,
            dvor,
            assignment: Assignment::Idle,
            efficiency: 0.0,
        }
    }

    pub fn is_working_age(&self, min_age: u32, max_age: u32) -> bool {
        (min_age..=max_age).contains(&self.age)
    }

    pub fn adjust_morale(&mut self, delta: f32) {
        self.morale = clamp_gauge(self.morale + delta);
    }

    pub fn adjust_hunger(&mut self, delta: f32) {
        self.hunger = clamp_gauge(self.hunger + delta);
    }

    pub fn adjust_loyalty(&mut self, delta: f32) {
        self.loyalty = clamp_gauge(self.loyalty + delta);
    }

    /// Individual contribution multiplier (0.3 - 1.0)
    ///
    /// Formula: (0.5 + skill/200) * (1 - hunger/250)
    /// - skill 0, fed      => 0.5
    /// - skill 100, fed    => 1.0
    /// - skill 100, starving => 0.6
    pub fn work_contribution(&self) -> f32 {
        let skill_multiplier = 0.5 + self.skill.clamp(0.0, 100.0) / 200.0;
        let hunger_penalty = 1.0 - self.hunger.clamp(0.0, 100.0) / 250.0;
        skill_multiplier * hunger_penalty
    }
}
