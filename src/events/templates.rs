//! Static event table
//!
//! Selection is a weighted draw over the whole table. Cold templates weigh
//! triple while the settlement's heating is failing.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::economy::resources::ResourceKind;

pub const COLD_WEIGHT_MULTIPLIER: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Disaster,
    Political,
    Economic,
    Cultural,
    Absurdist,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Disaster,
        EventCategory::Political,
        EventCategory::Economic,
        EventCategory::Cultural,
        EventCategory::Absurdist,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Trivial,
    Minor,
    Major,
    Catastrophic,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Trivial, Severity::Minor, Severity::Major, Severity::Catastrophic];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Good,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub category: EventCategory,
    pub severity: Severity,
    pub kind: EventKind,
    pub weight: u32,
    pub cold: bool,
    pub deltas: &'static [(ResourceKind, f64)],
}

impl EventTemplate {
    pub fn effective_weight(&self, heating_failing: bool) -> u32 {
        if self.cold && heating_failing {
            self.weight * COLD_WEIGHT_MULTIPLIER
        } else {
            self.weight
        }
    }
}

use EventCategory::*;
use ResourceKind::*;

pub const TEMPLATES: &[EventTemplate] = &[
    EventTemplate {
        id: "bumper_harvest",
        title: "Bumper harvest reported in the fields",
        category: Economic,
        severity: Severity::Minor,
        kind: EventKind::Good,
        weight: 8,
        cold: false,
        deltas: &[(Food, 80.0)],
    },
    EventTemplate {
        id: "blight",
        title: "Blight in the potato fields",
        category: Disaster,
        severity: Severity::Major,
        kind: EventKind::Bad,
        weight: 6,
        cold: false,
        deltas: &[(Food, -60.0)],
    },
    EventTemplate {
        id: "blizzard",
        title: "Blizzard buries the woodpiles",
        category: Disaster,
        severity: Severity::Major,
        kind: EventKind::Bad,
        weight: 5,
        cold: true,
        deltas: &[(Timber, -30.0), (Food, -10.0)],
    },
    EventTemplate {
        id: "frozen_pipes",
        title: "Frozen pipes burst at the depot",
        category: Disaster,
        severity: Severity::Minor,
        kind: EventKind::Bad,
        weight: 5,
        cold: true,
        deltas: &[(Cement, -10.0), (Money, -20.0)],
    },
    EventTemplate {
        id: "wolves",
        title: "Wolves raid the granary",
        category: Disaster,
        severity: Severity::Minor,
        kind: EventKind::Bad,
        weight: 3,
        cold: true,
        deltas: &[(Food, -20.0)],
    },
    EventTemplate {
        id: "timber_shipment",
        title: "Unexpected timber shipment arrives",
        category: Economic,
        severity: Severity::Minor,
        kind: EventKind::Good,
        weight: 6,
        cold: false,
        deltas: &[(Timber, 40.0)],
    },
    EventTemplate {
        id: "misrouted_steel",
        title: "A misrouted steel wagon is kept",
        category: Economic,
        severity: Severity::Minor,
        kind: EventKind::Good,
        weight: 4,
        cold: false,
        deltas: &[(Steel, 15.0)],
    },
    EventTemplate {
        id: "inspection",
        title: "Ministry inspectors demand hospitality",
        category: Political,
        severity: Severity::Minor,
        kind: EventKind::Bad,
        weight: 6,
        cold: false,
        deltas: &[(Money, -40.0)],
    },
    EventTemplate {
        id: "vodka_spill",
        title: "Vodka cart overturns",
        category: Absurdist,
        severity: Severity::Minor,
        kind: EventKind::Bad,
        weight: 5,
        cold: false,
        deltas: &[(Vodka, -15.0)],
    },
    EventTemplate {
        id: "congress_bonus",
        title: "Party congress grants a bonus",
        category: Political,
        severity: Severity::Minor,
        kind: EventKind::Good,
        weight: 4,
        cold: false,
        deltas: &[(Money, 60.0)],
    },
    EventTemplate {
        id: "warehouse_fire",
        title: "Fire in the warehouse",
        category: Disaster,
        severity: Severity::Major,
        kind: EventKind::Bad,
        weight: 3,
        cold: false,
        deltas: &[(Timber, -50.0), (Prefab, -5.0)],
    },
    EventTemplate {
        id: "spring_flood",
        title: "Spring flood washes out the stores",
        category: Disaster,
        severity: Severity::Major,
        kind: EventKind::Bad,
        weight: 3,
        cold: false,
        deltas: &[(Food, -40.0), (Cement, -15.0)],
    },
    EventTemplate {
        id: "militia_raid",
        title: "Militia raid the black market",
        category: Political,
        severity: Severity::Minor,
        kind: EventKind::Neutral,
        weight: 4,
        cold: false,
        deltas: &[(Vodka, -10.0), (Money, 25.0)],
    },
    EventTemplate {
        id: "heatwave",
        title: "Heatwave wilts the crops",
        category: Disaster,
        severity: Severity::Minor,
        kind: EventKind::Bad,
        weight: 3,
        cold: false,
        deltas: &[(Food, -25.0)],
    },
    EventTemplate {
        id: "coal_train",
        title: "Fuel train derails in the snow",
        category: Disaster,
        severity: Severity::Catastrophic,
        kind: EventKind::Bad,
        weight: 1,
        cold: true,
        deltas: &[(Timber, -80.0), (Steel, -20.0)],
    },
    EventTemplate {
        id: "subbotnik",
        title: "Voluntary subbotnik clears the backlog",
        category: Cultural,
        severity: Severity::Minor,
        kind: EventKind::Good,
        weight: 5,
        cold: false,
        deltas: &[(Timber, 20.0), (Cement, 10.0)],
    },
    EventTemplate {
        id: "famine",
        title: "Famine grips the district",
        category: Disaster,
        severity: Severity::Catastrophic,
        kind: EventKind::Bad,
        weight: 1,
        cold: false,
        deltas: &[(Food, -150.0)],
    },
    EventTemplate {
        id: "agitprop_train",
        title: "Agitprop train screens a film about tractors",
        category: Cultural,
        severity: Severity::Trivial,
        kind: EventKind::Neutral,
        weight: 4,
        cold: false,
        deltas: &[(Money, -5.0)],
    },
    EventTemplate {
        id: "folk_ensemble",
        title: "Folk ensemble wins the district festival",
        category: Cultural,
        severity: Severity::Minor,
        kind: EventKind::Good,
        weight: 3,
        cold: false,
        deltas: &[(Money, 30.0), (Vodka, 5.0)],
    },
    EventTemplate {
        id: "headless_statue",
        title: "Statue of Lenin delivered without a head",
        category: Absurdist,
        severity: Severity::Trivial,
        kind: EventKind::Bad,
        weight: 3,
        cold: false,
        deltas: &[(Cement, -5.0)],
    },
    EventTemplate {
        id: "nail_quota",
        title: "Nail plant meets its tonnage quota with one giant nail",
        category: Absurdist,
        severity: Severity::Trivial,
        kind: EventKind::Neutral,
        weight: 3,
        cold: false,
        deltas: &[(Steel, -8.0), (Money, 10.0)],
    },
    EventTemplate {
        id: "snow_shovels_in_july",
        title: "Ministry ships snow shovels in July",
        category: Absurdist,
        severity: Severity::Minor,
        kind: EventKind::Neutral,
        weight: 2,
        cold: false,
        deltas: &[(Timber, 10.0), (Money, -15.0)],
    },
];

/// Weighted draw from the table
pub fn select_template<R: Rng + ?Sized>(heating_failing: bool, rng: &mut R) -> Option<&'static EventTemplate> {
    TEMPLATES
        .choose_weighted(rng, |t| t.effective_weight(heating_failing))
        .ok()
}

pub fn find_template(id: &str) -> Option<&'static EventTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}
