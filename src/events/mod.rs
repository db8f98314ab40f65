//! Random events
//!
//! An event's resource deltas hit the store the moment it fires and are
//! never rolled back; only the history record ages out.

pub mod history;
pub mod templates;

pub use history::EventHistory;
pub use templates::{select_template, EventCategory, EventKind, EventTemplate, Severity, TEMPLATES};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::calendar::Season;
use crate::core::config::EventConfig;
use crate::core::types::Tick;
use crate::economy::doctrine::Doctrine;
use crate::economy::resources::{ResourceKind, ResourceStore, ShortageSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: u64,
    pub tick: Tick,
    pub template: String,
    pub title: String,
    pub category: EventCategory,
    pub severity: Severity,
    pub kind: EventKind,
    /// Deltas as actually applied after clamping
    pub deltas: Vec<(ResourceKind, f64)>,
}

/// Per-tick chance of an event
pub fn event_chance(cfg: &EventConfig, doctrine: Doctrine, season: Season, heating_failing: bool) -> f32 {
    let mut chance = cfg.base_chance * doctrine.event_frequency() * season.event_modifier();
    if heating_failing {
        chance *= cfg.heating_failure_multiplier;
    }
    chance.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSystem {
    history: EventHistory,
    next_id: u64,
}

impl EventSystem {
    pub fn new(cfg: &EventConfig) -> Self {
        Self {
            history: EventHistory::new(cfg.history_capacity),
            next_id: 1,
        }
    }

    pub fn history(&self) -> &EventHistory {
        &self.history
    }

    /// Roll for an event and apply it
    #[allow(clippy::too_many_arguments)]
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: Tick,
        doctrine: Doctrine,
        season: Season,
        heating_failing: bool,
        store: &mut ResourceStore,
        cfg: &EventConfig,
        rng: &mut R,
    ) -> Option<GameEvent> {
        let chance = event_chance(cfg, doctrine, season, heating_failing);
        if rng.gen::<f32>() >= chance {
            return None;
        }
        let template = select_template(heating_failing, rng)?;
        Some(self.fire(template, now, store))
    }

    /// Apply a template's deltas and record it
    pub fn fire(&mut self, template: &EventTemplate, now: Tick, store: &mut ResourceStore) -> GameEvent {
        let deltas: Vec<(ResourceKind, f64)> = template
            .deltas
            .iter()
            .map(|(kind, delta)| (*kind, store.apply_delta(*kind, *delta, ShortageSource::Event)))
            .collect();

        let event = GameEvent {
            id: self.next_id,
            tick: now,
            template: template.id.to_string(),
            title: template.title.to_string(),
            category: template.category,
            severity: template.severity,
            kind: template.kind,
            deltas,
        };
        self.next_id += 1;
        info!(id = event.id, template = template.id, tick = now, "event fired");
        self.history.push(event.clone());
        event
    }
}
