//! Political entities - politruks, KGB agents and officers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingId, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRole {
    Politruk,
    KgbAgent,
    MilitaryOfficer,
    ConscriptionOfficer,
}

impl EntityRole {
    pub fn name(&self) -> &'static str {
        match self {
            EntityRole::Politruk => "politruk",
            EntityRole::KgbAgent => "kgb agent",
            EntityRole::MilitaryOfficer => "military officer",
            EntityRole::ConscriptionOfficer => "conscription officer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticalEntity {
    pub id: EntityId,
    pub role: EntityRole,
    pub name: String,
    pub station: Option<BuildingId>,
    /// 0-100
    pub effectiveness: f32,
    pub target_building: Option<BuildingId>,
    pub ticks_remaining: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoliticalEntities {
    entities: BTreeMap<EntityId, PoliticalEntity>,
}

impl PoliticalEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: PoliticalEntity) {
        self.entities.insert(entity.id, entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<PoliticalEntity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&PoliticalEntity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut PoliticalEntity> {
        self.entities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoliticalEntity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count_role(&self, role: EntityRole) -> usize {
        self.entities.values().filter(|e| e.role == role).count()
    }

    pub fn first_of(&self, role: EntityRole) -> Option<&PoliticalEntity> {
        self.entities.values().find(|e| e.role == role)
    }

    /// Count down lifetimes and remove expired entities.
    /// KGB agents are tied to their investigation and skipped here.
    pub fn tick_lifetimes(&mut self) -> Vec<PoliticalEntity> {
        for entity in self.entities.values_mut() {
            if entity.role != EntityRole::KgbAgent {
                entity.ticks_remaining = entity.ticks_remaining.saturating_sub(1);
            }
        }
        let expired: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.role != EntityRole::KgbAgent && e.ticks_remaining == 0)
            .map(|e| e.id)
            .collect();
        expired
            .into_iter()
            .filter_map(|id| self.entities.remove(&id))
            .collect()
    }
}
