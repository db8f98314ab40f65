//! Production recipes - define what buildings produce
//!
//! Recipes are expressed per effective worker per tick. A building's actual
//! output is the recipe scaled by effective workers and efficiency.

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingType;
use crate::economy::resources::ResourceKind;

/// A production recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Building type that runs this recipe
    pub building_type: BuildingType,
    /// Inputs consumed per effective worker per tick
    pub inputs: Vec<(ResourceKind, f64)>,
    /// Outputs produced per effective worker per tick
    pub outputs: Vec<(ResourceKind, f64)>,
}

/// Catalog of all recipes, at most one per building type
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        use ResourceKind::*;
        let mut catalog = Self::new();

        catalog.add(Recipe {
            building_type: BuildingType::KolkhozFarm,
            inputs: vec![],
            outputs: vec![(Food, 0.5)],
        });
        catalog.add(Recipe {
            building_type: BuildingType::Distillery,
            inputs: vec![(Food, 0.2)],
            outputs: vec![(Vodka, 0.15)],
        });
        catalog.add(Recipe {
            building_type: BuildingType::Sawmill,
            inputs: vec![],
            outputs: vec![(Timber, 0.4)],
        });
        catalog.add(Recipe {
            building_type: BuildingType::CementWorks,
            inputs: vec![],
            outputs: vec![(Cement, 0.2)],
        });
        catalog.add(Recipe {
            building_type: BuildingType::PrefabPlant,
            inputs: vec![(Cement, 0.15)],
            outputs: vec![(Prefab, 0.1)],
        });
        catalog.add(Recipe {
            building_type: BuildingType::SteelMill,
            inputs: vec![(Timber, 0.1)],
            outputs: vec![(Steel, 0.1)],
        });
        catalog.add(Recipe {
            building_type: BuildingType::Factory,
            inputs: vec![(Steel, 0.05)],
            outputs: vec![(Money, 0.8)],
        });
        // Power stations burn fuel per worker; their output is power, handled by the grid
        catalog.add(Recipe {
            building_type: BuildingType::PowerStation,
            inputs: vec![(Timber, 0.2)],
            outputs: vec![],
        });

        catalog
    }

    pub fn add(&mut self, recipe: Recipe) {
        self.recipes.retain(|r| r.building_type != recipe.building_type);
        self.recipes.push(recipe);
    }

    pub fn get(&self, building_type: BuildingType) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.building_type == building_type)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = RecipeCatalog::with_defaults();
        assert_eq!(catalog.len(), 8);
        let farm = catalog.get(BuildingType::KolkhozFarm).unwrap();
        assert!(farm.inputs.is_empty());
        assert_eq!(farm.outputs, vec![(ResourceKind::Food, 0.5)]);
        assert!(catalog.get(BuildingType::School).is_none());
    }

    #[test]
    fn test_add_replaces_same_building() {
        let mut catalog = RecipeCatalog::with_defaults();
        catalog.add(Recipe {
            building_type: BuildingType::Sawmill,
            inputs: vec![],
            outputs: vec![(ResourceKind::Timber, 1.0)],
        });
        assert_eq!(catalog.len(), 8);
        assert_eq!(
            catalog.get(BuildingType::Sawmill).unwrap().outputs[0].1,
            1.0
        );
    }
}
