//! Collective focus - the player's labour priority

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollectiveFocus {
    Food,
    Construction,
    Production,
    #[default]
    Balanced,
}

impl CollectiveFocus {
    /// Roles filled first, in order. Balanced has no ordering.
    pub fn role_priority(&self) -> &'static [BuildingRole] {
        use BuildingRole::*;
        match self {
            CollectiveFocus::Food => &[Agriculture, Industry, Construction, Power],
            CollectiveFocus::Construction => &[Construction, Power, Agriculture, Industry],
            CollectiveFocus::Production => &[Industry, Power, Construction, Agriculture],
            CollectiveFocus::Balanced => &[],
        }
    }

    /// Sort rank of a role; roles not listed come after all listed ones
    pub fn rank(&self, role: BuildingRole) -> usize {
        let order = self.role_priority();
        order.iter().position(|r| *r == role).unwrap_or(order.len())
    }

    /// Role that absorbs surplus labour
    pub fn primary_role(&self) -> Option<BuildingRole> {
        self.role_priority().first().copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollectiveFocus::Food => "food",
            CollectiveFocus::Construction => "construction",
            CollectiveFocus::Production => "production",
            CollectiveFocus::Balanced => "balanced",
        }
    }
}

impl std::str::FromStr for CollectiveFocus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "food" => Ok(CollectiveFocus::Food),
            "construction" => Ok(CollectiveFocus::Construction),
            "production" => Ok(CollectiveFocus::Production),
            "balanced" => Ok(CollectiveFocus::Balanced),
            other => Err(format!("unknown collective focus '{}'", other)),
        }
    }
}
