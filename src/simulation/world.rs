//! The simulation context
//!
//! Every subsystem's state lives here and is handed to the subsystems by
//! reference during a tick.

use rand::Rng;
use tracing::info;

use crate::city::building::BuildingArchetype;
use crate::city::recipe::RecipeCatalog;
use crate::city::terrain::TerrainGrid;
use crate::core::calendar::Calendar;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{GridPos, IdAllocator, Tick};
use crate::economy::resources::{ResourceKind, ResourceStore};
use crate::economy::EconomySystem;
use crate::events::EventSystem;
use crate::political::{MandateState, PoliticalEntities, PoliticalSystem, Politburo};
use crate::population::citizen::CitizenClass;
use crate::population::registry::CitizenRegistry;
use crate::scoring::ScoringSystem;
use crate::settlement::SettlementSystem;
use crate::simulation::command::SimCommand;
use crate::simulation::tick::TickReport;
use crate::workforce::governor::WorkerGovernor;

#[derive(Debug, Clone)]
pub struct SimulationWorld {
    pub(crate) config: SimulationConfig,
    pub(crate) calendar: Calendar,
    pub(crate) terrain: TerrainGrid,
    pub(crate) recipes: RecipeCatalog,
    pub(crate) store: ResourceStore,
    pub(crate) registry: CitizenRegistry,
    pub(crate) buildings: BuildingArchetype,
    pub(crate) building_ids: IdAllocator,
    pub(crate) governor: WorkerGovernor,
    pub(crate) economy: EconomySystem,
    pub(crate) settlement: SettlementSystem,
    pub(crate) political: PoliticalSystem,
    pub(crate) events: EventSystem,
    pub(crate) scoring: ScoringSystem,
    pub(crate) pending: Vec<SimCommand>,
    pub(crate) last_report: Option<TickReport>,
    pub(crate) game_over: bool,
}

impl SimulationWorld {
    /// Found a settlement. Refuses an invalid configuration.
    pub fn new<R: Rng + ?Sized>(config: SimulationConfig, terrain: TerrainGrid, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let founding = &config.founding;
        let mut store = ResourceStore::new();
        store.set(ResourceKind::Food, founding.food);
        store.set(ResourceKind::Timber, founding.timber);
        store.set(ResourceKind::Steel, founding.steel);
        store.set(ResourceKind::Cement, founding.cement);
        store.set(ResourceKind::Prefab, founding.prefab);
        store.set(ResourceKind::Money, founding.money);
        store.set(ResourceKind::Vodka, founding.vodka);

        let mut registry = CitizenRegistry::new();
        registry.found_households(founding.households, founding.household_size, rng);
        let workforce = &config.workforce;
        for _ in 0..founding.party_officials {
            if registry
                .appoint(CitizenClass::PartyOfficial, workforce.min_working_age, workforce.max_working_age)
                .is_none()
            {
                break;
            }
        }
        store.set(ResourceKind::Population, registry.len() as f64);

        let mut buildings = BuildingArchetype::new();
        let mut building_ids = IdAllocator::new();
        {
            let mut sites = buildable_sites(&terrain);
            for building_type in &founding.buildings {
                let position = sites.next().ok_or_else(|| {
                    SimError::InvalidConfiguration("terrain has too few buildable cells for the founding buildings".into())
                })?;
                buildings.spawn(building_ids.building(), *building_type, position, 0);
            }
        }

        let economy = EconomySystem::new(&config.economy, config.start_year);
        let doctrine = economy.doctrine();
        let world = Self {
            calendar: Calendar::new(config.start_year),
            terrain,
            recipes: RecipeCatalog::with_defaults(),
            store,
            registry,
            buildings,
            building_ids,
            governor: WorkerGovernor::default(),
            economy,
            settlement: SettlementSystem::new(),
            political: PoliticalSystem::new(doctrine, &config.political),
            events: EventSystem::new(&config.events),
            scoring: ScoringSystem::new(doctrine, config.difficulty, config.consequences),
            pending: Vec::new(),
            last_report: None,
            game_over: false,
            config,
        };
        info!(
            citizens = world.registry.len(),
            buildings = world.buildings.count(),
            year = world.calendar.year(),
            "settlement founded"
        );
        Ok(world)
    }

    /// Queue a command for the start of the next tick
    pub fn submit(&mut self, command: SimCommand) {
        self.pending.push(command);
    }

    pub fn pending_commands(&self) -> &[SimCommand] {
        &self.pending
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn current_tick(&self) -> Tick {
        self.calendar.current_tick()
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.store
    }

    pub fn registry(&self) -> &CitizenRegistry {
        &self.registry
    }

    pub fn buildings(&self) -> &BuildingArchetype {
        &self.buildings
    }

    pub fn governor(&self) -> &WorkerGovernor {
        &self.governor
    }

    pub fn economy(&self) -> &EconomySystem {
        &self.economy
    }

    pub fn settlement(&self) -> &SettlementSystem {
        &self.settlement
    }

    pub fn political(&self) -> &PoliticalSystem {
        &self.political
    }

    pub fn political_entities(&self) -> &PoliticalEntities {
        self.political.entities()
    }

    pub fn politburo(&self) -> &Politburo {
        self.political.politburo()
    }

    pub fn mandates(&self) -> &MandateState {
        self.political.mandates()
    }

    pub fn events(&self) -> &EventSystem {
        &self.events
    }

    pub fn scoring(&self) -> &ScoringSystem {
        &self.scoring
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// True once the chairman has been arrested
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Provisional score including the open era
    pub fn score(&self) -> f64 {
        self.scoring
            .provisional_score(self.registry.len() as u32, self.buildings.count() as u32)
    }
}

/// Buildable cells in row-major order
fn buildable_sites(terrain: &TerrainGrid) -> impl Iterator<Item = GridPos> + '_ {
    (0..terrain.height())
        .flat_map(move |y| (0..terrain.width()).map(move |x| GridPos::new(x, y)))
        .filter(move |pos| terrain.is_buildable(*pos))
}
