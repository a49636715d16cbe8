//! Simulation engine - main entry point for running the colony

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use solvital_logic::dose::{BodyRegion, RADIATION_CHECK_INTERVAL};
use solvital_logic::{
    AgentHealthRecord, BodyProfile, ClockPulse, ComplaintKind, DeathCause, DeathRecord,
    LoadError, MarsClock, NaturalAttributes, PhysiologyContext,
};

use crate::components::*;
use crate::systems::*;

/// Millisols between habitat regulator runs
const HABITAT_INTERVAL: f64 = 10.0;

/// Fitness level below which a colonist is kept off demanding work
pub const MIN_WORK_FITNESS: u8 = 3;

/// Everything the engine is built from: the physiology config and complaint
/// catalog shared by every colonist, and the seed all randomness derives from.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub physiology: PhysiologyContext,
    pub seed: u64,
}

impl SimulationContext {
    pub fn new(physiology: PhysiologyContext, seed: u64) -> Self {
        Self { physiology, seed }
    }

    /// Default config and the built-in complaint catalog.
    pub fn standard(seed: u64) -> Self {
        Self::new(PhysiologyContext::standard(), seed)
    }

    /// Load config and catalog from JSON documents.
    pub fn from_json(config_json: &str, catalog_json: &str, seed: u64) -> Result<Self, LoadError> {
        Ok(Self::new(
            PhysiologyContext::from_json(config_json, catalog_json)?,
            seed,
        ))
    }

    /// Seed for the colonist registered `order`-th.
    pub fn agent_seed(&self, order: u64) -> u64 {
        self.seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(order.wrapping_mul(0xBF58_476D_1CE4_E5B9))
    }
}

/// What one engine update did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummary {
    pub pulse: ClockPulse,
    pub physiology: PhysiologySummary,
    /// Colonists who picked up a radiation dose
    pub exposures: usize,
    pub shift_changes: usize,
    /// Habitats found unsurvivable at the start of a new sol
    pub hazardous_habitats: usize,
}

/// Snapshot of colony health
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColonyCensus {
    pub living: usize,
    /// Living colonists below [`MIN_WORK_FITNESS`]
    pub unfit: usize,
    pub mean_fitness: f64,
    pub mean_health: f64,
    /// Mean of each colonist's logged daily sleep [millisols]
    pub mean_sleep: f64,
    pub hazardous_habitats: Vec<HabitatId>,
    /// Most severe event still in the health log
    pub worst_event: Option<ColonyEvent>,
}

/// What was left when the engine shut down
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeardownReport {
    pub living: usize,
    pub unburied: Vec<PendingBurial>,
    pub buried: usize,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all occupants
    pub world: World,
    /// Life-support providers
    pub habitats: HabitatRegistry,
    /// Health events of every colonist
    pub health_log: HealthEventLog,
    /// Bodies waiting to be retrieved
    pub burials: BurialQueue,

    context: SimulationContext,
    clock: MarsClock,
    rng: ChaCha8Rng,
    next_registration: u64,
    initialized: bool,

    // Update timing [total millisols]
    last_habitat_update: f64,
    last_radiation_update: f64,
    last_shift_review: u32,

    time_scale: f64,
}

impl SimulationEngine {
    /// Create an empty colony. Call [`init`](Self::init) before updating.
    pub fn new(context: SimulationContext) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(context.seed);
        Self {
            world: World::new(),
            habitats: HabitatRegistry::new(),
            health_log: HealthEventLog::new(),
            burials: BurialQueue::new(),
            context,
            clock: MarsClock::default(),
            rng,
            next_registration: 0,
            initialized: false,
            last_habitat_update: 0.0,
            last_radiation_update: 0.0,
            last_shift_review: 0,
            time_scale: 1.0,
        }
    }

    /// Start the clock. Returns false if already running.
    pub fn init(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        let now = self.clock.total_millisols();
        self.last_habitat_update = now;
        self.last_radiation_update = now;
        self.last_shift_review = self.clock.sol();
        self.initialized = true;
        log::info!(
            "Colony engine started on sol {} with {} occupants in {} habitats",
            self.clock.sol(),
            self.world.len(),
            self.habitats.len()
        );
        true
    }

    /// Stop the engine and clear the colony.
    pub fn teardown(&mut self) -> TeardownReport {
        let report = TeardownReport {
            living: self.living_count(),
            unburied: self.burials.drain(),
            buried: self.burials.graveyard().len(),
        };
        self.world.clear();
        self.habitats.clear();
        self.health_log.clear();
        self.initialized = false;
        log::info!(
            "Colony engine stopped on sol {}: {} living, {} unburied",
            self.clock.sol(),
            report.living,
            report.unburied.len()
        );
        report
    }

    pub fn is_running(&self) -> bool {
        self.initialized
    }

    // ── Population ─────────────────────────────────────────────────────

    fn register(&mut self) -> RegistrationOrder {
        let order = RegistrationOrder(self.next_registration);
        self.next_registration += 1;
        order
    }

    fn habitat_name(&self, habitat: Option<HabitatId>) -> Option<String> {
        habitat
            .and_then(|id| self.habitats.get(id))
            .map(|h| h.name.clone())
    }

    /// Add a colonist with a fresh health record.
    pub fn spawn_colonist(
        &mut self,
        name: Name,
        profile: BodyProfile,
        attributes: NaturalAttributes,
        habitat: Option<HabitatId>,
    ) -> Entity {
        let order = self.register();
        let record = AgentHealthRecord::new(
            &self.context.physiology,
            profile,
            attributes,
            self.context.agent_seed(order.0),
        );
        self.spawn_with_record(name, order, record, habitat)
    }

    /// Add a colonist with body, attributes, vitals and prior dose drawn
    /// from the engine's generator.
    pub fn spawn_random_colonist(&mut self, name: Name, habitat: Option<HabitatId>) -> Entity {
        let profile = BodyProfile {
            mass_kg: self.rng.gen_range(55.0..=95.0),
            height_cm: self.rng.gen_range(155.0..=195.0),
            age_years: self.rng.gen_range(22.0..=60.0),
        };
        let attributes = NaturalAttributes::randomized(&mut self.rng);
        let order = self.register();
        let record = AgentHealthRecord::new(
            &self.context.physiology,
            profile,
            attributes,
            self.context.agent_seed(order.0),
        )
        .with_random_vitals()
        .with_dose_history();
        self.spawn_with_record(name, order, record, habitat)
    }

    fn spawn_with_record(
        &mut self,
        name: Name,
        order: RegistrationOrder,
        mut record: AgentHealthRecord,
        habitat: Option<HabitatId>,
    ) -> Entity {
        if let Some(location) = self.habitat_name(habitat) {
            record.set_location(location);
        }
        let shift = Shift::avoiding(record.preferred_sleep_hours());
        record.adapt_sleep_to_shift(shift.window().1, true);
        let entity = self.world.spawn((
            Occupant::Person,
            order,
            name,
            Activity::default(),
            shift,
            Physiology(record),
        ));
        if let Some(habitat) = habitat {
            let _ = self.world.insert_one(entity, Containment { habitat });
        }
        entity
    }

    pub fn spawn_robot(&mut self, name: Name, habitat: Option<HabitatId>) -> Entity {
        self.spawn_occupant(Occupant::Robot, name, habitat)
    }

    pub fn spawn_equipment(&mut self, name: Name, habitat: Option<HabitatId>) -> Entity {
        self.spawn_occupant(Occupant::Equipment, name, habitat)
    }

    fn spawn_occupant(&mut self, kind: Occupant, name: Name, habitat: Option<HabitatId>) -> Entity {
        let order = self.register();
        let entity = self.world.spawn((kind, order, name));
        if let Some(habitat) = habitat {
            let _ = self.world.insert_one(entity, Containment { habitat });
        }
        entity
    }

    // ── Tick ───────────────────────────────────────────────────────────

    /// Advance the colony by `delta_msol` millisols.
    pub fn update(&mut self, delta_msol: f64) -> Option<TickSummary> {
        if !self.initialized {
            log::warn!("Colony engine updated before init; ignoring");
            return None;
        }
        let pulse = self.clock.advance(delta_msol * self.time_scale);
        let now = self.clock.total_millisols();

        // Regulators refill air before anyone breathes it
        if now - self.last_habitat_update >= HABITAT_INTERVAL {
            habitat_system(&mut self.habitats, now - self.last_habitat_update);
            self.last_habitat_update = now;
        }

        // Every colonist, every pulse
        let physiology = physiology_system(
            &mut self.world,
            &mut self.habitats,
            &pulse,
            &mut self.health_log,
            &mut self.burials,
        );

        let mut exposures = 0;
        if now - self.last_radiation_update >= RADIATION_CHECK_INTERVAL {
            exposures = radiation_system(
                &mut self.world,
                &self.habitats,
                now - self.last_radiation_update,
                &mut self.rng,
            );
            self.last_radiation_update = now;
        }

        let mut shift_changes = 0;
        let mut hazardous_habitats = 0;
        if pulse.new_sol {
            self.health_log.prune(pulse.mission_sol);
            shift_sleep_system(&mut self.world);
            if pulse.mission_sol.saturating_sub(self.last_shift_review) >= SHIFT_REVIEW_SOLS {
                shift_changes = shift_preference_system(&mut self.world);
                self.last_shift_review = pulse.mission_sol;
            }
            for id in self.habitats.hazardous(&self.context.physiology.config) {
                if let Some(habitat) = self.habitats.get(id) {
                    log::warn!("Habitat {} is unsurvivable on sol {}", habitat.name, pulse.mission_sol);
                }
                hazardous_habitats += 1;
            }
        }

        Some(TickSummary {
            pulse,
            physiology,
            exposures,
            shift_changes,
            hazardous_habitats,
        })
    }

    /// Set time scale (1.0 = one millisol per millisol requested)
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn clock(&self) -> &MarsClock {
        &self.clock
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    fn now(&self) -> ClockPulse {
        ClockPulse::at(self.clock.sol(), self.clock.millisol(), 0.0)
    }

    // ── Colonist actions ───────────────────────────────────────────────

    fn with_record<T>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut AgentHealthRecord) -> T,
    ) -> Option<T> {
        let mut physiology = self.world.get::<&mut Physiology>(entity).ok()?;
        Some(f(&mut physiology.0))
    }

    pub fn set_activity(&mut self, entity: Entity, activity: Activity) -> bool {
        match self.world.get::<&mut Activity>(entity) {
            Ok(mut current) => {
                *current = activity;
                true
            }
            Err(_) => false,
        }
    }

    /// Move an occupant into a habitat.
    pub fn move_to(&mut self, entity: Entity, habitat: HabitatId) -> bool {
        let Some(location) = self.habitat_name(Some(habitat)) else {
            return false;
        };
        if self.world.insert_one(entity, Containment { habitat }).is_err() {
            return false;
        }
        self.with_record(entity, |r| r.set_location(location));
        true
    }

    /// Feed a colonist. Returns the kJ absorbed.
    pub fn feed(&mut self, entity: Entity, food_kg: f64) -> Option<f64> {
        self.with_record(entity, |r| r.eat(food_kg))
    }

    pub fn give_water(&mut self, entity: Entity, water_kg: f64) -> bool {
        self.with_record(entity, |r| r.drink(water_kg)).is_some()
    }

    pub fn exercise(&mut self, entity: Entity, time: f64) -> bool {
        self.with_record(entity, |r| r.exercise(time)).is_some()
    }

    pub fn add_stress(&mut self, entity: Entity, amount: f64) -> bool {
        self.with_record(entity, |r| r.add_stress(amount)).is_some()
    }

    pub fn expose(&mut self, entity: Entity, region: BodyRegion, amount: f64) -> bool {
        self.with_record(entity, |r| r.expose(region, amount)).is_some()
    }

    /// Start treatment of an active complaint.
    pub fn treat(&mut self, entity: Entity, kind: ComplaintKind) -> bool {
        self.with_record(entity, |r| r.treat(kind)).unwrap_or(false)
    }

    /// Kill a colonist outright and queue the body for burial.
    pub fn declare_dead(&mut self, entity: Entity, cause: DeathCause) -> bool {
        let pulse = self.now();
        let Some(events) = self.with_record(entity, |r| r.declare_dead(cause, &pulse)) else {
            return false;
        };
        if events.is_empty() {
            return false;
        }
        let name = self.name_of(entity);
        for event in events {
            self.health_log.record(entity, name.as_str(), &pulse, event);
        }
        if let Some(record) = self.death_record(entity) {
            self.burials.enqueue(entity, name, record);
        }
        true
    }

    /// Bury a dead colonist, removing them from the world.
    pub fn bury(&mut self, entity: Entity) -> Option<DeathRecord> {
        self.burials.bury(&mut self.world, entity)
    }

    /// Bury whoever has waited longest.
    pub fn bury_oldest(&mut self) -> Option<DeathRecord> {
        let entity = self.burials.oldest()?.entity;
        self.bury(entity)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn name_of(&self, entity: Entity) -> String {
        self.world
            .get::<&Name>(entity)
            .map(|n| n.full_name())
            .unwrap_or_default()
    }

    pub fn performance(&self, entity: Entity) -> Option<f64> {
        self.world
            .get::<&Physiology>(entity)
            .ok()
            .map(|p| p.performance())
    }

    pub fn preferred_sleep_hours(&self, entity: Entity) -> Option<(u32, u32)> {
        self.world
            .get::<&Physiology>(entity)
            .ok()
            .map(|p| p.preferred_sleep_hours())
    }

    pub fn death_record(&self, entity: Entity) -> Option<DeathRecord> {
        self.world
            .get::<&Physiology>(entity)
            .ok()
            .and_then(|p| p.death_record().cloned())
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world
            .get::<&Physiology>(entity)
            .map(|p| p.is_alive())
            .unwrap_or(false)
    }

    /// Count every person, living or dead, still in the world
    pub fn colonist_count(&self) -> usize {
        self.count(Occupant::Person)
    }

    pub fn living_count(&self) -> usize {
        self.world
            .query::<&Physiology>()
            .iter()
            .filter(|(_, p)| p.is_alive())
            .count()
    }

    pub fn robot_count(&self) -> usize {
        self.count(Occupant::Robot)
    }

    pub fn equipment_count(&self) -> usize {
        self.count(Occupant::Equipment)
    }

    fn count(&self, kind: Occupant) -> usize {
        self.world
            .query::<&Occupant>()
            .iter()
            .filter(|(_, o)| **o == kind)
            .count()
    }

    /// Fitness, health and sleep across the living colony.
    pub fn census(&self) -> ColonyCensus {
        let mut census = ColonyCensus {
            hazardous_habitats: self.habitats.hazardous(&self.context.physiology.config),
            worst_event: self.health_log.highest_priority().cloned(),
            ..ColonyCensus::default()
        };
        let (mut fitness, mut health, mut sleep) = (0.0, 0.0, 0.0);
        for (_, physiology) in self.world.query::<&Physiology>().iter() {
            if physiology.is_dead() {
                continue;
            }
            census.living += 1;
            if physiology.is_unfit(MIN_WORK_FITNESS) {
                census.unfit += 1;
            }
            fitness += f64::from(physiology.fitness_level());
            health += physiology.health_score();
            sleep += physiology.average_sleep();
        }
        if census.living > 0 {
            let n = census.living as f64;
            census.mean_fitness = fitness / n;
            census.mean_health = health / n;
            census.mean_sleep = sleep / n;
        }
        census
    }

    /// Everyone inside a habitat
    pub fn occupants_of(&self, habitat: HabitatId) -> Vec<Entity> {
        self.world
            .query::<&Containment>()
            .iter()
            .filter(|(_, c)| c.habitat == habitat)
            .map(|(entity, _)| entity)
            .collect()
    }
}
