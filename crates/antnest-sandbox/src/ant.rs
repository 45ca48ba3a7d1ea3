//! Ants: the queen a candidate policy controls and the workers wandering around her.
//!
//! Both share the same body. Health decays over time, twice as fast on acid, and
//! standing on mulch eats it. Only the queen observes, digs and places nests; workers
//! pick a random direction now and then, competing with her for mulch.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    block::BlockKind,
    terrain::{Column, Terrain},
};

/// Number of values in a queen observation.
pub const OBSERVATION_LEN: usize = 6;

/// Highest step up or down the queen can take in one move.
pub const MAX_CLIMB: usize = 2;

/// Discrete actions, indexed by the position of the policy's highest output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveNorth,
    MoveSouth,
    MoveWest,
    MoveEast,
    Dig,
    PlaceNest,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveNorth,
        Action::MoveSouth,
        Action::MoveWest,
        Action::MoveEast,
        Action::Dig,
        Action::PlaceNest,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    fn direction(self) -> Option<(isize, isize)> {
        match self {
            Action::MoveNorth => Some(DIRECTIONS[0]),
            Action::MoveSouth => Some(DIRECTIONS[1]),
            Action::MoveWest => Some(DIRECTIONS[2]),
            Action::MoveEast => Some(DIRECTIONS[3]),
            Action::Dig | Action::PlaceNest => None,
        }
    }
}

/// North, south, west, east as `(dx, dz)`.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// Health parameters shared by all ants, and the queen's nest-building costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntConfig {
    pub max_health: f64,
    /// Health lost per simulated second.
    pub decay_per_second: f64,
    /// Decay multiplier while standing on acid.
    pub acid_decay_multiplier: f64,
    /// Fraction of max health restored by eating one mulch block.
    pub mulch_restore_fraction: f64,
    /// Fraction of max health one nest costs.
    pub nest_cost_fraction: f64,
    /// Nests can only be placed at least this many columns from every edge.
    pub nest_margin: usize,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            max_health: 30.0,
            decay_per_second: 1.0,
            acid_decay_multiplier: 2.0,
            mulch_restore_fraction: 0.6,
            nest_cost_fraction: 0.33,
            nest_margin: 2,
        }
    }
}

/// What happened when the queen tried to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Outcome {
    Moved,
    Dug,
    NestPlaced,
    Blocked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ant {
    column: Column,
    health: f64,
}

impl Ant {
    #[must_use]
    pub fn new(column: Column, config: &AntConfig) -> Self {
        Self {
            column,
            health: config.max_health,
        }
    }

    #[must_use]
    pub fn column(&self) -> Column {
        self.column
    }

    #[must_use]
    pub fn health(&self) -> f64 {
        self.health
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    fn standing_on(&self, terrain: &Terrain) -> BlockKind {
        terrain
            .surface_block(self.column)
            .map_or(BlockKind::Air, |(_, kind)| kind)
    }

    /// Applies health decay for `delta_time` seconds, doubled on acid.
    pub fn decay(&mut self, terrain: &Terrain, config: &AntConfig, delta_time: f64) {
        let mut decay = config.decay_per_second * delta_time;
        if self.standing_on(terrain).is_acidic() {
            decay *= config.acid_decay_multiplier;
        }
        self.health -= decay;
    }

    /// Eats the mulch block under the queen, if any.
    pub fn try_eat(&mut self, terrain: &mut Terrain, config: &AntConfig) -> bool {
        let Some((y, BlockKind::Mulch)) = terrain.surface_block(self.column) else {
            return false;
        };
        terrain.set(self.column.x, y, self.column.z, BlockKind::Air);
        self.health =
            (self.health + config.max_health * config.mulch_restore_fraction).min(config.max_health);
        true
    }

    fn can_place_nest(&self, terrain: &Terrain, config: &AntConfig) -> bool {
        terrain.is_interior(self.column, config.nest_margin)
            && terrain
                .surface_height(self.column)
                .and_then(|y| terrain.get(self.column.x, y + 1, self.column.z))
                .is_some_and(|kind| kind.is_air())
    }

    fn ready_to_nest(&self, config: &AntConfig) -> bool {
        self.health >= config.max_health * config.nest_cost_fraction
    }

    /// Builds the observation vector fed to the policy.
    ///
    /// `[health, on mulch, on acid, noise, can place nest, ready to nest]`, health
    /// normalized to `[0, 1]` and flags encoded as `0.0`/`1.0`.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn observe(
        &self,
        terrain: &Terrain,
        config: &AntConfig,
        noise: f32,
    ) -> [f32; OBSERVATION_LEN] {
        let flag = |b: bool| -> f32 { if b { 1.0 } else { 0.0 } };
        let standing_on = self.standing_on(terrain);
        [
            (self.health / config.max_health).clamp(0.0, 1.0) as f32,
            flag(standing_on.is_mulch()),
            flag(standing_on.is_acidic()),
            noise,
            flag(self.can_place_nest(terrain, config)),
            flag(self.ready_to_nest(config)),
        ]
    }

    /// Performs one action.
    pub fn act(&mut self, action: Action, terrain: &mut Terrain, config: &AntConfig) -> Outcome {
        if let Some((dx, dz)) = action.direction() {
            return self.try_move(dx, dz, terrain);
        }
        match action {
            Action::Dig => self.try_dig(terrain),
            Action::PlaceNest => self.try_place_nest(terrain, config),
            Action::MoveNorth | Action::MoveSouth | Action::MoveWest | Action::MoveEast => {
                Outcome::Blocked
            }
        }
    }

    /// Tries to move one column in a uniformly chosen direction.
    pub fn wander<R>(&mut self, terrain: &Terrain, rng: &mut R) -> Outcome
    where
        R: Rng + ?Sized,
    {
        let (dx, dz) = DIRECTIONS[rng.random_range(0..DIRECTIONS.len())];
        self.try_move(dx, dz, terrain)
    }

    fn try_move(&mut self, dx: isize, dz: isize, terrain: &Terrain) -> Outcome {
        let Some(target) = self.column.offset(dx, dz) else {
            return Outcome::Blocked;
        };
        let (Some(from), Some(to)) = (
            terrain.surface_height(self.column),
            terrain.surface_height(target),
        ) else {
            return Outcome::Blocked;
        };
        if from.abs_diff(to) > MAX_CLIMB {
            return Outcome::Blocked;
        }
        self.column = target;
        Outcome::Moved
    }

    fn try_dig(&mut self, terrain: &mut Terrain) -> Outcome {
        match terrain.surface_block(self.column) {
            Some((y, kind)) if y > 0 && kind.is_diggable() => {
                terrain.set(self.column.x, y, self.column.z, BlockKind::Air);
                Outcome::Dug
            }
            _ => Outcome::Blocked,
        }
    }

    fn try_place_nest(&mut self, terrain: &mut Terrain, config: &AntConfig) -> Outcome {
        if !self.ready_to_nest(config) || !self.can_place_nest(terrain, config) {
            return Outcome::Blocked;
        }
        let Some(y) = terrain.surface_height(self.column) else {
            return Outcome::Blocked;
        };
        terrain.set(self.column.x, y + 1, self.column.z, BlockKind::Nest);
        self.health -= config.max_health * config.nest_cost_fraction;
        Outcome::NestPlaced
    }
}
