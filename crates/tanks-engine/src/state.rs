use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use tanks_core::{Coord, Direction, HitTarget, Layout, PlayerId};

/// Cells lit by one explosion step: the centre plus up to eight reach cells.
pub type FlameSet = SmallVec<[Coord; 9]>;

/// One tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Coord,
    pub facing: Direction,
    pub health: u32,
}

/// Mutable per-game state. Owned by the engine; observers only see it by
/// shared reference.
#[derive(Debug, Clone)]
pub struct GridState {
    pub players: [PlayerState; 2],
    pub live_barrels: HashSet<Coord>,
    pub barrel_budget: u32,
    /// Set only while a shot is in flight.
    pub bullet: Option<Coord>,
    /// Non-empty only while a blast step is being shown.
    pub flames: FlameSet,
}

impl GridState {
    /// Fresh game state: full health, both facing North, barrels at their origins.
    pub fn new(layout: &Layout, positions: [Coord; 2], barrel_budget: u32) -> Self {
        let player = |position| PlayerState {
            position,
            facing: Direction::North,
            health: layout.max_health(),
        };
        Self {
            players: [player(positions[0]), player(positions[1])],
            live_barrels: layout.barrel_origins().clone(),
            barrel_budget,
            bullet: None,
            flames: FlameSet::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    /// Which players, if any, stand on `cell`.
    pub fn occupants(&self, cell: Coord) -> Option<HitTarget> {
        let one = self.player(PlayerId::One).position == cell;
        let two = self.player(PlayerId::Two).position == cell;
        match (one, two) {
            (true, true) => Some(HitTarget::Both),
            (true, false) => Some(HitTarget::Player(PlayerId::One)),
            (false, true) => Some(HitTarget::Player(PlayerId::Two)),
            (false, false) => None,
        }
    }

    /// Start a new round: re-place players and restore the board's dynamic
    /// content. Health and facing carry over.
    pub fn reset_round(&mut self, layout: &Layout, positions: [Coord; 2], barrel_budget: u32) {
        for (player, position) in self.players.iter_mut().zip(positions) {
            player.position = position;
        }
        self.live_barrels = layout.barrel_origins().clone();
        self.barrel_budget = barrel_budget;
        self.bullet = None;
        self.flames.clear();
    }

    /// Owned, render-ready copy of the dynamic state.
    pub fn snapshot(&self) -> Snapshot {
        let mut barrels: Vec<Coord> = self.live_barrels.iter().copied().collect();
        barrels.sort_unstable();
        Snapshot {
            players: self.players,
            barrels,
            barrel_budget: self.barrel_budget,
            bullet: self.bullet,
            flames: self.flames.to_vec(),
        }
    }
}

/// Serializable view of [`GridState`] for renderers and session broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: [PlayerState; 2],
    /// Sorted.
    pub barrels: Vec<Coord>,
    pub barrel_budget: u32,
    pub bullet: Option<Coord>,
    pub flames: Vec<Coord>,
}
