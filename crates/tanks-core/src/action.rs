use serde::{Deserialize, Serialize};

use crate::grid::Direction;
use crate::player::PlayerId;

/// What a tank can do in one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Turn to face the direction and try to drive one cell forward.
    Move(Direction),
    Fire,
    /// Drop a barrel on the tank's current cell.
    PlaceBarrel,
}

/// A resolved command for one player. The engine consumes exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub player: PlayerId,
    pub command: Command,
}

impl Action {
    pub const fn new(player: PlayerId, command: Command) -> Self {
        Self { player, command }
    }

    pub const fn moving(player: PlayerId, direction: Direction) -> Self {
        Self::new(player, Command::Move(direction))
    }

    pub const fn fire(player: PlayerId) -> Self {
        Self::new(player, Command::Fire)
    }

    pub const fn place_barrel(player: PlayerId) -> Self {
        Self::new(player, Command::PlaceBarrel)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.command {
            Command::Move(d) => write!(f, "{} moves {d:?}", self.player),
            Command::Fire => write!(f, "{} fires", self.player),
            Command::PlaceBarrel => write!(f, "{} places a barrel", self.player),
        }
    }
}
