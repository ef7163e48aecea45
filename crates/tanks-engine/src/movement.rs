use rand::Rng;

use tanks_core::{Direction, Layout, PlayerId};

use crate::observer::{Checkpoint, Observer};
use crate::spawn;
use crate::state::GridState;

/// Turn `player` to face `direction` and drive one cell forward if the
/// target is neither off the board nor a wall. Entering a portal teleports
/// the tank within the same action. Returns whether anything changed.
pub fn attempt_move<R: Rng>(
    state: &mut GridState,
    layout: &Layout,
    player: PlayerId,
    direction: Direction,
    rng: &mut R,
    observer: &mut impl Observer,
) -> bool {
    let tank = state.player_mut(player);
    let turned = tank.facing != direction;
    tank.facing = direction;

    let target = tank.position.step(direction);
    if layout.is_collision(target) {
        if turned {
            observer.checkpoint(Checkpoint::Turned(player), state);
        }
        return turned;
    }

    tank.position = target;
    observer.checkpoint(Checkpoint::Moved(player), state);

    if layout.is_portal(target) {
        let destination = spawn::teleport(layout, target, rng);
        if destination != target {
            state.player_mut(player).position = destination;
            tracing::debug!(%player, from = %target, to = %destination, "Tank teleported");
            observer.checkpoint(Checkpoint::Teleported(player), state);
        }
    }
    true
}
