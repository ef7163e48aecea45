use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use tanks_core::{Coord, Direction, HitTarget, Layout};

use crate::observer::{Checkpoint, Observer};
use crate::state::{FlameSet, GridState};

/// How a barrel chain ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionOutcome {
    /// Every queued barrel burned out without catching a tank.
    Cleared { detonated: Vec<Coord> },
    /// A flame reached a tank; the rest of the chain was abandoned.
    HitPlayer(HitTarget),
}

/// Cells reached by a blast centred on `centre`, in scan order: the centre,
/// then one step N/W/S/E, then two steps N/W/S/E.
///
/// The two-step cell is taken from the resolved one-step cell, so a wall or
/// board edge next to the centre shields the cell behind it as well.
pub fn footprint(layout: &Layout, centre: Coord) -> FlameSet {
    let mut flames = FlameSet::new();
    if !layout.is_collision(centre) {
        flames.push(centre);
    }

    let reach_one = Direction::ALL.map(|d| {
        let near = centre.step(d);
        (!layout.is_collision(near)).then_some(near)
    });
    flames.extend(reach_one.iter().flatten().copied());

    for (direction, near) in Direction::ALL.into_iter().zip(reach_one) {
        if let Some(near) = near
            && !layout.is_collision(near.step(direction))
        {
            flames.push(near.step(direction));
        }
    }
    flames
}

/// Detonate the live barrel at `origin` and propagate the chain.
///
/// Barrels caught in a blast are removed and queued as new centres. The
/// first flame cell holding a tank ends the whole chain.
pub fn explode(
    state: &mut GridState,
    layout: &Layout,
    origin: Coord,
    observer: &mut impl Observer,
) -> ExplosionOutcome {
    state.live_barrels.remove(&origin);
    let mut queue = VecDeque::from([origin]);
    let mut detonated = Vec::new();

    while let Some(centre) = queue.pop_front() {
        tracing::debug!(at = %centre, "Barrel detonated");
        detonated.push(centre);

        state.flames = footprint(layout, centre);
        observer.checkpoint(Checkpoint::FlamesLit, state);

        let mut hit = None;
        for i in 0..state.flames.len() {
            let cell = state.flames[i];
            if state.live_barrels.remove(&cell) {
                queue.push_back(cell);
            }
            if let Some(target) = state.occupants(cell) {
                hit = Some(target);
                break;
            }
        }

        state.flames.clear();
        observer.checkpoint(Checkpoint::FlamesCleared, state);

        if let Some(target) = hit {
            return ExplosionOutcome::HitPlayer(target);
        }
    }

    ExplosionOutcome::Cleared { detonated }
}
