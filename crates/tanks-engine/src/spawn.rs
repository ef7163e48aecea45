//! Random placement rules: round-start spawning and portal teleports.

use rand::Rng;

use tanks_core::{Coord, Layout};

/// Pick starting cells for both players.
///
/// With at least two designated spawns, two distinct ones are drawn.
/// Otherwise cells are drawn uniformly from the whole board until both are
/// free of special content and distinct. Layout validation guarantees at
/// least two such cells exist.
pub fn spawn_players<R: Rng>(layout: &Layout, rng: &mut R) -> [Coord; 2] {
    let spawns = layout.spawns();
    if spawns.len() >= 2 {
        let first = spawns[rng.random_range(0..spawns.len())];
        let mut second = spawns[rng.random_range(0..spawns.len())];
        while second == first {
            second = spawns[rng.random_range(0..spawns.len())];
        }
        return [first, second];
    }

    // Validated layouts never exceed i32::MAX.
    let size = i32::try_from(layout.size()).unwrap_or(i32::MAX);
    let random_cell = |rng: &mut R| {
        Coord::new(rng.random_range(0..size), rng.random_range(0..size))
    };
    loop {
        let first = random_cell(rng);
        let second = random_cell(rng);
        if first != second && !layout.is_occupied(first) && !layout.is_occupied(second) {
            return [first, second];
        }
    }
}

/// Destination when something enters the portal at `from`.
///
/// Uniform over the other portals. With fewer than two portals there is
/// nowhere to go and `from` is returned.
pub fn teleport<R: Rng>(layout: &Layout, from: Coord, rng: &mut R) -> Coord {
    let portals = layout.portals();
    let Some(entry) = portals.iter().position(|&p| p == from) else {
        return from;
    };
    if portals.len() < 2 {
        return from;
    }
    let mut pick = rng.random_range(0..portals.len() - 1);
    if pick >= entry {
        pick += 1;
    }
    portals[pick]
}
