use rand::Rng;
use serde::{Deserialize, Serialize};

use tanks_core::{Coord, HitTarget, Layout, PlayerId};

use crate::config::EngineConfig;
use crate::explosion::{self, ExplosionOutcome};
use crate::observer::{Checkpoint, Observer};
use crate::spawn;
use crate::state::GridState;

/// How a shot ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOutcome {
    /// Blocked by a wall or the board edge, or the step bound ran out.
    Stopped { at: Coord },
    HitPlayer(HitTarget),
    TriggeredBarrel {
        at: Coord,
        explosion: ExplosionOutcome,
    },
}

/// Fire a bullet from `player`'s cell along its facing and trace it to the
/// end: off walls and edges, through portals, around mirrors, into barrels
/// or tanks. The firer can be hit by its own bullet.
pub fn fire<R: Rng>(
    state: &mut GridState,
    layout: &Layout,
    config: &EngineConfig,
    player: PlayerId,
    rng: &mut R,
    observer: &mut impl Observer,
) -> ProjectileOutcome {
    let shooter = *state.player(player);
    let mut at = shooter.position;
    let mut direction = shooter.facing;
    let stride = config.bullet_frame_stride.max(1);
    let mut advances: u32 = 0;
    state.bullet = Some(at);

    let outcome = loop {
        if advances >= config.max_projectile_steps {
            tracing::warn!(%player, %at, advances, "Shot exceeded step bound, stopping bullet");
            break ProjectileOutcome::Stopped { at };
        }

        let next = at.step(direction);
        if layout.is_collision(next) {
            break ProjectileOutcome::Stopped { at };
        }
        at = next;
        advances += 1;
        state.bullet = Some(at);
        if (advances - 1) % stride == 0 {
            observer.checkpoint(Checkpoint::BulletAdvanced, state);
        }

        if state.live_barrels.contains(&at) {
            let explosion = explosion::explode(state, layout, at, observer);
            break ProjectileOutcome::TriggeredBarrel { at, explosion };
        }

        if let Some(target) = state.occupants(at) {
            break ProjectileOutcome::HitPlayer(target);
        }

        if layout.is_portal(at) {
            let destination = spawn::teleport(layout, at, rng);
            if destination != at {
                at = destination;
                state.bullet = Some(at);
                observer.checkpoint(Checkpoint::BulletTeleported, state);
            }
        }

        if let Some(mirror) = layout.mirror_at(at) {
            direction = direction.reflect(mirror);
        }
    };

    state.bullet = None;
    outcome
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tanks_core::Direction;
    use tanks_core::test_helpers::{at, board};

    use super::*;
    use crate::observer::{FrameRecorder, NullObserver};

    struct Shot {
        layout: Layout,
        state: GridState,
        config: EngineConfig,
        rng: StdRng,
    }

    impl Shot {
        fn new(rows: &[&str], one: Coord, facing: Direction, two: Coord) -> Self {
            let layout = board(rows, 3);
            let mut state = GridState::new(&layout, [one, two], 5);
            state.player_mut(PlayerId::One).facing = facing;
            Self {
                layout,
                state,
                config: EngineConfig::default(),
                rng: StdRng::seed_from_u64(17),
            }
        }

        fn fire(&mut self, observer: &mut impl Observer) -> ProjectileOutcome {
            fire(
                &mut self.state,
                &self.layout,
                &self.config,
                PlayerId::One,
                &mut self.rng,
                observer,
            )
        }
    }

    #[test]
    fn wall_stops_bullet_before_it() {
        let mut shot = Shot::new(
            &[".....", ".....", "....#", ".....", "....."],
            at(2, 0),
            Direction::East,
            at(4, 4),
        );
        assert_eq!(shot.fire(&mut NullObserver), ProjectileOutcome::Stopped { at: at(2, 3) });
        assert!(shot.state.bullet.is_none());
    }

    #[test]
    fn firing_into_the_edge_stops_at_the_firer() {
        let mut shot = Shot::new(&["...", "...", "..."], at(0, 1), Direction::North, at(2, 2));
        assert_eq!(shot.fire(&mut NullObserver), ProjectileOutcome::Stopped { at: at(0, 1) });
    }

    #[test]
    fn adjacent_target_against_wall_is_hit() {
        let mut shot = Shot::new(&["...", "..#", "..."], at(1, 0), Direction::East, at(1, 1));
        assert_eq!(
            shot.fire(&mut NullObserver),
            ProjectileOutcome::HitPlayer(HitTarget::Player(PlayerId::Two))
        );
    }

    #[test]
    fn barrel_in_line_of_fire_explodes() {
        let mut shot = Shot::new(
            &[".....", ".....", "..O..", ".....", "....."],
            at(2, 0),
            Direction::East,
            at(4, 4),
        );
        let mut rec = FrameRecorder::new();
        let outcome = shot.fire(&mut rec);

        let lit = rec
            .frames
            .iter()
            .find(|(c, _)| *c == Checkpoint::FlamesLit)
            .map(|(_, snap)| snap.flames.clone())
            .unwrap();
        let cross = [at(2, 2), at(1, 2), at(3, 2), at(2, 1), at(2, 3), at(0, 2), at(4, 2), at(2, 4)];
        for cell in cross {
            assert!(lit.contains(&cell), "{cell} missing from blast");
        }
        // The shooter stands two cells west of the barrel, inside the blast
        assert!(lit.contains(&at(2, 0)));
        assert_eq!(
            outcome,
            ProjectileOutcome::TriggeredBarrel {
                at: at(2, 2),
                explosion: ExplosionOutcome::HitPlayer(HitTarget::Player(PlayerId::One)),
            }
        );
        assert!(shot.state.live_barrels.is_empty());
    }

    #[test]
    fn barrel_out_of_blast_range_clears() {
        let mut shot = Shot::new(
            &[".......", ".......", ".......", "....O..", ".......", ".......", "......."],
            at(3, 0),
            Direction::East,
            at(6, 6),
        );
        assert_eq!(
            shot.fire(&mut NullObserver),
            ProjectileOutcome::TriggeredBarrel {
                at: at(3, 4),
                explosion: ExplosionOutcome::Cleared {
                    detonated: vec![at(3, 4)]
                },
            }
        );
    }

    #[test]
    fn mirror_redirects_bullet() {
        let mut shot = Shot::new(
            &["..#..", ".....", "../..", ".....", "....."],
            at(2, 0),
            Direction::East,
            at(1, 2),
        );
        // East into `/` turns North, straight into player 2
        assert_eq!(
            shot.fire(&mut NullObserver),
            ProjectileOutcome::HitPlayer(HitTarget::Player(PlayerId::Two))
        );
    }

    #[test]
    fn bullet_can_return_to_its_firer() {
        let mut shot = Shot::new(
            &["./.\\", "....", ".../", "...."],
            at(2, 1),
            Direction::East,
            at(3, 3),
        );
        assert_eq!(
            shot.fire(&mut NullObserver),
            ProjectileOutcome::HitPlayer(HitTarget::Player(PlayerId::One))
        );
    }

    #[test]
    fn bullet_passes_through_portals() {
        let mut shot = Shot::new(&["..?", "...", "?.."], at(0, 0), Direction::East, at(2, 1));
        let mut rec = FrameRecorder::new();
        assert_eq!(
            shot.fire(&mut rec),
            ProjectileOutcome::HitPlayer(HitTarget::Player(PlayerId::Two))
        );
        assert!(rec.checkpoints().any(|c| c == Checkpoint::BulletTeleported));
    }

    #[test]
    fn stacked_players_are_hit_together() {
        let mut shot = Shot::new(
            &["./.\\", "....", ".../", "...."],
            at(2, 1),
            Direction::East,
            at(2, 1),
        );
        assert_eq!(
            shot.fire(&mut NullObserver),
            ProjectileOutcome::HitPlayer(HitTarget::Both)
        );
    }

    #[test]
    fn frames_follow_stride() {
        let mut shot = Shot::new(&["......"; 6], at(0, 0), Direction::East, at(5, 5));
        let mut rec = FrameRecorder::new();
        shot.fire(&mut rec);
        // Five advances at stride 2: frames on the 1st, 3rd and 5th
        let bullets: Vec<_> = rec.frames.iter().map(|(_, s)| s.bullet).collect();
        assert_eq!(bullets, vec![Some(at(0, 1)), Some(at(0, 3)), Some(at(0, 5))]);
    }

    #[test]
    fn step_bound_stops_runaway_shot() {
        let mut shot = Shot::new(&["......."; 7], at(3, 0), Direction::East, at(0, 0));
        shot.config.max_projectile_steps = 3;
        assert_eq!(shot.fire(&mut NullObserver), ProjectileOutcome::Stopped { at: at(3, 3) });
    }

    #[test]
    fn firing_does_not_touch_health() {
        let mut shot = Shot::new(&["...", "...", "..."], at(1, 0), Direction::East, at(1, 2));
        shot.fire(&mut NullObserver);
        assert_eq!(shot.state.player(PlayerId::Two).health, 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use tanks_core::LayoutSpec;

        proptest! {
            #[test]
            fn straight_runs_never_exceed_the_board(
                seed in any::<u64>(),
                size in 2u32..9,
                cells in proptest::collection::vec((0i32..9, 0i32..9, 0u8..4), 0..16),
                firer in (0i32..9, 0i32..9),
                target in (0i32..9, 0i32..9),
                facing in 0usize..4,
            ) {
                let n = size as i32;
                let mut spec = LayoutSpec { size, max_health: 3, ..LayoutSpec::default() };
                for (r, c, kind) in cells {
                    let cell = Coord::new(r % n, c % n);
                    match kind {
                        0 => spec.walls.push(cell),
                        1 => spec.top_left_mirrors.push(cell),
                        2 => spec.top_right_mirrors.push(cell),
                        _ => spec.barrels.push(cell),
                    }
                }
                let layout = Layout::try_from(spec);
                prop_assume!(layout.is_ok());
                let layout = layout.unwrap();
                let one = Coord::new(firer.0 % n, firer.1 % n);
                let two = Coord::new(target.0 % n, target.1 % n);
                prop_assume!(!layout.is_occupied(one) && !layout.is_occupied(two));

                let mut state = GridState::new(&layout, [one, two], 5);
                state.player_mut(PlayerId::One).facing = Direction::ALL[facing];
                let config = EngineConfig { bullet_frame_stride: 1, ..EngineConfig::default() };
                let mut rng = StdRng::seed_from_u64(seed);
                let mut rec = FrameRecorder::new();
                let outcome = fire(&mut state, &layout, &config, PlayerId::One, &mut rng, &mut rec);

                let mut run = 0u32;
                let mut last_bullet = None;
                for (checkpoint, snapshot) in &rec.frames {
                    if *checkpoint != Checkpoint::BulletAdvanced {
                        continue;
                    }
                    let cell = snapshot.bullet.unwrap();
                    prop_assert!(!layout.is_collision(cell));
                    run += 1;
                    prop_assert!(run <= size, "{} steps in a straight line on a {}x{} board", run, size, size);
                    if layout.mirror_at(cell).is_some() {
                        run = 0;
                    }
                    last_bullet = Some(cell);
                }

                prop_assert_eq!(state.bullet, None);
                match outcome {
                    ProjectileOutcome::Stopped { at } => {
                        prop_assert!(!layout.is_collision(at));
                        prop_assert_eq!(last_bullet.unwrap_or(one), at);
                    },
                    ProjectileOutcome::HitPlayer(target) => {
                        let cell = last_bullet.unwrap();
                        prop_assert_eq!(
                            GridState::new(&layout, [one, two], 5).occupants(cell),
                            Some(target)
                        );
                    },
                    ProjectileOutcome::TriggeredBarrel { at, .. } => {
                        prop_assert_eq!(last_bullet, Some(at));
                        prop_assert!(layout.barrel_origins().contains(&at));
                    },
                }
            }
        }
    }
}
