pub mod config;
pub mod explosion;
pub mod movement;
pub mod observer;
pub mod projectile;
pub mod spawn;
pub mod state;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use tanks_core::{Action, Command, HitTarget, Layout, PlayerId, Winner};

use config::EngineConfig;
use explosion::ExplosionOutcome;
use observer::{Checkpoint, Observer};
use projectile::ProjectileOutcome;
use state::GridState;

/// Summary of one [`TurnEngine::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Whether the action altered the state at all.
    pub changed: bool,
    pub hit: Option<HitTarget>,
    pub game_over: bool,
    /// A hit happened; callers that pause between rounds should wait now.
    pub awaiting_ack: bool,
}

/// Owns one game: the static layout, the mutable grid state and the RNG.
pub struct TurnEngine {
    layout: Layout,
    config: EngineConfig,
    state: GridState,
    rng: StdRng,
}

impl TurnEngine {
    /// Start a game, seeding the RNG from `config.seed` or the OS.
    pub fn new(layout: Layout, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(layout, config, rng)
    }

    pub fn with_rng(layout: Layout, config: EngineConfig, mut rng: StdRng) -> Self {
        let positions = spawn::spawn_players(&layout, &mut rng);
        let state = GridState::new(&layout, positions, config.barrel_budget);
        tracing::debug!(
            size = layout.size(),
            max_health = layout.max_health(),
            p1 = %positions[0],
            p2 = %positions[1],
            "Game started"
        );
        Self {
            layout,
            config,
            state,
            rng,
        }
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_game_over(&self) -> bool {
        self.state.players.iter().any(|p| p.health == 0)
    }

    /// The result once the game is over, `None` while it is still running.
    pub fn winner(&self) -> Option<Winner> {
        if !self.is_game_over() {
            return None;
        }
        let one = self.state.player(PlayerId::One).health;
        let two = self.state.player(PlayerId::Two).health;
        Some(match one.cmp(&two) {
            std::cmp::Ordering::Greater => Winner::Player(PlayerId::One),
            std::cmp::Ordering::Less => Winner::Player(PlayerId::Two),
            std::cmp::Ordering::Equal => Winner::Draw,
        })
    }

    /// Resolve one action to completion, including any explosion chain and
    /// the round reset after a hit. Does nothing once the game is over.
    pub fn apply(&mut self, action: Action, observer: &mut impl Observer) -> TurnReport {
        if self.is_game_over() {
            return TurnReport {
                game_over: true,
                ..TurnReport::default()
            };
        }

        let player = action.player;
        let (changed, hit) = match action.command {
            Command::Move(direction) => {
                let changed = movement::attempt_move(
                    &mut self.state,
                    &self.layout,
                    player,
                    direction,
                    &mut self.rng,
                    observer,
                );
                (changed, None)
            },
            Command::Fire => {
                let origin = self.state.player(player).position;
                let outcome = projectile::fire(
                    &mut self.state,
                    &self.layout,
                    &self.config,
                    player,
                    &mut self.rng,
                    observer,
                );
                let hit = match &outcome {
                    ProjectileOutcome::HitPlayer(target)
                    | ProjectileOutcome::TriggeredBarrel {
                        explosion: ExplosionOutcome::HitPlayer(target),
                        ..
                    } => Some(*target),
                    _ => None,
                };
                let changed = outcome != ProjectileOutcome::Stopped { at: origin };
                (changed, hit)
            },
            Command::PlaceBarrel => (self.place_barrel(player, observer), None),
        };

        if let Some(target) = hit {
            self.resolve_hit(target, observer);
        }

        TurnReport {
            changed,
            hit,
            game_over: self.is_game_over(),
            awaiting_ack: hit.is_some(),
        }
    }

    fn place_barrel(&mut self, player: PlayerId, observer: &mut impl Observer) -> bool {
        let cell = self.state.player(player).position;
        if self.state.barrel_budget == 0 || self.layout.is_occupied(cell) {
            return false;
        }
        self.state.live_barrels.insert(cell);
        self.state.barrel_budget -= 1;
        tracing::debug!(%player, at = %cell, remaining = self.state.barrel_budget, "Barrel placed");
        observer.checkpoint(Checkpoint::BarrelPlaced(player), &self.state);
        true
    }

    fn resolve_hit(&mut self, target: HitTarget, observer: &mut impl Observer) {
        observer.checkpoint(Checkpoint::PlayerHit(target), &self.state);
        for id in PlayerId::ALL {
            if target.includes(id) {
                let tank = self.state.player_mut(id);
                tank.health = tank.health.saturating_sub(1);
            }
        }
        tracing::info!(
            %target,
            p1_health = self.state.player(PlayerId::One).health,
            p2_health = self.state.player(PlayerId::Two).health,
            "Player hit"
        );

        let positions = spawn::spawn_players(&self.layout, &mut self.rng);
        self.state
            .reset_round(&self.layout, positions, self.config.barrel_budget);
        observer.checkpoint(Checkpoint::RoundReset, &self.state);

        if let Some(winner) = self.winner() {
            tracing::info!(?winner, "Game over");
        }
    }
}
