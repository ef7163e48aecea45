use std::collections::VecDeque;

use rand::Rng;

use tanks_core::{Action, PlayerId};

/// Per-player input queues with alternating service priority.
///
/// Each player may have at most `capacity` actions waiting; anything beyond
/// that is dropped so a player mashing keys cannot build up a backlog. When
/// both players have input waiting they are served in turn.
#[derive(Debug, Clone)]
pub struct InputArbiter {
    queues: [VecDeque<Action>; 2],
    capacity: usize,
    priority: PlayerId,
}

impl InputArbiter {
    pub fn new(capacity: usize, first: PlayerId) -> Self {
        Self {
            queues: [
                VecDeque::with_capacity(capacity),
                VecDeque::with_capacity(capacity),
            ],
            capacity,
            priority: first,
        }
    }

    /// Arbiter whose first priority is a coin flip.
    pub fn with_random_priority<R: Rng>(capacity: usize, rng: &mut R) -> Self {
        let first = if rng.random_bool(0.5) {
            PlayerId::One
        } else {
            PlayerId::Two
        };
        Self::new(capacity, first)
    }

    /// Queue an action. Returns `false` if the player's queue was full.
    pub fn push(&mut self, action: Action) -> bool {
        let queue = &mut self.queues[action.player.index()];
        if queue.len() >= self.capacity {
            tracing::debug!(player = %action.player, "Input queue full, dropping action");
            return false;
        }
        queue.push_back(action);
        true
    }

    /// Next action to run. Serving the prioritised player hands priority to
    /// the other; serving the other player because the prioritised one is
    /// idle leaves priority where it is.
    pub fn next(&mut self) -> Option<Action> {
        let preferred = self.priority;
        if let Some(action) = self.queues[preferred.index()].pop_front() {
            self.priority = preferred.other();
            return Some(action);
        }
        self.queues[preferred.other().index()].pop_front()
    }

    pub fn priority(&self) -> PlayerId {
        self.priority
    }

    pub fn pending(&self, player: PlayerId) -> usize {
        self.queues[player.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub fn clear(&mut self) {
        self.queues.iter_mut().for_each(VecDeque::clear);
    }
}
