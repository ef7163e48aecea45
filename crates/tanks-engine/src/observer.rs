use serde::{Deserialize, Serialize};

use tanks_core::{HitTarget, PlayerId};

use crate::state::{GridState, Snapshot};

/// A point during action resolution where the state is worth showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Checkpoint {
    Moved(PlayerId),
    /// Facing changed but the tank was blocked.
    Turned(PlayerId),
    Teleported(PlayerId),
    BarrelPlaced(PlayerId),
    BulletAdvanced,
    BulletTeleported,
    FlamesLit,
    FlamesCleared,
    /// Emitted before health is reduced and the round is reset.
    PlayerHit(HitTarget),
    RoundReset,
}

/// Receives checkpoints while the engine resolves an action.
pub trait Observer {
    fn checkpoint(&mut self, checkpoint: Checkpoint, state: &GridState);
}

impl<F> Observer for F
where
    F: FnMut(Checkpoint, &GridState),
{
    fn checkpoint(&mut self, checkpoint: Checkpoint, state: &GridState) {
        self(checkpoint, state)
    }
}

/// Discards every checkpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn checkpoint(&mut self, _checkpoint: Checkpoint, _state: &GridState) {}
}

/// Keeps a snapshot of the state at every checkpoint.
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    pub frames: Vec<(Checkpoint, Snapshot)>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkpoints(&self) -> impl Iterator<Item = Checkpoint> + '_ {
        self.frames.iter().map(|(c, _)| *c)
    }

    /// Hand over the recorded frames, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<(Checkpoint, Snapshot)> {
        std::mem::take(&mut self.frames)
    }
}

impl Observer for FrameRecorder {
    fn checkpoint(&mut self, checkpoint: Checkpoint, state: &GridState) {
        self.frames.push((checkpoint, state.snapshot()));
    }
}
