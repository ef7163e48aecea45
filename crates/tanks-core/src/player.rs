use serde::{Deserialize, Serialize};

/// One of the two tanks on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Zero-based slot, for indexing per-player arrays.
    pub const fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub const fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::One => write!(f, "player 1"),
            PlayerId::Two => write!(f, "player 2"),
        }
    }
}

/// Who was caught by a bullet or a blast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    Player(PlayerId),
    Both,
}

impl HitTarget {
    pub fn includes(self, player: PlayerId) -> bool {
        match self {
            HitTarget::Player(p) => p == player,
            HitTarget::Both => true,
        }
    }
}

impl std::fmt::Display for HitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HitTarget::Player(p) => write!(f, "{p}"),
            HitTarget::Both => write!(f, "both players"),
        }
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(PlayerId),
    /// Equal health at the end, e.g. both knocked out by a shared hit.
    Draw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_swaps_players() {
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other(), PlayerId::One);
    }

    #[test]
    fn indices_are_distinct() {
        assert_eq!(PlayerId::One.index(), 0);
        assert_eq!(PlayerId::Two.index(), 1);
    }

    #[test]
    fn both_includes_everyone() {
        assert!(HitTarget::Both.includes(PlayerId::One));
        assert!(HitTarget::Both.includes(PlayerId::Two));
        assert!(HitTarget::Player(PlayerId::Two).includes(PlayerId::Two));
        assert!(!HitTarget::Player(PlayerId::Two).includes(PlayerId::One));
    }
}
