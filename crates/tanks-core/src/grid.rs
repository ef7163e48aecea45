use serde::{Deserialize, Serialize};

/// A board cell as `(row, col)`.
///
/// Signed so that the cell one step past the board edge is representable;
/// collision checks decide whether such a candidate is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell one step in `direction`. No wraparound.
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Whether the cell lies on a `size` x `size` board.
    pub fn in_bounds(self, size: u32) -> bool {
        let size = size as i64;
        (0..size).contains(&(self.row as i64)) && (0..size).contains(&(self.col as i64))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cardinal direction. The declaration order is the cyclic order used by
/// reflection and by [`TryFrom<u8>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    West = 1,
    South = 2,
    East = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];

    /// Unit vector as `(d_row, d_col)`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::West => (0, -1),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// New travel direction after bouncing off `mirror`.
    pub const fn reflect(self, mirror: Mirror) -> Direction {
        match (mirror, self) {
            (Mirror::TopLeft, Direction::North) => Direction::East,
            (Mirror::TopLeft, Direction::West) => Direction::South,
            (Mirror::TopLeft, Direction::South) => Direction::West,
            (Mirror::TopLeft, Direction::East) => Direction::North,
            (Mirror::TopRight, Direction::North) => Direction::West,
            (Mirror::TopRight, Direction::West) => Direction::North,
            (Mirror::TopRight, Direction::South) => Direction::East,
            (Mirror::TopRight, Direction::East) => Direction::South,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(value as usize)
            .copied()
            .ok_or(InvalidDirection(value))
    }
}

/// A direction index outside `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDirection(pub u8);

impl std::fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid direction index {} (expected 0..=3)", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

/// Mirror orientation, named after the corner the top of the glass leans to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mirror {
    /// Drawn as `/`.
    TopLeft,
    /// Drawn as `\`.
    TopRight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_follows_unit_vectors() {
        let c = Coord::new(2, 2);
        assert_eq!(c.step(Direction::North), Coord::new(1, 2));
        assert_eq!(c.step(Direction::West), Coord::new(2, 1));
        assert_eq!(c.step(Direction::South), Coord::new(3, 2));
        assert_eq!(c.step(Direction::East), Coord::new(2, 3));
    }

    #[test]
    fn step_off_board_is_not_clamped() {
        let c = Coord::new(0, 0).step(Direction::North);
        assert_eq!(c, Coord::new(-1, 0));
        assert!(!c.in_bounds(5));
    }

    #[test]
    fn bounds_are_half_open() {
        assert!(Coord::new(0, 0).in_bounds(3));
        assert!(Coord::new(2, 2).in_bounds(3));
        assert!(!Coord::new(3, 0).in_bounds(3));
        assert!(!Coord::new(0, 3).in_bounds(3));
        assert!(!Coord::new(0, 0).in_bounds(0));
    }

    #[test]
    fn reflection_table() {
        use Direction::*;
        let top_left = [(North, East), (West, South), (South, West), (East, North)];
        let top_right = [(North, West), (West, North), (South, East), (East, South)];
        for (from, to) in top_left {
            assert_eq!(from.reflect(Mirror::TopLeft), to);
        }
        for (from, to) in top_right {
            assert_eq!(from.reflect(Mirror::TopRight), to);
        }
    }

    #[test]
    fn reflection_has_no_fixed_points() {
        for mirror in [Mirror::TopLeft, Mirror::TopRight] {
            for d in Direction::ALL {
                assert_ne!(d.reflect(mirror), d, "{d:?} unchanged by {mirror:?}");
            }
        }
    }

    #[test]
    fn same_mirror_twice_restores_direction() {
        for mirror in [Mirror::TopLeft, Mirror::TopRight] {
            for d in Direction::ALL {
                assert_eq!(d.reflect(mirror).reflect(mirror), d);
            }
        }
    }

    #[test]
    fn direction_index_roundtrip() {
        for d in Direction::ALL {
            assert_eq!(Direction::try_from(d.index()), Ok(d));
        }
    }

    #[test]
    fn direction_rejects_out_of_range_index() {
        assert_eq!(Direction::try_from(4), Err(InvalidDirection(4)));
        assert_eq!(Direction::try_from(255), Err(InvalidDirection(255)));
    }
}
