pub mod action;
pub mod grid;
pub mod layout;
pub mod map;
pub mod player;

pub use action::{Action, Command};
pub use grid::{Coord, Direction, InvalidDirection, Mirror};
pub use layout::{Layout, LayoutError, LayoutSpec};
pub use map::MapError;
pub use player::{HitTarget, PlayerId, Winner};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::grid::Coord;
    use crate::layout::{Layout, LayoutSpec};
    use crate::map::parse_map;

    /// An empty `size` x `size` board with the given starting health.
    pub fn open_board(size: u32, max_health: u32) -> Layout {
        Layout::try_from(LayoutSpec {
            size,
            max_health,
            ..LayoutSpec::default()
        })
        .expect("open board must validate")
    }

    /// Build a square board from rows drawn in the text map glyphs.
    ///
    /// The board size is the number of rows; every row must be that wide.
    pub fn board(rows: &[&str], max_health: u32) -> Layout {
        let size = rows.len();
        for row in rows {
            assert_eq!(row.chars().count(), size, "row {row:?} is not {size} wide");
        }
        let text = format!("SIZE {size}\nMAXHEALTH {max_health}\nMAP\n{}\n", rows.join("\n"));
        let spec = parse_map(&text).expect("test board must parse");
        Layout::try_from(spec).expect("test board must validate")
    }

    /// Shorthand for `Coord::new`.
    pub fn at(row: i32, col: i32) -> Coord {
        Coord::new(row, col)
    }

    /// Assert that two spawned positions satisfy the spawn invariant.
    pub fn assert_valid_spawn(layout: &Layout, a: Coord, b: Coord) {
        assert_ne!(a, b, "players spawned on the same cell");
        for p in [a, b] {
            assert!(p.in_bounds(layout.size()), "spawn {p} is off the board");
            assert!(!layout.is_occupied(p), "spawn {p} lies on a special cell");
        }
    }
}
