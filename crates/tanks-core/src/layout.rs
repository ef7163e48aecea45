use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::grid::{Coord, Mirror};

/// Board side length used when a map does not say otherwise.
pub const DEFAULT_SIZE: u32 = 15;
/// Starting health used when a map does not say otherwise.
pub const DEFAULT_MAX_HEALTH: u32 = 10;

/// Raw board description as produced by a map loader, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpec {
    pub size: u32,
    pub max_health: u32,
    pub walls: Vec<Coord>,
    pub barrels: Vec<Coord>,
    pub portals: Vec<Coord>,
    pub top_left_mirrors: Vec<Coord>,
    pub top_right_mirrors: Vec<Coord>,
    pub spawns: Vec<Coord>,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            max_health: DEFAULT_MAX_HEALTH,
            walls: Vec::new(),
            barrels: Vec::new(),
            portals: Vec::new(),
            top_left_mirrors: Vec::new(),
            top_right_mirrors: Vec::new(),
            spawns: Vec::new(),
        }
    }
}

/// Reasons a [`LayoutSpec`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    EmptyBoard,
    /// Side length beyond what signed cell coordinates can address.
    TooLarge(u32),
    NoHealth,
    OutOfBounds { cell: Coord, size: u32 },
    BarrelOnWall(Coord),
    SpawnOnSpecialCell(Coord),
    NotEnoughFreeCells { free: u64 },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBoard => write!(f, "board size must be positive"),
            Self::TooLarge(size) => write!(f, "board size {size} exceeds {}", i32::MAX),
            Self::NoHealth => write!(f, "max health must be positive"),
            Self::OutOfBounds { cell, size } => {
                write!(f, "cell {cell} lies outside the {size}x{size} board")
            },
            Self::BarrelOnWall(c) => write!(f, "barrel at {c} overlaps a wall"),
            Self::SpawnOnSpecialCell(c) => write!(f, "spawn point {c} lies on a special cell"),
            Self::NotEnoughFreeCells { free } => {
                write!(f, "board needs at least 2 free cells for spawning, found {free}")
            },
        }
    }
}

impl std::error::Error for LayoutError {}

/// Validated, immutable board description consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LayoutSpec", into = "LayoutSpec")]
pub struct Layout {
    size: u32,
    max_health: u32,
    walls: HashSet<Coord>,
    barrels: HashSet<Coord>,
    portal_cells: HashSet<Coord>,
    /// Sorted so random portal selection is reproducible for a given seed.
    portals: Vec<Coord>,
    top_left_mirrors: HashSet<Coord>,
    top_right_mirrors: HashSet<Coord>,
    spawns: Vec<Coord>,
    occupied: HashSet<Coord>,
}

impl TryFrom<LayoutSpec> for Layout {
    type Error = LayoutError;

    fn try_from(spec: LayoutSpec) -> Result<Self, Self::Error> {
        if spec.size == 0 {
            return Err(LayoutError::EmptyBoard);
        }
        if i32::try_from(spec.size).is_err() {
            return Err(LayoutError::TooLarge(spec.size));
        }
        if spec.max_health == 0 {
            return Err(LayoutError::NoHealth);
        }

        let size = spec.size;
        let mut every_cell = spec
            .walls
            .iter()
            .chain(&spec.barrels)
            .chain(&spec.portals)
            .chain(&spec.top_left_mirrors)
            .chain(&spec.top_right_mirrors)
            .chain(&spec.spawns);
        if let Some(&cell) = every_cell.find(|c| !c.in_bounds(size)) {
            return Err(LayoutError::OutOfBounds { cell, size });
        }

        let walls: HashSet<Coord> = spec.walls.into_iter().collect();
        let barrels: HashSet<Coord> = spec.barrels.into_iter().collect();
        if let Some(&c) = barrels.iter().find(|c| walls.contains(c)) {
            return Err(LayoutError::BarrelOnWall(c));
        }

        let mut portals = spec.portals;
        portals.sort_unstable();
        portals.dedup();
        let portal_cells: HashSet<Coord> = portals.iter().copied().collect();
        let top_left_mirrors: HashSet<Coord> = spec.top_left_mirrors.into_iter().collect();
        let top_right_mirrors: HashSet<Coord> = spec.top_right_mirrors.into_iter().collect();

        let occupied: HashSet<Coord> = walls
            .iter()
            .chain(&barrels)
            .chain(&portal_cells)
            .chain(&top_left_mirrors)
            .chain(&top_right_mirrors)
            .copied()
            .collect();

        // Repeated spawn entries collapse to their first occurrence.
        let mut seen = HashSet::with_capacity(spec.spawns.len());
        let mut spawns = Vec::with_capacity(spec.spawns.len());
        for spawn in spec.spawns {
            if occupied.contains(&spawn) {
                return Err(LayoutError::SpawnOnSpecialCell(spawn));
            }
            if seen.insert(spawn) {
                spawns.push(spawn);
            }
        }

        let free = (size as u64) * (size as u64) - occupied.len() as u64;
        if free < 2 {
            return Err(LayoutError::NotEnoughFreeCells { free });
        }

        Ok(Self {
            size,
            max_health: spec.max_health,
            walls,
            barrels,
            portal_cells,
            portals,
            top_left_mirrors,
            top_right_mirrors,
            spawns,
            occupied,
        })
    }
}

impl From<Layout> for LayoutSpec {
    fn from(layout: Layout) -> Self {
        fn sorted(set: HashSet<Coord>) -> Vec<Coord> {
            let mut cells: Vec<Coord> = set.into_iter().collect();
            cells.sort_unstable();
            cells
        }

        Self {
            size: layout.size,
            max_health: layout.max_health,
            walls: sorted(layout.walls),
            barrels: sorted(layout.barrels),
            portals: layout.portals,
            top_left_mirrors: sorted(layout.top_left_mirrors),
            top_right_mirrors: sorted(layout.top_right_mirrors),
            spawns: layout.spawns,
        }
    }
}

impl Layout {
    /// The arena used when no map file is given.
    pub fn builtin() -> Self {
        let c = |cells: &[(i32, i32)]| -> Vec<Coord> {
            cells.iter().map(|&(r, col)| Coord::new(r, col)).collect()
        };
        let spec = LayoutSpec {
            size: DEFAULT_SIZE,
            max_health: DEFAULT_MAX_HEALTH,
            barrels: c(&[(5, 5), (5, 4), (9, 5), (3, 1), (3, 4)]),
            walls: c(&[(3, 3), (4, 3), (5, 3), (3, 8), (5, 7), (8, 7), (3, 6)]),
            portals: c(&[(1, 8), (3, 7), (6, 3), (5, 4)]),
            top_left_mirrors: c(&[(5, 2), (1, 2)]),
            top_right_mirrors: c(&[(4, 6), (7, 9)]),
            spawns: Vec::new(),
        };
        Self::try_from(spec).expect("built-in arena must validate")
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// A cell blocks occupancy if it is off the board or a wall.
    pub fn is_collision(&self, cell: Coord) -> bool {
        !cell.in_bounds(self.size) || self.walls.contains(&cell)
    }

    pub fn is_wall(&self, cell: Coord) -> bool {
        self.walls.contains(&cell)
    }

    pub fn is_portal(&self, cell: Coord) -> bool {
        self.portal_cells.contains(&cell)
    }

    /// Mirror on the cell, if any. A cell listed under both orientations
    /// behaves as `TopLeft`.
    pub fn mirror_at(&self, cell: Coord) -> Option<Mirror> {
        if self.top_left_mirrors.contains(&cell) {
            Some(Mirror::TopLeft)
        } else if self.top_right_mirrors.contains(&cell) {
            Some(Mirror::TopRight)
        } else {
            None
        }
    }

    /// Whether the cell holds any static special content.
    pub fn is_occupied(&self, cell: Coord) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn walls(&self) -> &HashSet<Coord> {
        &self.walls
    }

    pub fn barrel_origins(&self) -> &HashSet<Coord> {
        &self.barrels
    }

    pub fn portals(&self) -> &[Coord] {
        &self.portals
    }

    pub fn top_left_mirrors(&self) -> &HashSet<Coord> {
        &self.top_left_mirrors
    }

    pub fn top_right_mirrors(&self) -> &HashSet<Coord> {
        &self.top_right_mirrors
    }

    pub fn spawns(&self) -> &[Coord] {
        &self.spawns
    }

    /// Number of on-board cells with no static special content.
    pub fn free_cells(&self) -> u64 {
        (self.size as u64) * (self.size as u64) - self.occupied.len() as u64
    }
}
