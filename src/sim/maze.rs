//! Static maze grid
//!
//! Cells are read-only during an episode except for dot/pellet consumption,
//! which the reducer performs through [`Maze::set_cell`]. Any read outside the
//! grid reports a wall, so no query can walk an agent out of the maze.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Direction;

/// Contents of a single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Empty,
    Dot,
    PowerPellet,
    GhostHouse,
}

impl CellKind {
    /// Parse a layout glyph
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '#' => Some(CellKind::Wall),
            ' ' => Some(CellKind::Empty),
            '.' => Some(CellKind::Dot),
            'o' => Some(CellKind::PowerPellet),
            'H' => Some(CellKind::GhostHouse),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Empty => ' ',
            CellKind::Dot => '.',
            CellKind::PowerPellet => 'o',
            CellKind::GhostHouse => 'H',
        }
    }

    /// Dots and power pellets count toward level completion
    pub fn is_consumable(self) -> bool {
        matches!(self, CellKind::Dot | CellKind::PowerPellet)
    }
}

/// Who is asking whether a cell can be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    /// The player never enters the ghost house
    Player,
    /// Ghosts may enter every non-wall cell
    Ghost,
}

/// Errors produced while building a maze from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("layout is empty")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },
    #[error("unknown cell glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
    #[error("layout has no ghost house cells")]
    NoGhostHouse,
    #[error("{what} at ({x}, {y}) is not a traversable cell")]
    BlockedPosition { what: &'static str, x: i32, y: i32 },
}

/// Axis-aligned bounding rectangle of the ghost house (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseBounds {
    pub min: IVec2,
    pub max: IVec2,
}

impl HouseBounds {
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.cmpge(self.min).all() && cell.cmple(self.max).all()
    }

    pub fn center(&self) -> IVec2 {
        (self.min + self.max) / 2
    }
}

/// Fixed-size grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
}

impl Maze {
    /// Build a maze from ASCII art, one line per row
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        Self::from_rows(&rows)
    }

    /// Build a maze from one string per row
    pub fn from_rows(rows: &[&str]) -> Result<Self, MazeError> {
        let Some(first) = rows.first() else {
            return Err(MazeError::Empty);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow { row: y, found, expected: width });
            }
            for (x, glyph) in row.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph).ok_or(MazeError::UnknownGlyph { glyph, x, y })?;
                cells.push(kind);
            }
        }

        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Maze width in pixels (tunnel wrap distance)
    #[inline]
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * crate::consts::CELL_SIZE
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    /// Cell at grid coordinate; out of bounds reads as `Wall`
    pub fn cell_at(&self, x: i32, y: i32) -> CellKind {
        self.cell(IVec2::new(x, y))
    }

    pub fn cell(&self, cell: IVec2) -> CellKind {
        self.index(cell).map(|i| self.cells[i]).unwrap_or(CellKind::Wall)
    }

    /// Anything that isn't a wall
    pub fn is_traversable(&self, x: i32, y: i32) -> bool {
        self.cell_at(x, y) != CellKind::Wall
    }

    /// Traversability for a specific mover
    pub fn is_passable(&self, cell: IVec2, mover: Mover) -> bool {
        match (self.cell(cell), mover) {
            (CellKind::Wall, _) => false,
            (CellKind::GhostHouse, Mover::Player) => false,
            _ => true,
        }
    }

    /// Overwrite a cell; ignored outside the grid
    pub fn set_cell(&mut self, cell: IVec2, kind: CellKind) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = kind;
        }
    }

    /// Fold a column back into the grid (tunnel wrap); rows are untouched
    #[inline]
    pub fn wrap_cell(&self, cell: IVec2) -> IVec2 {
        IVec2::new(cell.x.rem_euclid(self.width), cell.y)
    }

    /// Clamp a cell into the grid
    pub fn clamp_cell(&self, cell: IVec2) -> IVec2 {
        cell.clamp(IVec2::ZERO, IVec2::new(self.width - 1, self.height - 1))
    }

    /// Adjacent cell in a direction, wrapping horizontally
    #[inline]
    pub fn neighbor(&self, cell: IVec2, dir: Direction) -> IVec2 {
        self.wrap_cell(cell + dir.delta())
    }

    /// Directions whose neighbor the mover may enter
    pub fn open_directions(&self, cell: IVec2, mover: Mover) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.is_passable(self.neighbor(cell, dir), mover))
            .collect()
    }

    /// Manhattan distance that accounts for the horizontal tunnel
    pub fn wrapped_manhattan(&self, a: IVec2, b: IVec2) -> i32 {
        let dx = (a.x - b.x).rem_euclid(self.width);
        let dx = dx.min(self.width - dx);
        dx + (a.y - b.y).abs()
    }

    /// Dots plus power pellets; seeds `dots_remaining`
    pub fn count_consumables(&self) -> u32 {
        self.cells.iter().filter(|c| c.is_consumable()).count() as u32
    }

    /// Coordinates of every remaining dot or pellet
    pub fn consumables(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells.iter().enumerate().filter(|(_, c)| c.is_consumable()).map(move |(i, _)| {
            let i = i as i32;
            IVec2::new(i % self.width, i / self.width)
        })
    }

    /// Bounding rectangle of all ghost-house cells
    pub fn house_bounds(&self) -> Option<HouseBounds> {
        let mut bounds: Option<HouseBounds> = None;
        for (i, kind) in self.cells.iter().enumerate() {
            if *kind != CellKind::GhostHouse {
                continue;
            }
            let i = i as i32;
            let cell = IVec2::new(i % self.width, i / self.width);
            bounds = Some(match bounds {
                None => HouseBounds { min: cell, max: cell },
                Some(b) => HouseBounds {
                    min: b.min.min(cell),
                    max: b.max.max(cell),
                },
            });
        }
        bounds
    }

    /// Render back to the text form accepted by [`Maze::parse`]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.cells.chunks(self.width as usize) {
            out.extend(row.iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out
    }
}
