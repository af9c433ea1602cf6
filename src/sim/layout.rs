//! Level layouts: a maze plus the fixed positions agents spawn at and aim for

use glam::IVec2;

use super::maze::{Maze, MazeError, Mover};
use super::state::GhostKind;

/// The standard 28x31 board. Row 14 is the tunnel.
pub const CLASSIC_MAZE: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###HH### ##.######",
    "######.## #HHHHHH# ##.######",
    "      .   #HHHHHH#   .      ",
    "######.## #HHHHHH# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// A maze together with spawn points, house cells and scatter corners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayout {
    /// Pristine maze; each level starts from a copy of this
    pub maze: Maze,
    pub player_start: IVec2,
    /// Start cells indexed by [`GhostKind::index`]
    pub ghost_starts: [IVec2; 4],
    /// Cell above the house where released ghosts appear
    pub house_exit: IVec2,
    /// Cell eaten ghosts head back to
    pub house_target: IVec2,
    /// Scatter corners indexed by [`GhostKind::index`]
    pub scatter_corners: [IVec2; 4],
}

impl LevelLayout {
    /// Validate and assemble a layout
    pub fn new(
        maze: Maze,
        player_start: IVec2,
        ghost_starts: [IVec2; 4],
        house_exit: IVec2,
        scatter_corners: [IVec2; 4],
    ) -> Result<Self, MazeError> {
        let house = maze.house_bounds().ok_or(MazeError::NoGhostHouse)?;

        let require = |what: &'static str, cell: IVec2, mover: Mover| {
            if maze.is_passable(cell, mover) {
                Ok(())
            } else {
                Err(MazeError::BlockedPosition { what, x: cell.x, y: cell.y })
            }
        };
        require("player start", player_start, Mover::Player)?;
        require("house exit", house_exit, Mover::Player)?;
        for start in ghost_starts {
            require("ghost start", start, Mover::Ghost)?;
        }

        Ok(Self {
            house_target: house.center(),
            maze,
            player_start,
            ghost_starts,
            house_exit,
            scatter_corners,
        })
    }

    /// The standard board
    pub fn classic() -> Self {
        let maze = Maze::from_rows(&CLASSIC_MAZE).expect("classic maze text is well formed");
        Self::new(
            maze,
            IVec2::new(13, 23),
            [
                IVec2::new(13, 14),
                IVec2::new(14, 14),
                IVec2::new(12, 14),
                IVec2::new(15, 14),
            ],
            IVec2::new(13, 11),
            [
                IVec2::new(26, 1),
                IVec2::new(1, 1),
                IVec2::new(26, 29),
                IVec2::new(1, 29),
            ],
        )
        .expect("classic layout positions are traversable")
    }

    pub fn ghost_start(&self, kind: GhostKind) -> IVec2 {
        self.ghost_starts[kind.index()]
    }

    pub fn scatter_corner(&self, kind: GhostKind) -> IVec2 {
        self.scatter_corners[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::CellKind;

    #[test]
    fn test_classic_layout() {
        let layout = LevelLayout::classic();
        assert_eq!(layout.maze.width(), 28);
        assert_eq!(layout.maze.height(), 31);
        assert_eq!(layout.maze.count_consumables(), 244);
        assert_eq!(layout.maze.cell(layout.house_target), CellKind::GhostHouse);
        // Tunnel row is open at both edges
        assert!(layout.maze.is_traversable(0, 14));
        assert!(layout.maze.is_traversable(27, 14));
    }

    #[test]
    fn test_house_target_inside_bounds() {
        let layout = LevelLayout::classic();
        let bounds = layout.maze.house_bounds().unwrap();
        assert!(bounds.contains(layout.house_target));
        assert!(!bounds.contains(layout.house_exit));
    }

    #[test]
    fn test_rejects_player_start_in_wall() {
        let maze = Maze::from_rows(&CLASSIC_MAZE).unwrap();
        let err = LevelLayout::new(
            maze,
            IVec2::new(0, 0),
            [IVec2::new(13, 14); 4],
            IVec2::new(13, 11),
            [IVec2::new(1, 1); 4],
        )
        .unwrap_err();
        assert_eq!(err, MazeError::BlockedPosition { what: "player start", x: 0, y: 0 });
    }

    #[test]
    fn test_rejects_maze_without_house() {
        let maze = Maze::parse("#####\n#...#\n#####\n").unwrap();
        let err = LevelLayout::new(maze, IVec2::new(1, 1), [IVec2::new(2, 1); 4], IVec2::new(3, 1), [IVec2::ZERO; 4])
            .unwrap_err();
        assert_eq!(err, MazeError::NoGhostHouse);
    }
}
