//! A* pathfinding on the maze grid
//!
//! Four-way expansion with tunnel wraparound and a tunnel-aware Manhattan
//! heuristic (never overestimates, so returned paths are shortest). Each
//! search expands at most `budget` nodes; running out returns `None` and
//! callers fall back to [`best_available_direction`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use glam::IVec2;

use super::grid::{Direction, manhattan};
use super::maze::{Maze, Mover};

/// Default expansion budget per search
pub const DEFAULT_NODE_BUDGET: usize = 80;

/// Open-set entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    cell: IVec2,
    /// Cost so far
    g: i32,
    /// g + heuristic
    f: i32,
    /// Insertion order, for stable tie-breaking
    seq: u32,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour; prefer deeper nodes, then older ones
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path from `from` to `to`, both ends included.
///
/// Returns `None` when the goal is unreachable, impassable, or more than
/// `budget` nodes would have to be expanded.
pub fn find_path(maze: &Maze, from: IVec2, to: IVec2, mover: Mover, budget: usize) -> Option<Vec<IVec2>> {
    let start = maze.wrap_cell(from);
    let goal = maze.wrap_cell(to);
    if !maze.is_passable(goal, mover) {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<IVec2> = HashSet::new();
    let mut best_g: HashMap<IVec2, i32> = HashMap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut seq = 0u32;
    let mut expanded = 0usize;

    best_g.insert(start, 0);
    open.push(Node {
        cell: start,
        g: 0,
        f: maze.wrapped_manhattan(start, goal),
        seq,
    });

    while let Some(node) = open.pop() {
        if node.cell == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        if !closed.insert(node.cell) {
            continue;
        }
        expanded += 1;
        if expanded > budget {
            return None;
        }

        for dir in Direction::ALL {
            let next = maze.neighbor(node.cell, dir);
            if !maze.is_passable(next, mover) || closed.contains(&next) {
                continue;
            }
            let g = node.g + 1;
            if best_g.get(&next).is_some_and(|&known| known <= g) {
                continue;
            }
            best_g.insert(next, g);
            came_from.insert(next, node.cell);
            seq += 1;
            open.push(Node {
                cell: next,
                g,
                f: g + maze.wrapped_manhattan(next, goal),
                seq,
            });
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<IVec2, IVec2>, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Direction of a single step between adjacent cells, tunnel included
pub fn step_direction(maze: &Maze, from: IVec2, to: IVec2) -> Direction {
    Direction::ALL
        .into_iter()
        .find(|&dir| maze.neighbor(from, dir) == maze.wrap_cell(to))
        .unwrap_or(Direction::None)
}

/// Among currently open moves, the one whose next cell is closest to the
/// target by plain Manhattan distance. Ties go to the current direction,
/// then to `Direction::ALL` order.
pub fn best_available_direction(maze: &Maze, from: IVec2, to: IVec2, current: Direction, mover: Mover) -> Direction {
    let from = maze.wrap_cell(from);
    let mut best: Option<(Direction, i32)> = None;

    for dir in Direction::ALL {
        let next = maze.neighbor(from, dir);
        if !maze.is_passable(next, mover) {
            continue;
        }
        let dist = manhattan(next, to);
        best = match best {
            None => Some((dir, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((dir, dist)),
            Some((best_dir, best_dist)) if dist == best_dist && dir == current && best_dir != current => {
                Some((dir, dist))
            }
            keep => keep,
        };
    }

    best.map(|(dir, _)| dir).unwrap_or(Direction::None)
}

/// Direction of the first step of the A* path toward `to`, or the
/// best-available heuristic when no path is found within the budget.
pub fn get_direction_to_target(
    maze: &Maze,
    from: IVec2,
    to: IVec2,
    current: Direction,
    mover: Mover,
    budget: usize,
) -> Direction {
    let to = maze.clamp_cell(to);
    let from = maze.wrap_cell(from);
    if from != to
        && let Some(path) = find_path(maze, from, to, mover, budget)
        && let [first, second, ..] = path.as_slice()
    {
        let dir = step_direction(maze, *first, *second);
        if dir != Direction::None {
            return dir;
        }
    }
    best_available_direction(maze, from, to, current, mover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::LevelLayout;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn classic() -> Maze {
        LevelLayout::classic().maze
    }

    /// Breadth-first distance oracle
    fn bfs_distance(maze: &Maze, from: IVec2, to: IVec2, mover: Mover) -> Option<usize> {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, 0usize)]);
        while let Some((cell, dist)) = queue.pop_front() {
            if cell == to {
                return Some(dist);
            }
            for dir in Direction::ALL {
                let next = maze.neighbor(cell, dir);
                if maze.is_passable(next, mover) && seen.insert(next) {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        None
    }

    fn assert_valid_path(maze: &Maze, path: &[IVec2], mover: Mover) {
        for pair in path.windows(2) {
            assert!(maze.is_passable(pair[1], mover));
            assert_ne!(step_direction(maze, pair[0], pair[1]), Direction::None);
        }
    }

    #[test]
    fn test_straight_corridor() {
        let maze = classic();
        let path = find_path(&maze, IVec2::new(1, 5), IVec2::new(5, 5), Mover::Ghost, 100).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&IVec2::new(1, 5)));
        assert_eq!(path.last(), Some(&IVec2::new(5, 5)));
    }

    #[test]
    fn test_path_uses_tunnel() {
        let maze = classic();
        let path = find_path(&maze, IVec2::new(1, 14), IVec2::new(26, 14), Mover::Ghost, 100).unwrap();
        // Through the tunnel: 1 -> 0 -> 27 -> 26
        assert_eq!(path.len(), 4);
        assert_valid_path(&maze, &path, Mover::Ghost);
        assert_eq!(
            get_direction_to_target(&maze, IVec2::new(1, 14), IVec2::new(26, 14), Direction::Right, Mover::Ghost, 100),
            Direction::Left
        );
    }

    #[test]
    fn test_wall_goal_has_no_path() {
        let maze = classic();
        assert_eq!(find_path(&maze, IVec2::new(1, 1), IVec2::new(0, 0), Mover::Ghost, 10_000), None);
    }

    #[test]
    fn test_budget_exhaustion_returns_none() {
        let maze = classic();
        let from = IVec2::new(1, 1);
        let to = IVec2::new(26, 29);
        assert_eq!(find_path(&maze, from, to, Mover::Ghost, 10), None);
        let full = find_path(&maze, from, to, Mover::Ghost, 10_000).unwrap();
        assert_eq!(full.len() - 1, bfs_distance(&maze, from, to, Mover::Ghost).unwrap());
    }

    #[test]
    fn test_player_paths_avoid_house() {
        let maze = classic();
        let house = IVec2::new(13, 14);
        assert_eq!(find_path(&maze, IVec2::new(13, 11), house, Mover::Player, 10_000), None);
        assert!(find_path(&maze, IVec2::new(13, 11), house, Mover::Ghost, 10_000).is_some());
    }

    #[test]
    fn test_fallback_when_budget_hit() {
        let maze = classic();
        // Budget of 1 can't reach a far target; the heuristic still moves
        let dir = get_direction_to_target(&maze, IVec2::new(1, 5), IVec2::new(26, 5), Direction::None, Mover::Ghost, 1);
        assert_eq!(dir, Direction::Right);
    }

    #[test]
    fn test_best_available_prefers_current_on_tie() {
        let maze = classic();
        // From (6,5) target straight below-left: Left and Down tie at equal distance
        let from = IVec2::new(6, 5);
        let to = IVec2::new(5, 6);
        assert_eq!(best_available_direction(&maze, from, to, Direction::Down, Mover::Ghost), Direction::Down);
        assert_eq!(best_available_direction(&maze, from, to, Direction::Left, Mover::Ghost), Direction::Left);
    }

    #[test]
    fn test_best_available_boxed_in() {
        let maze = Maze::parse("###\n# #\n###\n").unwrap();
        assert_eq!(
            best_available_direction(&maze, IVec2::new(1, 1), IVec2::new(0, 0), Direction::Up, Mover::Ghost),
            Direction::None
        );
    }

    #[test]
    fn test_same_cell_falls_back() {
        let maze = classic();
        let dir = get_direction_to_target(&maze, IVec2::new(3, 5), IVec2::new(3, 5), Direction::Right, Mover::Ghost, 80);
        assert_eq!(dir, Direction::Right);
    }

    fn open_cells(maze: &Maze) -> Vec<IVec2> {
        (0..maze.height())
            .flat_map(|y| (0..maze.width()).map(move |x| IVec2::new(x, y)))
            .filter(|&c| maze.is_passable(c, Mover::Ghost))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_astar_matches_bfs(a in 0usize..320, b in 0usize..320) {
            let maze = classic();
            let cells = open_cells(&maze);
            let from = cells[a % cells.len()];
            let to = cells[b % cells.len()];
            let path = find_path(&maze, from, to, Mover::Ghost, usize::MAX).unwrap();
            prop_assert_eq!(Some(path.len() - 1), bfs_distance(&maze, from, to, Mover::Ghost));
        }

        #[test]
        fn prop_budgeted_path_is_none_or_shortest(a in 0usize..320, b in 0usize..320, budget in 1usize..120) {
            let maze = classic();
            let cells = open_cells(&maze);
            let from = cells[a % cells.len()];
            let to = cells[b % cells.len()];
            if let Some(path) = find_path(&maze, from, to, Mover::Ghost, budget) {
                prop_assert_eq!(Some(path.len() - 1), bfs_distance(&maze, from, to, Mover::Ghost));
                assert_valid_path(&maze, &path, Mover::Ghost);
            }
        }

        #[test]
        fn prop_random_grids_match_bfs(
            walls in prop::collection::vec(prop::bool::weighted(0.3), 64),
            a in 0usize..64,
            b in 0usize..64,
        ) {
            let rows: Vec<String> = walls
                .chunks(8)
                .map(|row| row.iter().map(|&w| if w { '#' } else { ' ' }).collect())
                .collect();
            let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
            let maze = Maze::from_rows(&row_refs).unwrap();
            let from = IVec2::new((a % 8) as i32, (a / 8) as i32);
            let to = IVec2::new((b % 8) as i32, (b / 8) as i32);
            prop_assume!(maze.is_passable(from, Mover::Ghost));

            let expected = bfs_distance(&maze, from, to, Mover::Ghost);
            let found = find_path(&maze, from, to, Mover::Ghost, usize::MAX).map(|p| p.len() - 1);
            prop_assert_eq!(found, expected);
        }
    }
}
