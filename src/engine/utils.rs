use crate::maze::Maze;
use crate::rng::Rng;
use crate::types::{Direction, Vec2};

pub fn offset(pos: Vec2, dir: Direction, distance: i32) -> Vec2 {
    let (dx, dy) = dir.delta();
    Vec2::new(pos.x + dx * distance, pos.y + dy * distance)
}

pub fn squared_distance(a: Vec2, b: Vec2) -> i32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

pub fn manhattan(a: Vec2, b: Vec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

pub(super) fn random_direction(rng: &mut Rng) -> Direction {
    Direction::ALL[rng.pick_index(Direction::ALL.len())]
}

/// A uniformly random walkable neighbor, or `from` when boxed in.
pub(crate) fn random_legal_step(from: Vec2, maze: &Maze, rng: &mut Rng) -> Vec2 {
    let mut options = maze.walkable_neighbors(from);
    if options.is_empty() {
        return from;
    }
    rng.shuffle(&mut options);
    options[0]
}
