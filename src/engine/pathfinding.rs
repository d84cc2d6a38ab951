use std::collections::VecDeque;

use crate::maze::{Maze, NEIGHBOR_ORDER};
use crate::rng::Rng;
use crate::types::Vec2;

use super::utils::random_legal_step;

/// First step of a shortest 4-connected path from `from` to `target`.
///
/// Ties resolve by exploring +x, -x, +y, -y. Standing on `target`, or unable
/// to reach it, yields a random walkable neighbor, or `from` if there is none.
pub fn next_step_toward(from: Vec2, target: Vec2, maze: &Maze, rng: &mut Rng) -> Vec2 {
    if from == target {
        return random_legal_step(from, maze, rng);
    }
    match first_step(from, target, maze) {
        Some(step) => step,
        None => random_legal_step(from, maze, rng),
    }
}

fn first_step(from: Vec2, target: Vec2, maze: &Maze) -> Option<Vec2> {
    if !maze.is_walkable(target.x, target.y) || !maze.in_bounds(from.x, from.y) {
        return None;
    }
    let width = maze.width();
    let index = |pos: Vec2| (pos.y * width + pos.x) as usize;
    let mut parent: Vec<Option<Vec2>> = vec![None; (width * maze.height()) as usize];
    let mut visited = vec![false; parent.len()];
    let mut queue = VecDeque::new();
    visited[index(from)] = true;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for (dx, dy) in NEIGHBOR_ORDER {
            let next = Vec2::new(current.x + dx, current.y + dy);
            if !maze.is_walkable(next.x, next.y) || visited[index(next)] {
                continue;
            }
            visited[index(next)] = true;
            parent[index(next)] = Some(current);
            if next == target {
                return Some(unwind(next, from, &parent, index));
            }
            queue.push_back(next);
        }
    }
    None
}

fn unwind(
    mut cursor: Vec2,
    from: Vec2,
    parent: &[Option<Vec2>],
    index: impl Fn(Vec2) -> usize,
) -> Vec2 {
    while let Some(previous) = parent[index(cursor)] {
        if previous == from {
            break;
        }
        cursor = previous;
    }
    cursor
}

/// BFS distance from `origin` to every cell, `None` where unreachable.
/// Row-major, `width * height` entries.
pub fn distance_field(maze: &Maze, origin: Vec2) -> Vec<Option<u32>> {
    let width = maze.width();
    let mut out = vec![None; (width * maze.height()) as usize];
    if !maze.is_walkable(origin.x, origin.y) {
        return out;
    }
    let index = |pos: Vec2| (pos.y * width + pos.x) as usize;
    out[index(origin)] = Some(0);
    let mut queue = VecDeque::from([origin]);
    while let Some(current) = queue.pop_front() {
        let base = out[index(current)].unwrap_or(0);
        for next in maze.walkable_neighbors(current) {
            if out[index(next)].is_none() {
                out[index(next)] = Some(base + 1);
                queue.push_back(next);
            }
        }
    }
    out
}
