use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{FALLBACK_GHOST_SPAWN, FALLBACK_PLAYER_SPAWN};
use crate::error::{PaxmanError, PaxmanResult};
use crate::types::{CellKind, PickupKind, PickupView, Vec2};

/// Level shipped with the crate. Walls are mirror-symmetric per row so a
/// teleport always lands on floor.
pub const CLASSIC_LEVEL: &[&str] = &[
    "#####################",
    "#T........#........T#",
    "#.###.###.#.###.###.#",
    "#I..................#",
    "#.###.#.#####.#.###.#",
    "#.....#...G...#.....#",
    "#####.###.#.###.#####",
    "#S........P........S#",
    "#.###.#.#####.#.###.#",
    "#...#.#.......#.#...#",
    "###.#.#.##.##.#.#.###",
    "#I........#........I#",
    "#####################",
];

/// Neighbor exploration order used everywhere a deterministic scan is needed.
pub const NEIGHBOR_ORDER: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Clone, Debug)]
pub struct Maze {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    dots: BTreeSet<Vec2>,
    pickups: BTreeMap<Vec2, PickupKind>,
    player_spawn: Option<Vec2>,
    ghost_spawn: Option<Vec2>,
}

impl Maze {
    /// Builds a maze from the level loader's symbol rows.
    ///
    /// `#` wall, `.` floor with a dot, ` `/`_` bare floor, `P` player spawn,
    /// `G` adversary spawn, `T`/`S`/`I` teleport, speed and invincibility pickups.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> PaxmanResult<Self> {
        let Some(first) = rows.first() else {
            return Err(PaxmanError::EmptyLevel);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(PaxmanError::EmptyLevel);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut dots = BTreeSet::new();
        let mut pickups = BTreeMap::new();
        let mut player_spawn = None;
        let mut ghost_spawn = None;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(PaxmanError::RaggedLevel {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let pos = Vec2::new(x as i32, y as i32);
                let kind = match symbol {
                    '#' => CellKind::Wall,
                    ' ' | '_' => CellKind::Floor,
                    '.' => {
                        dots.insert(pos);
                        CellKind::Floor
                    }
                    'T' | 'S' | 'I' => {
                        pickups.insert(pos, pickup_from_symbol(symbol));
                        CellKind::Floor
                    }
                    'P' => {
                        player_spawn.get_or_insert(pos);
                        CellKind::PlayerSpawn
                    }
                    'G' => {
                        ghost_spawn.get_or_insert(pos);
                        CellKind::GhostSpawn
                    }
                    _ => return Err(PaxmanError::UnknownCell { symbol, x, y }),
                };
                cells.push(kind);
            }
        }

        if player_spawn.is_none() {
            log::warn!("level has no player spawn marker, using {FALLBACK_PLAYER_SPAWN:?}");
        }
        if ghost_spawn.is_none() {
            log::warn!("level has no adversary spawn marker, using {FALLBACK_GHOST_SPAWN:?}");
        }

        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            cells,
            dots,
            pickups,
            player_spawn,
            ghost_spawn,
        })
    }

    /// Parses newline separated rows, ignoring trailing blank lines.
    pub fn from_text(text: &str) -> PaxmanResult<Self> {
        let mut rows: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        Self::parse(&rows)
    }

    pub fn classic() -> PaxmanResult<Self> {
        Self::parse(CLASSIC_LEVEL)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<CellKind> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.cell(x, y)
            .map(|kind| kind != CellKind::Wall)
            .unwrap_or(false)
    }

    pub fn walkable_neighbors(&self, pos: Vec2) -> Vec<Vec2> {
        NEIGHBOR_ORDER
            .iter()
            .map(|(dx, dy)| Vec2::new(pos.x + dx, pos.y + dy))
            .filter(|next| self.is_walkable(next.x, next.y))
            .collect()
    }

    pub fn clamp(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            x.clamp(0, self.width - 1),
            y.clamp(0, self.height - 1),
        )
    }

    pub fn clamp_interior(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            x.clamp(1, (self.width - 2).max(1)),
            y.clamp(1, (self.height - 2).max(1)),
        )
    }

    pub fn mirror_column(&self, x: i32) -> i32 {
        self.width - 1 - x
    }

    pub fn consume_dot(&mut self, x: i32, y: i32) -> bool {
        self.dots.remove(&Vec2::new(x, y))
    }

    pub fn consume_pickup(&mut self, x: i32, y: i32) -> Option<PickupKind> {
        self.pickups.remove(&Vec2::new(x, y))
    }

    pub fn remaining_dots(&self) -> usize {
        self.dots.len()
    }

    pub fn dots(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.dots.iter().copied()
    }

    pub fn pickup_views(&self) -> Vec<PickupView> {
        self.dots
            .iter()
            .map(|pos| PickupView {
                kind: PickupKind::Dot,
                x: pos.x,
                y: pos.y,
            })
            .chain(self.pickups.iter().map(|(pos, kind)| PickupView {
                kind: *kind,
                x: pos.x,
                y: pos.y,
            }))
            .collect()
    }

    pub fn player_spawn(&self) -> Vec2 {
        self.player_spawn.unwrap_or(FALLBACK_PLAYER_SPAWN.into())
    }

    pub fn ghost_spawn(&self) -> Vec2 {
        self.ghost_spawn.unwrap_or(FALLBACK_GHOST_SPAWN.into())
    }
}

fn pickup_from_symbol(symbol: char) -> PickupKind {
    match symbol {
        'T' => PickupKind::TeleportCharge,
        'S' => PickupKind::SpeedBoost,
        _ => PickupKind::Invincibility,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;

    #[test]
    fn walkability_rejects_walls_and_out_of_bounds() {
        let maze = Maze::parse(&["###", "#P#", "###"]).expect("valid level");
        assert!(maze.is_walkable(1, 1));
        assert!(!maze.is_walkable(0, 0));
        assert!(!maze.is_walkable(-1, 1));
        assert!(!maze.is_walkable(1, 3));
        assert!(!maze.is_walkable(3, 1));
    }

    #[test]
    fn spawns_use_first_marker_in_row_major_order() {
        let maze = Maze::parse(&["#####", "#.PG#", "#PG.#", "#####"]).expect("valid level");
        assert_eq!(maze.player_spawn(), Vec2::new(2, 1));
        assert_eq!(maze.ghost_spawn(), Vec2::new(3, 1));
        assert!(maze.is_walkable(2, 1));
        assert!(maze.is_walkable(3, 1));
    }

    #[test]
    fn missing_spawns_fall_back_to_fixed_cells() {
        let maze = Maze::parse(&["...", "..."]).expect("valid level");
        assert_eq!(maze.player_spawn(), Vec2::new(1, 1));
        assert_eq!(maze.ghost_spawn(), Vec2::new(5, 5));
    }

    #[test]
    fn consuming_removes_items_once() {
        let mut maze = Maze::parse(&["#####", "#.T.#", "#####"]).expect("valid level");
        assert_eq!(maze.remaining_dots(), 2);
        assert!(maze.consume_dot(1, 1));
        assert!(!maze.consume_dot(1, 1));
        assert!(!maze.consume_dot(2, 1));
        assert_eq!(maze.remaining_dots(), 1);
        assert_eq!(maze.consume_pickup(2, 1), Some(PickupKind::TeleportCharge));
        assert_eq!(maze.consume_pickup(2, 1), None);
    }

    #[test]
    fn parse_reports_malformed_levels() {
        let empty: [&str; 0] = [];
        assert!(matches!(Maze::parse(&empty), Err(PaxmanError::EmptyLevel)));
        assert!(matches!(
            Maze::parse(&["###", "##"]),
            Err(PaxmanError::RaggedLevel {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            Maze::parse(&["#x#"]),
            Err(PaxmanError::UnknownCell { symbol: 'x', x: 1, y: 0 })
        ));
    }

    #[test]
    fn from_text_skips_trailing_blank_lines() {
        let maze = Maze::from_text("###\r\n#P#\r\n###\n\n").expect("valid level");
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.width(), 3);
    }

    #[test]
    fn classic_level_walls_are_mirror_symmetric() {
        let maze = Maze::classic().expect("built-in level parses");
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                assert_eq!(
                    maze.is_walkable(x, y),
                    maze.is_walkable(maze.mirror_column(x), y),
                    "asymmetric wall at ({x},{y})"
                );
            }
        }
    }

    #[test]
    fn classic_level_is_fully_reachable_from_player_spawn() {
        let maze = Maze::classic().expect("built-in level parses");
        let start = maze.player_spawn();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for next in maze.walkable_neighbors(pos) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        for dot in maze.dots() {
            assert!(seen.contains(&dot), "unreachable dot at {dot:?}");
        }
        assert!(seen.contains(&maze.ghost_spawn()));
    }
}
