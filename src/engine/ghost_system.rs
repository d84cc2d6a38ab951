use crate::constants::{
    AMBUSH_LOOKAHEAD, CHASE_TICKS, FLANK_LOOKAHEAD, FRIGHTENED_TICKS, GHOST_STEP,
    OPPORTUNIST_RADIUS_SQ, SCATTER_TICKS,
};
use crate::maze::Maze;
use crate::rng::Rng;
use crate::types::{Direction, GhostModeKind, GhostType, GhostView, Vec2};

use super::motion::Body;
use super::pathfinding::next_step_toward;
use super::utils::{offset, random_direction, random_legal_step, squared_distance};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostMode {
    Scatter { remaining: u32 },
    Chase { remaining: u32 },
    Frightened { remaining: u32 },
    ReturningHome,
}

impl GhostMode {
    pub fn initial() -> Self {
        GhostMode::Scatter {
            remaining: SCATTER_TICKS,
        }
    }

    pub fn kind(self) -> GhostModeKind {
        match self {
            GhostMode::Scatter { .. } => GhostModeKind::Scatter,
            GhostMode::Chase { .. } => GhostModeKind::Chase,
            GhostMode::Frightened { .. } => GhostModeKind::Frightened,
            GhostMode::ReturningHome => GhostModeKind::ReturningHome,
        }
    }

    pub fn advance(self, player_invincible: bool) -> Self {
        let next = match self {
            GhostMode::ReturningHome => return GhostMode::ReturningHome,
            GhostMode::Frightened { remaining } if remaining <= 1 => GhostMode::initial(),
            GhostMode::Frightened { remaining } => GhostMode::Frightened {
                remaining: remaining - 1,
            },
            GhostMode::Scatter { remaining } if remaining <= 1 => GhostMode::Chase {
                remaining: CHASE_TICKS,
            },
            GhostMode::Scatter { remaining } => GhostMode::Scatter {
                remaining: remaining - 1,
            },
            GhostMode::Chase { remaining } if remaining <= 1 => GhostMode::initial(),
            GhostMode::Chase { remaining } => GhostMode::Chase {
                remaining: remaining - 1,
            },
        };
        match next {
            GhostMode::Frightened { .. } => next,
            _ if player_invincible => GhostMode::Frightened {
                remaining: FRIGHTENED_TICKS,
            },
            _ => next,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Pursuit {
    pub player_tile: Vec2,
    pub player_dir: Direction,
    pub player_invincible: bool,
    pub peer_tile: Option<Vec2>,
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub ghost_type: GhostType,
    pub body: Body,
    pub mode: GhostMode,
    pub home: Vec2,
    pub scatter_target: Vec2,
    pub peer: Option<usize>,
}

impl Ghost {
    pub fn spawn(ghost_type: GhostType, maze: &Maze, rng: &mut Rng, peer: Option<usize>) -> Self {
        let home = maze.ghost_spawn();
        Self {
            ghost_type,
            body: Body::at(home, random_direction(rng)),
            mode: GhostMode::initial(),
            home,
            scatter_target: scatter_corner(ghost_type, maze),
            peer,
        }
    }

    pub fn is_eaten(&self) -> bool {
        self.mode == GhostMode::ReturningHome
    }

    pub fn is_frightened(&self) -> bool {
        matches!(self.mode, GhostMode::Frightened { .. })
    }

    pub fn mark_eaten(&mut self) {
        self.mode = GhostMode::ReturningHome;
    }

    pub fn update(&mut self, pursuit: &Pursuit, decide: bool, maze: &Maze, rng: &mut Rng) {
        if self.is_eaten() {
            if decide {
                if self.body.tile != self.home {
                    let next = next_step_toward(self.body.tile, self.home, maze, rng);
                    self.step_to(next);
                }
                if self.body.tile == self.home {
                    self.mode = GhostMode::initial();
                }
            }
        } else {
            self.mode = self.mode.advance(pursuit.player_invincible);
            if decide {
                let next = match self.mode {
                    GhostMode::Frightened { .. } => random_legal_step(self.body.tile, maze, rng),
                    GhostMode::Scatter { .. } => {
                        next_step_toward(self.body.tile, self.scatter_target, maze, rng)
                    }
                    GhostMode::Chase { .. } => {
                        let target = self.chase_target(pursuit, maze);
                        next_step_toward(self.body.tile, target, maze, rng)
                    }
                    GhostMode::ReturningHome => self.body.tile,
                };
                self.step_to(next);
            }
        }
        self.body.settle(GHOST_STEP);
    }

    pub fn chase_target(&self, pursuit: &Pursuit, maze: &Maze) -> Vec2 {
        let player = pursuit.player_tile;
        match self.ghost_type {
            GhostType::Chaser => player,
            GhostType::Ambusher => {
                let ahead = offset(player, pursuit.player_dir, AMBUSH_LOOKAHEAD);
                maze.clamp(ahead.x, ahead.y)
            }
            GhostType::Flanker => match pursuit.peer_tile {
                Some(peer) => {
                    let ahead = offset(player, pursuit.player_dir, FLANK_LOOKAHEAD);
                    maze.clamp(
                        peer.x + 2 * (ahead.x - peer.x),
                        peer.y + 2 * (ahead.y - peer.y),
                    )
                }
                None => player,
            },
            GhostType::Opportunist => {
                if squared_distance(self.body.tile, player) > OPPORTUNIST_RADIUS_SQ {
                    player
                } else {
                    self.scatter_target
                }
            }
        }
    }

    pub fn view(&self) -> GhostView {
        GhostView {
            ghost_type: self.ghost_type,
            x: self.body.tile.x,
            y: self.body.tile.y,
            fx: self.body.fx,
            fy: self.body.fy,
            dir: self.body.dir,
            mode: self.mode.kind(),
            eaten: self.is_eaten(),
        }
    }

    fn step_to(&mut self, next: Vec2) {
        if next == self.body.tile {
            return;
        }
        self.body.dir = Direction::from_delta(next.x - self.body.tile.x, next.y - self.body.tile.y);
        self.body.tile = next;
    }
}

pub fn scatter_corner(ghost_type: GhostType, maze: &Maze) -> Vec2 {
    let (right, bottom) = (maze.width() - 2, maze.height() - 2);
    match ghost_type {
        GhostType::Chaser => maze.clamp_interior(right, 1),
        GhostType::Ambusher => maze.clamp_interior(1, 1),
        GhostType::Flanker => maze.clamp_interior(right, bottom),
        GhostType::Opportunist => maze.clamp_interior(1, bottom),
    }
}
