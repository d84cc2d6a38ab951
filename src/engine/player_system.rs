use crate::constants::{
    INVINCIBLE_TICKS, PLAYER_BOOST_MULTIPLIER, PLAYER_STEP, SPEED_BOOST_TICKS,
};
use crate::maze::Maze;
use crate::types::{Direction, PickupKind, PlayerView, Vec2};

use super::motion::Body;

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub queued: Direction,
    pub teleport_charges: u32,
    pub speed_ticks: u32,
    pub invincible_ticks: u32,
}

impl Player {
    pub fn spawn(at: Vec2) -> Self {
        Self {
            body: Body::at(at, Direction::None),
            queued: Direction::None,
            teleport_charges: 0,
            speed_ticks: 0,
            invincible_ticks: 0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn is_speed_boosted(&self) -> bool {
        self.speed_ticks > 0
    }

    pub fn queue_direction(&mut self, dir: Direction) {
        self.queued = dir;
    }

    pub fn update(&mut self, maze: &Maze) {
        self.speed_ticks = self.speed_ticks.saturating_sub(1);
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);

        if self.is_speed_boosted() {
            let step = PLAYER_STEP * PLAYER_BOOST_MULTIPLIER;
            self.advance(maze, step);
            self.advance(maze, step);
        } else {
            self.advance(maze, PLAYER_STEP);
        }
    }

    fn advance(&mut self, maze: &Maze, step: f32) {
        let tile = self.body.tile;
        if self.queued != Direction::None {
            let (dx, dy) = self.queued.delta();
            if maze.is_walkable(tile.x + dx, tile.y + dy) {
                self.body.dir = self.queued;
            }
        }

        let (dx, dy) = self.body.dir.delta();
        let target = Vec2::new(tile.x + dx, tile.y + dy);
        if self.body.dir != Direction::None && maze.is_walkable(target.x, target.y) {
            self.body.glide_to(target, step);
        } else {
            self.body.settle(step);
        }
    }

    pub fn teleport(&mut self, maze: &Maze) -> Option<(Vec2, Vec2)> {
        if self.teleport_charges == 0 {
            return None;
        }
        self.teleport_charges -= 1;
        let from = self.body.tile;
        let to = Vec2::new(maze.mirror_column(from.x), from.y);
        self.body.place(to);
        Some((from, to))
    }

    pub fn apply_pickup(&mut self, kind: PickupKind) {
        match kind {
            PickupKind::TeleportCharge => self.teleport_charges += 1,
            PickupKind::SpeedBoost => self.speed_ticks = SPEED_BOOST_TICKS,
            PickupKind::Invincibility => self.invincible_ticks = INVINCIBLE_TICKS,
            PickupKind::Dot => {}
        }
    }

    pub fn respawn(&mut self, spawn: Vec2) {
        self.body = Body::at(spawn, Direction::None);
        self.queued = Direction::None;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.body.tile.x,
            y: self.body.tile.y,
            fx: self.body.fx,
            fy: self.body.fy,
            dir: self.body.dir,
            queued_dir: self.queued,
            teleport_charges: self.teleport_charges,
            speed_ticks: self.speed_ticks,
            invincible_ticks: self.invincible_ticks,
        }
    }
}
