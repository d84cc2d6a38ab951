use crate::constants::{
    get_difficulty_profile, DifficultyProfile, TeleportBonus, COMBO_BONUS, COMBO_WINDOW_TICKS,
    DOT_SCORE, GHOST_EATEN_SCORE, START_COUNTDOWN_TICKS, STARTING_LIVES,
};
use crate::leaderboard::Leaderboard;
use crate::maze::Maze;
use crate::rng::Rng;
use crate::types::{
    Difficulty, Direction, GameEvent, GhostType, RoundOutcome, ScoreRecord, Skin, Snapshot,
};

pub mod ghost_system;
pub mod motion;
pub mod pathfinding;
pub mod player_system;
pub mod utils;

pub use self::ghost_system::{Ghost, GhostMode, Pursuit};
pub use self::player_system::Player;

#[derive(Clone, Debug)]
pub struct GameEngineOptions {
    pub difficulty: Difficulty,
    pub skin: Skin,
    pub seed: u64,
    pub countdown_ticks: u32,
}

impl Default for GameEngineOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            skin: Skin::default(),
            seed: 0,
            countdown_ticks: START_COUNTDOWN_TICKS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    pub options: GameEngineOptions,
    profile: DifficultyProfile,
    maze: Maze,
    rng: Rng,
    player: Player,
    ghosts: Vec<Ghost>,
    events: Vec<GameEvent>,
    leaderboard: Leaderboard,

    score: u32,
    lives: i32,
    combo: u32,
    combo_ticks: u32,
    countdown: u32,
    decision_clock: u32,
    tick_counter: u64,
    ended: bool,
    outcome: Option<RoundOutcome>,
    score_saved: bool,
}

impl GameEngine {
    pub fn new(maze: Maze, options: GameEngineOptions, leaderboard: Leaderboard) -> Self {
        let mut rng = Rng::new(options.seed);
        let profile = get_difficulty_profile(options.difficulty);

        let mut player = Player::spawn(maze.player_spawn());
        match profile.teleport_bonus {
            TeleportBonus::Grant(charges) => player.teleport_charges += charges,
            TeleportBonus::Keep => {}
            TeleportBonus::Revoke => player.teleport_charges = 0,
        }

        // The flanker triangulates off the chaser, which is always spawned first.
        let ghosts = GhostType::ROSTER
            .iter()
            .map(|&ghost_type| {
                let peer = (ghost_type == GhostType::Flanker).then_some(0);
                Ghost::spawn(ghost_type, &maze, &mut rng, peer)
            })
            .collect();

        log::info!(
            "round start: {}x{} maze, {} dots, difficulty {:?}, seed {}",
            maze.width(),
            maze.height(),
            maze.remaining_dots(),
            options.difficulty,
            options.seed
        );

        Self {
            countdown: options.countdown_ticks,
            options,
            profile,
            maze,
            rng,
            player,
            ghosts,
            events: Vec::new(),
            leaderboard,
            score: 0,
            lives: STARTING_LIVES,
            combo: 0,
            combo_ticks: 0,
            decision_clock: 0,
            tick_counter: 0,
            ended: false,
            outcome: None,
            score_saved: false,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn into_leaderboard(self) -> Leaderboard {
        self.leaderboard
    }

    pub fn set_direction(&mut self, dir: Direction) {
        if self.ended {
            return;
        }
        self.player.queue_direction(dir);
    }

    pub fn request_teleport(&mut self) -> bool {
        if self.ended {
            return false;
        }
        match self.player.teleport(&self.maze) {
            Some((from, to)) => {
                self.events.push(GameEvent::Teleported { from, to });
                true
            }
            None => false,
        }
    }

    pub fn step(&mut self) {
        if self.ended {
            return;
        }
        self.tick_counter += 1;

        if self.countdown > 0 {
            self.countdown -= 1;
            return;
        }
        if self.lives <= 0 {
            self.finish(RoundOutcome::Defeat);
            return;
        }

        self.player.update(&self.maze);
        self.update_ghosts();
        self.resolve_dot();
        self.resolve_pickup();
        if self.maze.remaining_dots() == 0 {
            self.finish(RoundOutcome::Victory);
        }
        self.resolve_collisions();
        self.combo_ticks = self.combo_ticks.saturating_sub(1);
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            score: self.score,
            lives: self.lives,
            combo: self.combo,
            countdown: self.countdown,
            ended: self.ended,
            outcome: self.outcome,
            dots_remaining: self.maze.remaining_dots(),
            player: self.player.view(),
            ghosts: self.ghosts.iter().map(Ghost::view).collect(),
            pickups: self.maze.pickup_views(),
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    fn update_ghosts(&mut self) {
        self.decision_clock = (self.decision_clock + 1) % self.profile.decision_interval.max(1);
        let decide = self.decision_clock == 0;

        for index in 0..self.ghosts.len() {
            let peer_tile = self.ghosts[index]
                .peer
                .and_then(|peer| self.ghosts.get(peer))
                .map(|peer| peer.body.tile);
            let pursuit = Pursuit {
                player_tile: self.player.body.tile,
                player_dir: self.player.body.dir,
                player_invincible: self.player.is_invincible(),
                peer_tile,
            };
            self.ghosts[index].update(&pursuit, decide, &self.maze, &mut self.rng);
        }
    }

    fn resolve_dot(&mut self) {
        let tile = self.player.body.tile;
        if !self.maze.consume_dot(tile.x, tile.y) {
            return;
        }
        self.score += DOT_SCORE;
        self.events.push(GameEvent::DotEaten {
            x: tile.x,
            y: tile.y,
        });

        if self.combo_ticks > 0 {
            self.combo += 1;
            let bonus = (self.combo - 1) * COMBO_BONUS;
            self.score += bonus;
            self.events.push(GameEvent::ComboExtended {
                count: self.combo,
                bonus,
            });
        } else {
            self.combo = 1;
        }
        self.combo_ticks = COMBO_WINDOW_TICKS;
    }

    fn resolve_pickup(&mut self) {
        let tile = self.player.body.tile;
        let Some(kind) = self.maze.consume_pickup(tile.x, tile.y) else {
            return;
        };
        self.player.apply_pickup(kind);
        self.events.push(GameEvent::PickupTaken {
            kind,
            x: tile.x,
            y: tile.y,
        });
    }

    fn resolve_collisions(&mut self) {
        for index in 0..self.ghosts.len() {
            if self.ghosts[index].body.tile != self.player.body.tile
                || self.ghosts[index].is_eaten()
            {
                continue;
            }

            let invincible = self.player.is_invincible();
            let frightened = self.ghosts[index].is_frightened();
            if invincible && frightened {
                self.ghosts[index].mark_eaten();
                if !self.ended {
                    self.score += GHOST_EATEN_SCORE;
                }
                let ghost_type = self.ghosts[index].ghost_type;
                log::debug!("tick {}: ate {ghost_type:?}", self.tick_counter);
                self.events.push(GameEvent::GhostEaten {
                    ghost_index: index,
                    ghost_type,
                });
            } else if !invincible && !frightened {
                self.lives -= 1;
                self.player.respawn(self.maze.player_spawn());
                log::info!(
                    "tick {}: caught by {:?}, {} lives left",
                    self.tick_counter,
                    self.ghosts[index].ghost_type,
                    self.lives
                );
                self.events.push(GameEvent::PlayerDied {
                    lives_left: self.lives,
                });
            }
        }
    }

    fn finish(&mut self, outcome: RoundOutcome) {
        if !self.ended {
            self.ended = true;
            self.outcome = Some(outcome);
            self.events.push(GameEvent::RoundOver {
                outcome,
                score: self.score,
            });
            log::info!(
                "round over at tick {}: {outcome:?} with {} points",
                self.tick_counter,
                self.score
            );
        }
        self.persist_score();
    }

    fn persist_score(&mut self) {
        if self.score_saved {
            return;
        }
        self.score_saved = true;
        let rank = self.leaderboard.add(ScoreRecord {
            score: self.score,
            difficulty: self.options.difficulty,
            skin: self.options.skin,
        });
        match rank {
            Some(rank) => log::info!("score {} placed #{rank}", self.score),
            None => log::debug!("score {} did not place", self.score),
        }
    }
}
