use crate::types::Difficulty;

pub const TICK_RATE: u32 = 60;

pub const STARTING_LIVES: i32 = 3;
pub const START_COUNTDOWN_TICKS: u32 = 120;

pub const DOT_SCORE: u32 = 10;
pub const COMBO_BONUS: u32 = 10;
pub const COMBO_WINDOW_TICKS: u32 = 30;
pub const GHOST_EATEN_SCORE: u32 = 200;

pub const SCATTER_TICKS: u32 = 420;
pub const CHASE_TICKS: u32 = 1_740;
pub const FRIGHTENED_TICKS: u32 = 240;

pub const SPEED_BOOST_TICKS: u32 = 180;
pub const INVINCIBLE_TICKS: u32 = 180;

/// Tiles per tick the player's render position covers.
pub const PLAYER_STEP: f32 = 0.18;
pub const PLAYER_BOOST_MULTIPLIER: f32 = 1.5;
pub const GHOST_STEP: f32 = 0.14;
/// Distance below which an interpolated position snaps onto its tile.
pub const SNAP_EPSILON: f32 = 0.01;
/// Per-axis tolerance for the player's glide to commit a tile.
pub const ARRIVE_EPSILON: f32 = 0.05;

pub const AMBUSH_LOOKAHEAD: i32 = 4;
pub const FLANK_LOOKAHEAD: i32 = 2;
pub const OPPORTUNIST_RADIUS_SQ: i32 = 64;

pub const FALLBACK_PLAYER_SPAWN: (i32, i32) = (1, 1);
pub const FALLBACK_GHOST_SPAWN: (i32, i32) = (5, 5);

pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyProfile {
    /// Adversaries make one discrete move every `decision_interval` ticks.
    pub decision_interval: u32,
    pub teleport_bonus: TeleportBonus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeleportBonus {
    Grant(u32),
    Keep,
    Revoke,
}

pub fn get_difficulty_profile(difficulty: Difficulty) -> DifficultyProfile {
    match difficulty {
        Difficulty::Easy => DifficultyProfile {
            decision_interval: 30,
            teleport_bonus: TeleportBonus::Grant(2),
        },
        Difficulty::Normal => DifficultyProfile {
            decision_interval: 15,
            teleport_bonus: TeleportBonus::Keep,
        },
        Difficulty::Hard => DifficultyProfile {
            decision_interval: 8,
            teleport_bonus: TeleportBonus::Revoke,
        },
    }
}
