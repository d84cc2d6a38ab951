use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Direction::Up,
            (0, 1) => Direction::Down,
            (-1, 0) => Direction::Left,
            (1, 0) => Direction::Right,
            _ => Direction::None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vec2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Wall,
    Floor,
    PlayerSpawn,
    GhostSpawn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Dot,
    TeleportCharge,
    SpeedBoost,
    Invincibility,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostType {
    Chaser,
    Ambusher,
    Flanker,
    Opportunist,
}

impl GhostType {
    pub const ROSTER: [GhostType; 4] = [
        GhostType::Chaser,
        GhostType::Ambusher,
        GhostType::Flanker,
        GhostType::Opportunist,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostModeKind {
    Scatter,
    Chase,
    Frightened,
    ReturningHome,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skin {
    #[default]
    Yellow,
    Green,
    Pink,
}

impl Skin {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yellow" => Some(Self::Yellow),
            "green" => Some(Self::Green),
            "pink" => Some(Self::Pink),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    DotEaten {
        x: i32,
        y: i32,
    },
    ComboExtended {
        count: u32,
        bonus: u32,
    },
    PickupTaken {
        kind: PickupKind,
        x: i32,
        y: i32,
    },
    Teleported {
        from: Vec2,
        to: Vec2,
    },
    GhostEaten {
        #[serde(rename = "ghostIndex")]
        ghost_index: usize,
        #[serde(rename = "ghostType")]
        ghost_type: GhostType,
    },
    PlayerDied {
        #[serde(rename = "livesLeft")]
        lives_left: i32,
    },
    RoundOver {
        outcome: RoundOutcome,
        score: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub fx: f32,
    pub fy: f32,
    pub dir: Direction,
    #[serde(rename = "queuedDir")]
    pub queued_dir: Direction,
    #[serde(rename = "teleportCharges")]
    pub teleport_charges: u32,
    #[serde(rename = "speedTicks")]
    pub speed_ticks: u32,
    #[serde(rename = "invincibleTicks")]
    pub invincible_ticks: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    #[serde(rename = "type")]
    pub ghost_type: GhostType,
    pub x: i32,
    pub y: i32,
    pub fx: f32,
    pub fy: f32,
    pub dir: Direction,
    pub mode: GhostModeKind,
    pub eaten: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PickupView {
    pub kind: PickupKind,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: u32,
    pub lives: i32,
    pub combo: u32,
    pub countdown: u32,
    pub ended: bool,
    pub outcome: Option<RoundOutcome>,
    #[serde(rename = "dotsRemaining")]
    pub dots_remaining: usize,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub pickups: Vec<PickupView>,
    pub events: Vec<GameEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    pub difficulty: Difficulty,
    pub skin: Skin,
}
