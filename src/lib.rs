pub mod constants;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod maze;
pub mod ranking_store;
pub mod rng;
pub mod types;

pub use engine::{GameEngine, GameEngineOptions};
pub use error::{PaxmanError, PaxmanResult};
pub use leaderboard::Leaderboard;
pub use maze::Maze;
pub use ranking_store::RankingStore;
