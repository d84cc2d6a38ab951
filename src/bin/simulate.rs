use clap::Parser;
use paxman_core::constants::{LEADERBOARD_CAPACITY, TICK_RATE};
use paxman_core::engine::pathfinding::distance_field;
use paxman_core::engine::utils::manhattan;
use paxman_core::engine::{GameEngine, GameEngineOptions};
use paxman_core::leaderboard::Leaderboard;
use paxman_core::maze::{Maze, NEIGHBOR_ORDER};
use paxman_core::ranking_store::RankingStore;
use paxman_core::types::{Difficulty, Direction, GameEvent, RoundOutcome, Skin, Snapshot, Vec2};
use paxman_core::PaxmanResult;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const PLAYER_LAG_LIMIT: f32 = 1.5;
const GHOST_LAG_LIMIT: f32 = 1.0 + 1e-3;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long)]
    skin: Option<String>,
    #[arg(long, default_value_t = 3)]
    rounds: u32,
    /// Per-round tick cap; rounds that hit it are reported as unfinished.
    #[arg(long, default_value_t = TICK_RATE as u64 * 60 * 5)]
    max_ticks: u64,
    /// Level file in the `#`/`.`/`P`/`G`/`T`/`S`/`I` symbol format.
    #[arg(long)]
    level: Option<PathBuf>,
    /// Leaderboard JSON file to load and update.
    #[arg(long)]
    scores: Option<PathBuf>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct RoundPlan {
    round: u32,
    seed: u64,
    difficulty: Difficulty,
    skin: Skin,
    max_ticks: u64,
}

#[derive(Clone, Debug, Serialize)]
struct RoundResultLine {
    round: u32,
    seed: u64,
    difficulty: Difficulty,
    skin: Skin,
    outcome: Option<RoundOutcome>,
    ticks: u64,
    score: u32,
    lives: i32,
    #[serde(rename = "dotsEaten")]
    dots_eaten: u32,
    #[serde(rename = "bestCombo")]
    best_combo: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    deaths: u32,
    teleports: u32,
    pickups: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct RoundRunResult {
    result: RoundResultLine,
    anomaly_records: Vec<AnomalyRecord>,
    leaderboard: Leaderboard,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "roundCount")]
    round_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "bestScore")]
    best_score: u32,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    rounds: Vec<RoundResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let plans = resolve_rounds(&cli, run_started_at_ms);
    let seed_hint = plans.first().map(|plan| plan.seed).unwrap_or(0);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed_hint, run_started_at_ms));

    let maze = match load_maze(cli.level.as_deref()) {
        Ok(maze) => maze,
        Err(error) => {
            emit_log(
                "error",
                "level_load_failed",
                &run_id,
                None,
                None,
                json!({
                    "path": cli.level.as_ref().map(|path| path.to_string_lossy().to_string()),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    let mut store = cli.scores.clone().map(RankingStore::new);
    let mut leaderboard = store
        .as_mut()
        .map(RankingStore::take_leaderboard)
        .unwrap_or_default();

    let mut has_anomaly = false;
    let mut round_results = Vec::new();
    let mut total_anomalies = 0usize;

    for plan in plans {
        emit_log(
            "info",
            "round_started",
            &run_id,
            Some(plan.seed),
            None,
            json!({
                "round": plan.round,
                "difficulty": plan.difficulty,
                "skin": plan.skin,
                "maze": { "width": maze.width(), "height": maze.height() },
            }),
        );
        let round_run = run_round(&plan, maze.clone(), leaderboard);
        leaderboard = round_run.leaderboard;

        for anomaly in &round_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(plan.seed),
                Some(anomaly.tick),
                json!({ "message": anomaly.message }),
            );
        }
        if !round_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += round_run.anomaly_records.len();

        emit_log(
            "info",
            "round_finished",
            &run_id,
            Some(plan.seed),
            Some(round_run.result.ticks),
            json!({
                "outcome": round_run.result.outcome,
                "score": round_run.result.score,
                "anomalyCount": round_run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&round_run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => log::error!("failed to serialize round result: {error}"),
        }
        round_results.push(round_run.result);
    }

    if let Some(store) = store.as_mut() {
        store.replace(leaderboard);
        if let Err(error) = store.save() {
            emit_log(
                "error",
                "scores_write_failed",
                &run_id,
                None,
                None,
                json!({
                    "path": store.path().to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
        }
    }

    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        now_ms(),
        round_results,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        json!({
            "roundCount": summary.round_count,
            "anomalyCount": summary.anomaly_count,
            "averageTicks": summary.average_ticks,
            "bestScore": summary.best_score,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn load_maze(level: Option<&Path>) -> PaxmanResult<Maze> {
    match level {
        Some(path) => Maze::from_text(&std::fs::read_to_string(path)?),
        None => Maze::classic(),
    }
}

fn run_round(plan: &RoundPlan, maze: Maze, leaderboard: Leaderboard) -> RoundRunResult {
    let mut engine = GameEngine::new(
        maze,
        GameEngineOptions {
            difficulty: plan.difficulty,
            skin: plan.skin,
            seed: plan.seed,
            ..GameEngineOptions::default()
        },
        leaderboard,
    );
    let board_before = engine.leaderboard().len();

    let mut result = RoundResultLine {
        round: plan.round,
        seed: plan.seed,
        difficulty: plan.difficulty,
        skin: plan.skin,
        outcome: None,
        ticks: 0,
        score: 0,
        lives: engine.lives(),
        dots_eaten: 0,
        best_combo: 0,
        ghosts_eaten: 0,
        deaths: 0,
        teleports: 0,
        pickups: 0,
        anomalies: Vec::new(),
    };
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut round_overs = 0u32;
    let mut previous = engine.build_snapshot(false);

    while !engine.is_ended() && engine.tick() < plan.max_ticks {
        engine.set_direction(autopilot_direction(&engine));
        if threatened(&engine) {
            engine.request_teleport();
        }
        engine.step();
        let snapshot = engine.build_snapshot(true);

        for message in collect_tick_anomalies(&engine, &previous, &snapshot) {
            push_anomaly(
                &mut result.anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }

        for event in &snapshot.events {
            match event {
                GameEvent::DotEaten { .. } => result.dots_eaten += 1,
                GameEvent::ComboExtended { count, .. } => {
                    result.best_combo = result.best_combo.max(*count)
                }
                GameEvent::PickupTaken { .. } => result.pickups += 1,
                GameEvent::Teleported { .. } => result.teleports += 1,
                GameEvent::GhostEaten { .. } => result.ghosts_eaten += 1,
                GameEvent::PlayerDied { .. } => result.deaths += 1,
                GameEvent::RoundOver { .. } => round_overs += 1,
            }
        }
        previous = snapshot;
    }

    let expected_round_overs = u32::from(engine.is_ended());
    if round_overs != expected_round_overs {
        push_anomaly(
            &mut result.anomalies,
            &mut anomaly_records,
            &mut anomaly_seen,
            engine.tick(),
            format!("round over emitted {round_overs} times"),
        );
    }
    let board_after = engine.leaderboard().len();
    if engine.is_ended() && board_before == board_after && board_before < LEADERBOARD_CAPACITY {
        push_anomaly(
            &mut result.anomalies,
            &mut anomaly_records,
            &mut anomaly_seen,
            engine.tick(),
            "finished round was not recorded".to_string(),
        );
    }

    result.outcome = engine.outcome();
    result.ticks = engine.tick();
    result.score = engine.score();
    result.lives = engine.lives();
    RoundRunResult {
        result,
        anomaly_records,
        leaderboard: engine.into_leaderboard(),
    }
}

fn is_dangerous(engine: &GameEngine, ghost_index: usize) -> bool {
    let ghost = &engine.ghosts()[ghost_index];
    !ghost.is_eaten() && !(ghost.is_frightened() && engine.player().is_invincible())
}

fn threatened(engine: &GameEngine) -> bool {
    let player = engine.player().body.tile;
    (0..engine.ghosts().len()).any(|index| {
        is_dangerous(engine, index) && manhattan(engine.ghosts()[index].body.tile, player) <= 1
    })
}

/// Heads for the nearest remaining dot, refusing to step onto a dangerous adversary.
fn autopilot_direction(engine: &GameEngine) -> Direction {
    let maze = engine.maze();
    let player = engine.player().body.tile;
    let index = |pos: Vec2| (pos.y * maze.width() + pos.x) as usize;

    let from_player = distance_field(maze, player);
    let Some(goal) = maze
        .dots()
        .filter_map(|dot| from_player[index(dot)].map(|distance| (distance, dot)))
        .min()
        .map(|(_, dot)| dot)
    else {
        return Direction::None;
    };

    let blocked: Vec<Vec2> = (0..engine.ghosts().len())
        .filter(|&ghost_index| is_dangerous(engine, ghost_index))
        .map(|ghost_index| engine.ghosts()[ghost_index].body.tile)
        .collect();
    let to_goal = distance_field(maze, goal);
    NEIGHBOR_ORDER
        .iter()
        .map(|(dx, dy)| Vec2::new(player.x + dx, player.y + dy))
        .filter(|next| !blocked.contains(next))
        .filter_map(|next| {
            if !maze.in_bounds(next.x, next.y) {
                return None;
            }
            to_goal[index(next)].map(|distance| (distance, next))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, next)| Direction::from_delta(next.x - player.x, next.y - player.y))
        .unwrap_or(Direction::None)
}

fn collect_tick_anomalies(
    engine: &GameEngine,
    previous: &Snapshot,
    snapshot: &Snapshot,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    let maze = engine.maze();

    let player = &snapshot.player;
    if !maze.is_walkable(player.x, player.y) {
        anomalies.push(format!("player on blocked tile ({},{})", player.x, player.y));
    }
    if engine.player().body.render_lag() > PLAYER_LAG_LIMIT {
        anomalies.push(format!(
            "player render lag {:.2}",
            engine.player().body.render_lag()
        ));
    }
    for (index, ghost) in engine.ghosts().iter().enumerate() {
        let tile = ghost.body.tile;
        if !maze.is_walkable(tile.x, tile.y) {
            anomalies.push(format!("ghost {index} on blocked tile ({},{})", tile.x, tile.y));
        }
        if ghost.body.render_lag() > GHOST_LAG_LIMIT {
            anomalies.push(format!(
                "ghost {index} render lag {:.2}",
                ghost.body.render_lag()
            ));
        }
    }

    if snapshot.score < previous.score {
        anomalies.push(format!(
            "score went down: {} -> {}",
            previous.score, snapshot.score
        ));
    }
    if snapshot.lives > previous.lives {
        anomalies.push(format!(
            "lives went up: {} -> {}",
            previous.lives, snapshot.lives
        ));
    }
    if snapshot.dots_remaining > previous.dots_remaining {
        anomalies.push(format!(
            "dots reappeared: {} -> {}",
            previous.dots_remaining, snapshot.dots_remaining
        ));
    }
    anomalies
}

fn resolve_rounds(cli: &Cli, now_ms: u64) -> Vec<RoundPlan> {
    let seed = cli.seed.unwrap_or(now_ms);
    let difficulty = cli
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse)
        .unwrap_or_default();
    let skin = cli
        .skin
        .as_deref()
        .and_then(Skin::parse)
        .unwrap_or_default();

    (0..cli.rounds.max(1))
        .map(|round| RoundPlan {
            round: round + 1,
            seed: seed.wrapping_add(round as u64),
            difficulty,
            skin,
            max_ticks: cli.max_ticks.max(1),
        })
        .collect()
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u64, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn outcome_key(outcome: Option<RoundOutcome>) -> String {
    match outcome {
        Some(RoundOutcome::Victory) => "victory",
        Some(RoundOutcome::Defeat) => "defeat",
        None => "unfinished",
    }
    .to_string()
}

fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    rounds: Vec<RoundResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let round_count = rounds.len();
    let total_ticks: u64 = rounds.iter().map(|round| round.ticks).sum();
    let average_ticks = if round_count == 0 {
        0
    } else {
        total_ticks / round_count as u64
    };
    let mut outcome_counts = BTreeMap::new();
    for round in &rounds {
        *outcome_counts.entry(outcome_key(round.outcome)).or_insert(0) += 1;
    }
    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        round_count,
        anomaly_count,
        average_ticks,
        best_score: rounds.iter().map(|round| round.score).max().unwrap_or(0),
        outcome_counts,
        rounds,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    seed: Option<u64>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        seed,
        tick,
        details,
    };
    match serde_json::to_string(&log_line) {
        Ok(line) => eprintln!("{line}"),
        Err(error) => log::error!("failed to serialize log line for {event}: {error}"),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> PaxmanResult<()> {
    let summary_text = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, summary_text)?;
    Ok(())
}
