//! Metrics collection and output for simulation results.

use serde::Serialize;
use uno_engine::PlayerId;

use crate::simulator::GameResult;
use crate::types::MetricsLevel;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub bots: Vec<String>,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub status: String,
    /// Seat index of the winner.
    pub winner: Option<usize>,
    pub winner_score: Option<u32>,
    pub turns: u32,
    pub stalled: bool,
    pub plays: u32,
    pub voluntary_draws: u32,
    pub forced_draws: u32,
    pub forced_cards: u32,
    pub reversals: u32,
    pub reshuffles: u32,
    pub low_hand_calls: u32,
    pub events: u64,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub seat: usize,
    pub bot: String,
    pub cards_left: usize,
    pub hand_points: Option<u32>,
    pub plays: u32,
}

/// Build metrics from a game result.
pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    bots: Vec<String>,
    total_games: u32,
    result: &GameResult,
    duration_ms: f64,
    level: MetricsLevel,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let snap = &result.final_snapshot;
    let seat_of = |player: PlayerId| result.players.iter().position(|&p| p == player);
    let counts = &result.counts;

    let player_metrics = if level == MetricsLevel::Detailed {
        result
            .players
            .iter()
            .enumerate()
            .map(|(seat, &player)| {
                let member = snap.member(player);
                PlayerMetrics {
                    seat,
                    bot: bots.get(seat).cloned().unwrap_or_default(),
                    cards_left: member.map(|m| m.hand_size).unwrap_or(0),
                    hand_points: member.and_then(|m| m.hand_points),
                    plays: counts.plays_by_player.get(&player).copied().unwrap_or(0),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    GameMetrics {
        game_id,
        seed,
        timestamp,
        config: GameConfig { bots, total_games },
        result: GameResultMetrics {
            status: serde_json::to_value(snap.status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            winner: snap.winner.and_then(seat_of),
            winner_score: snap.winner_score,
            turns: result.turns,
            stalled: result.stalled,
            plays: counts.plays,
            voluntary_draws: counts.voluntary_draws,
            forced_draws: counts.forced_draws,
            forced_cards: counts.forced_cards,
            reversals: counts.reversals,
            reshuffles: counts.reshuffles,
            low_hand_calls: counts.low_hand_calls,
            events: snap.last_sequence,
            duration_ms,
        },
        player_metrics,
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub status: String,
    pub winner: Option<usize>,
    pub winner_score: Option<u32>,
    pub turns: u32,
    pub reshuffles: u32,
    pub bots: String,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            status: metrics.result.status.clone(),
            winner: metrics.result.winner,
            winner_score: metrics.result.winner_score,
            turns: metrics.result.turns,
            reshuffles: metrics.result.reshuffles,
            bots: metrics.config.bots.join("|"),
        }
    }
}
