//! Session simulator CLI: runs bot games through the session registry.
//!
//! Every game is played via the same registry operations a transport layer
//! would call, with invariants checked after each operation.

mod bots;
mod metrics;
mod output;
mod simulator;
mod types;

use std::time::Instant;

use bots::create_bot;
use clap::Parser;
use metrics::build_game_metrics;
use output::OutputWriter;
use rand::Rng;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::{BotKind, MetricsLevel, OutputFormat};
use uno_engine::{EngineConfig, SessionRegistry, SessionStatus};

#[derive(Parser)]
#[command(name = "uno-simulator")]
#[command(about = "Runs bot games through the session engine")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Bot for each seat; the number of bots sets the player count (2-4)
    #[arg(long, value_delimiter = ',', default_values = ["random", "greedy"])]
    bots: Vec<BotKind>,

    /// Base seed; game N uses seed + N. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Turn cap per game
    #[arg(long, default_value = "5000")]
    max_turns: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress output files
    #[arg(long)]
    compress: bool,

    /// Metrics detail level
    #[arg(long, default_value = "detailed")]
    metrics_level: MetricsLevel,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only show warnings/errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    uno_engine::init_tracing(filter, args.json_logs);

    if !(2..=4).contains(&args.bots.len()) {
        return Err(format!("need 2 to 4 bots, got {}", args.bots.len()).into());
    }

    let config = EngineConfig::from_env()?;
    let registry = SessionRegistry::new(config);
    let simulator = Simulator::new(&registry, args.max_turns);
    let bot_names: Vec<String> = args.bots.iter().map(|b| b.name().to_string()).collect();
    let base_seed = args.seed.unwrap_or_else(|| rand::rng().random());

    if args.show_output {
        info!(games = args.games, bots = ?bot_names, base_seed, "Starting simulator");
    }

    let mut output_writer =
        OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let seed = base_seed.wrapping_add(u64::from(game_num));
        let mut bots: Vec<_> = args
            .bots
            .iter()
            .enumerate()
            .map(|(seat, &kind)| create_bot(kind, seed.rotate_left(seat as u32 * 8)))
            .collect();

        match simulator.simulate_game(seed, &mut bots) {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    seed,
                    bot_names.clone(),
                    args.games,
                    &result,
                    duration_ms,
                    args.metrics_level,
                );
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(
                        game = game_num,
                        winner = ?result.final_snapshot.winner,
                        turns = result.turns,
                        "Game completed"
                    );
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {} ({})", game_num, e, e.code());
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let (jsonl_path, csv_path) = (jsonl_path.cloned(), csv_path.clone());
    output_writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, &bot_names, errors, elapsed, args.games);
    }

    Ok(())
}

fn print_summary(
    results: &[GameResult],
    bots: &[String],
    errors: u32,
    elapsed: std::time::Duration,
    total: u32,
) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let finished = results
        .iter()
        .filter(|r| r.final_snapshot.status == SessionStatus::Finished)
        .count();
    let stalled = results.iter().filter(|r| r.stalled).count();
    let avg_turns =
        results.iter().map(|r| f64::from(r.turns)).sum::<f64>() / results.len() as f64;
    println!("Finished: {finished}, stalled: {stalled}, avg turns: {avg_turns:.1}");

    let mut wins = vec![0u32; bots.len()];
    let mut scores = vec![0u64; bots.len()];
    for result in results {
        let winner_seat = result
            .final_snapshot
            .winner
            .and_then(|w| result.players.iter().position(|&p| p == w));
        if let Some(seat) = winner_seat {
            wins[seat] += 1;
            scores[seat] += u64::from(result.final_snapshot.winner_score.unwrap_or(0));
        }
    }

    println!("\n=== Results by Seat ===");
    for (seat, bot) in bots.iter().enumerate() {
        let win_rate = f64::from(wins[seat]) / results.len() as f64 * 100.0;
        let avg_score = if wins[seat] > 0 {
            scores[seat] as f64 / f64::from(wins[seat])
        } else {
            0.0
        };
        println!(
            "Seat {seat} ({bot}): wins={} ({win_rate:.1}%), avg winning score={avg_score:.1}",
            wins[seat]
        );
    }
}

