//! Shared types for the simulator.

use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Jsonl,
    /// CSV summary only
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricsLevel {
    Basic,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BotKind {
    /// Uniformly random legal card, random color
    Random,
    /// Highest-value legal card, color it holds most of
    Greedy,
    /// First legal card in hand order
    Cautious,
}

impl BotKind {
    pub fn name(&self) -> &'static str {
        match self {
            BotKind::Random => "Random",
            BotKind::Greedy => "Greedy",
            BotKind::Cautious => "Cautious",
        }
    }
}
