// config.rs - Command line options

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::event::{DELAY_MAX, DELAY_MIN};
use crate::pattern::{self, PATTERN_DEFS};
use crate::rule::{Rule, RuleError, RULE_ALIASES};

#[derive(Debug, Clone, Parser)]
#[command(name = "conga", version, about = "Conway's Game of Life and friends in the terminal")]
pub struct Config {
    /// Grid rows
    #[arg(short, long, default_value_t = 20)]
    pub rows: usize,

    /// Grid columns
    #[arg(short, long, default_value_t = 30)]
    pub cols: usize,

    /// Seed of the random initial generation
    #[arg(short, long, default_value_t = 17, allow_negative_numbers = true)]
    pub seed: i64,

    /// Microseconds between generations
    #[arg(short = 't', long, default_value_t = 500_000)]
    pub delay: u64,

    /// Fraction of cells alive in the random initial generation
    #[arg(short = 'p', long, default_value_t = 0.5)]
    pub live_percent: f64,

    /// Rule alias or B/S notation, e.g. B36/S23
    #[arg(short = 'R', long, default_value = "B3/S23")]
    pub rule: String,

    /// Built-in pattern to start from
    #[arg(short = 'P', long, conflicts_with = "pattern_file")]
    pub pattern: Option<String>,

    /// RLE file to start from
    #[arg(short = 'f', long)]
    pub pattern_file: Option<PathBuf>,

    /// Pause when a generation repeats a recent one
    #[arg(long)]
    pub stop_on_cycle: bool,

    /// Write log records to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the rule aliases and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Print the built-in patterns and exit
    #[arg(long)]
    pub list_patterns: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["conga"])
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size {rows}x{cols} must be positive")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("grid size {rows}x{cols} exceeds 16777216 cells")]
    GridTooLarge { rows: usize, cols: usize },

    #[error("delay {0} us must be in [20000, 1000000]")]
    DelayOutOfRange(u64),

    #[error("live percent {0} must be in (0, 1)")]
    LivePercentOutOfRange(f64),

    #[error("invalid rule '{rule}'")]
    InvalidRule {
        rule: String,
        #[source]
        source: RuleError,
    },

    #[error("unknown pattern '{0}' (see --list-patterns)")]
    UnknownPattern(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid { rows: self.rows, cols: self.cols });
        }
        if self.rows.checked_mul(self.cols).is_none_or(|n| n > pattern::MAX_CELLS) {
            return Err(ConfigError::GridTooLarge { rows: self.rows, cols: self.cols });
        }

        if !(DELAY_MIN..=DELAY_MAX).contains(&self.delay()) {
            return Err(ConfigError::DelayOutOfRange(self.delay));
        }

        if !(self.live_percent > 0.0 && self.live_percent < 1.0) {
            return Err(ConfigError::LivePercentOutOfRange(self.live_percent));
        }

        self.parsed_rule()?;

        if let Some(name) = &self.pattern {
            if !pattern::alias_is_valid(name) {
                return Err(ConfigError::UnknownPattern(name.clone()));
            }
        }

        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_micros(self.delay)
    }

    pub fn parsed_rule(&self) -> Result<Rule, ConfigError> {
        Rule::parse(&self.rule).map_err(|source| ConfigError::InvalidRule {
            rule: self.rule.clone(),
            source,
        })
    }
}

pub fn rules_listing() -> String {
    let mut out = String::new();
    for alias in RULE_ALIASES {
        let _ = writeln!(out, "{:<16} {}", alias.name, alias.rule);
    }
    out
}

pub fn patterns_listing() -> String {
    let mut out = String::new();
    for def in PATTERN_DEFS {
        let size = format!("{}x{}", def.rows, def.cols);
        let _ = writeln!(out, "{:<20} {:>6}  {}", def.name, size, def.desc);
    }
    out
}
