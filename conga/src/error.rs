// error.rs - Crate-level error type

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::pattern::PatternError;
use crate::rule::RuleError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
