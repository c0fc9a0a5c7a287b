// lib.rs - Two-state cellular automata on a wrap-around grid
//
// `Engine` owns the grid and rule, `EventQueue` decides when generations
// happen, and `Conga` wires both to a renderer and an input source.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod grid;
pub mod input;
pub mod pattern;
pub mod render;
pub mod rng;
pub mod rule;
pub mod seed;
pub mod signal;

pub use app::{build_engine, Conga, FPS};
pub use config::Config;
pub use engine::{Engine, GenerationStats};
pub use error::{Error, Result};
pub use event::{Event, EventQueue};
pub use grid::Grid;
pub use input::{InputSource, Key, QueuedInput};
pub use pattern::Pattern;
pub use render::{Render, Status};
pub use rule::Rule;
pub use signal::SignalFlags;
