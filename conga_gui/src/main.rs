// main.rs - egui front end driving the same scheduler as the terminal binary
// Frames pump the event queue; the painter reads the engine's grid directly

use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use eframe::egui;
use egui::Color32;

use conga::config::{patterns_listing, rules_listing};
use conga::pattern::{Pattern, PATTERN_DEFS};
use conga::render::Viewport;
use conga::rng::Rand48;
use conga::seed::{seed_from_subgrid, seed_random_generation};
use conga::{
    build_engine, Config, Conga, EventQueue, GenerationStats, Grid, Key, QueuedInput, Render,
    SignalFlags, Status, FPS,
};

mod ui;

const VISIBLE_CELLS: usize = 50;                      // painter shows at most 50x50 cells
const MAX_CATCH_UP: u32 = FPS;                        // polls replayed after a stalled frame

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    if config.list_rules || config.list_patterns {
        if config.list_rules {
            print!("{}", rules_listing());
        }
        if config.list_patterns {
            print!("{}", patterns_listing());
        }
        return Ok(());
    }
    config.validate()?;

    let app = CongaApp::new(&config)?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 1000.0]),
        ..Default::default()
    };

    eframe::run_native(
        "conga",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Keeps the viewport; the painting itself happens in the egui frame.
#[derive(Debug, Default)]
pub struct GuiRender {
    viewport: Viewport,
    frames: u64,
}

impl GuiRender {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Render for GuiRender {
    fn draw(&mut self, grid: &Grid, _stats: GenerationStats, _status: &Status) -> io::Result<()> {
        self.viewport.fit(grid, VISIBLE_CELLS, VISIBLE_CELLS);
        self.frames += 1;
        Ok(())
    }

    fn force_resize(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn scroll(&mut self, rows: isize, cols: isize) {
        self.viewport.scroll(rows, cols);
    }
}

pub struct CongaApp {
    conga: Conga<QueuedInput, GuiRender>,
    seed: i64,
    live_percent: f64,
    last_pump: Instant,
    carry: Duration,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub selected_pattern: usize,
}

impl CongaApp {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let engine = build_engine(config)?;
        let queue = EventQueue::new(FPS, config.delay(), SignalFlags::new(), QueuedInput::new());
        let mut conga = Conga::new(engine, queue, GuiRender::default(), config.stop_on_cycle);
        conga.draw()?;

        Ok(Self {
            conga,
            seed: config.seed,
            live_percent: config.live_percent,
            last_pump: Instant::now(),
            carry: Duration::ZERO,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            selected_pattern: 0,
        })
    }

    pub fn push_key(&mut self, key: Key) {
        self.conga.queue_mut().input_mut().push(key);
    }

    /// Runs as many scheduler polls as wall time allows since the last frame.
    pub fn advance(&mut self) -> io::Result<()> {
        let tick = self.conga.queue().tick();
        let elapsed = self.last_pump.elapsed() + self.carry;
        self.last_pump = Instant::now();

        let ticks = (elapsed.as_nanos() / tick.as_nanos()) as u32;
        self.carry = elapsed.saturating_sub(tick * ticks);
        self.conga.pump(ticks.min(MAX_CATCH_UP) as usize)
    }

    pub fn redraw(&mut self) {
        if let Err(e) = self.conga.draw() {
            log::warn!("draw failed: {e}");
        }
    }

    pub fn clear(&mut self) {
        self.conga.set_paused(true);
        self.conga.engine_mut().clear();
        self.redraw();
    }

    /// New random generation with the next seed.
    pub fn randomize(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        let current = self.conga.engine().grid();
        let mut grid = Grid::new(current.rows(), current.cols());
        seed_random_generation(&mut grid, &mut Rand48::new(self.seed), self.live_percent);

        log::info!("random generation from seed {}", self.seed);
        self.conga.set_paused(true);
        self.conga.engine_mut().reset(grid);
        self.redraw();
    }

    pub fn apply_selected_pattern(&mut self) {
        let Some(def) = PATTERN_DEFS.get(self.selected_pattern) else {
            return;
        };
        let pattern = match Pattern::from_def(def) {
            Ok(pattern) => pattern,
            Err(e) => {
                log::warn!("pattern '{}': {e}", def.name);
                return;
            }
        };

        let current = self.conga.engine().grid();
        let mut grid = Grid::new(
            current.rows().max(pattern.grid.rows()),
            current.cols().max(pattern.grid.cols()),
        );
        seed_from_subgrid(&mut grid, &pattern.grid);

        self.conga.set_paused(true);
        self.conga.engine_mut().reset(grid);
        self.redraw();
    }

    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        self.conga.engine_mut().toggle_cell(row, col);
        self.redraw();
    }

    pub fn generations_per_second(&self) -> f32 {
        1_000_000.0 / self.conga.queue().delay().as_micros() as f32
    }

    pub fn set_generations_per_second(&mut self, speed: f32) {
        let delay = Duration::from_micros((1_000_000.0 / speed) as u64);
        self.conga.queue_mut().set_delay(delay);
        self.redraw();
    }
}
