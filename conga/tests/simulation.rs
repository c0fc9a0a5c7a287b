use std::io;
use std::time::Duration;

use conga::input::QueuedInput;
use conga::pattern::Pattern;
use conga::seed::seed_from_subgrid;
use conga::{Conga, Engine, EventQueue, GenerationStats, Grid, Key, Render, Rule, SignalFlags, Status, FPS};

#[derive(Default)]
struct CountingRender {
    frames: usize,
    last: Option<GenerationStats>,
}

impl Render for CountingRender {
    fn draw(&mut self, _grid: &Grid, stats: GenerationStats, _status: &Status) -> io::Result<()> {
        self.frames += 1;
        self.last = Some(stats);
        Ok(())
    }

    fn force_resize(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn scroll(&mut self, _rows: isize, _cols: isize) {}
}

fn centered(name: &str, rows: usize, cols: usize) -> Grid {
    let pattern = Pattern::from_alias(name).unwrap();
    let mut grid = Grid::new(rows, cols);
    seed_from_subgrid(&mut grid, &pattern.grid);
    grid
}

#[test]
fn glider_travels_around_the_torus() {
    let start = centered("glider", 8, 8);
    let mut engine = Engine::new(start.clone(), Rule::default());

    for generation in 1..=32 {
        let stats = engine.step();
        assert_eq!(stats.alive, 5, "generation {generation}");
    }
    assert_eq!(engine.grid(), &start);
}

#[test]
fn pulsar_has_period_three() {
    let start = centered("pulsar", 19, 19);
    let mut engine = Engine::new(start.clone(), Rule::default());

    engine.step();
    engine.step();
    assert_ne!(engine.grid(), &start);
    assert!(!engine.is_cycling());

    engine.step();
    assert_eq!(engine.grid(), &start);
    assert!(engine.is_cycling());
}

#[test]
fn rle_file_runs_under_its_own_rule() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replicator.rle");
    std::fs::write(&path, "#N single cell\nx = 1, y = 1, rule = replicator\no!\n").unwrap();

    let pattern = Pattern::from_file(&path).unwrap();
    let rule: Rule = pattern.rule().unwrap().parse().unwrap();
    let mut grid = Grid::new(9, 9);
    seed_from_subgrid(&mut grid, &pattern.grid);
    let mut engine = Engine::new(grid, rule);

    // B1357/S1357 copies a lone cell into its eight neighbors.
    assert_eq!(engine.step().alive, 8);
    assert!(!engine.grid().get(4, 4));
}

#[test]
fn driver_pumps_generations_until_quit() {
    let signals = SignalFlags::new();
    let queue = EventQueue::new(FPS, Duration::from_micros(100_000), signals, QueuedInput::new());
    let engine = Engine::new(centered("blinker", 5, 5), Rule::default());
    let mut conga = Conga::new(engine, queue, CountingRender::default(), false);

    // 60 polls of 16666 us hold nine 100 ms periods.
    conga.pump(60).unwrap();
    assert_eq!(conga.engine().stats().generation, 9);
    assert_eq!(conga.render().last, Some(GenerationStats { alive: 3, generation: 9 }));

    conga.queue_mut().input_mut().push(Key::Char('q'));
    conga.pump(60).unwrap();
    assert!(conga.is_done());
    assert_eq!(conga.engine().stats().generation, 9);
}
