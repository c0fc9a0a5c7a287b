// app.rs - Driver: builds the first generation and reacts to queued events

use std::io;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::event::{Event, EventQueue};
use crate::grid::Grid;
use crate::input::{InputSource, Key};
use crate::pattern::Pattern;
use crate::render::{Render, Status};
use crate::rng::Rand48;
use crate::rule::Rule;
use crate::seed::{seed_from_subgrid, seed_random_generation};

pub const FPS: u32 = 60;
const DELAY_STEP: i64 = 50_000;                       // microseconds per +/- key

fn load_pattern(config: &Config) -> Result<Option<Pattern>> {
    if let Some(name) = &config.pattern {
        return Ok(Some(Pattern::from_alias(name)?));
    }
    if let Some(path) = &config.pattern_file {
        return Ok(Some(Pattern::from_file(path)?));
    }
    Ok(None)
}

/// Initial engine for `config`: a centered pattern on a grid large enough
/// for it, or a random generation from the configured seed.
///
/// A rule embedded in the pattern wins over `--rule`.
pub fn build_engine(config: &Config) -> Result<Engine> {
    let mut rule = config.parsed_rule()?;

    let grid = match load_pattern(config)? {
        Some(pattern) => {
            if let Some(embedded) = pattern.rule() {
                rule = Rule::parse(embedded)?;
            }
            let mut grid = Grid::new(
                config.rows.max(pattern.grid.rows()),
                config.cols.max(pattern.grid.cols()),
            );
            seed_from_subgrid(&mut grid, &pattern.grid);
            grid
        }
        None => {
            let mut grid = Grid::new(config.rows, config.cols);
            let mut rng = Rand48::new(config.seed);
            seed_random_generation(&mut grid, &mut rng, config.live_percent);
            grid
        }
    };

    log::info!(
        "starting {}x{} grid, {} alive, rule {rule}",
        grid.rows(),
        grid.cols(),
        grid.alive_count()
    );

    Ok(Engine::new(grid, rule))
}

pub struct Conga<I, R> {
    engine: Engine,
    queue: EventQueue<I>,
    render: R,
    stop_on_cycle: bool,
    done: bool,
}

impl<I: InputSource, R: Render> Conga<I, R> {
    pub fn new(engine: Engine, queue: EventQueue<I>, render: R, stop_on_cycle: bool) -> Self {
        Self {
            engine,
            queue,
            render,
            stop_on_cycle,
            done: false,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn queue(&self) -> &EventQueue<I> {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut EventQueue<I> {
        &mut self.queue
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_paused(&self) -> bool {
        self.queue.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.queue.pause(paused);
        log::debug!("{}", if paused { "paused" } else { "running" });
    }

    pub fn status(&self) -> Status {
        Status {
            rule: *self.engine.rule(),
            delay: self.queue.delay(),
            paused: self.queue.is_paused(),
            cycling: self.engine.is_cycling(),
        }
    }

    pub fn draw(&mut self) -> io::Result<()> {
        let status = self.status();
        self.render.draw(self.engine.grid(), self.engine.stats(), &status)
    }

    /// Draws once, then handles events until a quit.
    pub async fn run(&mut self) -> io::Result<()> {
        self.draw()?;
        while !self.done {
            let event = self.queue.wait_for_event().await;
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Runs `ticks` poll iterations without sleeping, handling every event
    /// they produce. Stops early on quit.
    pub fn pump(&mut self, ticks: usize) -> io::Result<()> {
        for _ in 0..ticks {
            if self.done {
                break;
            }
            self.queue.poll();
            while let Some(event) = self.queue.try_next_event() {
                self.handle_event(event)?;
                if self.done {
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Quit => {
                log::info!("quit after {} generations", self.engine.stats().generation);
                self.done = true;
                Ok(())
            }
            Event::Timer => {
                self.engine.step();
                if self.stop_on_cycle && self.engine.is_cycling() && !self.queue.is_paused() {
                    log::info!("generation {} repeats, pausing", self.engine.stats().generation);
                    self.set_paused(true);
                }
                self.draw()
            }
            Event::Winch => {
                self.render.force_resize()?;
                self.draw()
            }
            Event::Key(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: Key) -> io::Result<()> {
        let (rows, cols) = match key {
            Key::Char('q' | 'Q') => {
                self.done = true;
                return Ok(());
            }
            Key::Enter | Key::Char(' ') => {
                let paused = !self.queue.is_paused();
                self.set_paused(paused);
                return self.draw();
            }
            Key::Char('+') => {
                self.queue.add_delay(-DELAY_STEP);
                return self.draw();
            }
            Key::Char('-') => {
                self.queue.add_delay(DELAY_STEP);
                return self.draw();
            }
            Key::Up => (-1, 0),
            Key::Down => (1, 0),
            Key::Left => (0, -1),
            Key::Right => (0, 1),
            Key::Char('g') => (isize::MIN, 0),
            Key::Char('G') => (isize::MAX, 0),
            Key::Char('0') => (0, isize::MIN),
            Key::Char('$') => (0, isize::MAX),
            Key::Char('o') => (isize::MIN, isize::MIN),
            Key::Char('O') => (isize::MAX, isize::MAX),
            _ => return Ok(()),
        };

        self.render.scroll(rows, cols);
        self.draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GenerationStats;
    use crate::input::QueuedInput;
    use crate::signal::SignalFlags;
    use clap::Parser;
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingRender {
        draws: Vec<(GenerationStats, Status)>,
        resizes: usize,
        scrolls: Vec<(isize, isize)>,
    }

    impl Render for RecordingRender {
        fn draw(&mut self, _grid: &Grid, stats: GenerationStats, status: &Status) -> io::Result<()> {
            self.draws.push((stats, *status));
            Ok(())
        }

        fn force_resize(&mut self) -> io::Result<()> {
            self.resizes += 1;
            Ok(())
        }

        fn scroll(&mut self, rows: isize, cols: isize) {
            self.scrolls.push((rows, cols));
        }
    }

    fn config(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("conga").chain(args.iter().copied())).unwrap()
    }

    /// 50 ms per generation: the fourth poll at 60 fps fires the timer.
    fn conga(engine: Engine, keys: &[Key]) -> (Conga<QueuedInput, RecordingRender>, Arc<SignalFlags>) {
        let signals = SignalFlags::new();
        let input = keys.iter().copied().collect();
        let queue = EventQueue::new(FPS, Duration::from_micros(50_000), Arc::clone(&signals), input);
        (Conga::new(engine, queue, RecordingRender::default(), false), signals)
    }

    fn glider_engine() -> Engine {
        build_engine(&config(&["-P", "glider"])).unwrap()
    }

    #[test]
    fn random_start_uses_seed_and_fraction() {
        let engine = build_engine(&Config::default()).unwrap();
        assert_eq!(engine.stats(), GenerationStats { alive: 300, generation: 0 });
        assert_eq!((engine.grid().rows(), engine.grid().cols()), (20, 30));

        let again = build_engine(&Config::default()).unwrap();
        assert_eq!(engine.grid(), again.grid());
        let other = build_engine(&config(&["-s", "18"])).unwrap();
        assert_ne!(engine.grid(), other.grid());
    }

    #[test]
    fn pattern_is_centered() {
        let engine = glider_engine();
        let grid = engine.grid();
        let alive: Vec<_> = (0..grid.rows())
            .flat_map(|r| (0..grid.cols()).map(move |c| (r, c)))
            .filter(|&(r, c)| grid.get(r, c))
            .collect();
        assert_eq!(alive, vec![(8, 14), (9, 15), (10, 13), (10, 14), (10, 15)]);
    }

    #[test]
    fn grid_grows_to_fit_the_pattern() {
        let engine = build_engine(&config(&["-r", "5", "-c", "5", "-P", "gosper-glider-gun"])).unwrap();
        assert_eq!((engine.grid().rows(), engine.grid().cols()), (9, 36));
        assert_eq!(engine.stats().alive, 36);
    }

    #[test]
    fn embedded_rule_overrides_the_configured_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x = 3, y = 1, rule = highlife\n3o!\n").unwrap();
        let path = file.path().to_str().unwrap();

        let engine = build_engine(&config(&["-R", "seeds", "-f", path])).unwrap();
        assert_eq!(*engine.rule(), Rule::new("B36/S23"));
    }

    #[test]
    fn missing_pattern_file_is_an_error() {
        let result = build_engine(&config(&["-f", "/nonexistent/conga.rle"]));
        assert!(matches!(result, Err(crate::Error::Pattern(_))));
    }

    #[test]
    fn q_quits_before_any_step() {
        let (mut conga, _) = conga(glider_engine(), &[Key::Char('q'), Key::Char(' ')]);
        conga.pump(10).unwrap();
        assert!(conga.is_done());
        assert_eq!(conga.engine().stats().generation, 0);
        assert!(!conga.is_paused());
    }

    #[test]
    fn timer_steps_and_redraws() {
        let (mut conga, _) = conga(glider_engine(), &[]);
        conga.pump(3).unwrap();
        assert!(conga.render().draws.is_empty());

        conga.pump(1).unwrap();
        assert_eq!(conga.engine().stats().generation, 1);
        let (stats, status) = conga.render().draws[0];
        assert_eq!(stats, GenerationStats { alive: 5, generation: 1 });
        assert!(!status.paused);
    }

    #[test]
    fn space_pauses_and_enter_resumes() {
        let (mut conga, _) = conga(glider_engine(), &[Key::Char(' ')]);
        conga.pump(20).unwrap();
        assert!(conga.is_paused());
        assert_eq!(conga.engine().stats().generation, 0);
        assert!(conga.render().draws[0].1.paused);

        conga.queue_mut().input_mut().push(Key::Enter);
        conga.pump(1).unwrap();
        assert!(!conga.is_paused());
    }

    #[test]
    fn navigation_keys_scroll() {
        let keys = [Key::Up, Key::Right, Key::Char('G'), Key::Char('0'), Key::Char('o'), Key::Char('x')];
        let (mut conga, _) = conga(glider_engine(), &keys);
        conga.pump(6).unwrap();
        assert_eq!(
            conga.render().scrolls,
            vec![(-1, 0), (0, 1), (isize::MAX, 0), (0, isize::MIN), (isize::MIN, isize::MIN)]
        );
    }

    #[test]
    fn plus_and_minus_change_the_delay() {
        let (mut conga, _) = conga(glider_engine(), &[Key::Char('-'), Key::Char('-'), Key::Char('+')]);
        conga.pump(3).unwrap();
        assert_eq!(conga.queue().delay(), Duration::from_micros(100_000));
        assert_eq!(conga.status().delay, Duration::from_micros(100_000));
    }

    #[test]
    fn resize_and_quit_signals() {
        let (mut conga, signals) = conga(glider_engine(), &[]);
        signals.request_resize();
        conga.pump(1).unwrap();
        assert_eq!(conga.render().resizes, 1);
        assert_eq!(conga.render().draws.len(), 1);

        signals.request_quit();
        conga.pump(1).unwrap();
        assert!(conga.is_done());
    }

    #[test]
    fn stops_on_cycle_when_asked() {
        let mut grid = Grid::new(6, 6);
        for (r, c) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            grid.set(r, c, true);
        }
        let (conga_run, _) = conga(Engine::new(grid, Rule::default()), &[]);
        let mut conga = Conga { stop_on_cycle: true, ..conga_run };

        conga.pump(4).unwrap();
        assert_eq!(conga.engine().stats().generation, 1);
        assert!(conga.is_paused());
        assert!(conga.render().draws[0].1.cycling);

        conga.pump(100).unwrap();
        assert_eq!(conga.engine().stats().generation, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_steps_until_quit() {
        let (mut conga, signals) = conga(glider_engine(), &[]);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            signals.request_quit();
        });

        conga.run().await.unwrap();

        assert!(conga.is_done());
        let draws = &conga.render().draws;
        assert_eq!(draws[0].0.generation, 0);
        let generations = conga.engine().stats().generation;
        assert!((15..=21).contains(&generations), "{generations} generations");
    }
}
