// render.rs - Grid display: viewport scrolling and the crossterm renderer

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::engine::GenerationStats;
use crate::grid::Grid;
use crate::rule::Rule;

const PANEL_WIDTH: u16 = 36;                          // side panel, frames included
const CELL_WIDTH: u16 = 2;                            // terminal columns per cell

/// Driver state shown next to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub rule: Rule,
    pub delay: Duration,
    pub paused: bool,
    pub cycling: bool,
}

pub trait Render {
    fn draw(&mut self, grid: &Grid, stats: GenerationStats, status: &Status) -> io::Result<()>;

    /// Re-reads the output size; the next draw repaints everything.
    fn force_resize(&mut self) -> io::Result<()>;

    /// Moves the visible window. Offsets are clamped to the grid on the next
    /// draw, so `isize::MAX` reaches the far edge.
    fn scroll(&mut self, rows: isize, cols: isize);
}

/// Visible part of the grid: top-left offset and size in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    pub fn scroll(&mut self, rows: isize, cols: isize) {
        self.top = self.top.saturating_add_signed(rows);
        self.left = self.left.saturating_add_signed(cols);
    }

    /// Sizes the window to what fits in `avail_rows` x `avail_cols` and pulls
    /// the offsets back inside the grid.
    pub fn fit(&mut self, grid: &Grid, avail_rows: usize, avail_cols: usize) {
        self.rows = grid.rows().min(avail_rows);
        self.cols = grid.cols().min(avail_cols);
        self.top = self.top.min(grid.rows() - self.rows);
        self.left = self.left.min(grid.cols() - self.cols);
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// Draws into any writer with crossterm commands: an outer frame, the grid
/// in an inner frame and a side panel with the statistics.
pub struct TerminalRender<W: Write> {
    out: W,
    width: u16,
    height: u16,
    viewport: Viewport,
}

impl TerminalRender<io::Stdout> {
    pub fn stdout() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(io::stdout(), width, height))
    }
}

impl<W: Write> TerminalRender<W> {
    pub fn with_size(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            width,
            height,
            viewport: Viewport::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn available(&self) -> (usize, usize) {
        let rows = self.height.saturating_sub(4);
        let cols = self.width.saturating_sub(PANEL_WIDTH + 4) / CELL_WIDTH;
        (rows as usize, cols as usize)
    }

    fn frame(&mut self, x: u16, y: u16, width: u16, height: u16, title: &str) -> io::Result<()> {
        if width < 2 || height < 2 {
            return Ok(());
        }

        let inner = width.saturating_sub(2) as usize;
        let horizontal = "─".repeat(inner);

        queue!(self.out, MoveTo(x, y), Print(format!("┌{horizontal}┐")))?;
        for row in 1..height.saturating_sub(1) {
            queue!(
                self.out,
                MoveTo(x, y + row),
                Print("│"),
                MoveTo(x + width - 1, y + row),
                Print("│")
            )?;
        }
        queue!(
            self.out,
            MoveTo(x, y + height - 1),
            Print(format!("└{horizontal}┘"))
        )?;

        if title.len() + 4 <= width as usize {
            queue!(self.out, MoveTo(x + 2, y), Print(title))?;
        }
        Ok(())
    }

    fn draw_cells(&mut self, grid: &Grid) -> io::Result<()> {
        let view = self.viewport;
        for r in 0..view.rows {
            queue!(self.out, MoveTo(2, 2 + r as u16))?;
            let row = &grid.row(view.top + r)[view.left..view.left + view.cols];
            for &alive in row {
                if alive {
                    queue!(self.out, PrintStyledContent("  ".reverse()))?;
                } else {
                    queue!(self.out, Print("  "))?;
                }
            }
        }
        Ok(())
    }

    fn draw_panel(&mut self, x: u16, stats: GenerationStats, status: &Status) -> io::Result<()> {
        let view = self.viewport;
        let lines = [
            format!("generation  {}", stats.generation),
            format!("alive       {}", stats.alive),
            format!("rule        {}", status.rule),
            format!("delay       {} ms", status.delay.as_millis()),
            format!("position    {},{}", view.top, view.left),
            String::new(),
            match (status.paused, status.cycling) {
                (true, true) => "[paused] [cycle]".to_string(),
                (true, false) => "[paused]".to_string(),
                (false, true) => "[cycle]".to_string(),
                (false, false) => String::new(),
            },
        ];

        let width = PANEL_WIDTH.saturating_sub(4) as usize;
        for (i, line) in lines.iter().enumerate() {
            queue!(
                self.out,
                MoveTo(x, 2 + i as u16),
                Print(format!("{line:<width$.width$}"))
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Render for TerminalRender<W> {
    fn draw(&mut self, grid: &Grid, stats: GenerationStats, status: &Status) -> io::Result<()> {
        let (avail_rows, avail_cols) = self.available();
        self.viewport.fit(grid, avail_rows, avail_cols);

        let title = format!("[conga {}]", env!("CARGO_PKG_VERSION"));
        self.frame(0, 0, self.width, self.height, &title)?;

        if self.viewport.is_empty() {
            queue!(self.out, MoveTo(2, 1), Print("terminal too small"))?;
            return self.out.flush();
        }

        let view = self.viewport;
        let inner_width = view.cols as u16 * CELL_WIDTH + 2;
        let inner_title = format!("[{},{}]", view.rows, view.cols);
        self.frame(1, 1, inner_width, view.rows as u16 + 2, &inner_title)?;
        self.draw_cells(grid)?;
        self.draw_panel(inner_width + 3, stats, status)?;

        self.out.flush()
    }

    fn force_resize(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        log::debug!("render area {width}x{height}");
        self.width = width;
        self.height = height;
        queue!(self.out, Clear(ClearType::All))
    }

    fn scroll(&mut self, rows: isize, cols: isize) {
        self.viewport.scroll(rows, cols);
    }
}

/// Puts the terminal in raw mode on the alternate screen with the cursor
/// hidden; dropping the guard restores it.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            log::warn!("failed to leave the alternate screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("failed to leave raw mode: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> Status {
        Status {
            rule: Rule::default(),
            delay: Duration::from_micros(500_000),
            paused: true,
            cycling: false,
        }
    }

    #[test]
    fn viewport_fits_and_clamps() {
        let grid = Grid::new(20, 30);
        let mut view = Viewport::default();

        view.fit(&grid, 10, 100);
        assert_eq!((view.rows, view.cols), (10, 30));

        view.scroll(isize::MAX, isize::MAX);
        view.fit(&grid, 10, 100);
        assert_eq!((view.top, view.left), (10, 0));

        view.scroll(-3, -1);
        view.fit(&grid, 10, 100);
        assert_eq!((view.top, view.left), (7, 0));

        view.scroll(isize::MIN, 0);
        assert_eq!(view.top, 0);
    }

    #[test]
    fn shrinking_the_window_keeps_offsets_inside() {
        let grid = Grid::new(50, 50);
        let mut view = Viewport::default();
        view.fit(&grid, 10, 10);
        view.scroll(40, 40);
        view.fit(&grid, 10, 10);
        assert_eq!((view.top, view.left), (40, 40));

        view.fit(&grid, 25, 20);
        assert_eq!((view.top, view.left), (25, 30));
    }

    #[test]
    fn draws_frames_and_panel() {
        let mut grid = Grid::new(5, 6);
        grid.set(2, 3, true);
        let stats = GenerationStats { alive: 1, generation: 42 };

        let mut render = TerminalRender::with_size(Vec::new(), 80, 24);
        render.draw(&grid, stats, &status()).unwrap();

        let text = String::from_utf8_lossy(render.output());
        assert!(text.contains(&format!("[conga {}]", env!("CARGO_PKG_VERSION"))));
        assert!(text.contains("[5,6]"));
        assert!(text.contains("generation  42"));
        assert!(text.contains("rule        B3/S23"));
        assert!(text.contains("delay       500 ms"));
        assert!(text.contains("[paused]"));
        assert_eq!(render.viewport(), Viewport { top: 0, left: 0, rows: 5, cols: 6 });
    }

    #[test]
    fn viewport_follows_the_terminal_size() {
        let grid = Grid::new(100, 100);
        let mut render = TerminalRender::with_size(Vec::new(), 80, 24);
        render.draw(&grid, GenerationStats::default(), &status()).unwrap();
        assert_eq!(render.viewport(), Viewport { top: 0, left: 0, rows: 20, cols: 20 });

        render.scroll(isize::MAX, 0);
        render.draw(&grid, GenerationStats::default(), &status()).unwrap();
        assert_eq!(render.viewport().top, 80);
    }

    #[test]
    fn tiny_terminal_draws_a_notice() {
        let grid = Grid::new(5, 5);
        let mut render = TerminalRender::with_size(Vec::new(), 30, 3);
        render.draw(&grid, GenerationStats::default(), &status()).unwrap();
        assert!(String::from_utf8_lossy(render.output()).contains("terminal too small"));
    }
}
