// pattern.rs - Built-in patterns and RLE pattern files

use std::fs;
use std::iter::Peekable;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::Chars;

use thiserror::Error;

use crate::grid::Grid;
use crate::rule::{Rule, RuleError};

pub const MAX_SIDE: usize = 1 << 16;                  // rows or columns of one pattern
pub const MAX_CELLS: usize = 1 << 24;

pub struct PatternDef {
    pub name: &'static str,
    pub desc: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub rule: &'static str,
    pub rle: &'static str,
}

pub const PATTERN_DEFS: &[PatternDef] = &[
    PatternDef {
        name: "glider",
        desc: "Smallest moving pattern; moves diagonally",
        rows: 3, cols: 3, rule: "B3/S23",
        rle: "bob$2bo$3o!",
    },
    PatternDef {
        name: "blinker",
        desc: "Period 2 oscillator",
        rows: 1, cols: 3, rule: "B3/S23",
        rle: "3o!",
    },
    PatternDef {
        name: "toad",
        desc: "Period 2 oscillator",
        rows: 2, cols: 4, rule: "B3/S23",
        rle: "b3o$3o!",
    },
    PatternDef {
        name: "beacon",
        desc: "Period 2 oscillator made of two blocks",
        rows: 4, cols: 4, rule: "B3/S23",
        rle: "2o$2o$2b2o$2b2o!",
    },
    PatternDef {
        name: "pulsar",
        desc: "Period 3 oscillator",
        rows: 13, cols: 13, rule: "B3/S23",
        rle: "2b3o3b3o2$o4bobo4bo$o4bobo4bo$o4bobo4bo$2b3o3b3o2$2b3o3b3o$\
              o4bobo4bo$o4bobo4bo$o4bobo4bo2$2b3o3b3o!",
    },
    PatternDef {
        name: "r-pentomino",
        desc: "Methuselah that stabilizes after 1103 generations",
        rows: 3, cols: 3, rule: "B3/S23",
        rle: "b2o$2o$bo!",
    },
    PatternDef {
        name: "lwss",
        desc: "Lightweight spaceship; moves orthogonally",
        rows: 4, cols: 5, rule: "B3/S23",
        rle: "bo2bo$o4b$o3bo$4o!",
    },
    PatternDef {
        name: "diehard",
        desc: "Methuselah that vanishes after 130 generations",
        rows: 3, cols: 8, rule: "B3/S23",
        rle: "6bob$2o6b$bo3b3o!",
    },
    PatternDef {
        name: "acorn",
        desc: "Methuselah that takes 5206 generations to stabilize",
        rows: 3, cols: 7, rule: "B3/S23",
        rle: "bo5b$3bo3b$2o2b3o!",
    },
    PatternDef {
        name: "gosper-glider-gun",
        desc: "First known gun; emits a glider every 30 generations",
        rows: 9, cols: 36, rule: "B3/S23",
        rle: "24bo$22bobo$12b2o6b2o12b2o$11bo3bo4b2o12b2o$2o8bo5bo3b2o$\
              2o8bo3bob2o4bobo$10bo5bo7bo$11bo3bo$12b2o!",
    },
];

pub fn find_def(alias: &str) -> Option<&'static PatternDef> {
    PATTERN_DEFS.iter().find(|d| d.name.eq_ignore_ascii_case(alias))
}

pub fn alias_is_valid(alias: &str) -> bool {
    find_def(alias).is_some()
}

pub fn file_is_valid(path: impl AsRef<Path>) -> bool {
    Pattern::from_file(path).is_ok()
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown pattern '{0}'")]
    UnknownAlias(String),

    #[error("empty or truncated pattern")]
    Truncated,

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("invalid rule or alias '{rule}'")]
    InvalidRule {
        rule: String,
        #[source]
        source: RuleError,
    },

    #[error("count '{0}' misplaced")]
    MisplacedCount(usize),

    #[error("unexpected character '{0}' in pattern body")]
    UnexpectedCharacter(char),

    #[error("pattern has no columns")]
    NoColumns,

    #[error("pattern of {rows}x{cols} cells is too large (at most 65536 per side, 16777216 cells)")]
    TooLarge { rows: usize, cols: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternHeader {
    pub rows: usize,
    pub cols: usize,
    pub rule: Option<String>,
}

/// A decoded pattern: the header as written and a grid big enough for both
/// the header and the cells actually present in the body.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub header: PatternHeader,
    pub grid: Grid,
}

impl Pattern {
    /// Built-in alias first, then a file path.
    pub fn load(spec: &str) -> Result<Self, PatternError> {
        match find_def(spec) {
            Some(def) => Self::from_def(def),
            None => Self::from_file(spec),
        }
    }

    pub fn from_alias(alias: &str) -> Result<Self, PatternError> {
        let def = find_def(alias).ok_or_else(|| PatternError::UnknownAlias(alias.to_string()))?;
        Self::from_def(def)
    }

    pub fn from_def(def: &PatternDef) -> Result<Self, PatternError> {
        let header = PatternHeader {
            rows: def.rows,
            cols: def.cols,
            rule: Some(def.rule.to_string()),
        };
        Self::build(header, def.rle)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PatternError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let pattern = Self::from_rle(&text)?;
        log::info!(
            "loaded pattern '{}' ({}x{})",
            path.display(),
            pattern.grid.rows(),
            pattern.grid.cols()
        );
        Ok(pattern)
    }

    /// Decodes an RLE document: optional `#` comment lines, a
    /// `x = N, y = M[, rule = R]` header, then the run-length body.
    pub fn from_rle(text: &str) -> Result<Self, PatternError> {
        let (header, body) = split_header(text)?;
        let header = parse_header(header)?;
        Self::build(header, body)
    }

    fn build(header: PatternHeader, body: &str) -> Result<Self, PatternError> {
        if let Some(rule) = &header.rule {
            Rule::parse(rule).map_err(|source| PatternError::InvalidRule {
                rule: rule.clone(),
                source,
            })?;
        }

        let cells = parse_body(body)?;
        let rows = cells.rows.max(header.rows);
        let cols = cells.cols.max(header.cols);
        if cols == 0 {
            return Err(PatternError::NoColumns);
        }
        if rows > MAX_SIDE || cols > MAX_SIDE || rows.checked_mul(cols).is_none_or(|n| n > MAX_CELLS) {
            return Err(PatternError::TooLarge { rows, cols });
        }

        let mut grid = Grid::new(rows, cols);
        for (r, columns) in cells.runs {
            for c in columns {
                grid.set(r, c, true);
            }
        }

        Ok(Self { header, grid })
    }

    pub fn rule(&self) -> Option<&str> {
        self.header.rule.as_deref()
    }
}

fn split_header(text: &str) -> Result<(&str, &str), PatternError> {
    let mut rest = text;
    while let Some((line, tail)) = rest.split_once('\n') {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            if tail.trim().is_empty() {
                break;
            }
            return Ok((line, tail));
        }
        rest = tail;
    }
    Err(PatternError::Truncated)
}

fn parse_header(line: &str) -> Result<PatternHeader, PatternError> {
    let invalid = || PatternError::InvalidHeader(line.to_string());

    let mut rows = None;
    let mut cols = None;
    let mut rule = None;

    for field in line.split(',') {
        let (key, value) = field.split_once('=').ok_or_else(invalid)?;
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "x" => cols = Some(value.parse::<usize>().map_err(|_| invalid())?),
            "y" => rows = Some(value.parse::<usize>().map_err(|_| invalid())?),
            "rule" if !value.is_empty() => rule = Some(value.to_string()),
            _ => return Err(invalid()),
        }
    }

    match (rows, cols) {
        (Some(rows), Some(cols)) => Ok(PatternHeader { rows, cols, rule }),
        _ => Err(invalid()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RleToken {
    Count(usize),
    Dead,
    Alive,
    NewRow,
    End,
    Unknown(char),
}

struct RleLexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> RleLexer<'a> {
    fn new(body: &'a str) -> Self {
        Self { chars: body.chars().peekable() }
    }
}

impl Iterator for RleLexer<'_> {
    type Item = RleToken;

    fn next(&mut self) -> Option<RleToken> {
        loop {
            let c = self.chars.next()?;
            let token = match c {
                '0'..='9' => {
                    let mut count = c as usize - '0' as usize;
                    while let Some(d) = self.chars.peek().and_then(|d| d.to_digit(10)) {
                        count = count.saturating_mul(10).saturating_add(d as usize);
                        self.chars.next();
                    }
                    RleToken::Count(count)
                }
                'b' | 'B' => RleToken::Dead,
                'o' | 'O' => RleToken::Alive,
                '$' => RleToken::NewRow,
                '!' => RleToken::End,
                c if c.is_whitespace() => continue,
                c => RleToken::Unknown(c),
            };
            return Some(token);
        }
    }
}

/// Live runs as `(row, columns)`, one entry per `o` token.
struct BodyCells {
    runs: Vec<(usize, Range<usize>)>,
    rows: usize,
    cols: usize,
}

fn parse_body(body: &str) -> Result<BodyCells, PatternError> {
    let mut runs = Vec::new();
    let mut row = 0;
    let mut col = 0;
    let mut max_col = 0;
    let mut count = None;

    // Runs may only reach MAX_SIDE, so positions stay far from overflow.
    let advance = |pos: usize, run: usize, rows: usize| match pos.checked_add(run) {
        Some(end) if end <= MAX_SIDE => Ok(end),
        _ => Err(PatternError::TooLarge { rows, cols: pos.saturating_add(run) }),
    };

    for token in RleLexer::new(body) {
        match token {
            RleToken::Count(n) => count = Some(n),
            RleToken::Dead => col = advance(col, count.take().unwrap_or(1), row + 1)?,
            RleToken::Alive => {
                let end = advance(col, count.take().unwrap_or(1), row + 1)?;
                runs.push((row, col..end));
                col = end;
            }
            RleToken::NewRow => {
                let run = count.take().unwrap_or(1);
                row = match row.checked_add(run) {
                    Some(next) if next < MAX_SIDE => next,
                    _ => {
                        let rows = row.saturating_add(run).saturating_add(1);
                        return Err(PatternError::TooLarge { rows, cols: max_col.max(col) });
                    }
                };
                max_col = max_col.max(col);
                col = 0;
            }
            RleToken::End => {
                if let Some(n) = count.filter(|&n| n > 1) {
                    return Err(PatternError::MisplacedCount(n));
                }
                break;
            }
            RleToken::Unknown(c) => return Err(PatternError::UnexpectedCharacter(c)),
        }
    }

    Ok(BodyCells {
        runs,
        rows: row + 1,
        cols: max_col.max(col),
    })
}
