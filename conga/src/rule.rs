// rule.rs - Birth/survival rule tables for two-state automata

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const STATES: usize = 2;                          // dead, alive
pub const NEIGHBORS: usize = 9;                       // neighbor counts 0..=8

type RuleTable = [[bool; NEIGHBORS]; STATES];

pub struct RuleAlias {
    pub name: &'static str,
    pub rule: &'static str,
}

pub const RULE_ALIASES: &[RuleAlias] = &[
    RuleAlias { name: "anneal",             rule: "B4678/S35678"  },
    RuleAlias { name: "conway",             rule: "B3/S23"        },
    RuleAlias { name: "day_and_night",      rule: "B3678/S34678"  },
    RuleAlias { name: "highlife",           rule: "B36/S23"       },
    RuleAlias { name: "life34",             rule: "B34/S34"       },
    RuleAlias { name: "life_without_death", rule: "B3/S012345678" },
    RuleAlias { name: "maze",               rule: "B3/S12345"     },
    RuleAlias { name: "mazectric",          rule: "B3/S1234"      },
    RuleAlias { name: "replicator",         rule: "B1357/S1357"   },
    RuleAlias { name: "seeds",              rule: "B2/S"          },
];

/// Resolves a case-insensitive alias such as `"HighLife"` to its B/S notation.
pub fn rule_from_alias(alias: &str) -> Option<&'static str> {
    RULE_ALIASES
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(alias))
        .map(|a| a.rule)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Birth,
    Survival,
}

impl Operator {
    fn row(self) -> usize {
        match self {
            Operator::Birth => 0,
            Operator::Survival => 1,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Birth => f.write_str("B"),
            Operator::Survival => f.write_str("S"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("operator '{operator}' at position {position} must follow a '/'")]
    UnexpectedOperator { operator: Operator, position: usize },

    #[error("operator '{0}' given more than once")]
    DuplicateOperator(Operator),

    #[error("separator at position {0} does not close an operator")]
    MisplacedSeparator(usize),

    #[error("digit at position {0} is not preceded by an operator")]
    DigitWithoutOperator(usize),

    #[error("neighbor count {0} is out of range 0..=8")]
    NeighborCountOutOfRange(u8),

    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("missing '{0}' operator")]
    MissingOperator(Operator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Operator(Operator),
    Separator,
    Digit(u8),
    Unknown(char),
}

fn tokenize(spec: &str) -> impl Iterator<Item = (usize, Token)> + '_ {
    spec.chars().enumerate().map(|(position, c)| {
        let token = match c.to_ascii_lowercase() {
            'b' => Token::Operator(Operator::Birth),
            's' => Token::Operator(Operator::Survival),
            '/' => Token::Separator,
            d @ '0'..='9' => Token::Digit(d as u8 - b'0'),
            _ => Token::Unknown(c),
        };
        (position, token)
    })
}

#[derive(Debug, Clone, Copy)]
enum ParseState {
    WaitingOperator,
    ReadingDigits(Operator),
}

fn parse_table(rule: &str) -> Result<RuleTable, RuleError> {
    let mut table = [[false; NEIGHBORS]; STATES];
    let mut seen = [false; STATES];
    let mut state = ParseState::WaitingOperator;

    for (position, token) in tokenize(rule) {
        state = match (state, token) {
            (ParseState::WaitingOperator, Token::Operator(operator)) => {
                if seen[operator.row()] {
                    return Err(RuleError::DuplicateOperator(operator));
                }
                seen[operator.row()] = true;
                ParseState::ReadingDigits(operator)
            }
            (ParseState::ReadingDigits(_), Token::Operator(operator)) => {
                return Err(RuleError::UnexpectedOperator { operator, position });
            }
            (ParseState::WaitingOperator, Token::Separator) => {
                return Err(RuleError::MisplacedSeparator(position));
            }
            (ParseState::ReadingDigits(_), Token::Separator) => ParseState::WaitingOperator,
            (ParseState::WaitingOperator, Token::Digit(_)) => {
                return Err(RuleError::DigitWithoutOperator(position));
            }
            (ParseState::ReadingDigits(operator), Token::Digit(n)) => {
                if n as usize >= NEIGHBORS {
                    return Err(RuleError::NeighborCountOutOfRange(n));
                }
                table[operator.row()][n as usize] = true;
                state
            }
            (_, Token::Unknown(character)) => {
                return Err(RuleError::InvalidCharacter { character, position });
            }
        };
    }

    for operator in [Operator::Birth, Operator::Survival] {
        if !seen[operator.row()] {
            return Err(RuleError::MissingOperator(operator));
        }
    }

    Ok(table)
}

/// Compiled birth/survival table indexed by `[alive][neighbors]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    table: RuleTable,
}

impl Rule {
    /// Parses an alias or `B<digits>/S<digits>` notation.
    pub fn parse(spec: &str) -> Result<Self, RuleError> {
        let rule = rule_from_alias(spec).unwrap_or(spec);
        parse_table(rule).map(|table| Self { table })
    }

    /// Builds a rule from a spec already checked with [`Rule::is_valid`].
    ///
    /// Panics on invalid input: callers validate user input first.
    pub fn new(spec: &str) -> Self {
        match Self::parse(spec) {
            Ok(rule) => rule,
            Err(e) => panic!("invalid rule '{spec}': {e}"),
        }
    }

    pub fn is_valid(spec: &str) -> bool {
        Self::parse(spec).is_ok()
    }

    pub fn next_state(&self, alive: bool, neighbors: usize) -> bool {
        assert!(neighbors < NEIGHBORS, "neighbor count {neighbors} is out of range 0..=8");
        self.table[alive as usize][neighbors]
    }

    pub fn births(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts(Operator::Birth)
    }

    pub fn survivals(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts(Operator::Survival)
    }

    fn counts(&self, operator: Operator) -> impl Iterator<Item = usize> + '_ {
        let row = &self.table[operator.row()];
        (0..NEIGHBORS).filter(move |&n| row[n])
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new("conway")
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for n in self.births() {
            write!(f, "{n}")?;
        }
        write!(f, "/S")?;
        for n in self.survivals() {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_classifies_every_character() {
        let tokens: Vec<Token> = tokenize("bS/01234X").map(|(_, t)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Operator(Operator::Birth),
                Token::Operator(Operator::Survival),
                Token::Separator,
                Token::Digit(0),
                Token::Digit(1),
                Token::Digit(2),
                Token::Digit(3),
                Token::Digit(4),
                Token::Unknown('X'),
            ]
        );
    }

    #[test]
    fn parses_conway_table() {
        let rule = Rule::new("B3/S23");
        assert!(rule.next_state(false, 3));
        assert!(!rule.next_state(false, 2));
        assert!(rule.next_state(true, 2));
        assert!(rule.next_state(true, 3));
        assert!(!rule.next_state(true, 4));
        assert!(!rule.next_state(true, 1));
    }

    #[test]
    fn operator_order_and_case_do_not_matter() {
        assert!(Rule::is_valid("B3/S23"));
        assert!(Rule::is_valid("s23/b3"));
        assert_eq!(Rule::new("B3/S23"), Rule::new("s23/b3"));
    }

    #[test]
    fn full_survival_with_birth_on_zero() {
        let rule = Rule::new("S012345678/B0");
        for n in 0..NEIGHBORS {
            assert!(rule.next_state(true, n));
        }
        assert!(rule.next_state(false, 0));
        assert!(!rule.next_state(false, 1));
    }

    #[test]
    fn empty_digit_sets_are_valid() {
        let rule = Rule::new("B/S");
        assert_eq!(rule.births().count(), 0);
        assert_eq!(rule.survivals().count(), 0);
    }

    #[test]
    fn repeated_digits_collapse_into_a_set() {
        assert_eq!(Rule::new("B33/S232"), Rule::new("B3/S23"));
    }

    #[test]
    fn rejects_malformed_rules() {
        for spec in ["B9/S23", "B3//S23", "B3B4/S23", "3/S23", "/B3S23", "B3/", "", "B3#S23", "B3S23", "23/3"] {
            assert!(!Rule::is_valid(spec), "'{spec}' should be rejected");
        }
    }

    #[test]
    fn reports_why_a_rule_is_rejected() {
        assert_eq!(Rule::parse("B9/S23"), Err(RuleError::NeighborCountOutOfRange(9)));
        assert_eq!(Rule::parse("B3//S23"), Err(RuleError::MisplacedSeparator(3)));
        assert_eq!(Rule::parse("B3/B4"), Err(RuleError::DuplicateOperator(Operator::Birth)));
        assert_eq!(Rule::parse("3/S23"), Err(RuleError::DigitWithoutOperator(0)));
        assert_eq!(Rule::parse(""), Err(RuleError::MissingOperator(Operator::Birth)));
        assert_eq!(Rule::parse("B3/"), Err(RuleError::MissingOperator(Operator::Survival)));
        assert_eq!(
            Rule::parse("B3S23"),
            Err(RuleError::UnexpectedOperator { operator: Operator::Survival, position: 2 })
        );
        assert_eq!(
            Rule::parse("B3#S23"),
            Err(RuleError::InvalidCharacter { character: '#', position: 2 })
        );
    }

    #[test]
    fn every_alias_resolves_to_a_valid_rule() {
        for alias in RULE_ALIASES {
            assert!(Rule::is_valid(alias.name), "alias {} is broken", alias.name);
            assert_eq!(Rule::new(alias.name), Rule::new(alias.rule));
        }
        assert!(rule_from_alias("ponga").is_none());
        assert_eq!(rule_from_alias("HighLife"), Some("B36/S23"));
    }

    #[test]
    fn displays_canonical_notation() {
        assert_eq!(Rule::new("s32/b3").to_string(), "B3/S23");
        assert_eq!(Rule::new("seeds").to_string(), "B2/S");
        assert_eq!("day_and_night".parse::<Rule>().map(|r| r.to_string()), Ok("B3678/S34678".to_string()));
    }

    #[test]
    #[should_panic(expected = "invalid rule")]
    fn new_panics_on_invalid_spec() {
        Rule::new("B9/S23");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn next_state_panics_on_nine_neighbors() {
        Rule::default().next_state(true, 9);
    }
}
