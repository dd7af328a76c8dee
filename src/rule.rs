//! Rules: named score effects attached to hand or meld matchers.
//!
//! A rule is created from a definition string (see `parser` for the
//! segment syntax) plus exactly one effect. Definition problems surface
//! as `RuleDefinition` errors at ruleset build time; once built, a rule
//! can be matched any number of times without failing.

use crate::errors::{ScoreError, ScoreResult};
use crate::hand::Hand;
use crate::meld::Meld;
use crate::parser;
use crate::pattern::CompiledPattern;
use fancy_regex::Regex;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a matching rule contributes to the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RuleEffect {
    Points(i32),
    Doubles(u8),
    /// Fraction of the ruleset's limit, usually 1.0.
    Limit(f64),
}

impl fmt::Display for RuleEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleEffect::Points(p) => write!(f, "{} points", p),
            RuleEffect::Doubles(1) => write!(f, "1 double"),
            RuleEffect::Doubles(d) => write!(f, "{} doubles", d),
            RuleEffect::Limit(frac) => write!(f, "{} * limit", frac),
        }
    }
}

/// Payment options from `A` segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOptions {
    /// The rule's value stands alone; no other rules are added on top.
    pub absolute: bool,
    /// The offending player pays the winner's score for all players.
    pub pay_for_all: bool,
    pub payers: u8,
    pub payees: u8,
    /// Restricts the rule to hands whose winning tile came from one of
    /// these sources (source characters, see `LastSource::as_char`).
    pub last_source: Option<String>,
}

impl Default for RuleOptions {
    fn default() -> Self {
        RuleOptions {
            absolute: false,
            pay_for_all: false,
            payers: 1,
            payees: 1,
            last_source: None,
        }
    }
}

/// How one side of a penalty settles: every payer pays `amount` to every
/// payee, so the table stays zero-sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub payers: u8,
    pub payees: u8,
    /// Delta for each payer, always <= 0.
    pub payer_delta: i32,
    /// Delta for each payee, always >= 0.
    pub payee_delta: i32,
}

enum Matcher {
    Pattern(CompiledPattern),
    Regex(Regex),
}

impl Matcher {
    fn matches(&self, hand: &Hand, melds: &[Meld], encoded: &str) -> bool {
        match self {
            Matcher::Pattern(pattern) => pattern.matches(hand, melds),
            Matcher::Regex(regex) => match regex.is_match(encoded) {
                Ok(hit) => hit,
                Err(err) => {
                    // Backtracking limits can only trip on degenerate
                    // input; scoring treats that as a non-match.
                    debug!("regex {} failed on '{}': {}", regex.as_str(), encoded, err);
                    false
                }
            },
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Matcher::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
        }
    }
}

/// A scoring rule. Matches when any of its matchers does.
#[derive(Debug)]
pub struct Rule {
    name: String,
    matchers: Vec<Matcher>,
    effect: RuleEffect,
    options: RuleOptions,
}

impl Rule {
    pub fn new(name: &str, definition: &str, effect: RuleEffect) -> ScoreResult<Rule> {
        let named = |err: ScoreError| {
            let message = match err {
                ScoreError::Parse { message, .. } | ScoreError::RuleDefinition { message, .. } => {
                    message
                }
                other => other.to_string(),
            };
            ScoreError::RuleDefinition {
                rule: name.to_string(),
                message,
            }
        };
        let mut matchers = Vec::new();
        let mut options = RuleOptions::default();
        for segment in definition.split("||") {
            let mut chars = segment.chars();
            match chars.next() {
                None => continue,
                Some('P') => {
                    let pattern = parser::parse_pattern(chars.as_str()).map_err(named)?;
                    matchers.push(Matcher::Pattern(
                        CompiledPattern::compile(&pattern).map_err(named)?,
                    ));
                }
                Some('A') => {
                    options = parser::parse_options(chars.as_str()).map_err(named)?;
                }
                Some('I') => {
                    matchers.push(Matcher::Regex(compile_regex(name, chars.as_str(), true)?));
                }
                Some(_) => {
                    matchers.push(Matcher::Regex(compile_regex(name, segment, false)?));
                }
            }
        }
        Ok(Rule {
            name: name.to_string(),
            matchers,
            effect,
            options,
        })
    }

    pub fn points(name: &str, definition: &str, points: i32) -> ScoreResult<Rule> {
        Rule::new(name, definition, RuleEffect::Points(points))
    }

    pub fn doubles(name: &str, definition: &str, doubles: u8) -> ScoreResult<Rule> {
        Rule::new(name, definition, RuleEffect::Doubles(doubles))
    }

    pub fn limits(name: &str, definition: &str, fraction: f64) -> ScoreResult<Rule> {
        Rule::new(name, definition, RuleEffect::Limit(fraction))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effect(&self) -> RuleEffect {
        self.effect
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    fn source_allowed(&self, hand: &Hand) -> bool {
        match &self.options.last_source {
            None => true,
            Some(sources) => hand
                .win()
                .map_or(false, |w| sources.contains(w.source.as_char())),
        }
    }

    /// Whether the rule applies to the whole hand.
    pub fn matches(&self, hand: &Hand, encoded: &str) -> bool {
        self.source_allowed(hand)
            && self
                .matchers
                .iter()
                .any(|m| m.matches(hand, hand.melds(), encoded))
    }

    /// Whether the rule applies to a single meld of the hand.
    pub fn matches_meld(&self, hand: &Hand, meld: &Meld, encoded: &str) -> bool {
        self.source_allowed(hand)
            && self
                .matchers
                .iter()
                .any(|m| m.matches(hand, std::slice::from_ref(meld), encoded))
    }

    /// Settlement for a penalty of the given size under this rule's
    /// payer/payee counts.
    pub fn payment(&self, points: i32) -> Payment {
        let amount = points.abs();
        Payment {
            payers: self.options.payers,
            payees: self.options.payees,
            payer_delta: -amount * self.options.payees as i32,
            payee_delta: amount * self.options.payers as i32,
        }
    }
}

fn compile_regex(rule: &str, source: &str, case_insensitive: bool) -> ScoreResult<Regex> {
    let full = if case_insensitive {
        format!("(?i){}", source)
    } else {
        source.to_string()
    };
    Regex::new(&full).map_err(|err| ScoreError::RuleDefinition {
        rule: rule.to_string(),
        message: format!("bad regex '{}': {}", source, err),
    })
}

/// Serializable rule description for loading rule tables from JSON.
/// Exactly one of `points`, `doubles` and `limits` should be set; if
/// several are, the strongest kind wins (limit over doubles over
/// points), and a record with none scores zero points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub name: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doubles: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<f64>,
}

impl TryFrom<RuleRecord> for Rule {
    type Error = ScoreError;

    fn try_from(record: RuleRecord) -> ScoreResult<Rule> {
        let effect = if let Some(fraction) = record.limits {
            RuleEffect::Limit(fraction)
        } else if let Some(doubles) = record.doubles {
            RuleEffect::Doubles(doubles)
        } else {
            RuleEffect::Points(record.points.unwrap_or(0))
        };
        Rule::new(&record.name, &record.definition, effect)
    }
}
