//! Hand evaluation: runs a ruleset's rule lists over a hand and
//! aggregates the matches into a score.
//!
//! Evaluation order: hand rules, then meld rules once per meld, then
//! mah jongg rules for a winning claim, then manual rules the caller
//! asked for by name. Penalty scoring is a separate path that only
//! looks at penalty rules.

use crate::encode::{encode, encode_meld};
use crate::errors::{ScoreError, ScoreResult};
use crate::hand::Hand;
use crate::rule::{Rule, RuleEffect};
use crate::ruleset::Ruleset;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caller-supplied switches for one scoring call.
#[derive(Debug, Clone, Default)]
pub struct ScoreOptions {
    /// The hand is being scored as a winning claim.
    pub is_mah_jongg: bool,
    /// Names of manual rules the players declared applicable. A manual
    /// rule still has to match the hand to count.
    pub manual_overrides: HashSet<String>,
    /// Score a penalty instead of a hand: only penalty rules named in
    /// `manual_overrides` are evaluated and their points summed.
    pub penalty: bool,
}

impl ScoreOptions {
    pub fn mah_jongg() -> ScoreOptions {
        ScoreOptions {
            is_mah_jongg: true,
            ..ScoreOptions::default()
        }
    }

    pub fn penalty(name: &str) -> ScoreOptions {
        ScoreOptions {
            penalty: true,
            manual_overrides: HashSet::from([name.to_string()]),
            ..ScoreOptions::default()
        }
    }

    pub fn with_manual(mut self, name: &str) -> ScoreOptions {
        self.manual_overrides.insert(name.to_string());
        self
    }
}

/// One rule that applied, with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub name: String,
    pub effect: RuleEffect,
    pub explanation: String,
}

/// The result of scoring a hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total_points: i32,
    pub total_doubles: u32,
    /// Highest limit fraction among the matches, if any matched.
    pub limit: Option<f64>,
    /// The final score: limit fraction times the ruleset limit, or
    /// points doubled `total_doubles` times.
    pub score: i32,
    pub matched: Vec<RuleMatch>,
}

/// Scores a hand under a ruleset.
///
/// For a winning claim (`is_mah_jongg`) the hand must be structurally
/// complete and reach the ruleset's minimum points, unless a limit rule
/// matched; otherwise an `InvalidClaim` error is returned. A losing hand
/// never errors, it just scores what it scores.
pub fn score(ruleset: &Ruleset, hand: &Hand, options: &ScoreOptions) -> ScoreResult<ScoreBreakdown> {
    if options.penalty {
        return Ok(score_penalty(ruleset, hand, options));
    }

    let encoded = encode(hand);
    debug!("scoring hand '{}'", encoded);
    let mut matched: Vec<RuleMatch> = Vec::new();

    for rule in ruleset.hand_rules() {
        if rule.matches(hand, &encoded) {
            matched.push(hand_match(rule));
        }
    }
    for meld in hand.melds() {
        let encoded_meld = encode_meld(hand, meld);
        for rule in ruleset.meld_rules() {
            if rule.matches_meld(hand, meld, &encoded_meld) {
                matched.push(RuleMatch {
                    name: rule.name().to_string(),
                    effect: rule.effect(),
                    explanation: format!("{} for {}", rule.effect(), meld.token()),
                });
            }
        }
    }
    if options.is_mah_jongg {
        for rule in ruleset.mj_rules() {
            if rule.matches(hand, &encoded) {
                matched.push(hand_match(rule));
            }
        }
    }
    for rule in ruleset.manual_rules() {
        if options.manual_overrides.contains(rule.name()) && rule.matches(hand, &encoded) {
            matched.push(hand_match(rule));
        }
    }

    // An absolute rule silences everything else.
    if let Some(abs) = matched
        .iter()
        .position(|m| absolute(ruleset, &m.name))
    {
        let only = matched.swap_remove(abs);
        let points = match only.effect {
            RuleEffect::Points(p) => p,
            _ => 0,
        };
        return Ok(ScoreBreakdown {
            total_points: points,
            total_doubles: 0,
            limit: None,
            score: points,
            matched: vec![only],
        });
    }

    let mut total_points: i32 = 0;
    let mut total_doubles: u32 = 0;
    let mut limit: Option<f64> = None;
    for m in &matched {
        match m.effect {
            RuleEffect::Points(p) => total_points += p,
            RuleEffect::Doubles(d) => total_doubles += d as u32,
            // Strictly greater, so the first of equals wins.
            RuleEffect::Limit(fraction) => {
                if limit.map_or(true, |current| fraction > current) {
                    limit = Some(fraction);
                }
            }
        }
    }

    let params = ruleset.params();
    if options.is_mah_jongg && limit.is_none() {
        if !hand.is_complete() {
            return Err(ScoreError::InvalidClaim {
                points: total_points,
                required: params.min_mj_points,
                message: "hand is not complete".to_string(),
            });
        }
        if total_points < params.min_mj_points {
            return Err(ScoreError::InvalidClaim {
                points: total_points,
                required: params.min_mj_points,
                message: "not enough points for mah jongg".to_string(),
            });
        }
    }

    let score = match limit {
        Some(fraction) => (fraction * params.limit as f64).round() as i32,
        None => total_points << total_doubles.min(30),
    };
    Ok(ScoreBreakdown {
        total_points,
        total_doubles,
        limit,
        score,
        matched,
    })
}

fn score_penalty(ruleset: &Ruleset, hand: &Hand, options: &ScoreOptions) -> ScoreBreakdown {
    let encoded = encode(hand);
    let mut matched = Vec::new();
    let mut total_points = 0;
    for rule in ruleset.penalty_rules() {
        if options.manual_overrides.contains(rule.name()) && rule.matches(hand, &encoded) {
            if let RuleEffect::Points(p) = rule.effect() {
                total_points += p;
            }
            matched.push(hand_match(rule));
        }
    }
    ScoreBreakdown {
        total_points,
        total_doubles: 0,
        limit: None,
        score: total_points,
        matched,
    }
}

fn hand_match(rule: &Rule) -> RuleMatch {
    RuleMatch {
        name: rule.name().to_string(),
        effect: rule.effect(),
        explanation: rule.effect().to_string(),
    }
}

fn absolute(ruleset: &Ruleset, name: &str) -> bool {
    ruleset
        .find_rule(name)
        .map_or(false, |rule| rule.options().absolute)
}
