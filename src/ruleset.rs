//! Rulesets: named bundles of rules plus numeric parameters.
//!
//! Built-in rulesets live in an explicit registry table; `load` looks a
//! ruleset up by name and builds it fresh, so every definition string is
//! recompiled and validated on each load.

use crate::errors::{ScoreError, ScoreResult};
use crate::predefined;
use crate::rule::Rule;

/// Numeric knobs of a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesetParams {
    /// Minimum points (before doubles) a hand needs for a valid mah
    /// jongg claim.
    pub min_mj_points: i32,
    /// Score value of a limit hand.
    pub limit: i32,
}

impl Default for RulesetParams {
    fn default() -> Self {
        RulesetParams {
            min_mj_points: 0,
            limit: 500,
        }
    }
}

/// A complete ruleset. The five rule lists correspond to the five
/// evaluation categories of the scorer.
#[derive(Debug)]
pub struct Ruleset {
    name: String,
    description: String,
    pub(crate) penalty_rules: Vec<Rule>,
    pub(crate) hand_rules: Vec<Rule>,
    pub(crate) meld_rules: Vec<Rule>,
    pub(crate) mj_rules: Vec<Rule>,
    pub(crate) manual_rules: Vec<Rule>,
    params: RulesetParams,
}

impl Ruleset {
    pub(crate) fn new(name: &str, description: &str, params: RulesetParams) -> Ruleset {
        Ruleset {
            name: name.to_string(),
            description: description.to_string(),
            penalty_rules: Vec::new(),
            hand_rules: Vec::new(),
            meld_rules: Vec::new(),
            mj_rules: Vec::new(),
            manual_rules: Vec::new(),
            params,
        }
    }

    /// Builds a registered ruleset by name.
    pub fn load(name: &str) -> ScoreResult<Ruleset> {
        for (registered, build) in REGISTRY {
            if *registered == name {
                return build();
            }
        }
        Err(ScoreError::UnknownRuleset {
            name: name.to_string(),
        })
    }

    /// Names of all registered rulesets, in registry order.
    pub fn names() -> Vec<&'static str> {
        REGISTRY.iter().map(|(name, _)| *name).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> RulesetParams {
        self.params
    }

    pub fn penalty_rules(&self) -> &[Rule] {
        &self.penalty_rules
    }

    pub fn hand_rules(&self) -> &[Rule] {
        &self.hand_rules
    }

    pub fn meld_rules(&self) -> &[Rule] {
        &self.meld_rules
    }

    pub fn mj_rules(&self) -> &[Rule] {
        &self.mj_rules
    }

    pub fn manual_rules(&self) -> &[Rule] {
        &self.manual_rules
    }

    /// Finds a rule by name across all categories.
    pub fn find_rule(&self, name: &str) -> Option<&Rule> {
        self.penalty_rules
            .iter()
            .chain(&self.hand_rules)
            .chain(&self.meld_rules)
            .chain(&self.mj_rules)
            .chain(&self.manual_rules)
            .find(|rule| rule.name() == name)
    }
}

type Builder = fn() -> ScoreResult<Ruleset>;

static REGISTRY: &[(&str, Builder)] = &[
    (
        "Classical Chinese with Patterns",
        predefined::classical_chinese_pattern,
    ),
    (
        "Classical Chinese with Regular Expressions",
        predefined::classical_chinese_regex,
    ),
];
