//! Scoring engine for classical mah jongg rulesets.
//!
//! Hands are built from structured melds and bonus tiles, encoded into a
//! canonical string, and evaluated against rulesets whose rules are
//! written either as regular expressions over that string or as meld
//! pattern expressions. Two equivalent Classical Chinese rulesets ship
//! built in.

pub mod encode;
pub mod errors;
pub mod hand;
pub mod meld;
pub mod parser;
pub mod pattern;
pub mod predefined;
pub mod rule;
pub mod ruleset;
pub mod score;
mod tests;
pub mod tile;

pub use errors::{ScoreError, ScoreResult};
pub use hand::{Hand, HandContext, LastSource, WinContext};
pub use meld::{Meld, MeldShape, MeldState};
pub use rule::{Rule, RuleEffect, RuleRecord};
pub use ruleset::{Ruleset, RulesetParams};
pub use score::{score, ScoreBreakdown, ScoreOptions};
pub use tile::{Bonus, Dragon, Suit, Tile, Wind};
