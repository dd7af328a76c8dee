use std::fmt;

#[derive(Debug)]
pub enum ScoreError {
    /// Bad tile, meld or hand input.
    Parse { input: String, message: String },
    /// A rule definition failed to parse or compile. Raised while a
    /// ruleset is being built, never during scoring.
    RuleDefinition { rule: String, message: String },
    /// A mah jongg claim that is no valid winning hand. Distinct from a
    /// hand that simply scores zero.
    InvalidClaim { points: i32, required: i32, message: String },
    /// Ruleset name not present in the registry.
    UnknownRuleset { name: String },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
            ScoreError::RuleDefinition { rule, message } => {
                write!(f, "Bad rule definition '{}': {}", rule, message)
            }
            ScoreError::InvalidClaim {
                points,
                required,
                message,
            } => {
                write!(
                    f,
                    "Invalid mah jongg claim ({} points, {} required): {}",
                    points, required, message
                )
            }
            ScoreError::UnknownRuleset { name } => {
                write!(f, "Unknown ruleset: {}", name)
            }
        }
    }
}

impl std::error::Error for ScoreError {}

pub type ScoreResult<T> = Result<T, ScoreError>;
