//! Melds: structured tile groups with a shape and a concealment state.

use crate::errors::{ScoreError, ScoreResult};
use crate::tile::{Suit, Tile, Wind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The five meld shapes. The discriminant doubles as the shape digit in
/// summary codes, except for chow which encodes as 0 so that "no chow"
/// rules can key on a single character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldShape {
    Single,
    Pair,
    Chow,
    Pung,
    Kong,
}

impl MeldShape {
    /// Digit used in the summary section of the canonical encoding.
    pub fn digit(self) -> char {
        match self {
            MeldShape::Chow => '0',
            MeldShape::Single => '1',
            MeldShape::Pair => '2',
            MeldShape::Pung => '3',
            MeldShape::Kong => '4',
        }
    }

    /// Rank used for canonical meld ordering.
    pub fn rank(self) -> u8 {
        match self {
            MeldShape::Single => 0,
            MeldShape::Pair => 1,
            MeldShape::Chow => 2,
            MeldShape::Pung => 3,
            MeldShape::Kong => 4,
        }
    }
}

/// Concealment state. The two kong variants beyond plain exposure:
/// a declared kong comes entirely from the hand (it stays concealed for
/// scoring), a claimed kong was completed with another player's discard.
/// An exposed kong is a fourth self-drawn tile added to an exposed pung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldState {
    Concealed,
    Exposed,
    DeclaredKong,
    ClaimedKong,
}

/// An immutable tile group owned by exactly one hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meld {
    tiles: Vec<Tile>,
    shape: MeldShape,
    state: MeldState,
}

impl Meld {
    /// Builds a meld from its tiles, inferring the shape and checking
    /// that tile count and composition are consistent.
    pub fn new(mut tiles: Vec<Tile>, state: MeldState) -> ScoreResult<Meld> {
        tiles.sort();
        let shape = Self::infer_shape(&tiles)?;
        match state {
            MeldState::DeclaredKong | MeldState::ClaimedKong if shape != MeldShape::Kong => {
                return Err(ScoreError::Parse {
                    input: format!("{:?}", tiles),
                    message: "kong state on a non-kong meld".to_string(),
                });
            }
            MeldState::Concealed if shape == MeldShape::Kong => {
                return Err(ScoreError::Parse {
                    input: format!("{:?}", tiles),
                    message: "a concealed kong must use the DeclaredKong state".to_string(),
                });
            }
            _ => {}
        }
        Ok(Meld {
            tiles,
            shape,
            state,
        })
    }

    fn infer_shape(tiles: &[Tile]) -> ScoreResult<MeldShape> {
        let bad = |message: &str| ScoreError::Parse {
            input: format!("{:?}", tiles),
            message: message.to_string(),
        };
        match tiles.len() {
            1 => Ok(MeldShape::Single),
            2 if tiles[0] == tiles[1] => Ok(MeldShape::Pair),
            2 => Err(bad("a pair needs two identical tiles")),
            3 if tiles[0] == tiles[1] && tiles[1] == tiles[2] => Ok(MeldShape::Pung),
            3 => {
                let suit = tiles[0].suit().ok_or_else(|| bad("chow tiles must be suited"))?;
                let ok = tiles.iter().all(|t| t.suit() == Some(suit))
                    && tiles[1].value() == tiles[0].value().map(|v| v + 1)
                    && tiles[2].value() == tiles[0].value().map(|v| v + 2);
                if ok {
                    Ok(MeldShape::Chow)
                } else {
                    Err(bad("three tiles must form a pung or a chow"))
                }
            }
            4 if tiles.iter().all(|t| *t == tiles[0]) => Ok(MeldShape::Kong),
            4 => Err(bad("a kong needs four identical tiles")),
            n => Err(bad(&format!("invalid meld size {}", n))),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn shape(&self) -> MeldShape {
        self.shape
    }

    pub fn state(&self) -> MeldState {
        self.state
    }

    /// The lowest tile; for chows this is the starting tile.
    pub fn key_tile(&self) -> Tile {
        self.tiles[0]
    }

    pub fn suit(&self) -> Option<Suit> {
        self.key_tile().suit()
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.contains(&tile)
    }

    /// Whether the meld counts as concealed. A claimed kong normally does
    /// not; some limit rules relax that via `claimed_kong_ok`.
    pub fn is_concealed(&self, claimed_kong_ok: bool) -> bool {
        match self.state {
            MeldState::Concealed | MeldState::DeclaredKong => true,
            MeldState::ClaimedKong => claimed_kong_ok,
            MeldState::Exposed => false,
        }
    }

    /// Canonical ordering key: group, value, shape.
    pub fn sort_key(&self) -> (u8, u8, u8) {
        let key = self.key_tile();
        (key.group_rank(), key.value_rank(), self.shape.rank())
    }

    /// Classical Chinese base points for this meld. Pairs only score for
    /// dragons and the own or round wind; chows and singles never score.
    pub fn base_points(&self, own_wind: Wind, round_wind: Wind) -> u8 {
        let concealed = self.is_concealed(false);
        let major = self.key_tile().is_terminal() || self.key_tile().is_honour();
        match self.shape {
            MeldShape::Single | MeldShape::Chow => 0,
            MeldShape::Pair => match self.key_tile() {
                Tile::Dragon(_) => 2,
                Tile::Wind(w) if w == own_wind || w == round_wind => 2,
                _ => 0,
            },
            MeldShape::Pung => match (concealed, major) {
                (false, false) => 2,
                (false, true) => 4,
                (true, false) => 4,
                (true, true) => 8,
            },
            MeldShape::Kong => match (concealed, major) {
                (false, false) => 8,
                (false, true) => 16,
                (true, false) => 16,
                (true, true) => 32,
            },
        }
    }

    /// The meld token in the canonical hand string. Case encodes the
    /// concealment of each tile: a declared kong shows its outer tiles
    /// face down (lower case), an exposed kong keeps its self-drawn
    /// fourth tile concealed.
    pub fn token(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() * 2);
        for (i, tile) in self.tiles.iter().enumerate() {
            let concealed = match self.state {
                MeldState::Concealed => true,
                MeldState::ClaimedKong => false,
                MeldState::DeclaredKong => i == 1 || i == 2,
                MeldState::Exposed => self.shape == MeldShape::Kong && i == 3,
            };
            out.push_str(&tile.code(concealed));
        }
        out
    }

    /// The 4-character summary code: group letter (capitalized when the
    /// meld counts as concealed), shape digit, two-digit base points.
    pub fn summary_code(&self, own_wind: Wind, round_wind: Wind) -> String {
        let letter = if self.is_concealed(false) {
            self.key_tile().letter().to_ascii_uppercase()
        } else {
            self.key_tile().letter()
        };
        format!(
            "{}{}{:02}",
            letter,
            self.shape.digit(),
            self.base_points(own_wind, round_wind)
        )
    }
}

impl Ord for Meld {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Meld {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
