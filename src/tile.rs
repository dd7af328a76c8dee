//! Tile vocabulary: suits, honors and bonus tiles.
//!
//! Every tile has a two-character code used throughout the canonical hand
//! representation: a group letter and a value character. The group letter
//! is written upper-case for a concealed tile and lower-case for an
//! exposed one; bonus tiles are always lower-case.

use crate::errors::{ScoreError, ScoreResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The four winds, used both as honor tiles and for seat/round context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Wind {
    #[default]
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Wind {
    pub const ALL: [Wind; 4] = [Wind::East, Wind::South, Wind::West, Wind::North];

    /// The value character in tile codes: e, s, w, n.
    pub fn as_char(self) -> char {
        match self {
            Wind::East => 'e',
            Wind::South => 's',
            Wind::West => 'w',
            Wind::North => 'n',
        }
    }

    pub fn from_char(c: char) -> Option<Wind> {
        match c {
            'e' => Some(Wind::East),
            's' => Some(Wind::South),
            'w' => Some(Wind::West),
            'n' => Some(Wind::North),
            _ => None,
        }
    }
}

/// The three dragons. The value characters follow the classical naming:
/// b (white), g (green), r (red).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dragon {
    White = 0,
    Green = 1,
    Red = 2,
}

impl Dragon {
    pub fn as_char(self) -> char {
        match self {
            Dragon::White => 'b',
            Dragon::Green => 'g',
            Dragon::Red => 'r',
        }
    }

    pub fn from_char(c: char) -> Option<Dragon> {
        match c {
            'b' => Some(Dragon::White),
            'g' => Some(Dragon::Green),
            'r' => Some(Dragon::Red),
            _ => None,
        }
    }
}

/// The three numbered suits. Group letters: s, b, c.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Stone = 0,
    Bamboo = 1,
    Character = 2,
}

impl Suit {
    pub const ALL: [Suit; 3] = [Suit::Stone, Suit::Bamboo, Suit::Character];

    pub fn letter(self) -> char {
        match self {
            Suit::Stone => 's',
            Suit::Bamboo => 'b',
            Suit::Character => 'c',
        }
    }
}

/// A single playing tile (bonus tiles are a separate type since they
/// never take part in melds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Suited { suit: Suit, value: u8 },
    Wind(Wind),
    Dragon(Dragon),
}

impl Tile {
    /// A suited tile; value must lie in 1..=9.
    pub fn suited(suit: Suit, value: u8) -> ScoreResult<Tile> {
        if !(1..=9).contains(&value) {
            return Err(ScoreError::Parse {
                input: format!("{}{}", suit.letter(), value),
                message: "suited tile value must be 1..9".to_string(),
            });
        }
        Ok(Tile::Suited { suit, value })
    }

    pub fn suit(self) -> Option<Suit> {
        match self {
            Tile::Suited { suit, .. } => Some(suit),
            _ => None,
        }
    }

    pub fn value(self) -> Option<u8> {
        match self {
            Tile::Suited { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_honour(self) -> bool {
        matches!(self, Tile::Wind(_) | Tile::Dragon(_))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Tile::Suited { value: 1 | 9, .. })
    }

    /// 2..8 of a suit.
    pub fn is_simple(self) -> bool {
        matches!(self, Tile::Suited { value: 2..=8, .. })
    }

    /// Green tiles: bamboo 2, 3, 4, 6, 8 and the green dragon.
    pub fn is_green(self) -> bool {
        match self {
            Tile::Suited {
                suit: Suit::Bamboo,
                value,
            } => matches!(value, 2 | 3 | 4 | 6 | 8),
            Tile::Dragon(Dragon::Green) => true,
            _ => false,
        }
    }

    /// Group letter of the code, always lower-case here.
    pub fn letter(self) -> char {
        match self {
            Tile::Dragon(_) => 'd',
            Tile::Wind(_) => 'w',
            Tile::Suited { suit, .. } => suit.letter(),
        }
    }

    /// Value character of the code.
    pub fn value_char(self) -> char {
        match self {
            Tile::Suited { value, .. } => (b'0' + value) as char,
            Tile::Wind(w) => w.as_char(),
            Tile::Dragon(d) => d.as_char(),
        }
    }

    /// Two-character code; the group letter is capitalized for a
    /// concealed tile.
    pub fn code(self, concealed: bool) -> String {
        let letter = if concealed {
            self.letter().to_ascii_uppercase()
        } else {
            self.letter()
        };
        let mut s = String::with_capacity(2);
        s.push(letter);
        s.push(self.value_char());
        s
    }

    /// Canonical group rank: dragons, winds, stone, bamboo, character.
    pub fn group_rank(self) -> u8 {
        match self {
            Tile::Dragon(_) => 0,
            Tile::Wind(_) => 1,
            Tile::Suited { suit, .. } => 2 + suit as u8,
        }
    }

    /// Rank within the group.
    pub fn value_rank(self) -> u8 {
        match self {
            Tile::Dragon(d) => d as u8,
            Tile::Wind(w) => w as u8,
            Tile::Suited { value, .. } => value,
        }
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.group_rank(), self.value_rank()).cmp(&(other.group_rank(), other.value_rank()))
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code(false))
    }
}

/// Flower or season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    Flower = 0,
    Season = 1,
}

/// A bonus tile. Bonus tiles belong to a wind and never meld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    pub wind: Wind,
}

impl Bonus {
    pub fn flower(wind: Wind) -> Bonus {
        Bonus {
            kind: BonusKind::Flower,
            wind,
        }
    }

    pub fn season(wind: Wind) -> Bonus {
        Bonus {
            kind: BonusKind::Season,
            wind,
        }
    }

    /// Two-character code: f/y plus the wind character.
    pub fn code(self) -> String {
        let letter = match self.kind {
            BonusKind::Flower => 'f',
            BonusKind::Season => 'y',
        };
        let mut s = String::with_capacity(2);
        s.push(letter);
        s.push(self.wind.as_char());
        s
    }

    pub fn sort_key(self) -> (u8, u8) {
        (self.kind as u8, self.wind as u8)
    }
}

impl Ord for Bonus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Bonus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
