//! The hand aggregate handed to the scorer: melds, bonus tiles and the
//! winning-tile context. A hand is built fresh for one scoring call and
//! never mutated afterwards.

use crate::errors::ScoreResult;
use crate::meld::{Meld, MeldShape};
use crate::tile::{Bonus, Tile, Wind};
use serde::{Deserialize, Serialize};

/// Where the tile completing the hand came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LastSource {
    Wall,
    Discard,
    DeadWall,
    LastOfWall,
    LastOfWallDiscarded,
    RobbedKong,
    /// Dealt in the very first tiles (blessing hands).
    FirstTile,
}

impl LastSource {
    /// Source character in the declaration token.
    pub fn as_char(self) -> char {
        match self {
            LastSource::Wall => 'w',
            LastSource::Discard => 'd',
            LastSource::DeadWall => 'e',
            LastSource::LastOfWall => 'z',
            LastSource::LastOfWallDiscarded => 'Z',
            LastSource::RobbedKong => 'k',
            LastSource::FirstTile => '1',
        }
    }

    /// True when the tile came off a wall into the player's own hand
    /// rather than being claimed from another player.
    pub fn is_drawn(self) -> bool {
        matches!(
            self,
            LastSource::Wall | LastSource::DeadWall | LastSource::LastOfWall | LastSource::FirstTile
        )
    }
}

/// The tile that completed the hand, the meld it completed, and where it
/// came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinContext {
    pub tile: Tile,
    pub meld: Meld,
    pub source: LastSource,
}

/// Context the caller supplies alongside melds and bonus tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandContext {
    pub own_wind: Wind,
    pub round_wind: Wind,
    pub win: Option<WinContext>,
    /// True when the player declared the hand complete.
    pub declared_complete: bool,
}

impl Default for HandContext {
    fn default() -> Self {
        Self {
            own_wind: Wind::East,
            round_wind: Wind::East,
            win: None,
            declared_complete: false,
        }
    }
}

/// A player's hand at scoring time. Melds and bonus tiles are kept in
/// canonical order so that structurally equal hands encode identically
/// no matter how the caller ordered its collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    melds: Vec<Meld>,
    bonus: Vec<Bonus>,
    ctx: HandContext,
    long_hand: bool,
}

impl Hand {
    pub fn new(mut melds: Vec<Meld>, mut bonus: Vec<Bonus>, ctx: HandContext) -> ScoreResult<Hand> {
        melds.sort();
        bonus.sort();
        let tile_count: usize = melds.iter().map(|m| m.tiles().len()).sum();
        let kongs = melds
            .iter()
            .filter(|m| m.shape() == MeldShape::Kong)
            .count();
        let long_hand = tile_count > 14 + kongs;
        Ok(Hand {
            melds,
            bonus,
            ctx,
            long_hand,
        })
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    pub fn bonus(&self) -> &[Bonus] {
        &self.bonus
    }

    pub fn own_wind(&self) -> Wind {
        self.ctx.own_wind
    }

    pub fn round_wind(&self) -> Wind {
        self.ctx.round_wind
    }

    pub fn win(&self) -> Option<&WinContext> {
        self.ctx.win.as_ref()
    }

    pub fn declared_complete(&self) -> bool {
        self.ctx.declared_complete
    }

    /// A hand holding more tiles than it may: such a hand can never win.
    pub fn is_long(&self) -> bool {
        self.long_hand
    }

    /// Structural completeness: four chows/pungs/kongs plus one pair.
    pub fn is_complete(&self) -> bool {
        let mut pairs = 0;
        let mut sets = 0;
        for meld in &self.melds {
            match meld.shape() {
                MeldShape::Single => return false,
                MeldShape::Pair => pairs += 1,
                MeldShape::Chow | MeldShape::Pung | MeldShape::Kong => sets += 1,
            }
        }
        pairs == 1 && sets == 4 && !self.long_hand
    }
}
