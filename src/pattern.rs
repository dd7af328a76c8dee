//! The pattern mini-language's internal representation and matcher.
//!
//! Both rule front ends (predicate expressions and, indirectly, the
//! regex importer for equivalence testing) lower to this one IR so the
//! matching semantics exist exactly once. A pattern is compiled into
//! disjunctive normal form: a set of alternative term sequences, where
//! every term either consumes melds from the hand's multiset or states a
//! hand-level condition. A sequence matches when its terms consume every
//! meld (the full-consumption contract; `Rest` soaks up leftovers).
//!
//! Matching backtracks over the meld multiset. With at most seven melds
//! per hand this is cheap and makes the result independent of the order
//! in which ambiguous splits are tried.

use crate::errors::{ScoreError, ScoreResult};
use crate::hand::Hand;
use crate::meld::{Meld, MeldShape};
use crate::tile::{Suit, Tile};

/// A predicate over one meld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeldFilter {
    Concealed,
    Exposed,
    Dragons,
    Winds,
    OwnWind,
    RoundWind,
    Honours,
    NoHonours,
    Simple,
    NoSimple,
    Terminals,
    Stone,
    Bamboo,
    Character,
    NoStone,
    NoBamboo,
    NoCharacter,
    AllGreen,
    Single,
    Pair,
    Chow,
    Pung,
    Kong,
    PungKong,
    NoChow,
    /// Starting value of a chow, or the tile value otherwise.
    Value(u8),
    /// Honor tile by value character: b/g/r for dragons, e/s/w/n for winds.
    HonourChar(char),
    /// All tiles are honors or belong to the given suit. Injected by
    /// `OneColor` scopes.
    SuitedIn(Suit),
}

impl MeldFilter {
    fn matches(&self, meld: &Meld, hand: &Hand, claimed_kong_ok: bool) -> bool {
        let key = meld.key_tile();
        match self {
            MeldFilter::Concealed => meld.is_concealed(claimed_kong_ok),
            MeldFilter::Exposed => !meld.is_concealed(claimed_kong_ok),
            MeldFilter::Dragons => matches!(key, Tile::Dragon(_)),
            MeldFilter::Winds => matches!(key, Tile::Wind(_)),
            MeldFilter::OwnWind => key == Tile::Wind(hand.own_wind()),
            MeldFilter::RoundWind => key == Tile::Wind(hand.round_wind()),
            MeldFilter::Honours => key.is_honour(),
            MeldFilter::NoHonours => !key.is_honour(),
            MeldFilter::Simple => meld.tiles().iter().all(|t| t.is_simple()),
            MeldFilter::NoSimple => meld
                .tiles()
                .iter()
                .all(|t| t.is_terminal() || t.is_honour()),
            MeldFilter::Terminals => meld.tiles().iter().all(|t| t.is_terminal()),
            MeldFilter::Stone => meld.suit() == Some(Suit::Stone),
            MeldFilter::Bamboo => meld.suit() == Some(Suit::Bamboo),
            MeldFilter::Character => meld.suit() == Some(Suit::Character),
            MeldFilter::NoStone => meld.suit() != Some(Suit::Stone),
            MeldFilter::NoBamboo => meld.suit() != Some(Suit::Bamboo),
            MeldFilter::NoCharacter => meld.suit() != Some(Suit::Character),
            MeldFilter::AllGreen => meld.tiles().iter().all(|t| t.is_green()),
            MeldFilter::Single => meld.shape() == MeldShape::Single,
            MeldFilter::Pair => meld.shape() == MeldShape::Pair,
            MeldFilter::Chow => meld.shape() == MeldShape::Chow,
            MeldFilter::Pung => meld.shape() == MeldShape::Pung,
            MeldFilter::Kong => meld.shape() == MeldShape::Kong,
            MeldFilter::PungKong => {
                matches!(meld.shape(), MeldShape::Pung | MeldShape::Kong)
            }
            MeldFilter::NoChow => meld.shape() != MeldShape::Chow,
            MeldFilter::Value(v) => key.value() == Some(*v),
            MeldFilter::HonourChar(c) => key.is_honour() && key.value_char() == *c,
            MeldFilter::SuitedIn(suit) => meld
                .tiles()
                .iter()
                .all(|t| t.is_honour() || t.suit() == Some(*suit)),
        }
    }
}

/// Surface IR produced by the expression parser. Wrapper nodes
/// (`Filtered`, `OneColor`, `ClaimedKongAsConcealed`) are eliminated
/// during compilation by pushing their effect down onto the terms they
/// scope over.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Alt(Vec<Pattern>),
    Seq(Vec<Pattern>),
    Repeat(Box<Pattern>, u8),
    /// Consume exactly one meld satisfying all filters.
    One(Vec<MeldFilter>),
    /// Consume every remaining meld satisfying all filters; at least one.
    AllMatching(Vec<MeldFilter>),
    /// Consume all remaining melds unconditionally.
    Rest,
    /// The hand is complete and declared; consumes all remaining melds,
    /// each of which must satisfy the filters scoped onto this term.
    MahJongg,
    LongHand,
    LastTileCompletes(Vec<MeldFilter>),
    LastTileOnlyPossible,
    Filtered(MeldFilter, Box<Pattern>),
    OneColor(Box<Pattern>),
    ClaimedKongAsConcealed(Box<Pattern>),
}

/// Filter conjunction attached to a consuming term.
#[derive(Debug, Clone, Default, PartialEq)]
struct TermFilter {
    items: Vec<MeldFilter>,
    claimed_kong_ok: bool,
}

impl TermFilter {
    fn new(items: Vec<MeldFilter>) -> Self {
        TermFilter {
            items,
            claimed_kong_ok: false,
        }
    }

    fn matches(&self, meld: &Meld, hand: &Hand) -> bool {
        self.items
            .iter()
            .all(|f| f.matches(meld, hand, self.claimed_kong_ok))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Term {
    /// Consume exactly n matching melds.
    Count(TermFilter, u8),
    /// Consume every remaining matching meld, at least one.
    AllMatching(TermFilter),
    Rest,
    MahJongg(TermFilter),
    LongHand,
    LastTileCompletes(TermFilter),
    LastTileOnlyPossible,
}

impl Term {
    fn filter_mut(&mut self) -> Option<&mut TermFilter> {
        match self {
            Term::Count(f, _)
            | Term::AllMatching(f)
            | Term::MahJongg(f)
            | Term::LastTileCompletes(f) => Some(f),
            _ => None,
        }
    }

    /// Whether the term takes melds from the multiset. Scoped filters
    /// only apply to consuming terms.
    fn consumes(&self) -> bool {
        matches!(
            self,
            Term::Count(..) | Term::AllMatching(_) | Term::MahJongg(_) | Term::Rest
        )
    }
}

/// A pattern compiled to disjunctive normal form.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPattern {
    branches: Vec<Vec<Term>>,
}

impl CompiledPattern {
    pub fn compile(pattern: &Pattern) -> ScoreResult<CompiledPattern> {
        Ok(CompiledPattern {
            branches: compile_dnf(pattern)?,
        })
    }

    /// Matches the pattern against a slice of melds (the whole hand for
    /// hand-level rules, a single meld for meld-level rules).
    pub fn matches(&self, hand: &Hand, melds: &[Meld]) -> bool {
        self.branches.iter().any(|terms| {
            let mut used = vec![false; melds.len()];
            match_terms(terms, hand, melds, &mut used)
        })
    }
}

fn bad(message: String) -> ScoreError {
    ScoreError::RuleDefinition {
        rule: String::new(),
        message,
    }
}

fn compile_dnf(pattern: &Pattern) -> ScoreResult<Vec<Vec<Term>>> {
    match pattern {
        Pattern::Alt(alts) => {
            let mut out = Vec::new();
            for alt in alts {
                out.extend(compile_dnf(alt)?);
            }
            Ok(out)
        }
        Pattern::Seq(items) => {
            let mut out: Vec<Vec<Term>> = vec![Vec::new()];
            for item in items {
                let child = compile_dnf(item)?;
                let mut next = Vec::with_capacity(out.len() * child.len());
                for prefix in &out {
                    for suffix in &child {
                        let mut branch = prefix.clone();
                        branch.extend(suffix.iter().cloned());
                        next.push(branch);
                    }
                }
                out = next;
            }
            Ok(out)
        }
        Pattern::Repeat(inner, n) => {
            let child = compile_dnf(inner)?;
            if child.len() != 1 || child[0].len() != 1 {
                return Err(bad("'*' needs a single meld predicate".to_string()));
            }
            match &child[0][0] {
                Term::Count(f, 1) | Term::AllMatching(f) => {
                    Ok(vec![vec![Term::Count(f.clone(), *n)]])
                }
                other => Err(bad(format!("'*' cannot repeat {:?}", other))),
            }
        }
        Pattern::One(filters) => Ok(vec![vec![Term::Count(TermFilter::new(filters.clone()), 1)]]),
        Pattern::AllMatching(filters) => {
            Ok(vec![vec![Term::AllMatching(TermFilter::new(filters.clone()))]])
        }
        Pattern::Rest => Ok(vec![vec![Term::Rest]]),
        Pattern::MahJongg => Ok(vec![vec![Term::MahJongg(TermFilter::default())]]),
        Pattern::LongHand => Ok(vec![vec![Term::LongHand]]),
        Pattern::LastTileCompletes(filters) => Ok(vec![vec![Term::LastTileCompletes(
            TermFilter::new(filters.clone()),
        )]]),
        Pattern::LastTileOnlyPossible => Ok(vec![vec![Term::LastTileOnlyPossible]]),
        Pattern::Filtered(filter, inner) => {
            let mut branches = compile_dnf(inner)?;
            for branch in &mut branches {
                for term in branch.iter_mut() {
                    if let Some(f) = term.filter_mut() {
                        f.items.push(filter.clone());
                    }
                }
            }
            Ok(branches)
        }
        Pattern::ClaimedKongAsConcealed(inner) => {
            let mut branches = compile_dnf(inner)?;
            for branch in &mut branches {
                for term in branch.iter_mut() {
                    if let Some(f) = term.filter_mut() {
                        f.claimed_kong_ok = true;
                    }
                }
            }
            Ok(branches)
        }
        Pattern::OneColor(inner) => {
            let child = compile_dnf(inner)?;
            let mut out = Vec::with_capacity(child.len() * Suit::ALL.len());
            for suit in Suit::ALL {
                for branch in &child {
                    let mut colored = branch.clone();
                    for term in colored.iter_mut() {
                        if term.consumes() {
                            if let Some(f) = term.filter_mut() {
                                f.items.push(MeldFilter::SuitedIn(suit));
                            }
                        }
                    }
                    out.push(colored);
                }
            }
            Ok(out)
        }
    }
}

fn match_terms(terms: &[Term], hand: &Hand, melds: &[Meld], used: &mut Vec<bool>) -> bool {
    let Some((term, rest)) = terms.split_first() else {
        return used.iter().all(|&u| u);
    };
    match term {
        Term::Count(filter, n) => match_count(filter, *n, 0, rest, hand, melds, used),
        Term::AllMatching(filter) => {
            let picked: Vec<usize> = (0..melds.len())
                .filter(|&i| !used[i] && filter.matches(&melds[i], hand))
                .collect();
            if picked.is_empty() {
                return false;
            }
            consume_and_continue(&picked, rest, hand, melds, used)
        }
        Term::Rest => {
            let picked: Vec<usize> = (0..melds.len()).filter(|&i| !used[i]).collect();
            consume_and_continue(&picked, rest, hand, melds, used)
        }
        Term::MahJongg(filter) => {
            if !hand.is_complete() || !hand.declared_complete() {
                return false;
            }
            let remaining: Vec<usize> = (0..melds.len()).filter(|&i| !used[i]).collect();
            if remaining.iter().any(|&i| !filter.matches(&melds[i], hand)) {
                return false;
            }
            consume_and_continue(&remaining, rest, hand, melds, used)
        }
        // The remaining terms are hand-level conditions; they do not
        // constrain the meld split, so they swallow whatever is left.
        Term::LongHand => hand.is_long() && consume_rest(rest, hand, melds, used),
        Term::LastTileCompletes(filter) => match hand.win() {
            Some(win) => {
                filter.matches(&win.meld, hand)
                    && win.meld.contains(win.tile)
                    && consume_rest(rest, hand, melds, used)
            }
            None => false,
        },
        Term::LastTileOnlyPossible => match hand.win() {
            Some(win) => {
                let only = match win.meld.shape() {
                    MeldShape::Pair => true,
                    MeldShape::Chow => win.meld.tiles()[1] == win.tile,
                    _ => false,
                };
                only && consume_rest(rest, hand, melds, used)
            }
            None => false,
        },
    }
}

fn consume_rest(rest: &[Term], hand: &Hand, melds: &[Meld], used: &mut Vec<bool>) -> bool {
    let picked: Vec<usize> = (0..melds.len()).filter(|&i| !used[i]).collect();
    consume_and_continue(&picked, rest, hand, melds, used)
}

fn consume_and_continue(
    picked: &[usize],
    rest: &[Term],
    hand: &Hand,
    melds: &[Meld],
    used: &mut Vec<bool>,
) -> bool {
    for &i in picked {
        used[i] = true;
    }
    if match_terms(rest, hand, melds, used) {
        return true;
    }
    for &i in picked {
        used[i] = false;
    }
    false
}

/// Picks combinations of n melds satisfying the filter, backtracking
/// into the remaining terms. Indices are chosen in increasing order so
/// each combination is tried once.
#[allow(clippy::too_many_arguments)]
fn match_count(
    filter: &TermFilter,
    n: u8,
    from: usize,
    rest: &[Term],
    hand: &Hand,
    melds: &[Meld],
    used: &mut Vec<bool>,
) -> bool {
    if n == 0 {
        return match_terms(rest, hand, melds, used);
    }
    for i in from..melds.len() {
        if !used[i] && filter.matches(&melds[i], hand) {
            used[i] = true;
            if match_count(filter, n - 1, i + 1, rest, hand, melds, used) {
                return true;
            }
            used[i] = false;
        }
    }
    false
}
