//! Canonical hand encoding.
//!
//! The encoder renders a hand as one line of space-separated sections:
//!
//! 1. meld tokens in canonical order (case marks concealment),
//! 2. bonus-tile tokens (flowers, then seasons),
//! 3. `/` followed by one 4-char summary code per meld
//!    (group letter, shape digit, two-digit base points),
//! 4. `%l` for a long hand,
//! 5. the declaration token: `M` (declared complete) or `m`, the own
//!    wind, the round wind, and the last-tile source character,
//! 6. `L` plus the winning tile code and the meld it completed.
//!
//! Example: `DrDrDr WeWeWe s1s2s3 B5B5 /D308W308s000B200 Mesw LB5B5B5`
//!
//! Regex rules match against this string; pattern rules work on the
//! meld structures directly but are written against the same order.

use crate::hand::Hand;
use crate::meld::Meld;

/// Renders the canonical hand string. Deterministic: hands that are
/// structurally equal encode identically because melds and bonus tiles
/// are kept sorted by the hand itself.
pub fn encode(hand: &Hand) -> String {
    let mut out = String::new();
    for meld in hand.melds() {
        out.push_str(&meld.token());
        out.push(' ');
    }
    for bonus in hand.bonus() {
        out.push_str(&bonus.code());
        out.push(' ');
    }
    out.push('/');
    for meld in hand.melds() {
        out.push_str(&meld.summary_code(hand.own_wind(), hand.round_wind()));
    }
    if hand.is_long() {
        out.push_str(" %l");
    }
    out.push(' ');
    out.push_str(&declaration_token(hand));
    if let Some(win) = hand.win() {
        out.push_str(" L");
        out.push_str(&win.tile.code(win.source.is_drawn()));
        out.push_str(&win.meld.token());
    }
    out
}

/// Per-meld string used by meld-category rules: the meld token, its
/// summary code, and the declaration token (so wind-dependent meld rules
/// can see the own and round winds).
pub fn encode_meld(hand: &Hand, meld: &Meld) -> String {
    format!(
        "{} /{} {}",
        meld.token(),
        meld.summary_code(hand.own_wind(), hand.round_wind()),
        declaration_token(hand)
    )
}

fn declaration_token(hand: &Hand) -> String {
    let mut out = String::with_capacity(4);
    out.push(if hand.declared_complete() { 'M' } else { 'm' });
    out.push(hand.own_wind().as_char());
    out.push(hand.round_wind().as_char());
    out.push(match hand.win() {
        Some(win) => win.source.as_char(),
        None => 'd',
    });
    out
}
