//! The two built-in Classical Chinese rulesets.
//!
//! Both award the same scores; they differ in how rules are written.
//! The pattern ruleset expresses rules as meld predicates wherever the
//! pattern language can say them, the regex ruleset matches the
//! canonical hand string throughout. Rules neither language can express
//! alone are shared: bonus tiles and declaration-token tests stay
//! regexes in both, the claimed-kong concealment exemptions stay
//! patterns in both.

use crate::errors::ScoreResult;
use crate::rule::Rule;
use crate::ruleset::{Ruleset, RulesetParams};

const PARAMS: RulesetParams = RulesetParams {
    min_mj_points: 0,
    limit: 500,
};

// --- rules shared by both rulesets ---------------------------------------

fn penalties() -> ScoreResult<Vec<Rule>> {
    Ok(vec![
        Rule::points("False Naming of Discard, Claimed for Chow", " m", -50)?,
        Rule::points("False Naming of Discard, Claimed for Pung/Kong", " m", -100)?,
        Rule::points(
            "False Naming of Discard, Claimed for Mah Jongg",
            " m||Aabsolute payees=3",
            -300,
        )?,
        Rule::points(
            "False Naming of Discard, Claimed for Mah Jongg and False Declaration of Mah Jongg",
            " m||Aabsolute payers=2 payees=2",
            -300,
        )?,
        Rule::points(
            "False Declaration of Mah Jongg by One Player",
            " m||Aabsolute payees=3",
            -300,
        )?,
        Rule::points(
            "False Declaration of Mah Jongg by Two Players",
            " m||Aabsolute payers=2 payees=2",
            -300,
        )?,
        Rule::points(
            "False Declaration of Mah Jongg by Three Players",
            " m||Aabsolute payers=3",
            -300,
        )?,
    ])
}

/// Bonus-tile rules. Patterns never see bonus tiles, so these are
/// regexes in both rulesets.
fn bonus_rules() -> ScoreResult<Vec<Rule>> {
    Ok(vec![
        Rule::doubles("Own Flower and Own Season", r"I.* f(.).* y\1 .* m\1", 1)?,
        Rule::doubles("All Flowers", r"I.*( f[eswn]){4}", 1)?,
        Rule::doubles("All Seasons", r"I.*( y[eswn]){4}", 1)?,
        Rule::points("Flower 1", r" fe ", 4)?,
        Rule::points("Flower 2", r" fs ", 4)?,
        Rule::points("Flower 3", r" fw ", 4)?,
        Rule::points("Flower 4", r" fn ", 4)?,
        Rule::points("Season 1", r" ye ", 4)?,
        Rule::points("Season 2", r" ys ", 4)?,
        Rule::points("Season 3", r" yw ", 4)?,
        Rule::points("Season 4", r" yn ", 4)?,
    ])
}

/// Manual limit hands that depend on table context the encoding cannot
/// carry on its own. Identical in both rulesets.
fn manual_limit_rules() -> ScoreResult<Vec<Rule>> {
    Ok(vec![
        Rule::limits("Blessing of Heaven", r" Me.1", 1.0)?,
        Rule::limits("Blessing of Earth", r" M[swn].1", 1.0)?,
        Rule::limits(
            "Twofold Fortune",
            r"I.*/((.\d\d\d)*?.4\d\d){2}.* M..e.* L[A-Z]",
            1.0,
        )?,
    ])
}

/// Limit hands keyed entirely off the winning-tile section of the
/// declaration; the scorer detects them without a player override.
/// Identical in both rulesets.
fn last_tile_limit_rules() -> ScoreResult<Vec<Rule>> {
    Ok(vec![
        Rule::limits("Gathering the Plum Blossom from the Roof", r" M..e.* LS5", 1.0)?,
        Rule::limits("Plucking the Moon from the Bottom of the Sea", r" M..z.* LS1", 1.0)?,
        Rule::limits("Scratching a Carrying Pole", r" M..k.* Lb2", 1.0)?,
    ])
}

// --- Classical Chinese with Regular Expressions --------------------------

pub fn classical_chinese_regex() -> ScoreResult<Ruleset> {
    let mut rs = Ruleset::new(
        "Classical Chinese with Regular Expressions",
        "Classical Chinese as played in the 1920s, \
         with all rules given as regular expressions over the canonical hand string.",
        PARAMS,
    );
    rs.penalty_rules = penalties()?;

    rs.meld_rules = vec![
        Rule::doubles("Pung/Kong of Dragons", r"I^(d([brg]))(d\2){2,3} /d[34]", 1)?,
        Rule::doubles(
            "Pung/Kong of Own Wind",
            r"I^(w([eswn]))(w\2){2,3} /w[34]\d\d m\2",
            1,
        )?,
        Rule::doubles(
            "Pung/Kong of Round Wind",
            r"I^(w([eswn]))(w\2){2,3} /w[34]\d\d m.\2",
            1,
        )?,
        Rule::points("Exposed Kong", r"^([sbc])([2-8])\1\2\1\2.\2\b", 8)?,
        Rule::points("Exposed Kong of Terminals", r"^([sbc])([19])\1\2\1\2.\2\b", 16)?,
        Rule::points(
            "Exposed Kong of Honours",
            r"^([dw])([brgeswn])\1\2\1\2.\2\b",
            16,
        )?,
        Rule::points("Exposed Pung", r"^([sbc][2-8])\1\1\b", 2)?,
        Rule::points("Exposed Pung of Terminals", r"^([sbc][19])\1\1\b", 4)?,
        Rule::points("Exposed Pung of Honours", r"^(d[brg]|w[eswn])\1\1\b", 4)?,
        Rule::points("Concealed Kong", r"^([sbc])([2-8])([SBC]\2){2}\1\2\b", 16)?,
        Rule::points(
            "Concealed Kong of Terminals",
            r"^([sbc])([19])([SBC]\2){2}\1\2\b",
            32,
        )?,
        Rule::points(
            "Concealed Kong of Honours",
            r"^([dw])([brgeswn])([DW]\2){2}\1\2\b",
            32,
        )?,
        Rule::points("Concealed Pung", r"^([SBC][2-8])\1\1\b", 4)?,
        Rule::points("Concealed Pung of Terminals", r"^([SBC][19])\1\1\b", 8)?,
        Rule::points("Concealed Pung of Honours", r"^(D[brg]|W[eswn])\1\1\b", 8)?,
        Rule::points("Pair of Own Wind", r"I^(w([eswn]))w\2 .* m\2", 2)?,
        Rule::points("Pair of Round Wind", r"I^(w([eswn]))w\2 .* m.\2", 2)?,
        Rule::points("Pair of Dragons", r"I^(d([brg]))d\2\b", 2)?,
    ];

    rs.hand_rules = vec![
        Rule::doubles(
            "Three Concealed Pongs",
            r".*/((.\d\d\d)*?[DWSBC][34]\d\d){3}",
            1,
        )?,
        // The lazy (d.\d\d)*? fills step over other dragon melds sorted
        // between the ones the rule is counting.
        Rule::doubles(
            "Little Three Dragons",
            r"I.*/(d.\d\d)*?(d2\d\d(d.\d\d)*?d[34]\d\d(d.\d\d)*?d[34]\d\d|d[34]\d\d(d.\d\d)*?d2\d\d(d.\d\d)*?d[34]\d\d|d[34]\d\d(d.\d\d)*?d[34]\d\d(d.\d\d)*?d2\d\d)",
            1,
        )?,
        Rule::doubles("Big Three Dragons", r"I.*/((d.\d\d)*?d[34]\d\d){3}", 2)?,
        Rule::doubles(
            "Little Four Joys",
            r"I.*/(.\d\d\d)*(w2\d\d(w[34]\d\d){3}|w[34]\d\dw2\d\d(w[34]\d\d){2}|(w[34]\d\d){2}w2\d\dw[34]\d\d|(w[34]\d\d){3}w2\d\d)",
            1,
        )?,
        Rule::doubles("Big Four Joys", r"I.*/(.\d\d\d)*?((w.\d\d)*?w[34]\d\d){4}", 2)?,
        Rule::points("Long Hand", " %l||Aabsolute", 0)?,
    ];
    rs.hand_rules.extend(bonus_rules()?);

    rs.mj_rules = vec![
        Rule::points("Mah Jongg", r" M", 20)?,
        Rule::points("Last Tile Completes Pair of 2..8", r" L(.[2-8])\1\1\b", 2)?,
        Rule::points(
            "Last Tile Completes Pair of Terminals or Honours",
            r" L((.[19])|([dwDW].))\1\1\b",
            4,
        )?,
        // Branch one: the winning tile fills a pair. Branch two: it is
        // the middle tile of a chow; the lookahead rules pungs out.
        Rule::points(
            "Last Tile is Only Possible Tile",
            r" M.* L((..)\2\2|(..)..\3(?!\3)..)\b",
            4,
        )?,
        Rule::points("Won with Last Tile Taken from Wall", r" M.* L[A-Z]", 2)?,
        Rule::doubles("Zero Point Hand", r"I.*/(.\d00)+ ", 1)?,
        Rule::doubles("No Chow", r"I.*/(.[^0]\d\d)+ ", 1)?,
        Rule::doubles("Only Concealed Melds", r".*/([DWSBC]\d\d\d)+ ", 1)?,
        // Spelled out per suit: a backreference to the suit letter would
        // stay case-sensitive under (?i) and miss mixed-case summaries.
        Rule::doubles(
            "False Color Game",
            r"I.*/([dw]\d\d\d)+(s\d\d\d)+ |.*/([dw]\d\d\d)+(b\d\d\d)+ |.*/([dw]\d\d\d)+(c\d\d\d)+ ",
            1,
        )?,
        Rule::doubles(
            "True Color Game",
            r"I.*/(s\d\d\d)+ |.*/(b\d\d\d)+ |.*/(c\d\d\d)+ ",
            3,
        )?,
        Rule::doubles(
            "Only Terminals and Honours",
            r"I^((((d|w).)|(.[19])){1,4} )+[fy/]",
            1,
        )?,
        Rule::doubles("Only Honours", r"I.*/([dw]\d\d\d)+ ", 2)?,
        Rule::limits("All Honours", r".*/([DWdw]\d\d\d)+ ", 1.0)?,
        Rule::limits("All Terminals", r"^((.[19]){1,4} )+[fy/]", 1.0)?,
        Rule::limits(
            "Concealed True Color Game",
            r"^((?i:s[1-9])+ )+[fy/].*/([SBC]\d\d\d)+ |^((?i:b[1-9])+ )+[fy/].*/([SBC]\d\d\d)+ |^((?i:c[1-9])+ )+[fy/].*/([SBC]\d\d\d)+ ",
            1.0,
        )?,
        Rule::limits(
            "Hidden Treasure",
            "PConcealed(ClaimedKongAsConcealed(PungKong()*4+Pair()))||Alastsource=wez1",
            1.0,
        )?,
        Rule::limits("Fourfold Plenty", r"I.*/((.\d\d\d)*?.4\d\d){4}", 1.0)?,
        Rule::limits("Three Great Scholars", r"I.*/((d.\d\d)*?d[34]\d\d){3}", 1.0)?,
        Rule::limits(
            "Four Blessings Hovering Over the Door",
            r"I.*/(.\d\d\d)*?((w.\d\d)*?w[34]\d\d){4}",
            1.0,
        )?,
        Rule::limits("All Greens", r"I^((b[23468]|dg)+ )+[fy/]", 1.0)?,
        // The optional lower-case token is the winning tile, a single
        // that sorts among the concealed groups by value.
        Rule::limits(
            "Nine Gates",
            "^(s. )?S1S1S1 (s. )?S2S3S4 (s. )?S5S6S7 (s. )?S8 (s. )?S9S9S9 [fy/]\
             |^(b. )?B1B1B1 (b. )?B2B3B4 (b. )?B5B6B7 (b. )?B8 (b. )?B9B9B9 [fy/]\
             |^(c. )?C1C1C1 (c. )?C2C3C4 (c. )?C5C6C7 (c. )?C8 (c. )?C9C9C9 [fy/]",
            1.0,
        )?,
        Rule::limits(
            "Winding Snake",
            "I^(s1){3,4} s2s2 s3s4s5 s6s7s8 (s9){3,4} [fy/]\
             |^(s1){3,4} s2s3s4 s5s5 s6s7s8 (s9){3,4} [fy/]\
             |^(s1){3,4} s2s3s4 s5s6s7 s8s8 (s9){3,4} [fy/]\
             |^(b1){3,4} b2b2 b3b4b5 b6b7b8 (b9){3,4} [fy/]\
             |^(b1){3,4} b2b3b4 b5b5 b6b7b8 (b9){3,4} [fy/]\
             |^(b1){3,4} b2b3b4 b5b6b7 b8b8 (b9){3,4} [fy/]\
             |^(c1){3,4} c2c2 c3c4c5 c6c7c8 (c9){3,4} [fy/]\
             |^(c1){3,4} c2c3c4 c5c5 c6c7c8 (c9){3,4} [fy/]\
             |^(c1){3,4} c2c3c4 c5c6c7 c8c8 (c9){3,4} [fy/]",
            1.0,
        )?,
        Rule::limits(
            "Thirteen Orphans",
            r"I^(db ?){1,2}(dg ?){1,2}(dr ?){1,2}(we ?){1,2}(ws ?){1,2}(ww ?){1,2}(wn ?){1,2}(s1 ?){1,2}(s9 ?){1,2}(b1 ?){1,2}(b9 ?){1,2}(c1 ?){1,2}(c9 ?){1,2}[fy/]",
            1.0,
        )?,
    ];
    rs.mj_rules.extend(last_tile_limit_rules()?);

    rs.manual_rules = vec![
        Rule::doubles("Last Tile Taken from Dead Wall", r" M..e.* L[A-Z]", 1)?,
        Rule::doubles("Last Tile is Last Tile of Wall", r" M..z.* L[A-Z]", 1)?,
        Rule::doubles(
            "Last Tile is Last Tile of Wall Discarded",
            r" M..Z.* L[a-z]",
            1,
        )?,
        Rule::doubles("Robbing the Kong", r" M..k", 1)?,
        Rule::doubles("Mah Jongg with Call at Beginning", r" M", 1)?,
        Rule::points("Dangerous Game", " m||Apayforall", 0)?,
    ];
    rs.manual_rules.extend(manual_limit_rules()?);

    Ok(rs)
}

// --- Classical Chinese with Patterns -------------------------------------

pub fn classical_chinese_pattern() -> ScoreResult<Ruleset> {
    let mut rs = Ruleset::new(
        "Classical Chinese with Patterns",
        "Classical Chinese as played in the 1920s, \
         with rules written as meld predicates where the pattern language can express them.",
        PARAMS,
    );
    rs.penalty_rules = penalties()?;

    rs.meld_rules = vec![
        Rule::doubles("Pung/Kong of Dragons", "PDragons(PungKong)", 1)?,
        Rule::doubles("Pung/Kong of Own Wind", "POwnWind(PungKong)", 1)?,
        Rule::doubles("Pung/Kong of Round Wind", "PRoundWind(PungKong)", 1)?,
        Rule::points("Exposed Kong", "PExposed(Kong(Simple))", 8)?,
        Rule::points("Exposed Kong of Terminals", "PExposed(Kong(Terminals))", 16)?,
        Rule::points("Exposed Kong of Honours", "PExposed(Kong(Honours))", 16)?,
        Rule::points("Exposed Pung", "PExposed(Pung(Simple))", 2)?,
        Rule::points("Exposed Pung of Terminals", "PExposed(Pung(Terminals))", 4)?,
        Rule::points("Exposed Pung of Honours", "PExposed(Pung(Honours))", 4)?,
        Rule::points("Concealed Kong", "PConcealed(Kong(Simple))", 16)?,
        Rule::points("Concealed Kong of Terminals", "PConcealed(Kong(Terminals))", 32)?,
        Rule::points("Concealed Kong of Honours", "PConcealed(Kong(Honours))", 32)?,
        Rule::points("Concealed Pung", "PConcealed(Pung(Simple))", 4)?,
        Rule::points("Concealed Pung of Terminals", "PConcealed(Pung(Terminals))", 8)?,
        Rule::points("Concealed Pung of Honours", "PConcealed(Pung(Honours))", 8)?,
        Rule::points("Pair of Own Wind", "POwnWind(Pair)", 2)?,
        Rule::points("Pair of Round Wind", "PRoundWind(Pair)", 2)?,
        Rule::points("Pair of Dragons", "PDragons(Pair)", 2)?,
    ];

    rs.hand_rules = vec![
        Rule::doubles("Three Concealed Pongs", "PConcealed(PungKong)*3 + Rest", 1)?,
        Rule::doubles(
            "Little Three Dragons",
            "PDragons(Pair) + Dragons(PungKong)*2 + Rest",
            1,
        )?,
        Rule::doubles("Big Three Dragons", "PDragons(PungKong)*3 + Rest", 2)?,
        Rule::doubles(
            "Little Four Joys",
            "PWinds(Pair) + Winds(PungKong)*3 + Rest",
            1,
        )?,
        Rule::doubles("Big Four Joys", "PWinds(PungKong)*4 + Rest", 2)?,
        Rule::points("Long Hand", "PLongHand()||Aabsolute", 0)?,
    ];
    rs.hand_rules.extend(bonus_rules()?);

    rs.mj_rules = vec![
        Rule::points("Mah Jongg", "PMahJongg()", 20)?,
        Rule::points(
            "Last Tile Completes Pair of 2..8",
            "PLastTileCompletes(Pair(Simple))",
            2,
        )?,
        Rule::points(
            "Last Tile Completes Pair of Terminals or Honours",
            "PLastTileCompletes(Pair(NoSimple))",
            4,
        )?,
        Rule::points("Last Tile is Only Possible Tile", "PLastTileOnlyPossible()", 4)?,
        Rule::points("Won with Last Tile Taken from Wall", r" M.* L[A-Z]", 2)?,
        Rule::doubles("Zero Point Hand", r"I.*/(.\d00)+ ", 1)?,
        Rule::doubles("No Chow", "PNoChow()", 1)?,
        Rule::doubles("Only Concealed Melds", "PConcealed()", 1)?,
        Rule::doubles(
            "False Color Game",
            "PHonours() + Stone()||PHonours() + Bamboo()||PHonours() + Character()",
            1,
        )?,
        Rule::doubles("True Color Game", "POneColor(NoHonours())", 3)?,
        Rule::doubles("Only Terminals and Honours", "PNoSimple()", 1)?,
        Rule::doubles("Only Honours", "PHonours()", 2)?,
        Rule::limits("All Honours", "PHonours()", 1.0)?,
        Rule::limits("All Terminals", "PTerminals()", 1.0)?,
        Rule::limits(
            "Concealed True Color Game",
            "PConcealed(ClaimedKongAsConcealed(OneColor(NoHonours(MahJongg()))))",
            1.0,
        )?,
        Rule::limits(
            "Hidden Treasure",
            "PConcealed(ClaimedKongAsConcealed(PungKong()*4+Pair()))||Alastsource=wez1",
            1.0,
        )?,
        Rule::limits("Fourfold Plenty", "PKong()*4 + Pair()", 1.0)?,
        Rule::limits("Three Great Scholars", "PDragons(PungKong)*3 + Rest", 1.0)?,
        Rule::limits(
            "Four Blessings Hovering Over the Door",
            "PWinds(PungKong)*4 + Rest",
            1.0,
        )?,
        Rule::limits("All Greens", "PAllGreen()", 1.0)?,
        Rule::limits(
            "Nine Gates",
            "POneColor(Concealed(Pung(1)+Chow(2)+Chow(5)+Single(8)+Pung(9))+Exposed(Single))",
            1.0,
        )?,
        Rule::limits(
            "Winding Snake",
            "POneColor(PungKong(1)+Chow(2)+Chow(5)+PungKong(9)+Pair(8))\
             ||POneColor(PungKong(1)+Chow(3)+Chow(6)+PungKong(9)+Pair(2))\
             ||POneColor(PungKong(1)+Chow(2)+Chow(6)+PungKong(9)+Pair(5))",
            1.0,
        )?,
        Rule::limits(
            "Thirteen Orphans",
            "PBamboo(Single(1)+Single(9)) + Character(Single(1)+Single(9)) \
             + Stone(Single(1)+Single(9)) + Single('b') + Single('g') + Single('r') \
             + Single('e') + Single('s') + Single('w') + Single('n') + Single(NoSimple)",
            1.0,
        )?,
    ];
    rs.mj_rules.extend(last_tile_limit_rules()?);

    rs.manual_rules = vec![
        Rule::doubles(
            "Last Tile Taken from Dead Wall",
            "PMahJongg()||Alastsource=e",
            1,
        )?,
        Rule::doubles(
            "Last Tile is Last Tile of Wall",
            "PMahJongg()||Alastsource=z",
            1,
        )?,
        Rule::doubles(
            "Last Tile is Last Tile of Wall Discarded",
            "PMahJongg()||Alastsource=Z",
            1,
        )?,
        Rule::doubles("Robbing the Kong", "PMahJongg()||Alastsource=k", 1)?,
        Rule::doubles("Mah Jongg with Call at Beginning", "PMahJongg()", 1)?,
        Rule::points("Dangerous Game", " m||Apayforall", 0)?,
    ];
    rs.manual_rules.extend(manual_limit_rules()?);

    Ok(rs)
}
