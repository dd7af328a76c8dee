#[cfg(test)]
mod unit_tests {
    use crate::errors::ScoreError;
    use crate::hand::{Hand, HandContext, LastSource, WinContext};
    use crate::meld::{Meld, MeldShape, MeldState};
    use crate::parser::{parse_options, parse_pattern};
    use crate::pattern::CompiledPattern;
    use crate::rule::{Rule, RuleEffect, RuleRecord};
    use crate::ruleset::{Ruleset, RulesetParams};
    use crate::score::{score, ScoreOptions};
    use crate::tile::{Bonus, Dragon, Suit, Tile, Wind};
    use crate::{encode, predefined};

    // --- helpers ---------------------------------------------------------

    fn tile(code: &str) -> Tile {
        let mut chars = code.chars();
        let letter = chars.next().unwrap();
        let value = chars.next().unwrap();
        match letter {
            'd' => Tile::Dragon(Dragon::from_char(value).unwrap()),
            'w' => Tile::Wind(Wind::from_char(value).unwrap()),
            's' => Tile::suited(Suit::Stone, value.to_digit(10).unwrap() as u8).unwrap(),
            'b' => Tile::suited(Suit::Bamboo, value.to_digit(10).unwrap() as u8).unwrap(),
            'c' => Tile::suited(Suit::Character, value.to_digit(10).unwrap() as u8).unwrap(),
            _ => panic!("bad tile code {}", code),
        }
    }

    fn meld(codes: &[&str], state: MeldState) -> Meld {
        Meld::new(codes.iter().map(|c| tile(c)).collect(), state).unwrap()
    }

    fn pung(code: &str, state: MeldState) -> Meld {
        meld(&[code, code, code], state)
    }

    fn kong(code: &str, state: MeldState) -> Meld {
        meld(&[code, code, code, code], state)
    }

    fn pair(code: &str, state: MeldState) -> Meld {
        meld(&[code, code], state)
    }

    fn single(code: &str, state: MeldState) -> Meld {
        meld(&[code], state)
    }

    /// Chow starting at the given tile.
    fn chow(code: &str, state: MeldState) -> Meld {
        let start = tile(code);
        let suit = start.suit().unwrap();
        let v = start.value().unwrap();
        Meld::new(
            vec![
                start,
                Tile::suited(suit, v + 1).unwrap(),
                Tile::suited(suit, v + 2).unwrap(),
            ],
            state,
        )
        .unwrap()
    }

    fn ctx(own: Wind, round: Wind) -> HandContext {
        HandContext {
            own_wind: own,
            round_wind: round,
            win: None,
            declared_complete: false,
        }
    }

    fn hand(melds: Vec<Meld>, ctx: HandContext) -> Hand {
        Hand::new(melds, Vec::new(), ctx).unwrap()
    }

    fn both_rulesets() -> Vec<Ruleset> {
        vec![
            predefined::classical_chinese_pattern().unwrap(),
            predefined::classical_chinese_regex().unwrap(),
        ]
    }

    fn matched_names(breakdown: &crate::score::ScoreBreakdown) -> Vec<&str> {
        breakdown.matched.iter().map(|m| m.name.as_str()).collect()
    }

    // --- tiles and melds -------------------------------------------------

    #[test]
    fn test_tile_order() {
        let mut tiles = vec![tile("c1"), tile("s9"), tile("we"), tile("dr"), tile("db")];
        tiles.sort();
        let codes: Vec<String> = tiles.iter().map(|t| t.code(false)).collect();
        assert_eq!(codes, ["db", "dr", "we", "s9", "c1"]);
    }

    #[test]
    fn test_tile_codes_and_classes() {
        assert_eq!(tile("b5").code(true), "B5");
        assert!(tile("we").is_honour());
        assert!(tile("s1").is_terminal());
        assert!(tile("c5").is_simple());
        assert!(tile("b2").is_green());
        assert!(tile("dg").is_green());
        assert!(!tile("b5").is_green());
        assert!(Tile::suited(Suit::Stone, 0).is_err());
        assert!(Tile::suited(Suit::Stone, 10).is_err());
    }

    #[test]
    fn test_meld_shapes() {
        assert_eq!(chow("s1", MeldState::Exposed).shape(), MeldShape::Chow);
        assert_eq!(pung("dr", MeldState::Concealed).shape(), MeldShape::Pung);
        assert_eq!(
            kong("b2", MeldState::DeclaredKong).shape(),
            MeldShape::Kong
        );
        // 1-3-5 is not a chow.
        assert!(Meld::new(
            vec![tile("s1"), tile("s3"), tile("s5")],
            MeldState::Concealed
        )
        .is_err());
        // A chow never spans suits.
        assert!(Meld::new(
            vec![tile("s1"), tile("b2"), tile("c3")],
            MeldState::Concealed
        )
        .is_err());
        // Kongs must pick one of the kong states.
        assert!(Meld::new(vec![tile("s2"); 4], MeldState::Concealed).is_err());
        assert!(Meld::new(vec![tile("s2"); 3], MeldState::DeclaredKong).is_err());
    }

    #[test]
    fn test_meld_tokens() {
        assert_eq!(pung("s2", MeldState::Concealed).token(), "S2S2S2");
        assert_eq!(pung("s2", MeldState::Exposed).token(), "s2s2s2");
        assert_eq!(kong("s2", MeldState::ClaimedKong).token(), "s2s2s2s2");
        assert_eq!(kong("s2", MeldState::Exposed).token(), "s2s2s2S2");
        assert_eq!(kong("s2", MeldState::DeclaredKong).token(), "s2S2S2s2");
    }

    #[test]
    fn test_meld_base_points() {
        let e = Wind::East;
        assert_eq!(chow("s1", MeldState::Exposed).base_points(e, e), 0);
        assert_eq!(pung("s2", MeldState::Exposed).base_points(e, e), 2);
        assert_eq!(pung("s2", MeldState::Concealed).base_points(e, e), 4);
        assert_eq!(pung("s1", MeldState::Exposed).base_points(e, e), 4);
        assert_eq!(pung("dr", MeldState::Concealed).base_points(e, e), 8);
        assert_eq!(kong("b5", MeldState::ClaimedKong).base_points(e, e), 8);
        assert_eq!(kong("b9", MeldState::DeclaredKong).base_points(e, e), 32);
        assert_eq!(pair("dr", MeldState::Concealed).base_points(e, e), 2);
        assert_eq!(pair("we", MeldState::Concealed).base_points(e, e), 2);
        assert_eq!(pair("ws", MeldState::Concealed).base_points(e, e), 0);
        assert_eq!(pair("b9", MeldState::Concealed).base_points(e, e), 0);
    }

    // --- encoding --------------------------------------------------------

    #[test]
    fn test_encode_golden() {
        let pair_b5 = pair("b5", MeldState::Concealed);
        let mut context = ctx(Wind::East, Wind::South);
        context.declared_complete = true;
        context.win = Some(WinContext {
            tile: tile("b5"),
            meld: pair_b5.clone(),
            source: LastSource::Wall,
        });
        let h = hand(
            vec![
                chow("c7", MeldState::Exposed),
                pair_b5,
                chow("s1", MeldState::Exposed),
                pung("we", MeldState::Concealed),
                pung("dr", MeldState::Concealed),
            ],
            context,
        );
        assert!(h.is_complete());
        assert_eq!(
            encode::encode(&h),
            "DrDrDr WeWeWe s1s2s3 B5B5 c7c8c9 /D308W308s000B200c000 Mesw LB5B5B5"
        );
    }

    #[test]
    fn test_encode_meld_golden() {
        let mut context = ctx(Wind::East, Wind::South);
        context.declared_complete = true;
        let we = pung("we", MeldState::Concealed);
        let h = hand(vec![we.clone()], context);
        assert_eq!(encode::encode_meld(&h, &we), "WeWeWe /W308 Mesd");
    }

    #[test]
    fn test_encode_bonus_and_long_hand() {
        let mut melds = vec![
            pung("s2", MeldState::Exposed),
            pung("s5", MeldState::Exposed),
            pung("b2", MeldState::Exposed),
            pung("b5", MeldState::Exposed),
            pung("c2", MeldState::Exposed),
            pair("c7", MeldState::Concealed),
        ];
        melds.rotate_left(3);
        let h = Hand::new(
            melds,
            vec![Bonus::season(Wind::East), Bonus::flower(Wind::North)],
            ctx(Wind::East, Wind::East),
        )
        .unwrap();
        // 17 tiles without a kong: one too many.
        assert!(h.is_long());
        assert!(!h.is_complete());
        let encoded = encode::encode(&h);
        assert!(encoded.contains(" fn ye /"), "got '{}'", encoded);
        assert!(encoded.contains(" %l "), "got '{}'", encoded);
    }

    #[test]
    fn test_encode_is_order_independent() {
        let melds = vec![
            pung("dr", MeldState::Exposed),
            chow("s1", MeldState::Exposed),
            pung("b2", MeldState::Concealed),
            chow("c4", MeldState::Exposed),
            pair("ws", MeldState::Concealed),
        ];
        let mut reversed = melds.clone();
        reversed.reverse();
        let a = hand(melds, ctx(Wind::East, Wind::East));
        let b = hand(reversed, ctx(Wind::East, Wind::East));
        assert_eq!(encode::encode(&a), encode::encode(&b));
    }

    // --- pattern language ------------------------------------------------

    #[test]
    fn test_parse_options() {
        let options = parse_options("absolute payers=2 payees=3").unwrap();
        assert!(options.absolute);
        assert!(!options.pay_for_all);
        assert_eq!(options.payers, 2);
        assert_eq!(options.payees, 3);
        let options = parse_options("lastsource=e").unwrap();
        assert_eq!(options.last_source, Some("e".to_string()));
        // Several source characters form an any-of set.
        let options = parse_options("lastsource=wez1").unwrap();
        assert_eq!(options.last_source, Some("wez1".to_string()));
        assert!(parse_options("lastsource=").is_err());
        assert!(parse_options("payers=7").is_err());
        assert!(parse_options("bogus").is_err());
    }

    #[test]
    fn test_parse_pattern_errors() {
        assert!(parse_pattern("Bogus()").is_err());
        assert!(parse_pattern("Dragons(").is_err());
        assert!(parse_pattern("Pung()*0").is_err());
        // Only a single meld predicate can be repeated.
        let p = parse_pattern("MahJongg()*2").unwrap();
        assert!(CompiledPattern::compile(&p).is_err());
    }

    fn compiled(src: &str) -> CompiledPattern {
        CompiledPattern::compile(&parse_pattern(src).unwrap()).unwrap()
    }

    #[test]
    fn test_pattern_single_meld() {
        let h = hand(
            vec![pung("dr", MeldState::Exposed)],
            ctx(Wind::East, Wind::East),
        );
        let dragon_set = compiled("Dragons(PungKong)");
        assert!(dragon_set.matches(&h, h.melds()));
        let h2 = hand(
            vec![pung("we", MeldState::Exposed)],
            ctx(Wind::East, Wind::East),
        );
        assert!(!dragon_set.matches(&h2, h2.melds()));
        assert!(compiled("OwnWind(PungKong)").matches(&h2, h2.melds()));
        assert!(!compiled("OwnWind(PungKong)").matches(&h, h.melds()));
    }

    #[test]
    fn test_pattern_count_and_rest() {
        let h = hand(
            vec![
                pung("db", MeldState::Exposed),
                pung("dg", MeldState::Exposed),
                pung("dr", MeldState::Exposed),
                chow("s1", MeldState::Exposed),
                pair("s5", MeldState::Concealed),
            ],
            ctx(Wind::East, Wind::East),
        );
        assert!(compiled("Dragons(PungKong)*3 + Rest").matches(&h, h.melds()));
        assert!(!compiled("Dragons(PungKong)*4 + Rest").matches(&h, h.melds()));
        // Without Rest the chow and the pair stay unconsumed.
        assert!(!compiled("Dragons(PungKong)*3").matches(&h, h.melds()));
    }

    #[test]
    fn test_pattern_one_color() {
        let stones = hand(
            vec![
                chow("s1", MeldState::Exposed),
                pung("s5", MeldState::Exposed),
                pair("s9", MeldState::Concealed),
            ],
            ctx(Wind::East, Wind::East),
        );
        assert!(compiled("OneColor(NoHonours())").matches(&stones, stones.melds()));
        let mixed = hand(
            vec![
                chow("s1", MeldState::Exposed),
                pung("b5", MeldState::Exposed),
            ],
            ctx(Wind::East, Wind::East),
        );
        assert!(!compiled("OneColor(NoHonours())").matches(&mixed, mixed.melds()));
        // Honors are allowed inside a color scope but not under NoHonours.
        let with_wind = hand(
            vec![
                chow("s1", MeldState::Exposed),
                pung("we", MeldState::Exposed),
            ],
            ctx(Wind::East, Wind::East),
        );
        assert!(!compiled("OneColor(NoHonours())").matches(&with_wind, with_wind.melds()));
        assert!(compiled("OneColor(Chow() + Honours())").matches(&with_wind, with_wind.melds()));
    }

    #[test]
    fn test_pattern_claimed_kong_as_concealed() {
        let h = hand(
            vec![
                pung("s2", MeldState::Concealed),
                pung("b3", MeldState::Concealed),
                pung("c4", MeldState::Concealed),
                kong("s7", MeldState::ClaimedKong),
                pair("b9", MeldState::Concealed),
            ],
            ctx(Wind::East, Wind::East),
        );
        let strict = compiled("Concealed(PungKong()*4+Pair())");
        assert!(!strict.matches(&h, h.melds()));
        let liberal = compiled("Concealed(ClaimedKongAsConcealed(PungKong()*4+Pair()))");
        assert!(liberal.matches(&h, h.melds()));
    }

    #[test]
    fn test_pattern_mah_jongg_requires_declaration() {
        let melds = vec![
            pung("s2", MeldState::Exposed),
            pung("b3", MeldState::Exposed),
            chow("c4", MeldState::Exposed),
            chow("s5", MeldState::Exposed),
            pair("b9", MeldState::Concealed),
        ];
        let undeclared = hand(melds.clone(), ctx(Wind::East, Wind::East));
        assert!(!compiled("MahJongg()").matches(&undeclared, undeclared.melds()));
        let mut context = ctx(Wind::East, Wind::East);
        context.declared_complete = true;
        let declared = hand(melds, context);
        assert!(compiled("MahJongg()").matches(&declared, declared.melds()));
    }

    // --- rules and rulesets ----------------------------------------------

    #[test]
    fn test_rule_record_json() {
        let record: RuleRecord =
            serde_json::from_str(r#"{"name":"Mah Jongg","definition":" M","points":20}"#).unwrap();
        let rule = Rule::try_from(record.clone()).unwrap();
        assert_eq!(rule.effect(), RuleEffect::Points(20));
        let text = serde_json::to_string(&record).unwrap();
        let back: RuleRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);

        // A limit beats other effects in a record carrying several.
        let record: RuleRecord = serde_json::from_str(
            r#"{"name":"X","definition":" M","points":20,"limits":0.5}"#,
        )
        .unwrap();
        assert_eq!(
            Rule::try_from(record).unwrap().effect(),
            RuleEffect::Limit(0.5)
        );
    }

    #[test]
    fn test_bad_rule_definitions() {
        assert!(Rule::points("broken regex", r"([dw]", 1).is_err());
        assert!(Rule::points("broken pattern", "PNothing()", 1).is_err());
        match Rule::points("broken pattern", "PNothing()", 1) {
            Err(ScoreError::RuleDefinition { rule, .. }) => assert_eq!(rule, "broken pattern"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_registry() {
        let names = Ruleset::names();
        assert!(names.contains(&"Classical Chinese with Patterns"));
        assert!(names.contains(&"Classical Chinese with Regular Expressions"));
        assert!(Ruleset::load("No Such Ruleset").is_err());
        for name in names {
            let rs = Ruleset::load(name).unwrap();
            assert!(!rs.penalty_rules().is_empty());
            assert!(!rs.hand_rules().is_empty());
            assert!(!rs.meld_rules().is_empty());
            assert!(!rs.mj_rules().is_empty());
            assert!(!rs.manual_rules().is_empty());
            assert_eq!(rs.params().limit, 500);
        }
    }

    // --- scoring ---------------------------------------------------------

    fn winning_ctx(win_tile: &str, win_meld: Meld, source: LastSource) -> HandContext {
        HandContext {
            own_wind: Wind::East,
            round_wind: Wind::East,
            declared_complete: true,
            win: Some(WinContext {
                tile: tile(win_tile),
                meld: win_meld,
                source,
            }),
        }
    }

    #[test]
    fn test_basic_mah_jongg_score() {
        for rs in both_rulesets() {
            let winning_chow = chow("c4", MeldState::Exposed);
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    pung("b3", MeldState::Exposed),
                    winning_chow.clone(),
                    chow("s5", MeldState::Exposed),
                    pair("b9", MeldState::Concealed),
                ],
                winning_ctx("c6", winning_chow, LastSource::Discard),
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            // 20 mah jongg + two exposed pungs of simples.
            assert_eq!(breakdown.total_points, 24, "{}", rs.name());
            assert_eq!(breakdown.total_doubles, 0, "{}", rs.name());
            assert_eq!(breakdown.score, 24, "{}", rs.name());
        }
    }

    #[test]
    fn test_doubles_multiply() {
        for rs in both_rulesets() {
            let winning_chow = chow("c4", MeldState::Exposed);
            let h = hand(
                vec![
                    pung("db", MeldState::Exposed),
                    chow("s1", MeldState::Exposed),
                    winning_chow.clone(),
                    pung("b2", MeldState::Exposed),
                    pair("s8", MeldState::Concealed),
                ],
                winning_ctx("c4", winning_chow, LastSource::Discard),
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            assert_eq!(breakdown.total_points, 26, "{}", rs.name());
            assert_eq!(breakdown.total_doubles, 1, "{}", rs.name());
            assert_eq!(breakdown.score, 52, "{}", rs.name());
        }
    }

    #[test]
    fn test_limit_beats_points_and_doubles() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            let h = hand(
                vec![
                    pung("db", MeldState::Exposed),
                    pung("dg", MeldState::Exposed),
                    pung("dr", MeldState::Exposed),
                    chow("s1", MeldState::Exposed),
                    pair("c5", MeldState::Concealed),
                ],
                context,
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            let names = matched_names(&breakdown);
            assert!(names.contains(&"Three Great Scholars"), "{}", rs.name());
            assert!(names.contains(&"Big Three Dragons"), "{}", rs.name());
            // 20 mah jongg + three exposed honor pungs; five doubles from
            // the dragon rules. The limit wins over all of it.
            assert_eq!(breakdown.total_points, 32, "{}", rs.name());
            assert_eq!(breakdown.total_doubles, 5, "{}", rs.name());
            assert_eq!(breakdown.limit, Some(1.0), "{}", rs.name());
            assert_eq!(breakdown.score, 500, "{}", rs.name());
        }
    }

    #[test]
    fn test_limit_tie_keeps_first() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            let h = hand(
                vec![
                    pung("we", MeldState::Exposed),
                    pung("ws", MeldState::Exposed),
                    pung("ww", MeldState::Exposed),
                    pung("wn", MeldState::Exposed),
                    pair("db", MeldState::Concealed),
                ],
                context,
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            let names = matched_names(&breakdown);
            assert!(names.contains(&"All Honours"), "{}", rs.name());
            assert!(
                names.contains(&"Four Blessings Hovering Over the Door"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.limit, Some(1.0), "{}", rs.name());
            assert_eq!(breakdown.score, 500, "{}", rs.name());
        }
    }

    #[test]
    fn test_invalid_claim_incomplete_hand() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    chow("s5", MeldState::Exposed),
                ],
                context,
            );
            let result = score(&rs, &h, &ScoreOptions::mah_jongg());
            assert!(
                matches!(result, Err(ScoreError::InvalidClaim { .. })),
                "{}",
                rs.name()
            );
        }
    }

    #[test]
    fn test_minimum_points_gate() {
        // A custom ruleset demanding more points than a bare mah jongg.
        let mut rs = Ruleset::new(
            "strict",
            "",
            RulesetParams {
                min_mj_points: 30,
                limit: 500,
            },
        );
        rs.mj_rules = vec![Rule::points("Mah Jongg", " M", 20).unwrap()];
        let mut context = ctx(Wind::East, Wind::East);
        context.declared_complete = true;
        let h = hand(
            vec![
                chow("s1", MeldState::Exposed),
                chow("s4", MeldState::Exposed),
                chow("b1", MeldState::Exposed),
                chow("b4", MeldState::Exposed),
                pair("c5", MeldState::Concealed),
            ],
            context,
        );
        match score(&rs, &h, &ScoreOptions::mah_jongg()) {
            Err(ScoreError::InvalidClaim { points, required, .. }) => {
                assert_eq!(points, 20);
                assert_eq!(required, 30);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_long_hand_is_absolute() {
        for rs in both_rulesets() {
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    pung("s5", MeldState::Exposed),
                    pung("b2", MeldState::Exposed),
                    pung("b5", MeldState::Exposed),
                    pung("c2", MeldState::Exposed),
                    pair("c7", MeldState::Concealed),
                ],
                ctx(Wind::East, Wind::East),
            );
            assert!(h.is_long());
            let breakdown = score(&rs, &h, &ScoreOptions::default()).unwrap();
            assert_eq!(matched_names(&breakdown), ["Long Hand"], "{}", rs.name());
            assert_eq!(breakdown.score, 0, "{}", rs.name());
        }
    }

    #[test]
    fn test_penalty_scoring() {
        for rs in both_rulesets() {
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    chow("b3", MeldState::Exposed),
                ],
                ctx(Wind::East, Wind::East),
            );
            let options = ScoreOptions::penalty("False Naming of Discard, Claimed for Chow");
            let breakdown = score(&rs, &h, &options).unwrap();
            assert_eq!(breakdown.score, -50, "{}", rs.name());
            assert_eq!(breakdown.matched.len(), 1, "{}", rs.name());

            let rule = rs
                .find_rule("False Naming of Discard, Claimed for Chow")
                .unwrap();
            let payment = rule.payment(-50);
            assert_eq!(payment.payers, 1);
            assert_eq!(payment.payees, 1);
            assert_eq!(payment.payer_delta, -50);
            assert_eq!(payment.payee_delta, 50);
        }
    }

    #[test]
    fn test_penalty_payment_split() {
        let rs = predefined::classical_chinese_pattern().unwrap();
        let rule = rs
            .find_rule("False Declaration of Mah Jongg by Two Players")
            .unwrap();
        assert!(rule.options().absolute);
        let payment = rule.payment(-300);
        assert_eq!(payment.payers, 2);
        assert_eq!(payment.payees, 2);
        assert_eq!(payment.payer_delta, -600);
        assert_eq!(payment.payee_delta, 600);
        // Zero sum across the table.
        assert_eq!(
            payment.payers as i32 * payment.payer_delta
                + payment.payees as i32 * payment.payee_delta,
            0
        );
    }

    #[test]
    fn test_manual_rule_needs_override_and_match() {
        for rs in both_rulesets() {
            let winning_pair = pair("b5", MeldState::Concealed);
            let melds = vec![
                pung("s2", MeldState::Exposed),
                chow("s5", MeldState::Exposed),
                chow("c1", MeldState::Exposed),
                pung("c7", MeldState::Exposed),
                winning_pair.clone(),
            ];
            let from_dead_wall = hand(
                melds.clone(),
                winning_ctx("b5", winning_pair.clone(), LastSource::DeadWall),
            );
            let from_wall = hand(melds, winning_ctx("b5", winning_pair, LastSource::Wall));

            let plain = score(&rs, &from_dead_wall, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                !matched_names(&plain).contains(&"Last Tile Taken from Dead Wall"),
                "{}",
                rs.name()
            );

            let options = ScoreOptions::mah_jongg().with_manual("Last Tile Taken from Dead Wall");
            let claimed = score(&rs, &from_dead_wall, &options).unwrap();
            assert!(
                matched_names(&claimed).contains(&"Last Tile Taken from Dead Wall"),
                "{}",
                rs.name()
            );

            // Declared but not actually from the dead wall: no match.
            let wrong_source = score(&rs, &from_wall, &options).unwrap();
            assert!(
                !matched_names(&wrong_source).contains(&"Last Tile Taken from Dead Wall"),
                "{}",
                rs.name()
            );
        }
    }

    #[test]
    fn test_dangerous_game_pays_for_all() {
        for rs in both_rulesets() {
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    chow("b3", MeldState::Exposed),
                ],
                ctx(Wind::East, Wind::East),
            );
            let options = ScoreOptions::default().with_manual("Dangerous Game");
            let breakdown = score(&rs, &h, &options).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"Dangerous Game"),
                "{}",
                rs.name()
            );
            assert!(rs.find_rule("Dangerous Game").unwrap().options().pay_for_all);
        }
    }

    #[test]
    fn test_flowers_and_seasons() {
        for rs in both_rulesets() {
            let winning_pair = pair("b5", MeldState::Concealed);
            let mut context = winning_ctx("b5", winning_pair.clone(), LastSource::Wall);
            context.own_wind = Wind::North;
            context.round_wind = Wind::East;
            let h = Hand::new(
                vec![
                    pung("s2", MeldState::Exposed),
                    chow("s5", MeldState::Exposed),
                    chow("c1", MeldState::Exposed),
                    pung("c7", MeldState::Exposed),
                    winning_pair,
                ],
                vec![Bonus::flower(Wind::North), Bonus::season(Wind::North)],
                context,
            )
            .unwrap();
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            let names = matched_names(&breakdown);
            assert!(names.contains(&"Flower 4"), "{}", rs.name());
            assert!(names.contains(&"Season 4"), "{}", rs.name());
            assert!(names.contains(&"Own Flower and Own Season"), "{}", rs.name());
        }
    }

    #[test]
    fn test_thirteen_orphans() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            let mut melds: Vec<Meld> = [
                "db", "dg", "dr", "we", "ws", "ww", "wn", "s1", "s9", "b1", "b9", "c1", "c9",
            ]
            .into_iter()
            .map(|c| single(c, MeldState::Concealed))
            .collect();
            melds.push(single("c9", MeldState::Concealed));
            let h = hand(melds, context);
            assert!(!h.is_complete());
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"Thirteen Orphans"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.score, 500, "{}", rs.name());
        }
    }

    #[test]
    fn test_nine_gates() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            let h = hand(
                vec![
                    pung("s1", MeldState::Concealed),
                    chow("s2", MeldState::Concealed),
                    chow("s5", MeldState::Concealed),
                    single("s8", MeldState::Concealed),
                    pung("s9", MeldState::Concealed),
                    single("s5", MeldState::Exposed),
                ],
                context,
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"Nine Gates"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.score, 500, "{}", rs.name());
        }
    }

    #[test]
    fn test_hidden_treasure_with_claimed_kong() {
        for rs in both_rulesets() {
            let winning_pair = pair("b9", MeldState::Concealed);
            let h = hand(
                vec![
                    pung("s2", MeldState::Concealed),
                    pung("b3", MeldState::Concealed),
                    pung("c4", MeldState::Concealed),
                    kong("s7", MeldState::ClaimedKong),
                    winning_pair.clone(),
                ],
                winning_ctx("b9", winning_pair, LastSource::Wall),
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"Hidden Treasure"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.score, 500, "{}", rs.name());
        }
    }

    #[test]
    fn test_hidden_treasure_requires_self_draw() {
        for rs in both_rulesets() {
            let winning_pair = pair("b9", MeldState::Concealed);
            let melds = vec![
                pung("s2", MeldState::Concealed),
                pung("b3", MeldState::Concealed),
                pung("c4", MeldState::Concealed),
                pung("s6", MeldState::Concealed),
                winning_pair.clone(),
            ];
            let drawn = hand(
                melds.clone(),
                winning_ctx("b9", winning_pair.clone(), LastSource::Wall),
            );
            let breakdown = score(&rs, &drawn, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"Hidden Treasure"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.score, 500, "{}", rs.name());

            // Same concealed hand won off a discard is no Hidden Treasure.
            let claimed = hand(melds, winning_ctx("b9", winning_pair, LastSource::Discard));
            let breakdown = score(&rs, &claimed, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                !matched_names(&breakdown).contains(&"Hidden Treasure"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.limit, None, "{}", rs.name());
        }
    }

    #[test]
    fn test_true_color_game() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            // The concealed pair gives the summary mixed case.
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    pung("s3", MeldState::Exposed),
                    chow("s4", MeldState::Exposed),
                    chow("s6", MeldState::Exposed),
                    pair("s9", MeldState::Concealed),
                ],
                context,
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"True Color Game"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.total_points, 24, "{}", rs.name());
            assert_eq!(breakdown.total_doubles, 3, "{}", rs.name());
            assert_eq!(breakdown.score, 192, "{}", rs.name());
        }
    }

    #[test]
    fn test_false_color_game() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            let h = hand(
                vec![
                    pung("ww", MeldState::Exposed),
                    chow("s1", MeldState::Exposed),
                    chow("s4", MeldState::Exposed),
                    pung("s7", MeldState::Exposed),
                    pair("wn", MeldState::Concealed),
                ],
                context,
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"False Color Game"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.total_points, 26, "{}", rs.name());
            assert_eq!(breakdown.total_doubles, 1, "{}", rs.name());
            assert_eq!(breakdown.score, 52, "{}", rs.name());
        }
    }

    #[test]
    fn test_color_doubles_only_for_winner() {
        for rs in both_rulesets() {
            // A one-suit hand nobody declared earns no color doubles.
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    pung("s3", MeldState::Exposed),
                    chow("s4", MeldState::Exposed),
                    chow("s6", MeldState::Exposed),
                    pair("s9", MeldState::Concealed),
                ],
                ctx(Wind::East, Wind::East),
            );
            let breakdown = score(&rs, &h, &ScoreOptions::default()).unwrap();
            assert!(
                !matched_names(&breakdown).contains(&"True Color Game"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.total_doubles, 0, "{}", rs.name());
        }
    }

    #[test]
    fn test_plum_blossom_needs_dead_wall_tile() {
        for rs in both_rulesets() {
            let winning_pair = pair("s5", MeldState::Concealed);
            let melds = vec![
                pung("b2", MeldState::Exposed),
                chow("c4", MeldState::Exposed),
                chow("b5", MeldState::Exposed),
                pung("c8", MeldState::Exposed),
                winning_pair.clone(),
            ];
            // Stone 5 off the dead wall scores without any override.
            let from_dead_wall = hand(
                melds.clone(),
                winning_ctx("s5", winning_pair.clone(), LastSource::DeadWall),
            );
            let breakdown = score(&rs, &from_dead_wall, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown)
                    .contains(&"Gathering the Plum Blossom from the Roof"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.score, 500, "{}", rs.name());

            let from_wall = hand(melds, winning_ctx("s5", winning_pair, LastSource::Wall));
            let breakdown = score(&rs, &from_wall, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                !matched_names(&breakdown)
                    .contains(&"Gathering the Plum Blossom from the Roof"),
                "{}",
                rs.name()
            );
            assert_eq!(breakdown.limit, None, "{}", rs.name());
        }
    }

    #[test]
    fn test_middle_of_chow_is_only_possible_tile() {
        for rs in both_rulesets() {
            let winning_chow = chow("c4", MeldState::Exposed);
            let melds = vec![
                pung("s2", MeldState::Exposed),
                chow("b3", MeldState::Exposed),
                winning_chow.clone(),
                pung("s8", MeldState::Exposed),
                pair("c9", MeldState::Concealed),
            ];
            let middle = hand(
                melds.clone(),
                winning_ctx("c5", winning_chow.clone(), LastSource::Discard),
            );
            let breakdown = score(&rs, &middle, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                matched_names(&breakdown).contains(&"Last Tile is Only Possible Tile"),
                "{}",
                rs.name()
            );

            // An end tile of the chow could also have been the other end.
            let edge = hand(melds, winning_ctx("c6", winning_chow, LastSource::Discard));
            let breakdown = score(&rs, &edge, &ScoreOptions::mah_jongg()).unwrap();
            assert!(
                !matched_names(&breakdown).contains(&"Last Tile is Only Possible Tile"),
                "{}",
                rs.name()
            );
        }
    }

    #[test]
    fn test_last_tile_completes_pair() {
        for rs in both_rulesets() {
            let winning_pair = pair("b5", MeldState::Concealed);
            let h = hand(
                vec![
                    pung("s2", MeldState::Exposed),
                    chow("s5", MeldState::Exposed),
                    chow("c1", MeldState::Exposed),
                    pung("c7", MeldState::Exposed),
                    winning_pair.clone(),
                ],
                winning_ctx("b5", winning_pair, LastSource::Wall),
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            let names = matched_names(&breakdown);
            assert!(
                names.contains(&"Last Tile Completes Pair of 2..8"),
                "{}",
                rs.name()
            );
            assert!(
                names.contains(&"Last Tile is Only Possible Tile"),
                "{}",
                rs.name()
            );
            assert!(
                names.contains(&"Won with Last Tile Taken from Wall"),
                "{}",
                rs.name()
            );
        }
    }

    #[test]
    fn test_wind_melds_score_against_context() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::South, Wind::East);
            context.declared_complete = true;
            let h = hand(
                vec![
                    pung("ws", MeldState::Exposed),
                    pung("we", MeldState::Exposed),
                    chow("s1", MeldState::Exposed),
                    chow("c4", MeldState::Exposed),
                    pair("wn", MeldState::Concealed),
                ],
                context,
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            let names = matched_names(&breakdown);
            assert!(names.contains(&"Pung/Kong of Own Wind"), "{}", rs.name());
            assert!(names.contains(&"Pung/Kong of Round Wind"), "{}", rs.name());
            // North is neither own nor round wind here.
            assert!(!names.contains(&"Pair of Own Wind"), "{}", rs.name());
            assert!(!names.contains(&"Pair of Round Wind"), "{}", rs.name());
            assert_eq!(breakdown.total_doubles, 2, "{}", rs.name());
        }
    }

    #[test]
    fn test_rulesets_agree_on_kong_points() {
        for rs in both_rulesets() {
            let mut context = ctx(Wind::East, Wind::East);
            context.declared_complete = true;
            let h = hand(
                vec![
                    kong("s2", MeldState::Exposed),
                    kong("b9", MeldState::DeclaredKong),
                    kong("dr", MeldState::ClaimedKong),
                    chow("c4", MeldState::Exposed),
                    pair("c8", MeldState::Concealed),
                ],
                context,
            );
            let breakdown = score(&rs, &h, &ScoreOptions::mah_jongg()).unwrap();
            // 20 mah jongg, exposed simple kong 8, concealed terminal
            // kong 32, claimed honor kong counts as exposed 16.
            assert_eq!(breakdown.total_points, 76, "{}", rs.name());
            let names = matched_names(&breakdown);
            assert!(names.contains(&"Exposed Kong"), "{}", rs.name());
            assert!(names.contains(&"Concealed Kong of Terminals"), "{}", rs.name());
            assert!(names.contains(&"Exposed Kong of Honours"), "{}", rs.name());
            assert!(names.contains(&"Pung/Kong of Dragons"), "{}", rs.name());
        }
    }
}
