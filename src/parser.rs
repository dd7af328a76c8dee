//! Parser for rule definition strings.
//!
//! A definition is a list of `||`-separated segments. The first
//! character of a segment selects its kind: `P` introduces a pattern
//! expression, `A` an options clause, `I` a case-insensitive regex; any
//! other segment is a case-sensitive regex against the canonical hand
//! string. The splitting and regex compilation live in `rule`; this
//! module parses the `P` and `A` segment bodies.
//!
//! The pattern expression grammar:
//!
//! ```text
//! seq  := term ('+' term)*
//! term := atom ('*' NUMBER)?
//! atom := NAME | NAME '(' ')' | NAME '(' arg ')'
//! arg  := seq | NUMBER | '\'' CHAR '\''
//! ```
//!
//! A bare filter name consumes one matching meld, `Name()` consumes all
//! remaining matching melds, and a filter name applied to a pattern
//! scopes the filter over everything the pattern consumes.

use crate::errors::{ScoreError, ScoreResult};
use crate::pattern::{MeldFilter, Pattern};
use crate::rule::RuleOptions;

// --- tokenizer -----------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Number(u8),
    Quote(char),
    Plus,
    Star,
    Open,
    Close,
}

fn lex(src: &str) -> ScoreResult<Vec<Token>> {
    let bad = |message: String| ScoreError::Parse {
        input: src.to_string(),
        message,
    };
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '\'' => {
                chars.next();
                let inner = chars
                    .next()
                    .ok_or_else(|| bad("unterminated character literal".to_string()))?;
                if chars.next() != Some('\'') {
                    return Err(bad("unterminated character literal".to_string()));
                }
                tokens.push(Token::Quote(inner));
            }
            '0'..='9' => {
                let mut value: u32 = 0;
                while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                    value = value * 10 + d;
                    chars.next();
                }
                if value > u8::MAX as u32 {
                    return Err(bad(format!("number {} out of range", value)));
                }
                tokens.push(Token::Number(value as u8));
            }
            c if c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(name));
            }
            c => return Err(bad(format!("unexpected character '{}'", c))),
        }
    }
    Ok(tokens)
}

// --- expression AST ------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Seq(Vec<Expr>),
    Repeat(Box<Expr>, u8),
    Name(String),
    Call0(String),
    Call1(String, Box<Expr>),
    Num(u8),
    Quote(char),
}

struct ExprParser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn bad(&self, message: String) -> ScoreError {
        ScoreError::Parse {
            input: self.src.to_string(),
            message,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn seq(&mut self) -> ScoreResult<Expr> {
        let mut items = vec![self.term()?];
        while self.peek() == Some(&Token::Plus) {
            self.next();
            items.push(self.term()?);
        }
        if items.len() == 1 {
            Ok(items.swap_remove(0))
        } else {
            Ok(Expr::Seq(items))
        }
    }

    fn term(&mut self) -> ScoreResult<Expr> {
        let atom = self.atom()?;
        if self.peek() == Some(&Token::Star) {
            self.next();
            match self.next() {
                Some(Token::Number(n)) if n > 0 => Ok(Expr::Repeat(Box::new(atom), n)),
                other => Err(self.bad(format!("'*' needs a positive count, got {:?}", other))),
            }
        } else {
            Ok(atom)
        }
    }

    fn atom(&mut self) -> ScoreResult<Expr> {
        match self.next() {
            Some(Token::Name(name)) => {
                if self.peek() == Some(&Token::Open) {
                    self.next();
                    if self.peek() == Some(&Token::Close) {
                        self.next();
                        return Ok(Expr::Call0(name));
                    }
                    let arg = self.arg()?;
                    match self.next() {
                        Some(Token::Close) => Ok(Expr::Call1(name, Box::new(arg))),
                        other => Err(self.bad(format!("expected ')', got {:?}", other))),
                    }
                } else {
                    Ok(Expr::Name(name))
                }
            }
            other => Err(self.bad(format!("expected a name, got {:?}", other))),
        }
    }

    fn arg(&mut self) -> ScoreResult<Expr> {
        match self.peek() {
            Some(Token::Number(n)) => {
                let n = *n;
                self.next();
                Ok(Expr::Num(n))
            }
            Some(Token::Quote(c)) => {
                let c = *c;
                self.next();
                Ok(Expr::Quote(c))
            }
            _ => self.seq(),
        }
    }
}

// --- lowering to the pattern IR ------------------------------------------

fn filter_by_name(name: &str) -> Option<MeldFilter> {
    Some(match name {
        "Concealed" => MeldFilter::Concealed,
        "Exposed" => MeldFilter::Exposed,
        "Dragons" => MeldFilter::Dragons,
        "Winds" => MeldFilter::Winds,
        "OwnWind" => MeldFilter::OwnWind,
        "RoundWind" => MeldFilter::RoundWind,
        "Honours" => MeldFilter::Honours,
        "NoHonours" => MeldFilter::NoHonours,
        "Simple" => MeldFilter::Simple,
        "NoSimple" => MeldFilter::NoSimple,
        "Terminals" => MeldFilter::Terminals,
        "Stone" => MeldFilter::Stone,
        "Bamboo" => MeldFilter::Bamboo,
        "Character" => MeldFilter::Character,
        "NoStone" => MeldFilter::NoStone,
        "NoBamboo" => MeldFilter::NoBamboo,
        "NoCharacter" => MeldFilter::NoCharacter,
        "AllGreen" => MeldFilter::AllGreen,
        "Single" => MeldFilter::Single,
        "Pair" => MeldFilter::Pair,
        "Chow" => MeldFilter::Chow,
        "Pung" => MeldFilter::Pung,
        "Kong" => MeldFilter::Kong,
        "PungKong" => MeldFilter::PungKong,
        "NoChow" => MeldFilter::NoChow,
        _ => return None,
    })
}

/// Tries to read an expression as a pure filter conjunction. Fails for
/// anything that implies meld consumption structure of its own.
fn filter_conjunction(expr: &Expr) -> Option<Vec<MeldFilter>> {
    match expr {
        Expr::Name(name) => filter_by_name(name).map(|f| vec![f]),
        Expr::Num(n) => Some(vec![MeldFilter::Value(*n)]),
        Expr::Quote(c) => Some(vec![MeldFilter::HonourChar(*c)]),
        Expr::Call1(name, arg) => {
            let head = filter_by_name(name)?;
            let mut filters = vec![head];
            filters.extend(filter_conjunction(arg)?);
            Some(filters)
        }
        _ => None,
    }
}

fn lower(expr: &Expr, src: &str) -> ScoreResult<Pattern> {
    let bad = |message: String| ScoreError::Parse {
        input: src.to_string(),
        message,
    };
    match expr {
        Expr::Seq(items) => {
            let lowered = items
                .iter()
                .map(|e| lower(e, src))
                .collect::<ScoreResult<Vec<_>>>()?;
            Ok(Pattern::Seq(lowered))
        }
        Expr::Repeat(inner, n) => Ok(Pattern::Repeat(Box::new(lower(inner, src)?), *n)),
        Expr::Name(name) => match name.as_str() {
            "Rest" => Ok(Pattern::Rest),
            _ => match filter_by_name(name) {
                Some(f) => Ok(Pattern::One(vec![f])),
                None => Err(bad(format!("unknown name '{}'", name))),
            },
        },
        Expr::Call0(name) => match name.as_str() {
            "MahJongg" => Ok(Pattern::MahJongg),
            "LongHand" => Ok(Pattern::LongHand),
            "LastTileOnlyPossible" => Ok(Pattern::LastTileOnlyPossible),
            "Rest" => Ok(Pattern::Rest),
            _ => match filter_by_name(name) {
                Some(f) => Ok(Pattern::AllMatching(vec![f])),
                None => Err(bad(format!("unknown name '{}'", name))),
            },
        },
        Expr::Call1(name, arg) => match name.as_str() {
            "LastTileCompletes" => match filter_conjunction(arg) {
                Some(filters) => Ok(Pattern::LastTileCompletes(filters)),
                None => Err(bad("LastTileCompletes needs a meld predicate".to_string())),
            },
            "OneColor" => Ok(Pattern::OneColor(Box::new(lower(arg, src)?))),
            "ClaimedKongAsConcealed" => Ok(Pattern::ClaimedKongAsConcealed(Box::new(lower(
                arg, src,
            )?))),
            _ => match filter_by_name(name) {
                Some(f) => match filter_conjunction(arg) {
                    Some(filters) => {
                        let mut all = vec![f];
                        all.extend(filters);
                        Ok(Pattern::One(all))
                    }
                    None => Ok(Pattern::Filtered(f, Box::new(lower(arg, src)?))),
                },
                None => Err(bad(format!("unknown name '{}'", name))),
            },
        },
        Expr::Num(_) | Expr::Quote(_) => {
            Err(bad("a literal cannot stand alone in a pattern".to_string()))
        }
    }
}

/// Parses the body of a `P` segment into the pattern IR.
pub fn parse_pattern(src: &str) -> ScoreResult<Pattern> {
    let tokens = lex(src)?;
    if tokens.is_empty() {
        return Err(ScoreError::Parse {
            input: src.to_string(),
            message: "empty pattern".to_string(),
        });
    }
    let mut parser = ExprParser {
        src,
        tokens,
        pos: 0,
    };
    let expr = parser.seq()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.bad(format!(
            "trailing input after pattern: {:?}",
            &parser.tokens[parser.pos..]
        )));
    }
    lower(&expr, src)
}

/// Parses the body of an `A` segment: whitespace-separated option words.
pub fn parse_options(src: &str) -> ScoreResult<RuleOptions> {
    let mut options = RuleOptions::default();
    for word in src.split_whitespace() {
        match word {
            "absolute" => options.absolute = true,
            "payforall" => options.pay_for_all = true,
            _ => match word.split_once('=') {
                Some(("payers", n)) => {
                    options.payers = parse_count(src, "payers", n)?;
                }
                Some(("payees", n)) => {
                    options.payees = parse_count(src, "payees", n)?;
                }
                Some(("lastsource", s)) => {
                    if s.is_empty() {
                        return Err(ScoreError::Parse {
                            input: src.to_string(),
                            message: "lastsource needs at least one source character".to_string(),
                        });
                    }
                    options.last_source = Some(s.to_string());
                }
                _ => {
                    return Err(ScoreError::Parse {
                        input: src.to_string(),
                        message: format!("unknown option '{}'", word),
                    })
                }
            },
        }
    }
    Ok(options)
}

fn parse_count(src: &str, what: &str, raw: &str) -> ScoreResult<u8> {
    match raw.parse::<u8>() {
        Ok(n) if (1..=3).contains(&n) => Ok(n),
        _ => Err(ScoreError::Parse {
            input: src.to_string(),
            message: format!("{} must be 1..3", what),
        }),
    }
}
