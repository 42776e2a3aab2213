//! S-expression reader for atomspace text files
//!
//! Produces a position-annotated tree of lists, bare symbols, and string
//! literals. Knows nothing about atom types; the codec interprets the tree.
//!
//! ```text
//! (EvaluationLink (PredicateNode "p") x)   ; comment to end of line
//! List[ Symbol(EvaluationLink), List[ Symbol(PredicateNode), Str(p) ], Symbol(x) ]
//! ```

use crate::error::{AtomSpaceError, Result};

/// Source position (1-based line and character column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pos {
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Pos {
    pub(crate) fn error(self, message: impl Into<String>) -> AtomSpaceError {
        AtomSpaceError::parse(self.line, self.column, message)
    }
}

/// Parsed expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SExpr {
    /// Bare token (type name, `define`, symbol reference)
    Symbol(String, Pos),
    /// Double-quoted string, escapes already decoded
    Str(String, Pos),
    /// Parenthesised list
    List(Vec<SExpr>, Pos),
}

impl SExpr {
    pub(crate) const fn pos(&self) -> Pos {
        match self {
            Self::Symbol(_, pos) | Self::Str(_, pos) | Self::List(_, pos) => *pos,
        }
    }

    /// Structural equality, ignoring source positions
    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Symbol(a, _), Self::Symbol(b, _)) | (Self::Str(a, _), Self::Str(b, _)) => a == b,
            (Self::List(a, _), Self::List(b, _)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Symbol(String),
    Str(String),
}

/// Parse every top-level expression in `input`
///
/// # Errors
///
/// Returns [`AtomSpaceError::Parse`] on unbalanced parentheses, unterminated
/// strings, unknown escapes, or nesting deeper than `max_depth`
pub(crate) fn parse_all(input: &str, max_depth: usize) -> Result<Vec<SExpr>> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens: &tokens,
        cursor: 0,
        max_depth,
    };

    let mut exprs = Vec::new();
    while parser.cursor < tokens.len() {
        exprs.push(parser.parse_expr(0)?);
    }
    Ok(exprs)
}

/// Quote a string literal so that [`parse_all`] reads it back unchanged
pub(crate) fn quote(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn tokenize(input: &str) -> Result<Vec<(Token, Pos)>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut pos = Pos { line: 1, column: 1 };

    // Advances `pos` past `c`
    let step = |pos: &mut Pos, c: char| {
        if c == '\n' {
            pos.line += 1;
            pos.column = 1;
        } else {
            pos.column += 1;
        }
    };

    while let Some(&ch) = chars.peek() {
        let start = pos;
        match ch {
            '(' | ')' => {
                chars.next();
                step(&mut pos, ch);
                let token = if ch == '(' { Token::Open } else { Token::Close };
                tokens.push((token, start));
            }
            ';' => {
                // Comment runs to end of line
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                    step(&mut pos, c);
                }
            }
            '"' => {
                chars.next();
                step(&mut pos, ch);
                let mut value = String::new();
                loop {
                    let Some(c) = chars.next() else {
                        return Err(start.error("unterminated string literal"));
                    };
                    let at = pos;
                    step(&mut pos, c);
                    match c {
                        '"' => break,
                        '\\' => {
                            let Some(escaped) = chars.next() else {
                                return Err(start.error("unterminated string literal"));
                            };
                            step(&mut pos, escaped);
                            value.push(match escaped {
                                '"' => '"',
                                '\\' => '\\',
                                'n' => '\n',
                                'r' => '\r',
                                't' => '\t',
                                other => {
                                    return Err(at.error(format!("unknown escape `\\{other}`")));
                                }
                            });
                        }
                        _ => value.push(c),
                    }
                }
                tokens.push((Token::Str(value), start));
            }
            c if c.is_whitespace() => {
                chars.next();
                step(&mut pos, c);
            }
            _ => {
                let mut symbol = String::new();
                while let Some(&c) = chars.peek() {
                    if matches!(c, '(' | ')' | '"' | ';') || c.is_whitespace() {
                        break;
                    }
                    symbol.push(c);
                    chars.next();
                    step(&mut pos, c);
                }
                tokens.push((Token::Symbol(symbol), start));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [(Token, Pos)],
    cursor: usize,
    max_depth: usize,
}

impl Parser<'_> {
    fn parse_expr(&mut self, depth: usize) -> Result<SExpr> {
        let tokens = self.tokens;
        let Some((token, pos)) = tokens.get(self.cursor) else {
            let end = tokens.last().map_or(Pos { line: 1, column: 1 }, |(_, p)| *p);
            return Err(end.error("unexpected end of input"));
        };
        let pos = *pos;
        self.cursor += 1;

        match token {
            Token::Symbol(s) => Ok(SExpr::Symbol(s.clone(), pos)),
            Token::Str(s) => Ok(SExpr::Str(s.clone(), pos)),
            Token::Close => Err(pos.error("unexpected ')'")),
            Token::Open => {
                if depth >= self.max_depth {
                    return Err(pos.error(format!(
                        "nesting exceeds maximum depth of {}",
                        self.max_depth
                    )));
                }

                let mut items = Vec::new();
                loop {
                    match tokens.get(self.cursor) {
                        None => {
                            return Err(pos.error("unbalanced parentheses: missing ')'"));
                        }
                        Some((Token::Close, _)) => {
                            self.cursor += 1;
                            break;
                        }
                        Some(_) => items.push(self.parse_expr(depth + 1)?),
                    }
                }
                Ok(SExpr::List(items, pos))
            }
        }
    }
}
