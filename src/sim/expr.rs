//! Spawn position formulas
//!
//! Wave descriptors may place enemies relative to the player with a formula
//! such as `"player.x + 200"` or `"(player.y - 40) / 2"`. Formulas are parsed
//! once when the schedule loads into an [`Expr`] tree and evaluated against
//! the player's position at resolution time.
//!
//! Grammar (closed symbol set, no function calls):
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | "player.x" | "player.y" | '(' expr ')'
//! ```

use std::fmt;

use glam::Vec2;

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f32),
    PlayerX,
    PlayerY,
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Formula parse failure, with the byte offset where it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    UnexpectedChar { offset: usize, found: char },
    UnknownSymbol { offset: usize, symbol: String },
    InvalidNumber { offset: usize, text: String },
    UnexpectedToken { offset: usize, found: String },
    UnexpectedEnd,
    Empty,
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar { offset, found } => {
                write!(f, "unexpected character '{found}' at offset {offset}")
            }
            Self::UnknownSymbol { offset, symbol } => write!(
                f,
                "unknown symbol '{symbol}' at offset {offset} (expected player.x or player.y)"
            ),
            Self::InvalidNumber { offset, text } => {
                write!(f, "invalid number '{text}' at offset {offset}")
            }
            Self::UnexpectedToken { offset, found } => {
                write!(f, "unexpected '{found}' at offset {offset}")
            }
            Self::UnexpectedEnd => write!(f, "unexpected end of formula"),
            Self::Empty => write!(f, "empty formula"),
        }
    }
}

impl std::error::Error for ExprError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f32),
    PlayerX,
    PlayerY,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(n) => n.to_string(),
            Token::PlayerX => "player.x".into(),
            Token::PlayerY => "player.y".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        let start = i;
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
                continue;
            }
            '+' => tokens.push((start, Token::Plus)),
            '-' => tokens.push((start, Token::Minus)),
            '*' => tokens.push((start, Token::Star)),
            '/' => tokens.push((start, Token::Slash)),
            '(' => tokens.push((start, Token::LParen)),
            ')' => tokens.push((start, Token::RParen)),
            '0'..='9' | '.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let text = &src[start..i];
                let value = text.parse::<f32>().map_err(|_| ExprError::InvalidNumber {
                    offset: start,
                    text: text.to_string(),
                })?;
                tokens.push((start, Token::Num(value)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.')
                {
                    i += 1;
                }
                let token = match &src[start..i] {
                    "player.x" => Token::PlayerX,
                    "player.y" => Token::PlayerY,
                    other => {
                        return Err(ExprError::UnknownSymbol {
                            offset: start,
                            symbol: other.to_string(),
                        });
                    }
                };
                tokens.push((start, token));
                continue;
            }
            _ => {
                // Report the full (possibly multi-byte) character
                let found = src[start..].chars().next().unwrap_or(c);
                return Err(ExprError::UnexpectedChar { offset: start, found });
            }
        }
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinOp::Add),
            Some(Token::Minus) => Some(BinOp::Sub),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinOp::Mul),
            Some(Token::Slash) => Some(BinOp::Div),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some((_, Token::Num(n))) => Ok(Expr::Num(n)),
            Some((_, Token::PlayerX)) => Ok(Expr::PlayerX),
            Some((_, Token::PlayerY)) => Ok(Expr::PlayerY),
            Some((_, Token::LParen)) => {
                let inner = self.expr()?;
                match self.next() {
                    Some((_, Token::RParen)) => Ok(inner),
                    Some((offset, tok)) => Err(ExprError::UnexpectedToken {
                        offset,
                        found: tok.describe(),
                    }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some((offset, tok)) => Err(ExprError::UnexpectedToken {
                offset,
                found: tok.describe(),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

impl Expr {
    /// Parse a formula, rejecting anything outside the closed grammar
    pub fn parse(src: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.expr()?;
        if let Some((offset, tok)) = parser.next() {
            return Err(ExprError::UnexpectedToken {
                offset,
                found: tok.describe(),
            });
        }
        Ok(expr)
    }

    /// Evaluate against the player's current position
    pub fn eval(&self, player: Vec2) -> f32 {
        match self {
            Expr::Num(n) => *n,
            Expr::PlayerX => player.x,
            Expr::PlayerY => player.y,
            Expr::Neg(inner) => -inner.eval(player),
            Expr::Binary { op, lhs, rhs } => {
                let (a, b) = (lhs.eval(player), rhs.eval(player));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                }
            }
        }
    }

    /// Whether the formula reads the player's position
    pub fn depends_on_player(&self) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::PlayerX | Expr::PlayerY => true,
            Expr::Neg(inner) => inner.depends_on_player(),
            Expr::Binary { lhs, rhs, .. } => lhs.depends_on_player() || rhs.depends_on_player(),
        }
    }
}
