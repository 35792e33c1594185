//! Formula parser - converts formula text into a [`FormulaNode`] tree.
//!
//! Supports: numbers, cell references (A1), `+ - * /`, unary minus and
//! parentheses. The leading `=` marker is stripped by the caller.
//!
//! Precedence, loosest first:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := '-' unary | atom
//! atom  := NUMBER | CELL_ID | '(' expr ')'
//! ```

use super::ast::{BinaryOp, FormulaNode};
use super::error::SyntaxError;
use super::CellId;

/// Deepest parenthesis nesting accepted. Each level costs a few parser frames.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a formula body (without the `=` marker) into a tree.
pub fn parse_formula(input: &str) -> Result<FormulaNode, SyntaxError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SyntaxError::new("Empty formula", 0));
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: input.chars().count(),
        depth: 0,
    };
    let node = parser.parse_expr()?;
    if let Some(extra) = parser.peek() {
        return Err(SyntaxError::new(
            format!("Unexpected {}", extra.kind.describe()),
            extra.offset,
        ));
    }
    Ok(node)
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    CellRef(CellId),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::CellRef(id) => format!("cell reference {}", id),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    /// Character offset of the token's first character.
    offset: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().enumerate().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let kind = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n: f64 = num_str.parse().map_err(|_| {
                    SyntaxError::new(format!("Invalid number: {}", num_str), offset)
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(n),
                    offset,
                });
                continue;
            }
            'A'..='Z' | 'a'..='z' => {
                let mut ident = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_alphanumeric() {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let id = CellId::parse(&ident).ok_or_else(|| {
                    SyntaxError::new(format!("Invalid cell reference: {}", ident), offset)
                })?;
                tokens.push(Token {
                    kind: TokenKind::CellRef(id),
                    offset,
                });
                continue;
            }
            _ => {
                return Err(SyntaxError::new(
                    format!("Unexpected character: '{}'", c),
                    offset,
                ));
            }
        };
        chars.next();
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Character length of the input, reported for "unexpected end" errors.
    end: usize,
    /// Open parentheses enclosing the current position.
    depth: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn parse_expr(&mut self) -> Result<FormulaNode, SyntaxError> {
        let mut left = self.parse_term()?;
        while let Some(token) = self.peek() {
            let op = match token.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = FormulaNode::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<FormulaNode, SyntaxError> {
        let mut left = self.parse_unary()?;
        while let Some(token) = self.peek() {
            let op = match token.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = FormulaNode::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<FormulaNode, SyntaxError> {
        // Iterative so long runs of '-' cannot exhaust the stack.
        let mut negations = 0usize;
        while let Some(Token {
            kind: TokenKind::Minus,
            ..
        }) = self.peek()
        {
            negations += 1;
            self.pos += 1;
        }
        let mut node = self.parse_atom()?;
        for _ in 0..negations {
            node = FormulaNode::negate(node);
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<FormulaNode, SyntaxError> {
        let Some(token) = self.advance() else {
            return Err(SyntaxError::new("Unexpected end of formula", self.end));
        };
        match &token.kind {
            TokenKind::Number(n) => Ok(FormulaNode::Number(*n)),
            TokenKind::CellRef(id) => Ok(FormulaNode::Reference(id.clone())),
            TokenKind::LParen => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(SyntaxError::new("Formula nested too deeply", token.offset));
                }
                self.depth += 1;
                let inner = self.parse_expr();
                self.depth -= 1;
                let inner = inner?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(SyntaxError::new(
                        format!("Expected ')' but found {}", other.kind.describe()),
                        other.offset,
                    )),
                    None => Err(SyntaxError::new("Missing closing parenthesis", self.end)),
                }
            }
            other => Err(SyntaxError::new(
                format!("Unexpected {}", other.describe()),
                token.offset,
            )),
        }
    }
}
