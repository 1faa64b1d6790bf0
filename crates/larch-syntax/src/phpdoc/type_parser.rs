use thiserror::Error;

use super::{IdentifierTypeNode, TypeNode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("expected a type at offset {offset}")]
    ExpectedType { offset: usize },
    #[error("expected `{expected}` at offset {offset}")]
    Expected { expected: char, offset: usize },
    #[error("unexpected `{found}` after type at offset {offset}")]
    TrailingInput { found: String, offset: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(char),
}

#[derive(Clone, Debug)]
struct Lexed<'a> {
    token: Token<'a>,
    start: usize,
    end: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '\\' | '-' | '$') || !c.is_ascii()
}

fn lex(input: &str) -> Vec<Lexed<'_>> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if is_ident_char(c) {
            let mut end = start;
            while let Some(&(idx, c)) = chars.peek() {
                if !is_ident_char(c) {
                    break;
                }
                end = idx + c.len_utf8();
                chars.next();
            }
            out.push(Lexed {
                token: Token::Ident(&input[start..end]),
                start,
                end,
            });
        } else {
            chars.next();
            out.push(Lexed {
                token: Token::Punct(c),
                start,
                end: start + c.len_utf8(),
            });
        }
    }
    out
}

struct Parser<'a> {
    tokens: Vec<Lexed<'a>>,
    pos: usize,
    input_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.start)
            .unwrap_or(self.input_len)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(&Token::Punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), TypeParseError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(TypeParseError::Expected {
                expected: c,
                offset: self.offset(),
            })
        }
    }

    fn parse_type(&mut self) -> Result<TypeNode, TypeParseError> {
        let first = self.parse_intersection()?;
        if self.peek() != Some(&Token::Punct('|')) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.eat('|') {
            types.push(self.parse_intersection()?);
        }
        Ok(TypeNode::Union(types))
    }

    fn parse_intersection(&mut self) -> Result<TypeNode, TypeParseError> {
        let first = self.parse_postfix()?;
        if self.peek() != Some(&Token::Punct('&')) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.eat('&') {
            types.push(self.parse_postfix()?);
        }
        Ok(TypeNode::Intersection(types))
    }

    fn parse_postfix(&mut self) -> Result<TypeNode, TypeParseError> {
        let mut ty = self.parse_atomic()?;
        while self.peek() == Some(&Token::Punct('['))
            && self.tokens.get(self.pos + 1).map(|t| &t.token) == Some(&Token::Punct(']'))
        {
            self.pos += 2;
            ty = TypeNode::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_atomic(&mut self) -> Result<TypeNode, TypeParseError> {
        match self.peek().cloned() {
            Some(Token::Punct('?')) => {
                self.pos += 1;
                Ok(TypeNode::Nullable(Box::new(self.parse_atomic()?)))
            }
            Some(Token::Punct('(')) => {
                self.pos += 1;
                let inner = self.parse_type()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                self.pos += 1;
                let base = IdentifierTypeNode::new(name);
                if !self.eat('<') {
                    return Ok(TypeNode::Identifier(base));
                }
                let mut args = vec![self.parse_type()?];
                while self.eat(',') {
                    args.push(self.parse_type()?);
                }
                self.expect('>')?;
                Ok(TypeNode::Generic { base, args })
            }
            _ => Err(TypeParseError::ExpectedType {
                offset: self.offset(),
            }),
        }
    }
}

/// Parse a complete PHPDoc type expression.
pub fn parse_type(input: &str) -> Result<TypeNode, TypeParseError> {
    let (ty, rest) = parse_type_prefix(input)?;
    let rest_trimmed = rest.trim_start();
    if rest_trimmed.is_empty() {
        Ok(ty)
    } else {
        Err(TypeParseError::TrailingInput {
            found: rest_trimmed.to_string(),
            offset: input.len() - rest_trimmed.len(),
        })
    }
}

/// Parse the type at the start of `input` and return it together with the
/// unconsumed remainder (for a tag, the description).
///
/// Tokens after a complete type are left alone unless they continue it
/// (`|`, `&`, `[]`, `<`).
pub(crate) fn parse_type_prefix(input: &str) -> Result<(TypeNode, &str), TypeParseError> {
    let mut parser = Parser {
        tokens: lex(input),
        pos: 0,
        input_len: input.len(),
    };
    let ty = parser.parse_type()?;
    let consumed = parser
        .pos
        .checked_sub(1)
        .and_then(|last| parser.tokens.get(last))
        .map(|t| t.end)
        .unwrap_or(0);
    Ok((ty, &input[consumed..]))
}
