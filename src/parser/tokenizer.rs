// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

use char_feed::{CharFeed, Position};

#[derive(Clone, Error, Debug, Eq, PartialEq)]
pub enum TokenizeError {
    #[error("unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("invalid integer")]
    InvalidInteger,
    #[error("unparsable integer")]
    UnparsableInteger {
        #[from]
        source: std::num::ParseIntError,
    },
    #[error("unparsable float")]
    UnparsableFloat {
        #[from]
        source: std::num::ParseFloatError,
    },
    #[error("unterminated string")]
    UnterminatedString,
}

/// A tokenize error labelled with where in the input it happened.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenizeErrorAt {
    pub error: TokenizeError,
    pub at: Position,
}

impl std::error::Error for TokenizeErrorAt {}

impl std::fmt::Display for TokenizeErrorAt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, column) = self.at;
        write!(f, "{} (at line {}, column {})", self.error, line, column)
    }
}

type TResult<T> = Result<T, TokenizeError>;
type TAResult<T> = Result<T, TokenizeErrorAt>;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenContents {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Newline,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Integer(i64),
    Float(f64),
    Str(String),
    Identifier(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub contents: TokenContents,
    pub at: Position,
}

fn char_starts_identifier(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn char_continues_identifier(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub struct Tokenizer<I: Iterator<Item = char>> {
    input: CharFeed<I>,
    peeked: Option<Option<TAResult<Token>>>,
    stopped: bool,
}

impl<I> Tokenizer<I>
where
    I: Iterator<Item = char>,
{
    /// Position of the next unread character; used to report where input
    /// ran out.
    pub fn position(&self) -> Position {
        self.input.position()
    }

    pub fn next_token(&mut self) -> Option<TAResult<Token>> {
        if let Some(peeked) = self.peeked.take() {
            return peeked;
        }

        self.read_token()
    }

    pub fn peek_token(&mut self) -> Option<&TAResult<Token>> {
        if self.peeked.is_none() {
            let next = self.read_token();
            self.peeked = Some(next);
        }

        self.peeked.as_ref().and_then(|t| t.as_ref())
    }

    fn read_token(&mut self) -> Option<TAResult<Token>> {
        use TokenContents::*;

        if self.stopped {
            return None;
        }

        self.input
            .skip_while(|c| c.is_ascii_whitespace() && c != '\n');

        let at = self.input.position();

        let contents = self.input.next().map(|c| match c {
            '\n' => Ok(Newline),
            '(' => Ok(LParen),
            ')' => Ok(RParen),
            '[' => Ok(LBracket),
            ']' => Ok(RBracket),
            ',' => Ok(Comma),
            ';' => Ok(Semicolon),
            '+' => Ok(Plus),
            '-' => Ok(Minus),
            '*' => Ok(Star),
            '/' => Ok(Slash),
            '%' => Ok(Percent),
            '=' => Ok(if self.input.next_if(|c| c == '=').is_some() {
                EqEq
            } else {
                Assign
            }),
            '!' => {
                if self.input.next_if(|c| c == '=').is_some() {
                    Ok(NotEq)
                } else {
                    Err(TokenizeError::UnexpectedChar('!'))
                }
            }
            '<' => Ok(if self.input.next_if(|c| c == '=').is_some() {
                LtEq
            } else {
                Lt
            }),
            '>' => Ok(if self.input.next_if(|c| c == '=').is_some() {
                GtEq
            } else {
                Gt
            }),
            '"' => Ok(Str(self.tokenize_string()?)),
            _ if c.is_ascii_digit() => self.tokenize_number(c),
            _ if char_starts_identifier(c) => Ok(Identifier(self.tokenize_identifier(c))),
            _ => Err(TokenizeError::UnexpectedChar(c)),
        });

        if let Some(Err(_)) = contents {
            self.stopped = true;
        }

        contents.map(|contents| {
            contents
                .map(|contents| Token { contents, at })
                .map_err(|error| TokenizeErrorAt { error, at })
        })
    }

    fn tokenize_string(&mut self) -> TResult<String> {
        let result = self.input.collect_while(|c| c != '"');

        if self.input.next().is_none() {
            return Err(TokenizeError::UnterminatedString);
        }

        Ok(result)
    }

    fn tokenize_identifier(&mut self, first_char: char) -> String {
        let mut result = String::new();
        result.push(first_char);
        result.push_str(&self.input.collect_while(char_continues_identifier));

        result
    }

    fn tokenize_number(&mut self, mut first_char: char) -> TResult<TokenContents> {
        let mut base = 10;

        if first_char == '0' {
            match self.input.peek() {
                Some('b') => {
                    base = 2;
                    self.input.next();
                    first_char = self.input.next().ok_or(TokenizeError::InvalidInteger)?;
                }
                Some('x') => {
                    base = 16;
                    self.input.next();
                    first_char = self.input.next().ok_or(TokenizeError::InvalidInteger)?;
                }
                _ => {}
            }
        }

        // Letters are swallowed here so that `04y` fails as an unparsable
        // number rather than splitting into a number and an identifier.
        let mut s = String::new();
        s.push(first_char);
        s.push_str(&self.input.collect_while(|c| c.is_ascii_alphanumeric()));

        if base == 10 && self.input.peek() == Some('.') {
            self.input.next();
            s.push('.');
            s.push_str(&self.input.collect_while(|c| c.is_ascii_alphanumeric()));

            return s
                .parse::<f64>()
                .map(TokenContents::Float)
                .map_err(|e| e.into());
        }

        i64::from_str_radix(&s, base)
            .map(TokenContents::Integer)
            .map_err(|e| e.into())
    }
}

impl<I> std::iter::Iterator for Tokenizer<I>
where
    I: Iterator<Item = char>,
{
    type Item = TAResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

pub fn tokenize<I>(input: I) -> Tokenizer<I::IntoIter>
where
    I: IntoIterator<Item = char>,
{
    Tokenizer {
        input: CharFeed::new(input.into_iter()),
        peeked: None,
        stopped: false,
    }
}
