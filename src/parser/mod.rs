// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod tokenizer;

use thiserror::Error;

use self::tokenizer::{tokenize, Token, TokenContents, TokenizeError, TokenizeErrorAt, Tokenizer};
use crate::ast::{AssignTarget, BinaryOp, Expr, Statement, UnaryOp};
use crate::value::Value;
use char_feed::Position;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum ErrorInternal {
    #[error("unexpected end of input")]
    Eof,
    #[error("{source}")]
    Tokenize {
        #[from]
        source: TokenizeError,
    },
    #[error("unexpected token")]
    UnexpectedToken(TokenContents),
    #[error("cannot assign to this target")]
    InvalidAssignTarget,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    error: ErrorInternal,
    line: usize,
    column: usize,
}

impl Error {
    fn from_internal_at(error: ErrorInternal, at: Position) -> Self {
        let (line, column) = at;
        Error {
            error,
            line,
            column,
        }
    }

    /// True when the parse failed only because the input ran out mid-way
    /// through a statement; more lines may yet complete it.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self.error,
            ErrorInternal::Eof
                | ErrorInternal::Tokenize {
                    source: TokenizeError::UnterminatedString,
                }
        )
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(
            f,
            "{} (at line {}, column {})",
            self.error, self.line, self.column
        )
    }
}

type Result<T> = std::result::Result<T, Error>;

pub struct Parser<I: Iterator<Item = char>> {
    input: Tokenizer<I>,
    depth: usize,
}

impl<I: Iterator<Item = char>> Parser<I> {
    fn wrap_tokenize_error(e: &TokenizeErrorAt) -> Error {
        Error::from_internal_at(
            ErrorInternal::Tokenize {
                source: e.error.clone(),
            },
            e.at,
        )
    }

    fn eof_error(&self) -> Error {
        Error::from_internal_at(ErrorInternal::Eof, self.input.position())
    }

    /// Next significant token, without consuming it. Newlines are skipped
    /// while inside parentheses or brackets; elsewhere they separate
    /// statements and are returned like any other token.
    fn peek_contents(&mut self) -> Result<Option<(TokenContents, Position)>> {
        loop {
            let skip = matches!(
                self.input.peek_token(),
                Some(Ok(Token {
                    contents: TokenContents::Newline,
                    ..
                })) if self.depth > 0
            );

            if !skip {
                break;
            }

            self.input.next_token();
        }

        match self.input.peek_token() {
            None => Ok(None),
            Some(Err(e)) => Err(Self::wrap_tokenize_error(e)),
            Some(Ok(token)) => Ok(Some((token.contents.clone(), token.at))),
        }
    }

    fn next(&mut self) -> Result<Option<Token>> {
        self.peek_contents()?;

        match self.input.next_token() {
            None => Ok(None),
            Some(Err(e)) => Err(Self::wrap_tokenize_error(&e)),
            Some(Ok(token)) => Ok(Some(token)),
        }
    }

    fn next_or_eof(&mut self) -> Result<Token> {
        match self.next()? {
            Some(token) => Ok(token),
            None => Err(self.eof_error()),
        }
    }

    fn skip_separators(&mut self) -> Result<()> {
        while let Some((contents, _)) = self.peek_contents()? {
            if contents == TokenContents::Newline || contents == TokenContents::Semicolon {
                self.next()?;
            } else {
                break;
            }
        }

        Ok(())
    }

    pub fn parse_program(&mut self) -> Result<Vec<Statement>> {
        let mut statements = vec![];

        loop {
            self.skip_separators()?;

            if self.peek_contents()?.is_none() {
                break;
            }

            statements.push(self.parse_statement()?);

            match self.peek_contents()? {
                None => break,
                Some((TokenContents::Newline, _)) | Some((TokenContents::Semicolon, _)) => {}
                Some((contents, at)) => {
                    return Err(Error::from_internal_at(
                        ErrorInternal::UnexpectedToken(contents),
                        at,
                    ))
                }
            }
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        let expr = self.parse_expr()?;

        if let Some((TokenContents::Assign, at)) = self.peek_contents()? {
            self.next()?;
            let target = Self::expr_into_target(expr, at)?;
            let value = self.parse_expr()?;

            return Ok(Statement::Assign {
                target,
                expr: value,
            });
        }

        Ok(Statement::Expr(expr))
    }

    /// Reinterprets an already-parsed expression as an assignment target.
    /// The grammar cannot tell `(a, b) = ...` from the expression `(a, b)`
    /// until the `=` shows up, so targets are parsed as expressions first.
    fn expr_into_target(expr: Expr, at: Position) -> Result<AssignTarget> {
        let invalid = || Error::from_internal_at(ErrorInternal::InvalidAssignTarget, at);

        match expr {
            Expr::Variable(name) => Ok(AssignTarget::Name(name)),
            Expr::List(items) => {
                let mut names = vec![];

                for item in items {
                    match item {
                        Expr::Variable(name) => names.push(name),
                        _ => return Err(invalid()),
                    }
                }

                Ok(AssignTarget::Unpack(names))
            }
            _ => Err(invalid()),
        }
    }

    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_comparison()
    }

    fn parse_binary_tier(
        &mut self,
        op_for: impl Fn(&TokenContents) -> Option<BinaryOp>,
        mut operand: impl FnMut(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut left = operand(self)?;

        while let Some((contents, _)) = self.peek_contents()? {
            let op = match op_for(&contents) {
                Some(op) => op,
                None => break,
            };

            self.next()?;
            let right = operand(self)?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        use TokenContents::*;

        self.parse_binary_tier(
            |contents| match contents {
                EqEq => Some(BinaryOp::Eq),
                NotEq => Some(BinaryOp::NotEq),
                Lt => Some(BinaryOp::Lt),
                LtEq => Some(BinaryOp::LtEq),
                Gt => Some(BinaryOp::Gt),
                GtEq => Some(BinaryOp::GtEq),
                _ => None,
            },
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        use TokenContents::*;

        self.parse_binary_tier(
            |contents| match contents {
                Plus => Some(BinaryOp::Add),
                Minus => Some(BinaryOp::Sub),
                _ => None,
            },
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        use TokenContents::*;

        self.parse_binary_tier(
            |contents| match contents {
                Star => Some(BinaryOp::Mul),
                Slash => Some(BinaryOp::Div),
                Percent => Some(BinaryOp::Rem),
                _ => None,
            },
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if let Some((TokenContents::Minus, _)) = self.peek_contents()? {
            self.next()?;
            let expr = self.parse_unary()?;

            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(expr),
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        use TokenContents::*;

        let token = self.next_or_eof()?;

        match token.contents {
            Integer(i) => Ok(Expr::Literal(Value::Integer(i))),
            Float(x) => Ok(Expr::Literal(Value::Float(x))),
            Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Identifier(name) => match name.as_str() {
                "nil" => Ok(Expr::Literal(Value::Nil)),
                "true" => Ok(Expr::Literal(Value::Boolean(true))),
                "false" => Ok(Expr::Literal(Value::Boolean(false))),
                _ => {
                    if let Some((LParen, _)) = self.peek_contents()? {
                        self.next()?;
                        let args = self.parse_grouped_items(RParen)?;

                        return Ok(Expr::Call { name, args });
                    }

                    Ok(Expr::Variable(name))
                }
            },
            LParen => self.parse_parenthesized(),
            LBracket => Ok(Expr::List(self.parse_grouped_items(RBracket)?)),
            contents => Err(Error::from_internal_at(
                ErrorInternal::UnexpectedToken(contents),
                token.at,
            )),
        }
    }

    fn parse_grouped_items(&mut self, terminator: TokenContents) -> Result<Vec<Expr>> {
        self.depth += 1;
        let items = self.parse_items_until(&terminator)?;
        self.depth -= 1;

        Ok(items)
    }

    fn parse_items_until(&mut self, terminator: &TokenContents) -> Result<Vec<Expr>> {
        use TokenContents::*;

        let mut items = vec![];

        loop {
            match self.peek_contents()? {
                None => return Err(self.eof_error()),
                Some((contents, _)) if contents == *terminator => {
                    self.next()?;
                    break;
                }
                _ => {}
            }

            items.push(self.parse_expr()?);

            match self.peek_contents()? {
                None => return Err(self.eof_error()),
                Some((contents, _)) if contents == *terminator => {
                    self.next()?;
                    break;
                }
                Some((Comma, _)) => {
                    self.next()?;
                }
                Some((contents, at)) => {
                    return Err(Error::from_internal_at(
                        ErrorInternal::UnexpectedToken(contents),
                        at,
                    ))
                }
            }
        }

        Ok(items)
    }

    /// `(` already consumed: either a grouping or a list built with tuple
    /// syntax, told apart by a comma after the first element.
    fn parse_parenthesized(&mut self) -> Result<Expr> {
        use TokenContents::*;

        self.depth += 1;

        if let Some((RParen, _)) = self.peek_contents()? {
            self.next()?;
            self.depth -= 1;

            return Ok(Expr::List(vec![]));
        }

        let first = self.parse_expr()?;

        let expr = match self.peek_contents()? {
            None => return Err(self.eof_error()),
            Some((RParen, _)) => {
                self.next()?;
                first
            }
            Some((Comma, _)) => {
                self.next()?;
                let mut items = vec![first];
                items.extend(self.parse_items_until(&RParen)?);

                Expr::List(items)
            }
            Some((contents, at)) => {
                return Err(Error::from_internal_at(
                    ErrorInternal::UnexpectedToken(contents),
                    at,
                ))
            }
        };

        self.depth -= 1;

        Ok(expr)
    }
}

pub fn parse_statements<I>(input: I) -> Result<Vec<Statement>>
where
    I: IntoIterator<Item = char>,
{
    let mut parser = Parser {
        input: tokenize(input.into_iter()),
        depth: 0,
    };

    parser.parse_program()
}
