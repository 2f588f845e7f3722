// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bitflags::bitflags;
use thiserror::Error;

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("expected {expected}, got {actual}")]
    ExpectedKind { expected: Kind, actual: Kind },

    #[error("argument {position} invalid: {source}")]
    InvalidArgument { position: usize, source: Box<Error> },

    #[error("too many arguments; expected at most {expected}, got {actual}")]
    TooManyArguments { expected: usize, actual: usize },

    #[error("not enough arguments; expected at least {expected}, got {actual}")]
    NotEnoughArguments { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Nil,
    Boolean,
    Integer,
    Float,
    Text,
    List,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Kind::Nil => "nil",
                Kind::Boolean => "boolean",
                Kind::Integer => "integer",
                Kind::Float => "float",
                Kind::Text => "text",
                Kind::List => "list",
            }
        )
    }
}

bitflags! {
    /// A set of value kinds, used to pick which bindings an evaluation pass
    /// tracks.
    pub struct KindSet: u8 {
        const NIL = 1 << 0;
        const BOOLEAN = 1 << 1;
        const INTEGER = 1 << 2;
        const FLOAT = 1 << 3;
        const TEXT = 1 << 4;
        const LIST = 1 << 5;
    }
}

impl KindSet {
    pub fn tracks(&self, kind: Kind) -> bool {
        self.contains(kind.into())
    }
}

impl From<Kind> for KindSet {
    fn from(kind: Kind) -> KindSet {
        match kind {
            Kind::Nil => KindSet::NIL,
            Kind::Boolean => KindSet::BOOLEAN,
            Kind::Integer => KindSet::INTEGER,
            Kind::Float => KindSet::FLOAT,
            Kind::Text => KindSet::TEXT,
            Kind::List => KindSet::LIST,
        }
    }
}

impl Default for KindSet {
    /// Text, integer and float bindings are tracked unless the caller says
    /// otherwise.
    fn default() -> KindSet {
        KindSet::TEXT | KindSet::INTEGER | KindSet::FLOAT
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KindSpec {
    Any,
    Base(Kind),
    Number,
    Sized,
}

impl KindSpec {
    fn check(&self, actual: Kind) -> Result<()> {
        use KindSpec::*;

        match *self {
            Any => Ok(()),
            Base(expected) => {
                if actual == expected {
                    Ok(())
                } else {
                    Err(Error::ExpectedKind { expected, actual })
                }
            }
            Number => {
                if actual == Kind::Integer || actual == Kind::Float {
                    Ok(())
                } else {
                    Err(Error::ExpectedKind {
                        expected: Kind::Integer,
                        actual,
                    })
                }
            }
            Sized => {
                if actual == Kind::Text || actual == Kind::List {
                    Ok(())
                } else {
                    Err(Error::ExpectedKind {
                        expected: Kind::List,
                        actual,
                    })
                }
            }
        }
    }

    pub fn check_at(&self, actual: Kind, position: usize) -> Result<()> {
        self.check(actual).map_err(|e| Error::InvalidArgument {
            position,
            source: Box::new(e),
        })
    }
}

impl From<Kind> for KindSpec {
    fn from(k: Kind) -> KindSpec {
        KindSpec::Base(k)
    }
}

#[derive(Debug)]
pub struct Signature {
    argument_specs: Vec<KindSpec>,
    rest_argument_spec: Option<KindSpec>,
}

impl Signature {
    pub fn new() -> SignatureBuilder {
        SignatureBuilder(Self {
            argument_specs: Vec::new(),
            rest_argument_spec: None,
        })
    }

    pub fn check_arguments_length(&self, actual: usize) -> Result<()> {
        let expected = self.argument_specs.len();

        if actual < expected {
            Err(Error::NotEnoughArguments { expected, actual })
        } else if actual > expected && self.rest_argument_spec.is_none() {
            Err(Error::TooManyArguments { expected, actual })
        } else {
            Ok(())
        }
    }

    pub fn specs_by_position(&self) -> impl Iterator<Item = &KindSpec> + '_ {
        let mut arg_specs = self.argument_specs.iter();
        let mut arg_spec = arg_specs.next();

        std::iter::from_fn(move || match arg_spec {
            None => self.rest_argument_spec.as_ref(),
            Some(spec) => {
                arg_spec = arg_specs.next();

                Some(spec)
            }
        })
    }

    /// Checks a call's argument kinds against this signature.
    pub fn check_arguments(&self, kinds: impl IntoIterator<Item = Kind>) -> Result<()> {
        let kinds: Vec<_> = kinds.into_iter().collect();

        self.check_arguments_length(kinds.len())?;

        for (position, (spec, kind)) in self.specs_by_position().zip(kinds).enumerate() {
            spec.check_at(kind, position)?;
        }

        Ok(())
    }
}

#[must_use]
pub struct SignatureBuilder(Signature);

impl SignatureBuilder {
    pub fn build(self) -> Signature {
        self.0
    }

    pub fn add(mut self, argument_spec: impl Into<KindSpec>) -> Self {
        self.0.argument_specs.push(argument_spec.into());

        self
    }

    pub fn add_rest(mut self, argument_spec: impl Into<KindSpec>) -> Self {
        self.0.rest_argument_spec = Some(argument_spec.into());

        self
    }
}

impl std::convert::From<SignatureBuilder> for Signature {
    fn from(b: SignatureBuilder) -> Self {
        b.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use k9::assert_err_matches_regex;

    #[test]
    fn any_takes_any_kind() -> Result<()> {
        for kind in vec![Kind::Nil, Kind::Boolean, Kind::Integer, Kind::Text] {
            KindSpec::Any.check(kind)?;
        }

        Ok(())
    }

    #[test]
    fn specific_kind_takes_only_that_kind() -> Result<()> {
        let spec = KindSpec::Base(Kind::Boolean);

        spec.check(Kind::Boolean)?;
        assert_err_matches_regex!(spec.check(Kind::Integer), "ExpectedKind.*Boolean.*Integer");

        Ok(())
    }

    #[test]
    fn number_takes_integer_or_float() -> Result<()> {
        let spec = KindSpec::Number;

        spec.check(Kind::Integer)?;
        spec.check(Kind::Float)?;
        assert_err_matches_regex!(spec.check(Kind::Text), "ExpectedKind.*Integer.*Text");

        Ok(())
    }

    #[test]
    fn sized_takes_text_or_list() -> Result<()> {
        let spec = KindSpec::Sized;

        spec.check(Kind::Text)?;
        spec.check(Kind::List)?;
        assert_err_matches_regex!(spec.check(Kind::Float), "ExpectedKind.*List.*Float");

        Ok(())
    }

    #[test]
    fn function_taking_fixed_arguments_rejects_more_or_less() -> Result<()> {
        let signature = Signature::new().add(KindSpec::Any).add(KindSpec::Any).build();

        signature.check_arguments(vec![Kind::Integer, Kind::Integer])?;
        assert_err_matches_regex!(
            signature.check_arguments(vec![Kind::Integer, Kind::Integer, Kind::Integer]),
            "TooManyArguments.*2.*3"
        );
        assert_err_matches_regex!(
            signature.check_arguments(vec![Kind::Integer]),
            "NotEnoughArguments.*2.*1"
        );

        Ok(())
    }

    #[test]
    fn function_taking_fixed_and_rest_arguments_rejects_less() -> Result<()> {
        let signature = Signature::new()
            .add(KindSpec::Number)
            .add_rest(KindSpec::Number)
            .build();

        signature.check_arguments(vec![Kind::Integer])?;
        signature.check_arguments(vec![Kind::Integer, Kind::Float, Kind::Integer])?;
        assert_err_matches_regex!(
            signature.check_arguments(vec![]),
            "NotEnoughArguments.*1.*0"
        );

        Ok(())
    }

    #[test]
    fn argument_position_reported() -> Result<()> {
        let signature = Signature::new().add(Kind::Integer).add(Kind::Boolean).build();

        signature.check_arguments(vec![Kind::Integer, Kind::Boolean])?;
        assert_err_matches_regex!(
            signature.check_arguments(vec![Kind::Integer, Kind::Text]),
            "InvalidArgument.*1.*Boolean.*Text"
        );

        Ok(())
    }

    #[test]
    fn kind_set_tracks_members_only() {
        let kinds = KindSet::default();

        assert!(kinds.tracks(Kind::Text));
        assert!(kinds.tracks(Kind::Integer));
        assert!(kinds.tracks(Kind::Float));
        assert!(!kinds.tracks(Kind::Boolean));
        assert!(!kinds.tracks(Kind::List));
        assert!(!kinds.tracks(Kind::Nil));

        assert!(KindSet::INTEGER.tracks(Kind::Integer));
        assert!(!KindSet::INTEGER.tracks(Kind::Float));
    }
}
