//! Textual patterns for `Regex<char>`.
//!
//! ```text
//! a|b    alternation          ab     concatenation
//! a*     zero or more         a+     one or more         a?    zero or one
//! (..)   grouping             ()     the empty string    []    the empty set
//! [abc]  any of a, b, c       [a-z]  range               \*    escaped metacharacter
//! ```
//!
//! Concatenation binds tighter than alternation. Concatenation nests to the right and
//! alternation to the left; a class is a balanced alternation. An empty branch (as in `a|`) is
//! the empty string.

use std::iter::Peekable;
use std::str::CharIndices;
use std::str::FromStr;

use thiserror::Error;

use crate::regex::Regex;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("group opened at offset {0} is never closed")]
    UnclosedGroup(usize),
    #[error("character class opened at offset {0} is never closed")]
    UnclosedClass(usize),
    #[error("nothing to repeat before `{op}` at offset {offset}")]
    NothingToRepeat { op: char, offset: usize },
    #[error("pattern ends with an unfinished escape")]
    DanglingEscape,
    #[error("range `{start}-{end}` at offset {offset} is out of order")]
    InvalidRange {
        start: char,
        end: char,
        offset: usize,
    },
}

/// Parse a pattern into an expression.
pub fn parse(pattern: &str) -> Result<Regex<char>, ParseError> {
    let mut parser = Parser {
        chars: pattern.char_indices().peekable(),
    };
    let re = parser.parse_alternation()?;
    if let Some((offset, found)) = parser.chars.next() {
        return Err(ParseError::Unexpected { found, offset });
    }
    log::debug!("parsed {:?} into {} nodes", pattern, re.size());
    Ok(re)
}

impl FromStr for Regex<char> {
    type Err = ParseError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        parse(pattern)
    }
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl Parser<'_> {
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn parse_alternation(&mut self) -> Result<Regex<char>, ParseError> {
        let mut re = self.parse_concat()?;
        while self.peek_char() == Some('|') {
            self.chars.next();
            let right = self.parse_concat()?;
            re = Regex::alternate(re, right);
        }
        Ok(re)
    }

    fn parse_concat(&mut self) -> Result<Regex<char>, ParseError> {
        let mut parts = Vec::new();
        loop {
            let (offset, c) = match self.chars.peek() {
                None | Some(&(_, '|')) | Some(&(_, ')')) => break,
                Some(&next) => next,
            };
            self.chars.next();
            parts.push(self.parse_postfix(offset, c)?);
        }
        Ok(Regex::concat_all(parts))
    }

    fn parse_postfix(&mut self, offset: usize, c: char) -> Result<Regex<char>, ParseError> {
        let mut re = self.parse_atom(offset, c)?;
        loop {
            re = match self.peek_char() {
                Some('*') => Regex::repeat(re),
                Some('+') => Regex::plus(re),
                Some('?') => Regex::optional(re),
                _ => return Ok(re),
            };
            self.chars.next();
        }
    }

    fn parse_atom(&mut self, offset: usize, c: char) -> Result<Regex<char>, ParseError> {
        match c {
            '(' => {
                let inner = self.parse_alternation()?;
                match self.chars.next() {
                    Some((_, ')')) => Ok(inner),
                    _ => Err(ParseError::UnclosedGroup(offset)),
                }
            }
            '[' => self.parse_class(offset),
            '\\' => self.parse_escape().map(Regex::Literal),
            '*' | '+' | '?' => Err(ParseError::NothingToRepeat { op: c, offset }),
            ']' => Err(ParseError::Unexpected { found: c, offset }),
            c => Ok(Regex::Literal(c)),
        }
    }

    fn parse_escape(&mut self) -> Result<char, ParseError> {
        self.chars
            .next()
            .map(|(_, c)| c)
            .ok_or(ParseError::DanglingEscape)
    }

    fn parse_class(&mut self, open: usize) -> Result<Regex<char>, ParseError> {
        let mut symbols = Vec::new();
        loop {
            let (offset, c) = self.chars.next().ok_or(ParseError::UnclosedClass(open))?;
            let start = match c {
                ']' => break,
                '\\' => self.parse_escape()?,
                c => c,
            };
            if self.peek_char() != Some('-') {
                symbols.push(start);
                continue;
            }
            // A `-` right before the closing bracket is an ordinary symbol.
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if let None | Some((_, ']')) = lookahead.next() {
                symbols.push(start);
                continue;
            }
            self.chars.next();
            let end = match self.chars.next() {
                Some((_, '\\')) => self.parse_escape()?,
                Some((_, c)) => c,
                None => return Err(ParseError::UnclosedClass(open)),
            };
            if end < start {
                return Err(ParseError::InvalidRange { start, end, offset });
            }
            symbols.extend(start..=end);
        }
        Ok(Regex::any_of(symbols))
    }
}
