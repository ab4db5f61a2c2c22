//! Regular expression matching by Brzozowski derivatives.
//!
//! The derivative of an expression `r` with respect to a symbol `a` is an expression matching
//! exactly those `s` for which `r` matches `a s`. Matching a whole input is then a left fold of
//! [`derive`] over its symbols followed by one [`matches_empty`] test on the result. No automaton
//! is ever built up front.
//!
//! ```
//! use regex_deriv::{regex_match, Regex};
//!
//! let re = Regex::concat(Regex::repeat(Regex::literal('c')), Regex::literal('d'));
//! assert!(regex_match("cccd".chars(), &re));
//! assert!(!regex_match("cdc".chars(), &re));
//! ```
//!
//! Expressions are generic over the symbol type; anything `Clone + Eq` works (`char`, `u8`,
//! tokens). Besides the plain functions there are three [`Matcher`]s that give the same answers:
//! [`DerivMatcher`] (no caching), [`CachedMatcher`] (memoized transitions, see [`DerivCache`]),
//! and, with the `arena` feature, [`ArenaMatcher`](arena::ArenaMatcher), which simplifies every
//! derivative as it is built.
//!
//! # Cost
//!
//! [`derive`] never simplifies, so [`regex_match`] and [`DerivMatcher`] carry every branch that
//! can no longer match. The expression grows with each symbol, and under nested repetition such
//! as `(a*)*b` it grows exponentially in the input length. [`DerivCache`] bounds the work to one
//! `derive` per distinct transition. [`ArenaMatcher`](arena::ArenaMatcher) and
//! [`arena_match`](arena::arena_match) keep derivatives small by simplifying them, and are the
//! ones to reach for on long inputs.

pub mod cache;
pub mod deriv;
pub mod parse;
pub mod regex;

#[cfg(feature = "arena")]
pub mod arena;

pub use cache::{CacheStats, CachedMatcher, DerivCache, StateId};
pub use deriv::{derive, matches_empty, regex_match, trace, DerivMatcher, Matcher};
pub use parse::{parse, ParseError};
pub use regex::Regex;
