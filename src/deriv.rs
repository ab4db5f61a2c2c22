use std::borrow::Borrow;
use std::rc::Rc;

use crate::regex::Regex;

/// Does `re` match the empty sequence?
pub fn matches_empty<S>(re: &Regex<S>) -> bool {
    match re {
        Regex::EmptySet => false,
        Regex::EmptyStr => true,
        Regex::Literal(_) => false,
        Regex::Concat(l, r) => matches_empty(l) && matches_empty(r),
        Regex::Alternate(l, r) => matches_empty(l) || matches_empty(r),
        Regex::Repeat(_) => true,
    }
}

/// The derivative of `re` with respect to `a`: an expression matching `s` exactly when `re`
/// matches `a` followed by `s`.
///
/// The result is built node for node with no simplification, so it can be larger than `re`.
/// Subtrees that survive unchanged are shared, not copied.
pub fn derive<S: Clone + Eq>(a: &S, re: &Regex<S>) -> Regex<S> {
    match re {
        Regex::EmptySet | Regex::EmptyStr => Regex::EmptySet,
        Regex::Literal(b) if a == b => Regex::EmptyStr,
        Regex::Literal(_) => Regex::EmptySet,
        // If the left side can match nothing, `a` may be the first symbol of the right side.
        Regex::Concat(l, r) if matches_empty(l) => Regex::Alternate(
            Rc::new(Regex::Concat(Rc::new(derive(a, l)), r.clone())),
            Rc::new(derive(a, r)),
        ),
        Regex::Concat(l, r) => Regex::Concat(Rc::new(derive(a, l)), r.clone()),
        Regex::Alternate(l, r) => {
            Regex::Alternate(Rc::new(derive(a, l)), Rc::new(derive(a, r)))
        }
        Regex::Repeat(body) => Regex::Concat(
            Rc::new(derive(a, body)),
            Rc::new(Regex::Repeat(body.clone())),
        ),
    }
}

/// Does `re` match the whole of `input`?
///
/// Folds [`derive`] over the input from left to right, then asks [`matches_empty`] of what is
/// left. This is not a search: a match must cover every symbol.
///
/// Derivatives are never simplified, so they keep every branch that can no longer match. Each
/// step grows the expression, and under nested repetition such as `(a*)*b` it grows
/// exponentially in the input length. For long inputs or patterns like that, use
/// [`DerivCache`](crate::DerivCache) to share repeated work, or the simplifying
/// `arena::ArenaMatcher`.
pub fn regex_match<S, I>(input: I, re: &Regex<S>) -> bool
where
    S: Clone + Eq,
    I: IntoIterator,
    I::Item: Borrow<S>,
{
    let mut current = re.clone();
    let mut consumed = 0usize;
    for symbol in input {
        current = derive(symbol.borrow(), &current);
        consumed += 1;
    }
    let accepts = matches_empty(&current);
    log::trace!("consumed {} symbols, accepting: {}", consumed, accepts);
    accepts
}

/// The states visited while matching `input`: `re` itself, then one derivative per symbol.
///
/// The last element is accepting exactly when [`regex_match`] returns true.
pub fn trace<S, I>(input: I, re: &Regex<S>) -> Vec<Regex<S>>
where
    S: Clone + Eq,
    I: IntoIterator,
    I::Item: Borrow<S>,
{
    let mut current = re.clone();
    let mut states = vec![current.clone()];
    for symbol in input {
        current = derive(symbol.borrow(), &current);
        states.push(current.clone());
    }
    states
}

impl<S: Clone + Eq> Regex<S> {
    pub fn matches_empty(&self) -> bool {
        matches_empty(self)
    }

    pub fn derive(&self, symbol: &S) -> Regex<S> {
        derive(symbol, self)
    }

    /// See [`regex_match`].
    pub fn is_match<I>(&self, input: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        regex_match(input, self)
    }
}

/// An incremental matcher. Its state tracks the input consumed since the last `reset`.
///
/// **Requirement.** `accepts()` is true iff the regex matches the input consumed so far, and
/// `is_dead()` may only be true if `accepts()` will stay false whatever comes next.
pub trait Matcher<S> {
    /// Forget all input consumed so far.
    fn reset(&mut self);
    /// Consume one more symbol.
    fn advance(&mut self, symbol: &S);
    /// Does the regex match the input consumed so far?
    fn accepts(&self) -> bool;
    /// Used to stop reading input early. Returning `false` is always correct.
    fn is_dead(&self) -> bool {
        false
    }

    /// Does the regex match the _entire_ input? Resets first.
    fn is_match<I>(&mut self, input: I) -> bool
    where
        Self: Sized,
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        self.reset();
        for symbol in input {
            self.advance(symbol.borrow());
            if self.is_dead() {
                return false;
            }
        }
        self.accepts()
    }
}

/// The plain derivative matcher: its state is the current derivative.
#[derive(Debug, Clone)]
pub struct DerivMatcher<S> {
    start: Regex<S>,
    current: Regex<S>,
}

impl<S: Clone + Eq> DerivMatcher<S> {
    pub fn new(re: Regex<S>) -> DerivMatcher<S> {
        DerivMatcher {
            current: re.clone(),
            start: re,
        }
    }

    /// The expression the remaining input has to match.
    pub fn current(&self) -> &Regex<S> {
        &self.current
    }
}

impl<S: Clone + Eq> Matcher<S> for DerivMatcher<S> {
    fn reset(&mut self) {
        self.current = self.start.clone();
    }

    fn advance(&mut self, symbol: &S) {
        self.current = derive(symbol, &self.current);
    }

    fn accepts(&self) -> bool {
        matches_empty(&self.current)
    }

    // `∅` derives to itself, so once here nothing can match.
    fn is_dead(&self) -> bool {
        self.current == Regex::EmptySet
    }
}
