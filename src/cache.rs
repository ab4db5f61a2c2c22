//! Memoized derivatives.
//!
//! A [`DerivCache`] hash-conses expressions: every structurally distinct expression it sees gets
//! a dense [`StateId`], and each `(state, symbol)` transition is computed with [`derive`] at most
//! once. The states and transitions form a lazily built automaton; it accepts exactly what
//! [`regex_match`](crate::regex_match) accepts.

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::deriv::{derive, matches_empty, Matcher};
use crate::regex::Regex;

/// Index of an interned expression in a [`DerivCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    /// Position of the state in interning order: the first expression interned is 0, the next
    /// new one 1, and so on.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct expressions interned.
    pub states: usize,
    /// Transitions memoized.
    pub transitions: usize,
    /// Transition lookups answered from the table.
    pub hits: usize,
    /// Transition lookups that had to call `derive`.
    pub misses: usize,
}

#[derive(Debug)]
struct State<S> {
    expression: Rc<Regex<S>>,
    nullable: bool,
}

#[derive(Debug)]
pub struct DerivCache<S> {
    states: Vec<State<S>>,
    ids: HashMap<Rc<Regex<S>>, StateId>,
    transitions: HashMap<(StateId, S), StateId>,
    hits: usize,
    misses: usize,
}

impl<S: Clone + Eq + Hash> Default for DerivCache<S> {
    fn default() -> Self {
        DerivCache::new()
    }
}

impl<S: Clone + Eq + Hash> DerivCache<S> {
    pub fn new() -> DerivCache<S> {
        DerivCache {
            states: Vec::new(),
            ids: HashMap::new(),
            transitions: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Get the state of `re`, creating it if this expression has not been seen before.
    pub fn intern(&mut self, re: Regex<S>) -> StateId {
        match self.ids.entry(Rc::new(re)) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(e) => {
                let id = StateId(self.states.len());
                let expression = e.key().clone();
                let nullable = matches_empty(&expression);
                log::debug!(
                    "new state {} ({} nodes, nullable: {})",
                    id.0,
                    expression.size(),
                    nullable
                );
                self.states.push(State {
                    expression,
                    nullable,
                });
                *e.insert(id)
            }
        }
    }

    /// The expression interned as `state`.
    ///
    /// # Panics
    ///
    /// If `state` was not produced by this cache.
    pub fn expression(&self, state: StateId) -> &Regex<S> {
        &self.states[state.0].expression
    }

    pub fn matches_empty(&self, state: StateId) -> bool {
        self.states[state.0].nullable
    }

    /// The state reached from `state` on `symbol`.
    pub fn derive(&mut self, symbol: &S, state: StateId) -> StateId {
        let key = (state, symbol.clone());
        if let Some(&next) = self.transitions.get(&key) {
            self.hits += 1;
            return next;
        }
        self.misses += 1;
        let next = derive(symbol, &self.states[state.0].expression);
        let next = self.intern(next);
        self.transitions.insert(key, next);
        next
    }

    /// Same answer as [`regex_match`](crate::regex_match), reusing every transition computed
    /// by earlier calls.
    pub fn is_match<I>(&mut self, input: I, re: &Regex<S>) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        let mut state = self.intern(re.clone());
        for symbol in input {
            state = self.derive(symbol.borrow(), state);
        }
        self.matches_empty(state)
    }

    /// A [`Matcher`] for `re` backed by this cache.
    pub fn matcher(&mut self, re: Regex<S>) -> CachedMatcher<'_, S> {
        let start = self.intern(re);
        CachedMatcher {
            cache: self,
            start,
            current: start,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            states: self.states.len(),
            transitions: self.transitions.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Drop every state and transition. Previously returned `StateId`s become invalid.
    pub fn clear(&mut self) {
        self.states.clear();
        self.ids.clear();
        self.transitions.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[derive(Debug)]
pub struct CachedMatcher<'c, S> {
    cache: &'c mut DerivCache<S>,
    start: StateId,
    current: StateId,
}

impl<S: Clone + Eq + Hash> CachedMatcher<'_, S> {
    pub fn state(&self) -> StateId {
        self.current
    }
}

impl<S: Clone + Eq + Hash> Matcher<S> for CachedMatcher<'_, S> {
    fn reset(&mut self) {
        self.current = self.start;
    }

    fn advance(&mut self, symbol: &S) {
        self.current = self.cache.derive(symbol, self.current);
    }

    fn accepts(&self) -> bool {
        self.cache.matches_empty(self.current)
    }

    fn is_dead(&self) -> bool {
        *self.cache.expression(self.current) == Regex::EmptySet
    }
}
