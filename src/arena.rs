//! A simplifying derivative engine on top of an arena.
//!
//! Nodes are allocated in a [`typed_arena::Arena`] and carry their nullability, so the emptiness
//! test is a field read. Every node is built through constructors that apply the usual
//! identities (`∅r = ∅`, `εr = r`, `∅|r = r`, `r** = r*`, ...). That keeps derivatives small, and
//! lets matching stop as soon as the current node is `∅`.
//!
//! The arena only grows. Use one [`Storage`] per batch of matches.

use std::borrow::Borrow;

use typed_arena::Arena;

use crate::deriv::Matcher;
use crate::regex::Regex;

pub struct Storage<'a, S>(Arena<Node<'a, S>>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a, S> {
    nullable: bool,
    contents: Contents<'a, S>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contents<'a, S> {
    Void,
    Epsilon,
    Symbol(S),
    Seq(&'a Node<'a, S>, &'a Node<'a, S>),
    Alt(&'a Node<'a, S>, &'a Node<'a, S>),
    Star(&'a Node<'a, S>),
}

impl<'a, S> Node<'a, S> {
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Is this `∅`? Nothing derived from it can match.
    pub fn is_void(&self) -> bool {
        matches!(self.contents, Contents::Void)
    }
}

impl<'a, S: Copy> Node<'a, S> {
    pub fn to_regex(&self) -> Regex<S> {
        use Contents::*;

        match self.contents {
            Void => Regex::EmptySet,
            Epsilon => Regex::EmptyStr,
            Symbol(s) => Regex::Literal(s),
            Seq(x, y) => Regex::concat(x.to_regex(), y.to_regex()),
            Alt(x, y) => Regex::alternate(x.to_regex(), y.to_regex()),
            Star(x) => Regex::repeat(x.to_regex()),
        }
    }
}

impl<'a, S: Copy + Eq> Default for Storage<'a, S> {
    fn default() -> Self {
        Storage::new()
    }
}

impl<'a, S: Copy + Eq> Storage<'a, S> {
    pub fn new() -> Storage<'a, S> {
        Storage(Arena::new())
    }

    /// Copy `re` into the arena, simplifying on the way.
    ///
    /// The right spine of a concatenation and the left spine of an alternation are walked in a
    /// loop, so long sequences and long `a|b|c|...` chains lower in constant stack.
    pub fn lower(&'a self, re: &Regex<S>) -> Node<'a, S> {
        match re {
            Regex::EmptySet => self.void(),
            Regex::EmptyStr => self.epsilon(),
            Regex::Literal(s) => self.symbol(*s),
            Regex::Concat(_, _) => {
                let mut firsts = Vec::new();
                let mut last = re;
                while let Regex::Concat(x, y) = last {
                    firsts.push(&**x);
                    last = &**y;
                }
                let mut node = self.lower(last);
                for x in firsts.into_iter().rev() {
                    node = self.seq(self.lower(x), node);
                }
                node
            }
            Regex::Alternate(_, _) => {
                let mut rests = Vec::new();
                let mut first = re;
                while let Regex::Alternate(x, y) = first {
                    rests.push(&**y);
                    first = &**x;
                }
                let mut node = self.lower(first);
                for y in rests.into_iter().rev() {
                    node = self.alt(node, self.lower(y));
                }
                node
            }
            Regex::Repeat(x) => self.star(self.lower(x)),
        }
    }

    pub fn matches<I>(&'a self, input: I, regex: Node<'a, S>) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        let mut regex = regex;
        for symbol in input {
            regex = self.deriv(symbol.borrow(), regex);
            if regex.is_void() {
                return false;
            }
        }
        regex.nullable
    }

    pub fn deriv(&'a self, c: &S, regex: Node<'a, S>) -> Node<'a, S> {
        use Contents::*;

        match regex.contents {
            Void | Epsilon => self.void(),
            Symbol(c2) if *c == c2 => self.epsilon(),
            Symbol(_) => self.void(),
            Seq(x, y) if x.nullable => self.alt(self.seq(self.deriv(c, *x), *y), self.deriv(c, *y)),
            Seq(x, y) => self.seq(self.deriv(c, *x), *y),
            Alt(x, y) => self.alt(self.deriv(c, *x), self.deriv(c, *y)),
            Star(x) => self.seq(self.deriv(c, *x), regex),
        }
    }

    pub fn void(&self) -> Node<'a, S> {
        Node {
            nullable: false,
            contents: Contents::Void,
        }
    }

    pub fn epsilon(&self) -> Node<'a, S> {
        Node {
            nullable: true,
            contents: Contents::Epsilon,
        }
    }

    pub fn symbol(&self, s: S) -> Node<'a, S> {
        Node {
            nullable: false,
            contents: Contents::Symbol(s),
        }
    }

    pub fn seq(&'a self, x: Node<'a, S>, y: Node<'a, S>) -> Node<'a, S> {
        use Contents::*;

        match (x.contents, y.contents) {
            (Void, _) | (_, Void) => self.void(),
            (Epsilon, _) => y,
            (_, Epsilon) => x,
            (_, _) => {
                let x = self.0.alloc(x);
                let y = self.0.alloc(y);
                Node {
                    nullable: x.nullable && y.nullable,
                    contents: Seq(x, y),
                }
            }
        }
    }

    pub fn alt(&'a self, x: Node<'a, S>, y: Node<'a, S>) -> Node<'a, S> {
        use Contents::*;

        match (x.contents, y.contents) {
            (Void, _) => y,
            (_, Void) => x,
            (Epsilon, _) if y.nullable => y,
            (_, Epsilon) if x.nullable => x,
            _ if x == y => x,
            (_, _) => {
                let x = self.0.alloc(x);
                let y = self.0.alloc(y);
                Node {
                    nullable: x.nullable || y.nullable,
                    contents: Alt(x, y),
                }
            }
        }
    }

    pub fn star(&'a self, x: Node<'a, S>) -> Node<'a, S> {
        use Contents::*;

        match x.contents {
            Void | Epsilon => self.epsilon(),
            Star(_) => x,
            _ => {
                let x = self.0.alloc(x);
                Node {
                    nullable: true,
                    contents: Star(x),
                }
            }
        }
    }
}

/// An equivalent expression, simplified bottom-up. Accepts exactly the same sequences as `re`.
pub fn simplify<S: Copy + Eq>(re: &Regex<S>) -> Regex<S> {
    let storage = Storage::new();
    storage.lower(re).to_regex()
}

/// Same answer as [`regex_match`](crate::regex_match), computed in a fresh arena.
pub fn arena_match<S, I>(input: I, re: &Regex<S>) -> bool
where
    S: Copy + Eq,
    I: IntoIterator,
    I::Item: Borrow<S>,
{
    let storage = Storage::new();
    let start = storage.lower(re);
    storage.matches(input, start)
}

/// A [`Matcher`] whose derivatives live in a borrowed [`Storage`].
pub struct ArenaMatcher<'a, S> {
    storage: &'a Storage<'a, S>,
    start: Node<'a, S>,
    current: Node<'a, S>,
}

impl<'a, S: Copy + Eq> ArenaMatcher<'a, S> {
    pub fn new(storage: &'a Storage<'a, S>, re: &Regex<S>) -> ArenaMatcher<'a, S> {
        let start = storage.lower(re);
        ArenaMatcher {
            storage,
            start,
            current: start,
        }
    }

    pub fn current(&self) -> Node<'a, S> {
        self.current
    }
}

impl<'a, S: Copy + Eq> Matcher<S> for ArenaMatcher<'a, S> {
    fn reset(&mut self) {
        self.current = self.start;
    }

    fn advance(&mut self, symbol: &S) {
        self.current = self.storage.deriv(symbol, self.current);
    }

    fn accepts(&self) -> bool {
        self.current.nullable
    }

    fn is_dead(&self) -> bool {
        self.current.is_void()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const ANUM: &str = "100100010100010010.10010101000100111";
    const NOTANUM: &str = "100100010100010010.100101010001001.11";

    fn number() -> Regex<char> {
        parse("(0|1[01]*)(.[01]*)?").unwrap()
    }

    #[test]
    fn my_regex() {
        let storage = Storage::new();
        let zero = storage.symbol('0');
        let one = storage.symbol('1');
        let dot = storage.symbol('.');
        let epsilon = storage.epsilon();
        let digit = storage.alt(zero, one);
        let digits = storage.star(digit);
        let leading = storage.alt(zero, storage.seq(one, digits));
        let trailing = storage.alt(epsilon, storage.seq(dot, digits));
        let number = storage.seq(leading, trailing);

        assert!(storage.matches("1".chars(), number));
        assert!(storage.matches("1.0".chars(), number));
        assert!(!storage.matches(".0".chars(), number));

        for _ in 0..1000 {
            assert!(storage.matches(ANUM.chars(), number));
            assert!(!storage.matches(NOTANUM.chars(), number));
        }
    }

    // Burnt Sushi's Regexes, as a reference answer.
    #[test]
    fn his_regex() {
        let number = regex::Regex::new("^(0|1[01]*)(\\.[01]*)?$").unwrap();
        let ours = self::number();
        for input in &[ANUM, NOTANUM, "1", "1.0", ".0", "0", "01", "10.", ""] {
            assert_eq!(
                arena_match(input.chars(), &ours),
                number.is_match(input),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn simplification() {
        let a = || Regex::literal('a');
        assert_eq!(simplify(&Regex::concat(Regex::EmptyStr, a())), a());
        assert_eq!(simplify(&Regex::concat(a(), Regex::EmptyStr)), a());
        assert_eq!(
            simplify(&Regex::concat(a(), Regex::EmptySet)),
            Regex::EmptySet
        );
        assert_eq!(simplify(&Regex::alternate(Regex::EmptySet, a())), a());
        assert_eq!(simplify(&Regex::alternate(a(), a())), a());
        assert_eq!(
            simplify(&Regex::alternate(Regex::EmptyStr, Regex::repeat(a()))),
            Regex::repeat(a())
        );
        assert_eq!(
            simplify(&Regex::repeat(Regex::repeat(a()))),
            Regex::repeat(a())
        );
        assert_eq!(
            simplify(&Regex::<char>::repeat(Regex::EmptySet)),
            Regex::EmptyStr
        );
        assert_eq!(
            simplify(&Regex::alternate(a(), Regex::EmptyStr)),
            Regex::alternate(a(), Regex::EmptyStr)
        );
    }

    #[test]
    fn long_sequence() {
        let long = vec![1u8; 200_000];
        let re = Regex::sequence(long.clone());
        assert!(arena_match(&long, &re));
        assert!(!arena_match(&long[1..], &re));

        let storage = Storage::new();
        let mut m = ArenaMatcher::new(&storage, &re);
        assert!(!m.is_match(&[1u8, 2]));
        assert!(m.is_dead());
    }

    #[test]
    fn wide_class() {
        let re = parse("[\u{0}-\u{FFFF}]*").unwrap();
        assert!(arena_match("any text at all".chars(), &re));
        assert!(!arena_match("\u{1F600}".chars(), &re));
    }

    #[test]
    fn lowering_keeps_nesting() {
        let a = || Regex::literal('a');
        let b = || Regex::literal('b');
        for re in &[
            Regex::concat(Regex::concat(a(), b()), Regex::concat(b(), a())),
            Regex::alternate(Regex::alternate(a(), b()), Regex::alternate(b(), a())),
            Regex::concat(a(), Regex::alternate(b(), Regex::concat(a(), b()))),
        ] {
            assert_eq!(&simplify(re), re);
        }
    }

    #[test]
    fn matcher_stops_on_void() {
        let storage = Storage::new();
        let mut m = ArenaMatcher::new(&storage, &parse("ab*").unwrap());
        assert!(m.is_match("abbb".chars()));
        assert!(!m.is_match("abba".chars()));
        assert!(m.is_dead());
        assert!(m.current().is_void());
        m.reset();
        assert!(!m.accepts());
        m.advance(&'a');
        assert!(m.accepts());
    }
}
