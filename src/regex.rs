use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// A regular expression over an alphabet of symbols `S`.
///
/// Values are immutable trees. Children sit behind `Rc` so that a derivative can share every
/// subtree it does not rewrite. Two expressions are equal only if they are structurally equal;
/// nothing here canonicalizes (see [`simplify`](crate::arena::simplify) for that).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex<S> {
    /// Matches nothing.
    EmptySet,
    /// Matches only the empty sequence.
    EmptyStr,
    /// Matches the one-element sequence holding this symbol.
    Literal(S),
    /// Matches `l ++ r` where `l` matches the left side and `r` the right side.
    Concat(Rc<Regex<S>>, Rc<Regex<S>>),
    /// Matches whatever either side matches.
    Alternate(Rc<Regex<S>>, Rc<Regex<S>>),
    /// Matches zero or more concatenated matches of the body.
    Repeat(Rc<Regex<S>>),
}

impl<S> Regex<S> {
    pub fn literal(symbol: S) -> Regex<S> {
        Regex::Literal(symbol)
    }

    pub fn concat(left: Regex<S>, right: Regex<S>) -> Regex<S> {
        Regex::Concat(Rc::new(left), Rc::new(right))
    }

    pub fn alternate(left: Regex<S>, right: Regex<S>) -> Regex<S> {
        Regex::Alternate(Rc::new(left), Rc::new(right))
    }

    pub fn repeat(body: Regex<S>) -> Regex<S> {
        Regex::Repeat(Rc::new(body))
    }

    /// One or more: `r r*`. The body is shared between both positions.
    pub fn plus(body: Regex<S>) -> Regex<S> {
        let body = Rc::new(body);
        Regex::Concat(body.clone(), Rc::new(Regex::Repeat(body)))
    }

    /// Zero or one: `r | ε`.
    pub fn optional(body: Regex<S>) -> Regex<S> {
        Regex::alternate(body, Regex::EmptyStr)
    }

    /// The literal sequence `s1 s2 ... sn`, nested to the right. Empty input gives `EmptyStr`.
    pub fn sequence(symbols: impl IntoIterator<Item = S>) -> Regex<S> {
        Regex::concat_all(symbols.into_iter().map(Regex::Literal).collect())
    }

    /// Any one of the symbols, as a balanced alternation. Empty input gives `EmptySet`.
    pub fn any_of(symbols: impl IntoIterator<Item = S>) -> Regex<S> {
        Regex::alternate_all(symbols.into_iter().map(Regex::Literal).collect())
    }

    /// `r1 (r2 (... rn))`. Nesting to the right keeps [`derive`](crate::derive) shallow on a
    /// leading non-nullable part, however long the chain.
    pub fn concat_all(parts: Vec<Regex<S>>) -> Regex<S> {
        parts
            .into_iter()
            .rev()
            .reduce(|rest, part| Regex::concat(part, rest))
            .unwrap_or(Regex::EmptyStr)
    }

    /// Alternation of all `parts`, split down the middle so the tree has logarithmic depth.
    pub fn alternate_all(mut parts: Vec<Regex<S>>) -> Regex<S> {
        if parts.len() <= 1 {
            return parts.pop().unwrap_or(Regex::EmptySet);
        }
        let right = parts.split_off(parts.len() / 2);
        Regex::alternate(Regex::alternate_all(parts), Regex::alternate_all(right))
    }

    /// Number of nodes in the tree, counting shared subtrees once per occurrence.
    pub fn size(&self) -> usize {
        let mut size = 0;
        let mut pending = vec![self];
        while let Some(re) = pending.pop() {
            size += 1;
            match re {
                Regex::EmptySet | Regex::EmptyStr | Regex::Literal(_) => {}
                Regex::Repeat(body) => pending.push(&**body),
                Regex::Concat(l, r) | Regex::Alternate(l, r) => {
                    pending.push(&**l);
                    pending.push(&**r);
                }
            }
        }
        size
    }
}

impl<S: Clone + Eq + Hash> Regex<S> {
    /// Every symbol that occurs in a literal somewhere in the expression.
    pub fn alphabet(&self) -> HashSet<S> {
        let mut alphabet = HashSet::new();
        self.search_alphabet(&mut alphabet);
        alphabet
    }

    fn search_alphabet(&self, alphabet: &mut HashSet<S>) {
        match self {
            Regex::EmptySet | Regex::EmptyStr => {}
            Regex::Literal(s) => {
                alphabet.insert(s.clone());
            }
            Regex::Repeat(body) => body.search_alphabet(alphabet),
            Regex::Concat(l, r) | Regex::Alternate(l, r) => {
                l.search_alphabet(alphabet);
                r.search_alphabet(alphabet);
            }
        }
    }
}

// Dropping recurses once per level of the tree. Long chains of uniquely owned nodes are moved to
// an explicit stack first, so only the first level of each is dropped recursively.
impl<S> Drop for Regex<S> {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            if let Some(inner) = Rc::get_mut(&mut node) {
                inner.detach_children(&mut stack);
            }
        }
    }
}

impl<S> Regex<S> {
    fn detach_children(&mut self, stack: &mut Vec<Rc<Regex<S>>>) {
        match self {
            Regex::EmptySet | Regex::EmptyStr | Regex::Literal(_) => {}
            Regex::Repeat(body) => detach(body, stack),
            Regex::Concat(l, r) | Regex::Alternate(l, r) => {
                detach(l, stack);
                detach(r, stack);
            }
        }
    }
}

// Shared children are only decremented; leaves have nothing below them.
fn detach<S>(child: &mut Rc<Regex<S>>, stack: &mut Vec<Rc<Regex<S>>>) {
    let inner = matches!(
        Rc::get_mut(child),
        Some(Regex::Concat(..)) | Some(Regex::Alternate(..)) | Some(Regex::Repeat(_))
    );
    if inner {
        stack.push(std::mem::replace(child, Rc::new(Regex::EmptySet)));
    }
}

const META: &[char] = &['(', ')', '|', '*', '+', '?', '[', ']', '\\'];

fn write_literal(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    if META.contains(&c) {
        write!(f, "\\{}", c)
    } else {
        write!(f, "{}", c)
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, re: &Regex<char>) -> fmt::Result {
    write!(f, "({})", re)
}

// Printed so that `parse` reads the exact same tree back. Concatenation parses right-nested and
// alternation left-nested, so an operand on the other side of the same kind needs parentheses.
impl fmt::Display for Regex<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::EmptySet => write!(f, "[]"),
            Regex::EmptyStr => write!(f, "()"),
            Regex::Literal(c) => write_literal(f, *c),
            Regex::Concat(l, r) => {
                match **l {
                    Regex::Alternate(_, _) | Regex::Concat(_, _) => write_group(f, l)?,
                    _ => write!(f, "{}", l)?,
                }
                match **r {
                    Regex::Alternate(_, _) => write_group(f, r),
                    _ => write!(f, "{}", r),
                }
            }
            Regex::Alternate(l, r) => {
                write!(f, "{}|", l)?;
                match **r {
                    Regex::Alternate(_, _) => write_group(f, r),
                    _ => write!(f, "{}", r),
                }
            }
            Regex::Repeat(body) => {
                match **body {
                    Regex::Concat(_, _) | Regex::Alternate(_, _) => write_group(f, body)?,
                    _ => write!(f, "{}", body)?,
                }
                write!(f, "*")
            }
        }
    }
}
