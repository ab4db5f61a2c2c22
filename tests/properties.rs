//! Exhaustive checks over small expressions and inputs.
//!
//! Expressions are every tree of depth at most 2 over the literals `a` and `b`; inputs are every
//! sequence over `a`, `b`, `c` up to a small length (`c` never occurs in a literal). The ground
//! truth is a direct search for a derivation in the inductive match relation.

use regex_deriv::{
    derive, matches_empty, regex_match, trace, DerivCache, DerivMatcher, Matcher, Regex,
};

const LITERALS: &[char] = &['a', 'b'];
const ALPHABET: &[char] = &['a', 'b', 'c'];

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn expressions(depth: usize) -> Vec<Regex<char>> {
    let mut out = vec![Regex::EmptySet, Regex::EmptyStr];
    out.extend(LITERALS.iter().map(|&c| Regex::literal(c)));
    if depth == 0 {
        return out;
    }
    let smaller = expressions(depth - 1);
    for l in &smaller {
        out.push(Regex::repeat(l.clone()));
        for r in &smaller {
            out.push(Regex::concat(l.clone(), r.clone()));
            out.push(Regex::alternate(l.clone(), r.clone()));
        }
    }
    out
}

fn inputs(max_len: usize) -> Vec<Vec<char>> {
    let mut out = vec![vec![]];
    let mut last = vec![vec![]];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &last {
            for &c in ALPHABET {
                let mut s: Vec<char> = prefix.clone();
                s.push(c);
                next.push(s);
            }
        }
        out.extend(next.iter().cloned());
        last = next;
    }
    out
}

/// Is there a derivation of `s ⊨ re`? Repetitions only peel off non-empty pieces, which loses
/// nothing and keeps the search finite.
fn relates(s: &[char], re: &Regex<char>) -> bool {
    match re {
        Regex::EmptySet => false,
        Regex::EmptyStr => s.is_empty(),
        Regex::Literal(a) => matches!(s, [x] if x == a),
        Regex::Concat(l, r) => (0..=s.len()).any(|i| relates(&s[..i], l) && relates(&s[i..], r)),
        Regex::Alternate(l, r) => relates(s, l) || relates(s, r),
        Regex::Repeat(body) => {
            s.is_empty() || (1..=s.len()).any(|i| relates(&s[..i], body) && relates(&s[i..], re))
        }
    }
}

#[test]
fn emptiness_is_correct() {
    for re in expressions(2) {
        assert_eq!(matches_empty(&re), relates(&[], &re), "{}", re);
    }
}

#[test]
fn derivative_is_correct() {
    init();
    let suffixes = inputs(3);
    for re in expressions(2) {
        for &a in ALPHABET {
            let d = derive(&a, &re);
            for s in &suffixes {
                let mut whole = vec![a];
                whole.extend(s);
                assert_eq!(
                    relates(&whole, &re),
                    relates(s, &d),
                    "{} by {:?} on {:?}",
                    re,
                    a,
                    s
                );
            }
        }
    }
}

#[test]
fn matcher_is_correct() {
    init();
    let all = inputs(4);
    for re in expressions(2) {
        for s in &all {
            assert_eq!(regex_match(s, &re), relates(s, &re), "{} on {:?}", re, s);
        }
    }
}

#[test]
fn empty_input_is_emptiness() {
    for re in expressions(2) {
        assert_eq!(regex_match(&[] as &[char], &re), matches_empty(&re), "{}", re);
    }
}

#[test]
fn alternation_distributes() {
    let all = inputs(3);
    let small = expressions(1);
    for l in &small {
        for r in &small {
            let re = Regex::alternate(l.clone(), r.clone());
            for s in &all {
                assert_eq!(
                    regex_match(s, &re),
                    regex_match(s, l) || regex_match(s, r),
                    "{} on {:?}",
                    re,
                    s
                );
            }
        }
    }
}

#[test]
fn concatenation_splits() {
    let all = inputs(3);
    let small = expressions(1);
    for l in &small {
        for r in &small {
            let re = Regex::concat(l.clone(), r.clone());
            for s in &all {
                let split =
                    (0..=s.len()).any(|i| regex_match(&s[..i], l) && regex_match(&s[i..], r));
                assert_eq!(regex_match(s, &re), split, "{} on {:?}", re, s);
            }
        }
    }
}

#[test]
fn trace_ends_in_verdict() {
    let all = inputs(3);
    for re in expressions(1) {
        for s in &all {
            let states = trace(s, &re);
            assert_eq!(states.len(), s.len() + 1);
            let last = states.last().map(matches_empty);
            assert_eq!(last, Some(regex_match(s, &re)), "{} on {:?}", re, s);
        }
    }
}

#[test]
fn cache_does_not_change_answers() {
    init();
    let all = inputs(4);
    let mut cache = DerivCache::new();
    for re in expressions(2) {
        for s in &all {
            assert_eq!(cache.is_match(s, &re), relates(s, &re), "{} on {:?}", re, s);
        }
    }
    let stats = cache.stats();
    assert!(stats.hits > 0);
    assert_eq!(stats.misses, stats.transitions);
}

#[test]
fn matchers_agree() {
    let all = inputs(3);
    let mut cache = DerivCache::new();
    for re in expressions(2) {
        let expected: Vec<bool> = all.iter().map(|s| relates(s, &re)).collect();

        let mut plain = DerivMatcher::new(re.clone());
        let got: Vec<bool> = all.iter().map(|s| plain.is_match(s)).collect();
        assert_eq!(got, expected, "plain {}", re);

        let mut cached = cache.matcher(re.clone());
        let got: Vec<bool> = all.iter().map(|s| cached.is_match(s)).collect();
        assert_eq!(got, expected, "cached {}", re);
    }
}

#[cfg(feature = "arena")]
#[test]
fn arena_does_not_change_answers() {
    use regex_deriv::arena::{arena_match, simplify, ArenaMatcher, Storage};

    let all = inputs(4);
    for re in expressions(2) {
        let simplified = simplify(&re);
        assert!(simplified.size() <= re.size(), "{} became {}", re, simplified);
        let storage = Storage::new();
        let mut matcher = ArenaMatcher::new(&storage, &re);
        for s in &all {
            let expected = relates(s, &re);
            assert_eq!(arena_match(s, &re), expected, "{} on {:?}", re, s);
            assert_eq!(regex_match(s, &simplified), expected, "{} on {:?}", simplified, s);
            assert_eq!(matcher.is_match(s), expected, "{} on {:?}", re, s);
        }
    }
}

#[test]
fn display_parses_back() {
    for re in expressions(2) {
        let printed = re.to_string();
        assert_eq!(regex_deriv::parse(&printed).as_ref(), Ok(&re), "{}", printed);
    }
}
