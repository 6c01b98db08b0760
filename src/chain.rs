// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Generic traversal over [`std::error::Error::source`] chains, plus the matching, extraction
//! and tag-aggregation utilities built on top of it.

use crate::{AnnotatedError, Tag};

/// Iterator over an error chain, from the outermost error to the innermost cause.
///
/// Created by [`chain`].
pub struct Chain<'a> {
    next: Option<&'a (dyn std::error::Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn std::error::Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.source();
        Some(current)
    }
}

impl std::iter::FusedIterator for Chain<'_> {}

/// Iterates over the chain of `err`, starting with `err` itself and following
/// [`std::error::Error::source`] links to the innermost cause.
pub fn chain<'a>(err: &'a (dyn std::error::Error + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Returns `true` if some link of the chain of `err` is the same instance as `target`.
///
/// Matching is by address, never by value: two separately constructed errors compare unequal
/// even when their contents are identical.  Since the walk starts at `err` itself,
/// `chain_contains(err, err)` always holds.
pub fn chain_contains(
    err: &(dyn std::error::Error + 'static),
    target: &(dyn std::error::Error + 'static),
) -> bool {
    chain(err).any(|link| std::ptr::addr_eq(link as *const _, target as *const _))
}

/// Returns a reference to the first link of the chain of `err` whose concrete type is `T`.
///
/// Both annotated and foreign links are traversed, and `err` itself is considered first.
/// Returns [`None`] when no link of type `T` exists anywhere in the chain.
pub fn downcast_chain_ref<'a, T>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a T>
where
    T: std::error::Error + 'static,
{
    chain(err).find_map(|link| link.downcast_ref::<T>())
}

/// Returns `true` iff `err` itself is an [`AnnotatedError`].
///
/// The check applies to the concrete type of `err` only; an [`AnnotatedError`] buried deeper
/// in the chain does not count.
pub fn is_annotated(err: &(dyn std::error::Error + 'static)) -> bool {
    err.downcast_ref::<AnnotatedError>().is_some()
}

/// Collects the tags of every [`AnnotatedError`] in the chain of `err`.
///
/// Tags are returned in chain order, outermost to innermost, with each link contributing its
/// own tags (duplicates and all).  Links that are not annotated, including `err` itself,
/// contribute nothing.  The returned vector is freshly allocated on every call, so callers may
/// mutate it freely.
pub fn tags(err: &(dyn std::error::Error + 'static)) -> Vec<Tag> {
    chain(err)
        .filter_map(|link| link.downcast_ref::<AnnotatedError>())
        .flat_map(|annotated| annotated.tags().iter().cloned())
        .collect()
}

/// Returns `true` if any link of the chain of `err` carries `tag`.
pub fn has_tag(err: &(dyn std::error::Error + 'static), tag: impl AsRef<str>) -> bool {
    let tag = tag.as_ref();
    chain(err)
        .filter_map(|link| link.downcast_ref::<AnnotatedError>())
        .any(|annotated| annotated.tags().iter().any(|t| t.as_str() == tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate;

    #[derive(Debug, PartialEq)]
    struct PlainError(&'static str);

    impl std::fmt::Display for PlainError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for PlainError {}

    #[derive(Debug, PartialEq)]
    struct ParseFailure {
        line: u32,
    }

    impl std::fmt::Display for ParseFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "parse failure at line {}", self.line)
        }
    }

    impl std::error::Error for ParseFailure {}

    #[test]
    fn test_chain_order() {
        let inner = annotate!(PlainError("base"), [], "inner");
        let outer = annotate!(inner, [], "outer");

        let messages: Vec<String> = chain(&outer).map(|link| link.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "outer: [inner: [base]]".to_string(),
                "inner: [base]".to_string(),
                "base".to_string(),
            ]
        );
    }

    #[test]
    fn test_chain_contains_self() {
        let err = annotate!(["abc"], "custom");
        assert!(chain_contains(&err, &err));
    }

    #[test]
    fn test_chain_contains_wrapped_instance() {
        let outer = annotate!(PlainError("testError1"), [], "wrap message {}", 10);

        let target = std::error::Error::source(&outer).expect("source must be present");
        assert!(chain_contains(&outer, target));
    }

    #[test]
    fn test_chain_contains_is_identity_not_equality() {
        let outer = annotate!(PlainError("x"), [], "wrap");
        let lookalike = PlainError("x");

        assert!(!chain_contains(&outer, &lookalike));
    }

    #[test]
    fn test_downcast_chain_ref_nested() {
        let inner = annotate!(ParseFailure { line: 7 }, ["abc"], "custom");
        let outer = annotate!(inner, ["efg"], "custom2");

        let found = downcast_chain_ref::<ParseFailure>(&outer);
        assert_eq!(found, Some(&ParseFailure { line: 7 }));
    }

    #[test]
    fn test_downcast_chain_ref_outermost_annotated() {
        let outer = annotate!(PlainError("base"), [], "custom");

        let found = downcast_chain_ref::<AnnotatedError>(&outer).expect("must find itself");
        assert_eq!(found.message(), "custom");
    }

    #[test]
    fn test_downcast_chain_ref_missing() {
        let outer = annotate!(PlainError("base"), [], "custom");
        assert!(downcast_chain_ref::<ParseFailure>(&outer).is_none());
    }

    #[test]
    fn test_is_annotated() {
        let annotated = annotate!(PlainError("inner"), [], "custom");
        assert!(is_annotated(&annotated));

        assert!(!is_annotated(&PlainError("testError")));
    }

    #[test]
    fn test_has_tag_across_wraps() {
        let target1 = annotate!(PlainError("inner"), ["abc"], "custom");
        assert!(has_tag(&target1, "abc"));

        let target1 = annotate!(PlainError("inner"), ["abc"], "custom");
        let target2 = annotate!(target1, ["efg"], "custom2");
        assert!(has_tag(&target2, "efg"));
        assert!(has_tag(&target2, "abc"));

        let target1 = annotate!(PlainError("inner"), ["abc"], "custom");
        assert!(!has_tag(&target1, "efg"));
    }

    #[test]
    fn test_tags_order_outermost_first() {
        let inner = annotate!(PlainError("base"), ["abc"], "custom");
        let middle = annotate!(inner, [], "no tags here");
        let outer = annotate!(middle, ["efg", "efg"], "custom2");

        assert_eq!(
            tags(&outer),
            vec![Tag::from("efg"), Tag::from("efg"), Tag::from("abc")]
        );
    }

    #[test]
    fn test_tags_empty_for_plain_chain() {
        let plain = PlainError("testError");

        let collected = tags(&plain);
        assert!(collected.is_empty());
        // empty, not absent: iterating must simply yield nothing
        assert_eq!(collected.iter().count(), 0);
    }

    #[test]
    fn test_tags_fresh_allocation_each_call() {
        let err = annotate!(PlainError("inner"), ["abc"], "custom");

        let mut first = tags(&err);
        let second = tags(&err);
        assert_eq!(first, second);

        first.push(Tag::from("mutated"));
        assert_eq!(second, vec![Tag::from("abc")]);
        assert_eq!(tags(&err), vec![Tag::from("abc")]);
    }
}
