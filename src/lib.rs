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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides chained, tag-annotated errors.
//!
//! An [`AnnotatedError`] wraps an underlying failure with a human-readable message and a list of
//! classification [`Tag`]s.  Error handlers can later ask "does this failure, or anything it
//! wraps, carry tag T?" via [`has_tag`] without depending on the concrete error types involved.
//!
//! # Details
//!
//! Construct an [`AnnotatedError`] with [`AnnotatedError::wrap`] (or [`AnnotatedError::root`]
//! when there is no underlying cause), or with the [`annotate!`] macro when the message is built
//! from a format template.  The wrapped cause is reachable through
//! [`std::error::Error::source`], so the error participates in ordinary error-chain traversal.
//!
//! The chain utilities operate on any [`std::error::Error`] value:
//!
//! * [`chain`] iterates over a whole error chain, outermost to innermost.
//! * [`chain_contains`] tests whether a chain contains a specific error *instance*.
//! * [`downcast_chain_ref`] finds an error of a concrete type anywhere in a chain.
//! * [`is_annotated`] tests whether an error itself is an [`AnnotatedError`].
//! * [`tags`] collects the tags of every [`AnnotatedError`] in a chain; [`has_tag`] tests
//!   membership of a single tag.
//!
//! For wrapping an in-flight `Result` error, the [`traits`] module offers the
//! [`Annotate`][traits::Annotate] extension trait, and [`Loggable`][traits::Loggable] for
//! logging an error chain at the error level.
//!
//! # Examples
//!
//! ```
//! use bhannotate::{annotate, has_tag, traits::Annotate};
//!
//! #[derive(Debug)]
//! struct QueryTimeout;
//!
//! impl std::fmt::Display for QueryTimeout {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "query timeout")
//!     }
//! }
//!
//! impl std::error::Error for QueryTimeout {}
//!
//! fn load_user(id: u64) -> bhannotate::Result<()> {
//!     Err(QueryTimeout).annotate_with(["retryable".into()], || format!("loading user {id}"))
//! }
//!
//! fn serve() -> bhannotate::Result<()> {
//!     load_user(42).map_err(|err| annotate!(err, ["http5xx"], "serving /user/{}", 42))
//! }
//!
//! let err = serve().unwrap_err();
//! assert!(has_tag(&err, "retryable"));
//! assert!(has_tag(&err, "http5xx"));
//! assert_eq!(
//!     err.to_string(),
//!     "serving /user/42: [loading user 42: [query timeout]]"
//! );
//! ```

mod chain;
mod display;
pub mod traits;

pub use chain::{chain, chain_contains, downcast_chain_ref, has_tag, is_annotated, tags, Chain};

/// An opaque classification label attached to a single link of an error chain.
///
/// Tags are intended to be used by error handlers to identify error kinds (e.g. `"retryable"`,
/// `"fatal"`) without depending on concrete error types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Creates a new tag with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the tag label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

impl From<String> for Tag {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An error wrapping an underlying cause with a message and classification [`Tag`]s.
///
/// The wrapped cause may itself be an [`AnnotatedError`] or any other
/// [`std::error::Error`] value, forming a singly-linked, acyclic chain.  All fields are
/// immutable after construction, so instances are safe to share freely across threads.
///
/// The cause is exposed through [`std::error::Error::source`], which is what lets the generic
/// chain utilities of this crate (and any other `source()`-walking facility) traverse through
/// an [`AnnotatedError`].
pub struct AnnotatedError {
    /// The original error wrapped by this one, if any.
    inner: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// The message for this link of the chain.
    message: String,
    /// The tags attached to this link only.
    tags: Vec<Tag>,
}

/// The [`std::result::Result`] specialization with [`AnnotatedError`] as the error type.
pub type Result<T> = std::result::Result<T, AnnotatedError>;

impl AnnotatedError {
    /// Creates an annotated error with no wrapped cause.
    ///
    /// Use this where an error happens for the first time.  To wrap an existing error, use
    /// [`AnnotatedError::wrap`] instead, so that the error chain is preserved.
    pub fn root(tags: Vec<Tag>, message: impl Into<String>) -> Self {
        Self {
            inner: None,
            message: message.into(),
            tags,
        }
    }

    /// Creates an annotated error wrapping `inner` as its cause.
    ///
    /// The cause is stored verbatim and stays reachable through
    /// [`std::error::Error::source`].
    pub fn wrap<E>(inner: E, tags: Vec<Tag>, message: impl Into<String>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::wrap_boxed(Box::new(inner), tags, message)
    }

    /// Creates an annotated error wrapping an already-boxed cause.
    ///
    /// Use this when the concrete cause type is not known at compile time; otherwise prefer
    /// [`AnnotatedError::wrap`].
    pub fn wrap_boxed(
        inner: Box<dyn std::error::Error + Send + Sync>,
        tags: Vec<Tag>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            inner: Some(inner),
            message: message.into(),
            tags,
        }
    }

    /// Returns the message of this link of the chain.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the tags attached to this link only.
    ///
    /// To collect the tags of a whole chain, use [`tags`].
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl std::error::Error for AnnotatedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // "as _" here denotes casting to the output type, i.e. from
        // (Error + Send + Sync) to (Error + 'static).
        self.inner.as_ref().map(|inner| inner.as_ref() as _)
    }
}

/// Constructs an [`AnnotatedError`] from a format template.
///
/// The first form creates a root error; the second wraps an existing cause.  The bracketed tag
/// list accepts anything convertible into a [`Tag`] and may be empty.  The template and
/// arguments are consumed exactly as by [`format!`].
///
/// # Examples
///
/// ```
/// use bhannotate::annotate;
///
/// let root = annotate!(["fatal"], "config key {} missing", "db.url");
/// let wrapped = annotate!(root, [], "startup failed");
/// assert_eq!(
///     wrapped.to_string(),
///     "startup failed: [config key db.url missing: [<nil>]]"
/// );
/// ```
#[macro_export]
macro_rules! annotate {
    ([$($tag:expr),* $(,)?], $($arg:tt)+) => {
        $crate::AnnotatedError::root(
            ::std::vec![$($crate::Tag::from($tag)),*],
            ::std::format!($($arg)+),
        )
    };
    ($inner:expr, [$($tag:expr),* $(,)?], $($arg:tt)+) => {
        $crate::AnnotatedError::wrap(
            $inner,
            ::std::vec![$($crate::Tag::from($tag)),*],
            ::std::format!($($arg)+),
        )
    };
}
