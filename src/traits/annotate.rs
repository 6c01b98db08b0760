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

use crate::Tag;

/// Trait for wrapping `Result` errors into [`crate::AnnotatedError`].
///
/// This trait is implemented for the [`std::result::Result`] type, to provide functionality for
/// wrapping the received error with a message (and optionally classification tags), while
/// automatically preserving the error as the wrapped cause.
///
/// The message is lazily evaluated, so it incurs no cost on the [Ok] path.
pub trait Annotate<T, S>
where
    S: std::error::Error + Send + Sync + 'static,
{
    /// Maps a `Result<T, S>` to `Result<T, AnnotatedError>`, attaching no tags.
    ///
    /// The [Ok] variant is left untouched.  The [Err] value becomes the wrapped cause of the
    /// resulting [`crate::AnnotatedError`].
    fn annotate<M, F>(self, f: F) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// Maps a `Result<T, S>` to `Result<T, AnnotatedError>`, attaching the given tags.
    ///
    /// The [Ok] variant is left untouched.  The [Err] value becomes the wrapped cause of the
    /// resulting [`crate::AnnotatedError`], with `tags` attached to this link of the chain.
    fn annotate_with<I, M, F>(self, tags: I, f: F) -> crate::Result<T>
    where
        I: IntoIterator<Item = Tag>,
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, S> Annotate<T, S> for std::result::Result<T, S>
where
    S: std::error::Error + Send + Sync + 'static,
{
    fn annotate<M, F>(self, f: F) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|source| crate::AnnotatedError::wrap(source, Vec::new(), f()))
    }

    fn annotate_with<I, M, F>(self, tags: I, f: F) -> crate::Result<T>
    where
        I: IntoIterator<Item = Tag>,
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|source| {
            crate::AnnotatedError::wrap(source, tags.into_iter().collect(), f())
        })
    }
}

/// Trait for wrapping boxed `Result` errors into [`crate::AnnotatedError`].
///
/// This trait is essentially the [`Annotate`] trait but implemented for
/// `std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>`, storing the box as the
/// wrapped cause without another level of boxing.
pub trait AnnotateBoxed<T> {
    /// Maps a `Result<T, Box<dyn std::error::Error + Send + Sync>>` to
    /// `Result<T, AnnotatedError>`.
    ///
    /// The [Ok] variant is left untouched.
    fn annotate_boxed<I, M, F>(self, tags: I, f: F) -> crate::Result<T>
    where
        I: IntoIterator<Item = Tag>,
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T> AnnotateBoxed<T> for std::result::Result<T, Box<dyn std::error::Error + Send + Sync>> {
    fn annotate_boxed<I, M, F>(self, tags: I, f: F) -> crate::Result<T>
    where
        I: IntoIterator<Item = Tag>,
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|source| {
            crate::AnnotatedError::wrap_boxed(source, tags.into_iter().collect(), f())
        })
    }
}
