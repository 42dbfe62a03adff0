/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Errors reported to callers of the public API.
///
/// Neither variant leaves any [`crate::Position`] partially modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A position record or move string could not be parsed.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A well-formed move that is not in the current legal move set.
    #[error("Illegal move {mv:?} in position {fen}")]
    IllegalMove { mv: String, fen: String },
}

impl Error {
    /// Shorthand for constructing an [`Error::MalformedInput`].
    pub(crate) fn malformed(reason: impl ToString) -> Self {
        Self::MalformedInput(reason.to_string())
    }
}

/// Result type alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
