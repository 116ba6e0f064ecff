// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `glsl-program`.
//
// `glsl-program` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `glsl-program` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `glsl-program`. If not, see <https://www.gnu.org/licenses/>.

//! Errors that can occur while building a shader program.

use crate::backend::Stage;

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

/// The default cap on the length of a driver info log, in bytes.
pub const DEFAULT_INFO_LOG_LIMIT: usize = 512;

/// Used in place of an info log when the driver reports failure without one.
pub(crate) const EMPTY_LOG: &str = "(driver produced no info log)";

/// An error that occurred while building a [`ShaderProgram`].
///
/// [`ShaderProgram`]: crate::ShaderProgram
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaderError {
    /// A shader source file could not be read.
    #[error("failed to read shader source `{}`", path.display())]
    FileRead {
        /// The path that was being read.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A shader stage failed to compile.
    #[error("failed to compile {stage} shader: {log}")]
    Compile {
        /// The stage that failed.
        stage: Stage,

        /// The driver's info log, truncated.
        log: String,
    },

    /// The compiled stages failed to link.
    #[error("failed to link shader program: {log}")]
    Link {
        /// The driver's info log, truncated.
        log: String,
    },

    /// The backend could not allocate an object.
    #[error("graphics backend error")]
    Backend(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl ShaderError {
    pub(crate) fn backend(err: impl StdError + Send + Sync + 'static) -> Self {
        ShaderError::Backend(Box::new(err))
    }

    /// The info log attached to this error, if any.
    pub fn log(&self) -> Option<&str> {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => Some(log),
            _ => None,
        }
    }
}

/// Trim a driver info log and cap it at `limit` bytes.
///
/// Drivers tend to pad their logs with NUL bytes and newlines. The cut always lands on a
/// character boundary.
pub(crate) fn truncate_log(log: &str, limit: usize) -> String {
    let log = log.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());

    if log.is_empty() {
        return EMPTY_LOG.to_owned();
    }

    if log.len() <= limit {
        return log.to_owned();
    }

    let mut end = limit;
    while !log.is_char_boundary(end) {
        end -= 1;
    }

    if end == 0 {
        return EMPTY_LOG.to_owned();
    }

    log[..end].to_owned()
}
