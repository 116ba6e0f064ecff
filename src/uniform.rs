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

//! Per-program cache of uniform locations.

use ahash::RandomState;
use hashbrown::HashMap;

use std::cell::RefCell;
use std::fmt;

/// Remembers the result of looking up each uniform name, including misses.
pub(crate) struct UniformCache<L> {
    locations: RefCell<HashMap<Box<str>, Option<L>, RandomState>>,
}

impl<L> fmt::Debug for UniformCache<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformCache")
            .field("len", &self.locations.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<L: Clone> UniformCache<L> {
    pub(crate) fn new() -> Self {
        Self {
            locations: RefCell::new(HashMap::with_hasher(RandomState::new())),
        }
    }

    /// Get the cached location for `name`, running `lookup` the first time it is asked for.
    pub(crate) fn get_or_lookup(
        &self,
        name: &str,
        lookup: impl FnOnce() -> Option<L>,
    ) -> Option<L> {
        if let Some(location) = self.locations.borrow().get(name) {
            return location.clone();
        }

        let location = lookup();
        self.locations
            .borrow_mut()
            .insert(name.into(), location.clone());
        location
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locations.borrow().len()
    }
}
