// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Core identifier type shared by every stored entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque object identifier.
///
/// Wraps a `u32`, unique and monotonically increasing within one
/// [`Repository`](crate::Repository) instance. `0` is reserved as the
/// null/unset value ([`Oid::NULL`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Oid(pub u32);

impl Oid {
    /// The reserved null identifier. Never allocated to an entity.
    pub const NULL: Oid = Oid(0);

    /// Returns `true` if this is the reserved null identifier.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
