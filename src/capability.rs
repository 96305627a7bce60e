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

//! Capability bitmask authorization.
//!
//! A [`Capabilities`] value is the set of rights a user holds on one entity
//! (currently always an account). Grants are additive: regranting ORs new
//! bits into the stored set. Admin users bypass per-entity capability checks
//! entirely, which the [`Principal`] sum type makes explicit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of rights a user may hold on an entity, stored as bit flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Capabilities(pub u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0x00);
    pub const CREATE: Capabilities = Capabilities(0x01);
    pub const REVIEW: Capabilities = Capabilities(0x02);
    pub const UPDATE: Capabilities = Capabilities(0x04);
    pub const DELETE: Capabilities = Capabilities(0x08);
    pub const CREDIT: Capabilities = Capabilities(0x10);
    pub const DEBIT: Capabilities = Capabilities(0x20);

    /// Returns `true` if every bit of `required` is present in `self`.
    pub fn contains(self, required: Capabilities) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Returns `true` if no bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Capabilities) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Capabilities, &str); 6] = [
            (Capabilities::CREATE, "create"),
            (Capabilities::REVIEW, "review"),
            (Capabilities::UPDATE, "update"),
            (Capabilities::DELETE, "delete"),
            (Capabilities::CREDIT, "credit"),
            (Capabilities::DEBIT, "debit"),
        ];

        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}

/// The authorization standing of a requesting user against one entity.
///
/// Resolved inside a lock scope from the user record and the stored grants,
/// then checked through [`Principal::allows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// Admin users pass every per-entity check.
    Admin,
    /// Regular users carry whatever capabilities were granted to them
    /// for the entity in question.
    Granted(Capabilities),
}

impl Principal {
    /// The single authorization check: admins always pass, regular users
    /// must hold every required bit.
    pub fn allows(self, required: Capabilities) -> bool {
        match self {
            Principal::Admin => true,
            Principal::Granted(held) => held.contains(required),
        }
    }
}
