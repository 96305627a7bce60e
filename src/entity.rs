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

//! Stored entity records: users, clients, and accounts.
//!
//! All three are plain value types. The store owns the canonical records;
//! everything a business operation returns is an owned clone taken while the
//! repository lock is still held, so no live reference ever escapes a lock
//! scope.

use crate::base::Oid;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user is an identity with certain rights in the system, not necessarily
/// a human.
///
/// A user may be linked to at most one [`Client`] through `client_oid`
/// (null by default). Admin users bypass per-entity authorization checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Oid,
    pub username: String,
    /// Back-link to the owned client, [`Oid::NULL`] when unbound.
    pub client_oid: Oid,
    pub is_admin: bool,
}

impl User {
    pub(crate) fn new(id: Oid, username: impl Into<String>, is_admin: bool) -> Self {
        User {
            id,
            username: username.into(),
            client_oid: Oid::NULL,
            is_admin,
        }
    }
}

/// Clients are distinct from users: clients own accounts, users hold rights
/// to them.
///
/// A client carries the human-facing `C#####` business key plus the legal
/// owner's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: Oid,
    /// Business key, `C` followed by a 5-digit zero-padded sequence number.
    pub client_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Client {
    pub(crate) fn new(
        id: Oid,
        client_id: String,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Client {
            id,
            client_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// An account record identifies the owning client of an account.
///
/// Ownership is distinct from access: any user with the right grants may
/// operate on an account without being its owner (for example the second
/// holder of a joint account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: Oid,
    /// Business key, `A` followed by a 5-digit zero-padded sequence number.
    pub account_number: String,
    /// The owning client.
    pub client_oid: Oid,
    /// The user that created this account.
    pub created_by: Oid,
    pub created_on: DateTime<Utc>,
}

impl Account {
    pub(crate) fn new(id: Oid, account_number: String, client_oid: Oid, created_by: Oid) -> Self {
        Account {
            id,
            account_number,
            client_oid,
            created_by,
            created_on: Utc::now(),
        }
    }
}
