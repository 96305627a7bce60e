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

//! Error types for ledger operations.
//!
//! Every failure is a synchronous, typed error; the core never retries or
//! swallows. Translating an error kind to a transport-level response is the
//! boundary's job, and each kind stays distinct all the way there.

use thiserror::Error;

/// Ledger operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountsError {
    /// Username could not be resolved at login or logout
    #[error("authentication failed: user '{0}' is not known")]
    Authentication(String),

    /// Operation attempted on a session that is not validated
    #[error("invalid session")]
    InvalidSession,

    /// Duplicate username, unknown reference, or violated creation precondition
    #[error("bad request: {0}")]
    InvalidRequest(String),

    /// Capability or admin check failed (also masks missing resources
    /// during transaction execution)
    #[error("{0}")]
    Authorization(String),

    /// Debit would exceed the current balance
    #[error("debit against account '{0}' failed due to insufficient funds")]
    Overdraft(String),
}
