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

//! # Accounts Demo
//!
//! This library provides a single-process, in-memory transactional ledger
//! with authorization: an append-only store of users, clients, accounts and
//! transactions behind a reader/writer lock, with session-based business
//! operations on top.
//!
//! ## Core Components
//!
//! - [`Repository`]: owns the store and its lock, allocates identifiers
//! - [`Session`]: a caller's authenticated context, obtained via [`logic::login`]
//! - [`logic`]: the business operations (entity creation, credit/debit,
//!   balance and history)
//! - [`AccountsError`]: typed failures for every operation
//!
//! ## Example
//!
//! ```
//! use accounts_demo_rs::{logic, Repository, TransactionKind};
//!
//! let repository = Repository::make("admin");
//! let session = logic::login(&repository, "admin").unwrap();
//!
//! // Compound creation: user "carol", client C00001, account A00001.
//! let account = logic::create_account_with_owner(&session, "carol", "Carol", "Jones").unwrap();
//!
//! logic::execute_transaction(
//!     &session,
//!     &account.account_number,
//!     TransactionKind::Credit,
//!     100.0,
//!     Some("opening deposit"),
//! )
//! .unwrap();
//!
//! assert_eq!(logic::get_balance(&session, &account.account_number).unwrap(), 100.0);
//! ```
//!
//! ## Thread Safety
//!
//! One [`Repository`] is shared by arbitrarily many callers. Readers run
//! concurrently; writers are exclusive. Every operation is one atomic
//! critical section, so a debit's overdraft check and its append cannot be
//! split by a racing writer.

mod base;
mod capability;
mod entity;
pub mod error;
pub mod logic;
mod repository;
mod session;
mod snapshot;
mod store;
mod transaction;

pub use base::Oid;
pub use capability::{Capabilities, Principal};
pub use entity::{Account, Client, User};
pub use error::AccountsError;
pub use repository::Repository;
pub use session::{Session, SessionState};
pub use snapshot::AccountSnapshot;
pub use store::Store;
pub use transaction::{HistoryEntry, Transaction, TransactionKind};
