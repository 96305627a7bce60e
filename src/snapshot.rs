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

//! Derived account state: balance by replay.
//!
//! A snapshot folds an account's transactions, ordered by timestamp
//! ascending (ties broken by Oid, which equals insertion order), into the
//! current balance. There is no cached running balance; every snapshot
//! replays the full set.

use crate::base::Oid;
use crate::transaction::{HistoryEntry, Transaction};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Balance and ordered history for one account at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub account_id: Oid,
    /// Timestamp of the newest entry, or the fold time for an empty history.
    pub timestamp: DateTime<Utc>,
    pub balance: f64,
    pub history: Vec<HistoryEntry>,
}

impl AccountSnapshot {
    /// Folds the given transactions into a snapshot.
    ///
    /// The input does not need to be sorted; the snapshot orders it.
    pub fn make(account_id: Oid, mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|t| (t.timestamp, t.id));

        let balance = transactions
            .iter()
            .map(|t| t.kind.signed(t.amount))
            .sum::<f64>();

        let timestamp = transactions
            .last()
            .map_or_else(Utc::now, |t| t.timestamp);

        let history = transactions.iter().map(HistoryEntry::from).collect();

        AccountSnapshot {
            account_id,
            timestamp,
            balance,
            history,
        }
    }
}
