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

//! Transaction records and their history projection.
//!
//! Amounts are stored as unsigned magnitudes; the signed contribution to a
//! balance is derived from the transaction kind (+credit, -debit).

use crate::base::Oid;
use crate::capability::Capabilities;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// The kinds of transaction that may be applied to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    /// The capability bit a non-admin user must hold to execute this kind.
    pub fn required_capability(self) -> Capabilities {
        match self {
            TransactionKind::Credit => Capabilities::CREDIT,
            TransactionKind::Debit => Capabilities::DEBIT,
        }
    }

    /// Applies the kind's sign to a stored magnitude.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Credit => amount,
            TransactionKind::Debit => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Credit => write!(f, "credit"),
            TransactionKind::Debit => write!(f, "debit"),
        }
    }
}

/// A stored ledger transaction, linked to its account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: Oid,
    pub account_id: Oid,
    pub kind: TransactionKind,
    /// Unsigned magnitude; see [`TransactionKind::signed`].
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub memo: Option<String>,
}

impl Transaction {
    pub(crate) fn new(
        id: Oid,
        account_id: Oid,
        kind: TransactionKind,
        amount: f64,
        memo: Option<String>,
    ) -> Self {
        Transaction {
            id,
            account_id,
            kind,
            amount,
            timestamp: Utc::now(),
            memo,
        }
    }
}

/// A transaction as returned to history callers.
///
/// Carries no account back-reference: once a history leaves the core, its
/// entries cannot be correlated back to other accounts by a caller that
/// only holds one account's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: Oid,
    pub kind: TransactionKind,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub memo: Option<String>,
}

impl From<&Transaction> for HistoryEntry {
    fn from(transaction: &Transaction) -> Self {
        HistoryEntry {
            id: transaction.id,
            kind: transaction.kind,
            amount: transaction.amount,
            timestamp: transaction.timestamp,
            memo: transaction.memo.clone(),
        }
    }
}
