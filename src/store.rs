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

//! The in-memory "database": tables, secondary indices, and identifier
//! allocation.
//!
//! The store makes no concurrency guarantees of its own. It is only
//! reachable through the read/write guards handed out by
//! [`Repository`](crate::Repository), so holding a `&Store` or `&mut Store`
//! borrow *is* holding the lock, and internal helpers can be passed the
//! borrow instead of re-acquiring.

use crate::base::Oid;
use crate::capability::Capabilities;
use crate::entity::{Account, Client, User};
use crate::transaction::{Transaction, TransactionKind};
use std::collections::HashMap;

/// Tables and indices for one repository instance.
///
/// All entities are append-only; the single permitted mutation is binding a
/// client to a user at client-creation time. Oids and business-key sequence
/// numbers are strictly increasing and never reused. The account-number and
/// client-id sequences advance independently.
#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<Oid, User>,
    clients: HashMap<Oid, Client>,
    accounts: HashMap<Oid, Account>,
    transactions: HashMap<Oid, Transaction>,
    /// Capability grants per (user, entity) pair. Grants are additive:
    /// regranting ORs new bits into the stored set.
    grants: HashMap<(Oid, Oid), Capabilities>,

    user_by_username: HashMap<String, Oid>,
    user_by_client_oid: HashMap<Oid, Oid>,
    account_by_number: HashMap<String, Oid>,
    client_by_client_id: HashMap<String, Oid>,
    transactions_by_account: HashMap<Oid, Vec<Oid>>,

    current_oid: u32,
    account_seq: u32,
    client_seq: u32,
}

impl Store {
    pub(crate) fn new() -> Self {
        Store::default()
    }

    // === Allocation ===

    fn next_oid(&mut self) -> Oid {
        self.current_oid += 1;
        Oid(self.current_oid)
    }

    fn next_account_number(&mut self) -> String {
        self.account_seq += 1;
        format!("A{:05}", self.account_seq)
    }

    fn next_client_id(&mut self) -> String {
        self.client_seq += 1;
        format!("C{:05}", self.client_seq)
    }

    // === Users ===

    /// Adds a user. The caller must have checked username uniqueness.
    pub fn add_user(&mut self, username: &str, is_admin: bool) -> User {
        debug_assert!(
            !self.user_by_username.contains_key(username),
            "duplicate username '{username}'"
        );

        let user = User::new(self.next_oid(), username, is_admin);
        self.user_by_username.insert(user.username.clone(), user.id);
        self.users.insert(user.id, user.clone());

        user
    }

    pub fn user_by_oid(&self, oid: Oid) -> Option<&User> {
        self.users.get(&oid)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.user_by_username
            .get(username)
            .and_then(|oid| self.users.get(oid))
    }

    pub fn user_by_client_oid(&self, client_oid: Oid) -> Option<&User> {
        self.user_by_client_oid
            .get(&client_oid)
            .and_then(|oid| self.users.get(oid))
    }

    /// Binds a client to a user, the one non-append mutation in the model.
    ///
    /// Returns the updated user, or `None` if the user is unknown.
    pub fn bind_client(&mut self, user_id: Oid, client_oid: Oid) -> Option<User> {
        let user = self.users.get_mut(&user_id)?;
        user.client_oid = client_oid;
        let user = user.clone();

        self.user_by_client_oid.insert(client_oid, user_id);

        Some(user)
    }

    // === Clients ===

    pub fn add_client(&mut self, first_name: &str, last_name: &str) -> Client {
        let id = self.next_oid();
        let client_id = self.next_client_id();
        let client = Client::new(id, client_id, first_name, last_name);

        self.client_by_client_id
            .insert(client.client_id.clone(), client.id);
        self.clients.insert(client.id, client.clone());

        client
    }

    pub fn client_by_oid(&self, oid: Oid) -> Option<&Client> {
        self.clients.get(&oid)
    }

    pub fn client_by_client_id(&self, client_id: &str) -> Option<&Client> {
        self.client_by_client_id
            .get(client_id)
            .and_then(|oid| self.clients.get(oid))
    }

    // === Accounts ===

    pub fn add_account(&mut self, client_oid: Oid, created_by: Oid) -> Account {
        let id = self.next_oid();
        let account_number = self.next_account_number();
        let account = Account::new(id, account_number, client_oid, created_by);

        self.account_by_number
            .insert(account.account_number.clone(), account.id);
        self.accounts.insert(account.id, account.clone());

        account
    }

    pub fn account_by_oid(&self, oid: Oid) -> Option<&Account> {
        self.accounts.get(&oid)
    }

    pub fn account_by_number(&self, account_number: &str) -> Option<&Account> {
        self.account_by_number
            .get(account_number)
            .and_then(|oid| self.accounts.get(oid))
    }

    // === Transactions ===

    pub fn add_transaction(
        &mut self,
        account_id: Oid,
        kind: TransactionKind,
        amount: f64,
        memo: Option<String>,
    ) -> Transaction {
        let transaction = Transaction::new(self.next_oid(), account_id, kind, amount, memo);

        self.transactions_by_account
            .entry(account_id)
            .or_default()
            .push(transaction.id);
        self.transactions.insert(transaction.id, transaction.clone());

        transaction
    }

    /// Clones all transactions recorded against an account, in insertion
    /// order. Cost is proportional to that account's transaction count.
    pub fn transactions_for_account(&self, account_id: Oid) -> Vec<Transaction> {
        self.transactions_by_account
            .get(&account_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.transactions.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    // === Authorizations ===

    /// Grants capabilities to a user on an entity, ORed into any existing
    /// grant.
    pub fn grant(&mut self, user_id: Oid, entity_id: Oid, capabilities: Capabilities) {
        *self.grants.entry((user_id, entity_id)).or_default() |= capabilities;
    }

    /// The capabilities a user holds on an entity, [`Capabilities::NONE`]
    /// when nothing was granted.
    pub fn capabilities_for(&self, user_id: Oid, entity_id: Oid) -> Capabilities {
        self.grants
            .get(&(user_id, entity_id))
            .copied()
            .unwrap_or_default()
    }
}
