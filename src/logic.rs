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

//! Business operations.
//!
//! All business and security rules live here; the store and repository
//! below this layer carry none. Every operation:
//!
//! 1. asserts session validity ([`AccountsError::InvalidSession`] if not),
//! 2. acquires the minimal lock scope on the session's repository,
//! 3. enforces authorization,
//! 4. mutates or reads the store, and
//! 5. returns an owned copy of the result.
//!
//! Each operation is a single synchronous critical section. Nothing is
//! retried internally; typed errors are the only failure channel.

use crate::base::Oid;
use crate::capability::{Capabilities, Principal};
use crate::entity::{Account, Client, User};
use crate::error::AccountsError;
use crate::repository::Repository;
use crate::session::Session;
use crate::snapshot::AccountSnapshot;
use crate::store::Store;
use crate::transaction::{HistoryEntry, TransactionKind};
use tracing::{debug, info, warn};

/// Placeholder used in denial messages when the account itself could not
/// be resolved.
const INVALID_VALUE: &str = "<invalid>";

/// The grant a client's owning user receives on each new account.
const OWNER_GRANT: Capabilities =
    Capabilities(Capabilities::REVIEW.0 | Capabilities::CREDIT.0 | Capabilities::DEBIT.0);

// === Session lifecycle ===

/// Authenticates `username` against the repository and returns a validated
/// session wrapping a private copy of the user.
///
/// No password is checked here: credential verification belongs to the
/// trusted boundary that hands the username in.
///
/// # Errors
///
/// [`AccountsError::Authentication`] if the username is unknown.
pub fn login<'r>(
    repository: &'r Repository,
    username: &str,
) -> Result<Session<'r>, AccountsError> {
    let user = {
        let store = repository.read();
        store
            .user_by_username(username)
            .cloned()
            .ok_or_else(|| AccountsError::Authentication(username.to_string()))?
    };

    debug!(username, "login");

    Ok(Session::make(repository, user)?.validated())
}

/// Invalidates the session.
///
/// The flag is cleared before the terminal existence check, so the session
/// can never be left valid, even on error.
///
/// # Errors
///
/// [`AccountsError::InvalidSession`] if the session is already invalid;
/// [`AccountsError::Authentication`] if the bound user has disappeared
/// from the store.
pub fn logout(session: &mut Session<'_>) -> Result<(), AccountsError> {
    assert_valid_session(session)?;

    let repository = session.repository();
    let store = repository.read();

    // No matter what happens below, this session is now invalid.
    session.invalidate();

    let username = &session.user().username;
    if store.user_by_username(username).is_none() {
        return Err(AccountsError::Authentication(username.clone()));
    }

    debug!(username = %username, "logout");

    Ok(())
}

// === Entity creation ===

/// Creates a non-admin user with no client link. Admin-only.
///
/// # Errors
///
/// [`AccountsError::InvalidRequest`] if the username is already taken.
pub fn create_user(session: &Session<'_>, new_username: &str) -> Result<User, AccountsError> {
    assert_valid_session(session)?;

    let mut store = session.repository().write();
    assert_admin(&store, &session.user().username)?;

    if store.user_by_username(new_username).is_some() {
        return Err(AccountsError::InvalidRequest(format!(
            "username '{new_username}' is already taken"
        )));
    }

    let user = store.add_user(new_username, false);
    info!(username = new_username, oid = %user.id, "user created");

    Ok(user)
}

/// Creates a client and binds it to an existing owner user. Admin-only.
///
/// # Errors
///
/// [`AccountsError::InvalidRequest`] if the owner user does not exist.
pub fn create_client(
    session: &Session<'_>,
    owner_username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<Client, AccountsError> {
    assert_valid_session(session)?;

    let mut store = session.repository().write();
    assert_admin(&store, &session.user().username)?;

    let owner = store
        .user_by_username(owner_username)
        .cloned()
        .ok_or_else(|| {
            AccountsError::InvalidRequest(format!("unknown owner user '{owner_username}'"))
        })?;

    let client = store.add_client(first_name, last_name);
    store.bind_client(owner.id, client.id).ok_or_else(|| {
        AccountsError::InvalidRequest(format!("unknown owner user '{owner_username}'"))
    })?;

    info!(client_id = %client.client_id, owner = owner_username, "client created");

    Ok(client)
}

/// Creates an account under an existing client, identified by its `C#####`
/// business key, and grants the client's owning user review, credit and
/// debit on it. Admin-only.
///
/// # Errors
///
/// [`AccountsError::InvalidRequest`] if the client is unknown or has no
/// owning user.
pub fn create_account(session: &Session<'_>, client_id: &str) -> Result<Account, AccountsError> {
    assert_valid_session(session)?;

    let mut store = session.repository().write();
    assert_admin(&store, &session.user().username)?;

    let client = store.client_by_client_id(client_id).cloned().ok_or_else(|| {
        AccountsError::InvalidRequest(format!("unknown client '{client_id}'"))
    })?;

    let owner = store
        .user_by_client_oid(client.id)
        .cloned()
        .ok_or_else(|| {
            AccountsError::InvalidRequest(format!("client '{client_id}' has no owning user"))
        })?;

    let account = store.add_account(client.id, session.user().id);
    store.grant(owner.id, account.id, OWNER_GRANT);

    info!(
        account_number = %account.account_number,
        client_id,
        "account created"
    );

    Ok(account)
}

/// Legacy compound path: creates a user, a client, and an account in one
/// write scope, granting the new user review, credit and debit. Admin-only.
///
/// The owner username must NOT already exist; this is the historical
/// behavior of the compound path and the inverse of what
/// [`create_account`] implies.
///
/// # Errors
///
/// [`AccountsError::InvalidRequest`] if the owner username already exists.
pub fn create_account_with_owner(
    session: &Session<'_>,
    owner_username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<Account, AccountsError> {
    assert_valid_session(session)?;

    let mut store = session.repository().write();
    assert_admin(&store, &session.user().username)?;

    if store.user_by_username(owner_username).is_some() {
        return Err(AccountsError::InvalidRequest(format!(
            "username '{owner_username}' already exists"
        )));
    }

    let owner = store.add_user(owner_username, false);
    let client = store.add_client(first_name, last_name);
    store.bind_client(owner.id, client.id).ok_or_else(|| {
        AccountsError::InvalidRequest(format!("unknown owner user '{owner_username}'"))
    })?;

    let account = store.add_account(client.id, session.user().id);
    store.grant(owner.id, account.id, OWNER_GRANT);

    info!(
        account_number = %account.account_number,
        client_id = %client.client_id,
        owner = owner_username,
        "account created with new owner"
    );

    Ok(account)
}

// === Transactions ===

/// Applies a credit or debit to an account.
///
/// Resolution failures (account, its client, or the requesting user) are
/// all reported as [`AccountsError::Authorization`] so a caller probing
/// account numbers cannot distinguish "absent" from "forbidden". The
/// overdraft check replays the balance inside the same write scope as the
/// append, so two racing debits cannot both pass it.
///
/// # Errors
///
/// [`AccountsError::Authorization`] on any resolution or capability
/// failure; [`AccountsError::Overdraft`] if a debit exceeds the current
/// balance.
pub fn execute_transaction(
    session: &Session<'_>,
    account_number: &str,
    kind: TransactionKind,
    amount: f64,
    memo: Option<&str>,
) -> Result<(), AccountsError> {
    assert_valid_session(session)?;

    let requesting_username = session.user().username.clone();
    let mut store = session.repository().write();

    let account = store
        .account_by_number(account_number)
        .cloned()
        .ok_or_else(|| {
            AccountsError::Authorization(transaction_denied_message(
                &requesting_username,
                INVALID_VALUE,
                kind,
                amount,
            ))
        })?;

    let denied = || {
        AccountsError::Authorization(transaction_denied_message(
            &requesting_username,
            &account.account_number,
            kind,
            amount,
        ))
    };

    store.client_by_oid(account.client_oid).ok_or_else(denied)?;

    let requesting_user = store
        .user_by_username(&requesting_username)
        .cloned()
        .ok_or_else(denied)?;

    let principal = principal_for(&store, &requesting_user, account.id);
    if !principal.allows(kind.required_capability()) {
        warn!(
            username = %requesting_username,
            account_number = %account.account_number,
            %kind,
            "transaction denied"
        );
        return Err(denied());
    }

    if kind == TransactionKind::Debit {
        let balance = balance_of(&store, account.id);
        if balance < amount {
            return Err(AccountsError::Overdraft(account.account_number.clone()));
        }
    }

    store.add_transaction(account.id, kind, amount.abs(), memo.map(String::from));

    info!(
        account_number = %account.account_number,
        %kind,
        amount,
        "transaction applied"
    );

    Ok(())
}

// === Queries ===

/// Computes the account's balance by replaying its transactions.
///
/// # Errors
///
/// [`AccountsError::InvalidRequest`] if the account is unknown;
/// [`AccountsError::Authorization`] without the Review capability (admins
/// bypass).
pub fn get_balance(session: &Session<'_>, account_number: &str) -> Result<f64, AccountsError> {
    assert_valid_session(session)?;

    let store = session.repository().read();

    let account = store.account_by_number(account_number).ok_or_else(|| {
        AccountsError::InvalidRequest(format!("unknown account '{account_number}'"))
    })?;
    let account_id = account.id;

    assert_review_access(&store, &session.user().username, account_id)?;

    Ok(balance_of(&store, account_id))
}

/// Returns the account's transactions ordered by timestamp ascending,
/// projected without their account back-reference.
///
/// # Errors
///
/// Same as [`get_balance`].
pub fn get_transaction_history(
    session: &Session<'_>,
    account_number: &str,
) -> Result<Vec<HistoryEntry>, AccountsError> {
    assert_valid_session(session)?;

    let store = session.repository().read();

    let account = store.account_by_number(account_number).ok_or_else(|| {
        AccountsError::InvalidRequest(format!("unknown account '{account_number}'"))
    })?;
    let account_id = account.id;

    assert_review_access(&store, &session.user().username, account_id)?;

    Ok(snapshot_of(&store, account_id).history)
}

// === Internal helpers ===
//
// Helpers take the `&Store`/`&mut Store` borrow of an already-held guard;
// none of them acquire the lock themselves.

fn assert_valid_session(session: &Session<'_>) -> Result<(), AccountsError> {
    if session.is_valid() {
        Ok(())
    } else {
        Err(AccountsError::InvalidSession)
    }
}

fn assert_admin(store: &Store, username: &str) -> Result<(), AccountsError> {
    let user = store.user_by_username(username).ok_or_else(|| {
        AccountsError::Authorization(format!("user '{username}' is not known"))
    })?;

    if !user.is_admin {
        return Err(AccountsError::Authorization(format!(
            "user '{username}' is not authorized for administrative operations"
        )));
    }

    Ok(())
}

fn assert_review_access(
    store: &Store,
    username: &str,
    entity_id: Oid,
) -> Result<(), AccountsError> {
    let user = store.user_by_username(username).ok_or_else(|| {
        AccountsError::Authorization(format!("user '{username}' is not known"))
    })?;

    if !principal_for(store, user, entity_id).allows(Capabilities::REVIEW) {
        return Err(AccountsError::Authorization(format!(
            "user '{username}' is not authorized for this operation"
        )));
    }

    Ok(())
}

fn principal_for(store: &Store, user: &User, entity_id: Oid) -> Principal {
    if user.is_admin {
        Principal::Admin
    } else {
        Principal::Granted(store.capabilities_for(user.id, entity_id))
    }
}

fn balance_of(store: &Store, account_id: Oid) -> f64 {
    snapshot_of(store, account_id).balance
}

fn snapshot_of(store: &Store, account_id: Oid) -> AccountSnapshot {
    AccountSnapshot::make(account_id, store.transactions_for_account(account_id))
}

fn transaction_denied_message(
    username: &str,
    account_number: &str,
    kind: TransactionKind,
    amount: f64,
) -> String {
    format!(
        "transaction not authorized: user '{username}' attempted to {kind} account \
         '{account_number}' by {amount:.2}"
    )
}
