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

//! Business-operation integration tests against the public API.

use accounts_demo_rs::{AccountsError, Oid, Repository, SessionState, TransactionKind, logic};

fn make_repository() -> Repository {
    Repository::make("admin")
}

fn credit(
    session: &accounts_demo_rs::Session<'_>,
    account_number: &str,
    amount: f64,
) -> Result<(), AccountsError> {
    logic::execute_transaction(session, account_number, TransactionKind::Credit, amount, None)
}

fn debit(
    session: &accounts_demo_rs::Session<'_>,
    account_number: &str,
    amount: f64,
) -> Result<(), AccountsError> {
    logic::execute_transaction(session, account_number, TransactionKind::Debit, amount, None)
}

// === Session lifecycle ===

#[test]
fn login_unknown_user_fails_authentication() {
    let repository = make_repository();
    let result = logic::login(&repository, "mallory");
    assert_eq!(
        result.err(),
        Some(AccountsError::Authentication("mallory".into()))
    );
}

#[test]
fn login_returns_validated_session_with_user_copy() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    assert!(session.is_valid());
    assert_eq!(session.user().username, "admin");
    assert!(session.user().is_admin);
    assert_ne!(session.user().id, Oid::NULL);
}

#[test]
fn logout_invalidates_and_blocks_further_operations() {
    let repository = make_repository();
    let mut session = logic::login(&repository, "admin").unwrap();

    logic::logout(&mut session).unwrap();
    assert!(!session.is_valid());
    assert_eq!(session.state(), SessionState::Invalidated);

    assert_eq!(
        logic::create_user(&session, "foo").err(),
        Some(AccountsError::InvalidSession)
    );
    assert_eq!(
        logic::get_balance(&session, "A00001").err(),
        Some(AccountsError::InvalidSession)
    );
}

#[test]
fn logout_twice_fails_without_side_effects() {
    let repository = make_repository();
    let mut session = logic::login(&repository, "admin").unwrap();

    logic::logout(&mut session).unwrap();
    assert_eq!(
        logic::logout(&mut session).err(),
        Some(AccountsError::InvalidSession)
    );
}

#[test]
fn dropping_a_session_does_not_disturb_the_store() {
    let repository = make_repository();
    {
        let session = logic::login(&repository, "admin").unwrap();
        logic::create_account_with_owner(&session, "foo", "Foo", "Bar").unwrap();
    }
    // A fresh login still sees everything.
    let session = logic::login(&repository, "foo").unwrap();
    assert_eq!(logic::get_balance(&session, "A00001").unwrap(), 0.0);
}

// === Entity creation ===

#[test]
fn create_user_requires_admin() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_user(&admin, "foo").unwrap();

    let foo = logic::login(&repository, "foo").unwrap();
    let result = logic::create_user(&foo, "bar");
    assert!(matches!(result, Err(AccountsError::Authorization(_))));
}

#[test]
fn create_user_rejects_duplicate_username() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    logic::create_user(&session, "foo").unwrap();
    let result = logic::create_user(&session, "foo");
    assert!(matches!(result, Err(AccountsError::InvalidRequest(_))));
}

#[test]
fn created_user_is_not_admin_and_unbound() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    let user = logic::create_user(&session, "foo").unwrap();
    assert!(!user.is_admin);
    assert_eq!(user.client_oid, Oid::NULL);
}

#[test]
fn create_client_binds_owner_user() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    logic::create_user(&session, "foo").unwrap();
    let client = logic::create_client(&session, "foo", "Foo", "Bar").unwrap();
    assert_eq!(client.client_id, "C00001");

    let foo = logic::login(&repository, "foo").unwrap();
    assert_eq!(foo.user().client_oid, client.id);
}

#[test]
fn create_client_unknown_owner_is_bad_request() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    let result = logic::create_client(&session, "nobody", "No", "Body");
    assert!(matches!(result, Err(AccountsError::InvalidRequest(_))));
}

#[test]
fn create_account_unknown_client_is_bad_request() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    let result = logic::create_account(&session, "C99999");
    assert!(matches!(result, Err(AccountsError::InvalidRequest(_))));
}

#[test]
fn create_account_grants_owner_review_credit_debit() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();

    logic::create_user(&admin, "foo").unwrap();
    let client = logic::create_client(&admin, "foo", "Foo", "Bar").unwrap();
    let account = logic::create_account(&admin, &client.client_id).unwrap();

    let foo = logic::login(&repository, "foo").unwrap();
    credit(&foo, &account.account_number, 10.0).unwrap();
    debit(&foo, &account.account_number, 4.0).unwrap();
    assert_eq!(logic::get_balance(&foo, &account.account_number).unwrap(), 6.0);
}

#[test]
fn create_account_records_creator() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();

    logic::create_user(&admin, "foo").unwrap();
    let client = logic::create_client(&admin, "foo", "Foo", "Bar").unwrap();
    let account = logic::create_account(&admin, &client.client_id).unwrap();

    assert_eq!(account.created_by, admin.user().id);
    assert_eq!(account.client_oid, client.id);
}

#[test]
fn compound_create_account_builds_user_client_account() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    let account = logic::create_account_with_owner(&session, "foo", "Foo", "Bar").unwrap();
    assert_eq!(account.account_number, "A00001");

    let foo = logic::login(&repository, "foo").unwrap();
    assert!(!foo.user().is_admin);
    assert_ne!(foo.user().client_oid, Oid::NULL);

    assert_eq!(logic::get_balance(&session, "A00001").unwrap(), 0.0);
    assert!(logic::get_transaction_history(&session, "A00001").unwrap().is_empty());
}

#[test]
fn compound_create_account_requires_fresh_username() {
    // The legacy compound path rejects an owner that already exists - the
    // inverse of the primary path's precondition. Historical behavior,
    // kept as observed.
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    logic::create_user(&session, "foo").unwrap();
    let result = logic::create_account_with_owner(&session, "foo", "Foo", "Bar");
    assert!(matches!(result, Err(AccountsError::InvalidRequest(_))));
}

#[test]
fn account_numbers_are_sequential_and_unique() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    let first = logic::create_account_with_owner(&session, "foo", "Foo", "Bar").unwrap();
    let second = logic::create_account_with_owner(&session, "bar", "Bar", "Baz").unwrap();
    let client = logic::create_client(&session, "admin", "Ad", "Min").unwrap();
    let third = logic::create_account(&session, &client.client_id).unwrap();

    assert_eq!(first.account_number, "A00001");
    assert_eq!(second.account_number, "A00002");
    assert_eq!(third.account_number, "A00003");
}

#[test]
fn client_ids_sequence_independently_of_account_numbers() {
    // One compound creation allocates both a client id and an account
    // number; the sequences advance independently.
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    logic::create_account_with_owner(&session, "foo", "Foo", "Bar").unwrap();
    let client = logic::create_client(&session, "admin", "Ad", "Min").unwrap();

    assert_eq!(client.client_id, "C00002");
    let account = logic::create_account(&session, &client.client_id).unwrap();
    assert_eq!(account.account_number, "A00002");
}

// === Transactions ===

#[test]
fn credit_then_debit_replays_to_expected_balance() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    let foo = logic::login(&repository, "foo").unwrap();
    credit(&foo, "A00001", 100.0).unwrap();
    assert_eq!(logic::get_balance(&foo, "A00001").unwrap(), 100.0);

    debit(&foo, "A00001", 30.5).unwrap();
    credit(&foo, "A00001", 0.25).unwrap();
    assert_eq!(logic::get_balance(&foo, "A00001").unwrap(), 69.75);
}

#[test]
fn debit_beyond_balance_is_overdraft_and_leaves_balance_unchanged() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    let foo = logic::login(&repository, "foo").unwrap();
    credit(&foo, "A00001", 100.0).unwrap();

    assert_eq!(
        debit(&foo, "A00001", 150.0).err(),
        Some(AccountsError::Overdraft("A00001".into()))
    );
    assert_eq!(logic::get_balance(&foo, "A00001").unwrap(), 100.0);
}

#[test]
fn debit_of_entire_balance_is_allowed() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    credit(&admin, "A00001", 75.25).unwrap();
    debit(&admin, "A00001", 75.25).unwrap();
    assert_eq!(logic::get_balance(&admin, "A00001").unwrap(), 0.0);
}

#[test]
fn debit_on_empty_account_is_overdraft() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    assert!(matches!(
        debit(&admin, "A00001", 0.01),
        Err(AccountsError::Overdraft(_))
    ));
}

#[test]
fn transaction_against_unknown_account_masks_as_authorization() {
    // Deliberate information hiding: a caller probing account numbers
    // cannot distinguish "absent" from "forbidden".
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    let result = credit(&session, "A99999", 10.0);
    assert!(matches!(result, Err(AccountsError::Authorization(_))));
}

#[test]
fn transaction_without_grant_is_denied() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();
    logic::create_account_with_owner(&admin, "bar", "Bar", "Baz").unwrap();

    // foo holds grants on A00001 only.
    let foo = logic::login(&repository, "foo").unwrap();
    let result = credit(&foo, "A00002", 10.0);
    assert!(matches!(result, Err(AccountsError::Authorization(_))));
}

#[test]
fn admin_bypasses_per_account_grants() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    // The admin was never granted anything on A00001.
    credit(&admin, "A00001", 50.0).unwrap();
    debit(&admin, "A00001", 20.0).unwrap();
    assert_eq!(logic::get_balance(&admin, "A00001").unwrap(), 30.0);
}

#[test]
fn amounts_are_stored_as_unsigned_magnitudes() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    // The core takes the absolute value before storage.
    credit(&admin, "A00001", -25.0).unwrap();
    let history = logic::get_transaction_history(&admin, "A00001").unwrap();
    assert_eq!(history[0].amount, 25.0);
    assert_eq!(logic::get_balance(&admin, "A00001").unwrap(), 25.0);
}

#[test]
fn memo_is_carried_through_to_history() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    logic::execute_transaction(
        &admin,
        "A00001",
        TransactionKind::Credit,
        10.0,
        Some("initial deposit"),
    )
    .unwrap();
    credit(&admin, "A00001", 5.0).unwrap();

    let history = logic::get_transaction_history(&admin, "A00001").unwrap();
    assert_eq!(history[0].memo.as_deref(), Some("initial deposit"));
    assert_eq!(history[1].memo, None);
}

// === Queries ===

#[test]
fn balance_of_unknown_account_is_bad_request() {
    let repository = make_repository();
    let session = logic::login(&repository, "admin").unwrap();

    assert!(matches!(
        logic::get_balance(&session, "A99999"),
        Err(AccountsError::InvalidRequest(_))
    ));
    assert!(matches!(
        logic::get_transaction_history(&session, "A99999"),
        Err(AccountsError::InvalidRequest(_))
    ));
}

#[test]
fn review_requires_grant_or_admin() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();
    logic::create_account_with_owner(&admin, "bar", "Bar", "Baz").unwrap();

    let foo = logic::login(&repository, "foo").unwrap();
    assert!(matches!(
        logic::get_balance(&foo, "A00002"),
        Err(AccountsError::Authorization(_))
    ));
    assert!(matches!(
        logic::get_transaction_history(&foo, "A00002"),
        Err(AccountsError::Authorization(_))
    ));

    // Own account is fine; admin sees everything.
    logic::get_balance(&foo, "A00001").unwrap();
    logic::get_balance(&admin, "A00002").unwrap();
}

#[test]
fn history_is_ordered_by_timestamp_ascending() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    for i in 1..=10 {
        credit(&admin, "A00001", f64::from(i)).unwrap();
    }
    debit(&admin, "A00001", 5.0).unwrap();

    let history = logic::get_transaction_history(&admin, "A00001").unwrap();
    assert_eq!(history.len(), 11);
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn repeated_reads_are_idempotent() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();

    credit(&admin, "A00001", 33.25).unwrap();
    debit(&admin, "A00001", 8.0).unwrap();

    let first_balance = logic::get_balance(&admin, "A00001").unwrap();
    let first_history = logic::get_transaction_history(&admin, "A00001").unwrap();

    assert_eq!(logic::get_balance(&admin, "A00001").unwrap(), first_balance);
    assert_eq!(
        logic::get_transaction_history(&admin, "A00001").unwrap(),
        first_history
    );
}

#[test]
fn histories_do_not_leak_across_accounts() {
    let repository = make_repository();
    let admin = logic::login(&repository, "admin").unwrap();
    logic::create_account_with_owner(&admin, "foo", "Foo", "Bar").unwrap();
    logic::create_account_with_owner(&admin, "bar", "Bar", "Baz").unwrap();

    credit(&admin, "A00001", 10.0).unwrap();
    credit(&admin, "A00002", 20.0).unwrap();
    credit(&admin, "A00001", 30.0).unwrap();

    let history = logic::get_transaction_history(&admin, "A00001").unwrap();
    let amounts: Vec<f64> = history.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![10.0, 30.0]);
}
