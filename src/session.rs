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

//! Per-call authenticated context.
//!
//! A session binds a caller to one repository and a private copy of the
//! authenticated user. Its lifecycle is a one-way state machine:
//!
//! ```text
//! Uninitialized ──login──► Validated ──logout/drop──► Invalidated
//! ```
//!
//! `Invalidated` is terminal; a session never becomes valid again.

use crate::entity::User;
use crate::error::AccountsError;
use crate::repository::Repository;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Validated,
    Invalidated,
}

/// A caller's authenticated working context.
///
/// Obtained from [`login`](crate::logic::login) and passed into every
/// business operation. Dropping a session invalidates it; use
/// [`logout`](crate::logic::logout) to also surface the terminal
/// existence check as an error.
#[derive(Debug)]
pub struct Session<'r> {
    repository: &'r Repository,
    user: User,
    state: SessionState,
}

impl<'r> Session<'r> {
    /// Wraps a user copy, cross-checking it against the stored record.
    pub(crate) fn make(
        repository: &'r Repository,
        user: User,
    ) -> Result<Session<'r>, AccountsError> {
        {
            let store = repository.read();
            match store.user_by_username(&user.username) {
                Some(stored) if stored.id == user.id => {}
                _ => return Err(AccountsError::InvalidRequest("bad session user".into())),
            }
        }

        Ok(Session {
            repository,
            user,
            state: SessionState::Uninitialized,
        })
    }

    pub(crate) fn validated(mut self) -> Session<'r> {
        self.state = SessionState::Validated;
        self
    }

    /// Marks the session invalid. One-way; there is no path back.
    pub(crate) fn invalidate(&mut self) {
        self.state = SessionState::Invalidated;
    }

    /// The session's private copy of the authenticated user, as of login.
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn repository(&self) -> &'r Repository {
        self.repository
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The raw lifecycle flag, without touching the repository.
    pub fn is_validated(&self) -> bool {
        self.state == SessionState::Validated
    }

    /// Full validity check: the lifecycle flag plus a fresh re-resolution
    /// of the bound username. Detects the user having disappeared from the
    /// store; does not detect changes to other user attributes.
    pub fn is_valid(&self) -> bool {
        self.is_validated()
            && self
                .repository
                .read()
                .user_by_username(&self.user.username)
                .is_some()
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        // Best-effort disposal. The flag is always cleared; the existence
        // check that explicit logout performs cannot report from here.
        self.invalidate();
    }
}
