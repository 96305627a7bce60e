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

//! Serialized access to the [`Store`].
//!
//! One repository instance lives for the whole process and is shared by
//! arbitrarily many concurrent callers. A reader/writer lock serializes
//! access: multiple readers may proceed concurrently, a writer excludes
//! everyone else. Guards release on all exit paths, including panics.
//!
//! Each public operation acquires the lock exactly once; internal helpers
//! take the guard's `&Store`/`&mut Store` borrow instead of re-acquiring,
//! so a call chain can never deadlock against itself. There is no
//! acquisition timeout and no cancellation: a stuck writer blocks the whole
//! store, which is an accepted operational risk.

use crate::store::Store;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// Owns the store and its lock, and seeds the initial admin identities.
#[derive(Debug)]
pub struct Repository {
    state: RwLock<Store>,
}

impl Repository {
    /// Creates a repository seeded with a single admin user.
    pub fn make(admin_username: &str) -> Repository {
        let repository = Repository {
            state: RwLock::new(Store::new()),
        };

        repository.write().add_user(admin_username, true);
        info!(admin = admin_username, "repository created");

        repository
    }

    /// Creates a repository seeded with the two well-known admin users,
    /// `alice` and `bob`.
    pub fn make_default() -> Repository {
        let repository = Repository {
            state: RwLock::new(Store::new()),
        };

        {
            let mut store = repository.write();
            store.add_user("alice", true);
            store.add_user("bob", true);
        }
        info!("repository created with default admins");

        repository
    }

    /// Acquires the shared lock for reading. Blocks while a writer is
    /// active.
    pub fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.state.read()
    }

    /// Acquires the shared lock for writing. Blocks until all readers and
    /// writers have released.
    pub fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.state.write()
    }
}
