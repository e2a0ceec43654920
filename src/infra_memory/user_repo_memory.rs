use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

const USERNAME_CONSTRAINT: &str = "user.username";

/// Process-local account table. Ids start at 1 and are never reused.
pub struct MemoryUserRepo {
    accounts: DashMap<String, UserAccount>,
    next_id: AtomicI64,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        MemoryUserRepo {
            accounts: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for MemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn insert(&self, account: NewUserAccount) -> Result<UserAccount, StoreError> {
        // The shard lock held by the entry makes check-and-insert atomic.
        match self.accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation(USERNAME_CONSTRAINT.into())),
            Entry::Vacant(slot) => {
                let record = UserAccount {
                    id: UserId(self.next_id.fetch_add(1, Ordering::Relaxed)),
                    username: account.username,
                    password_hash: account.password_hash,
                    balance: DEFAULT_BALANCE,
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self
            .accounts
            .get(username)
            .map(|entry| entry.value().clone()))
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64, StoreError> {
        Ok(self.accounts.remove(username).map_or(0, |_| 1))
    }
}
