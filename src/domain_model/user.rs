use serde::Serialize;
use std::fmt;

/// Balance credited to every account when it is created.
pub const DEFAULT_BALANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialOrd, Eq, PartialEq, Serialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted account. `password_hash` is a PHC string and must not leave the server.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub balance: f64,
}

/// An account that has not been stored yet; the store assigns `id` and `balance`.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub username: String,
    pub password_hash: String,
}
