mod argon2_hasher;
mod credential_service_impl;

pub use argon2_hasher::*;
pub use credential_service_impl::*;
