mod user_repo_sqlite;

pub use user_repo_sqlite::*;

mod util;
