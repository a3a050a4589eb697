pub mod export;
pub mod sqlite;
