pub mod cache;
pub mod github;
pub mod sqlite;
