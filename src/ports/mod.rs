pub mod auth;
pub mod cache;
pub mod remote;
pub mod repository;
