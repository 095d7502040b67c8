pub mod auth;
pub mod dashboard;
pub mod proxy;
pub mod repository;
