pub mod flash;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod templates;
