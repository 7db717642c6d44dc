pub mod auth;
pub mod connection;
pub mod predictions;

pub use connection::{init_db, Database};
