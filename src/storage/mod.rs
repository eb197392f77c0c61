pub mod db;
pub mod models;
mod postings;
mod schema;

pub use db::{Database, DatabaseError};
