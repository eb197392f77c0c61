pub mod handlers;
pub mod response;
pub mod routes;
pub mod views;

pub use routes::create_router;
