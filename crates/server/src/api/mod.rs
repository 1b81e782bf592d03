pub mod handlers;
pub mod providers;
pub mod routes;

pub use routes::create_router;
