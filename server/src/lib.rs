pub mod response;
pub mod router;
pub mod server;
pub mod store;
