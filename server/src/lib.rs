pub mod assets;
pub mod config;
pub mod error;
pub mod server;
pub mod web;

pub use config::{HomePage, ServerConfig};
pub use error::ServerError;
pub use server::{bind, router, run, serve};
pub use web::AppState;
