pub mod config;
pub mod database;
pub mod errors;
pub mod events;
pub mod models;
pub mod services;

pub use config::*;
pub use database::*;
pub use errors::*;
pub use models::*;
pub use services::*;
