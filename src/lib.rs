pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
mod error;
pub mod model;
pub mod session;
mod utils;


pub use config::Config;
pub use error::Error;
pub use error::Rejection;
pub use error::Result;
