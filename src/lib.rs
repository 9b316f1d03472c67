pub mod args;
pub mod callbacks;
pub mod charts;
mod config;
pub mod controller;
mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod server;
pub mod table;
mod utils;


pub use config::Config;
pub use error::Error;
pub use error::Result;
