pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod models;
pub mod session;
pub mod views;

pub use app::{App, Page};
pub use error::ClientError;
