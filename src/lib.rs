pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod state;
pub mod web;
pub mod youtube;

pub use config::Config;
pub use error::{Result, VidaskError};
pub use state::AppState;
