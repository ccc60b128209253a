pub mod compute;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod input;

pub use config::Tuning;
pub use engine::Engine;
