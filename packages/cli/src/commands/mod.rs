pub mod config;
pub mod replay;

pub use config::{config, ConfigArgs};
pub use replay::{replay, ReplayArgs};
