pub mod config;
pub mod types;

pub use config::{ConfigError, TableConfig};
pub use types::{BallId, BallKind, Player, TableEvent};
