pub mod api;
pub mod core;
pub mod components;
pub mod input;
pub mod rules;
#[cfg(feature = "physics")]
pub mod runner;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, TableConfig};
pub use api::types::{BallId, BallKind, Player, TableEvent};
pub use components::ball::{Ball, BallStatus};
pub use core::arena::BallArena;
pub use core::rng::RackRng;
pub use core::table::{CushionSpan, Table};
pub use core::time::FixedTimestep;
pub use input::queue::{ShotQueue, ShotRequest, ShotSender};
pub use rules::{
    Phase, RackLayout, Ruling, ScoreBoard, SharedView, ShotError, ShotRuleEngine, ShotState,
    TableBodies, TableView, ViewState,
};

#[cfg(feature = "physics")]
pub use core::physics::{BallMaterial, PhysicsBody, PhysicsWorld};
#[cfg(feature = "physics")]
pub use runner::{RunnerHandle, TableRunner};
