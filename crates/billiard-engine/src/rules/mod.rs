// rules/mod.rs
//
// Turn-based game rules. Nothing here talks to rapier directly:
// physics is reached through `TableBodies`, presentation through `TableView`.

pub mod bodies;
pub mod engine;
pub mod rack;
pub mod score;
pub mod view;

pub use bodies::TableBodies;
pub use engine::{Phase, Ruling, ShotError, ShotRuleEngine, ShotState};
pub use rack::RackLayout;
pub use score::ScoreBoard;
pub use view::{SharedView, TableView, ViewState};
