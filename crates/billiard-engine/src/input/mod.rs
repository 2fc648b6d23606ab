pub mod queue;

pub use queue::{ShotQueue, ShotRequest, ShotSender};
