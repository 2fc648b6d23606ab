pub mod arena;
#[cfg(feature = "physics")]
pub mod physics;
pub mod rng;
pub mod table;
pub mod time;
