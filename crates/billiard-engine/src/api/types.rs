use serde::{Deserialize, Serialize};

/// Stable identifier for a ball in the arena.
/// Id 0 is always the cue ball; object balls are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl BallId {
    pub const CUE: BallId = BallId(0);

    pub fn is_cue(self) -> bool {
        self == Self::CUE
    }
}

/// Cue ball or one of the object balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Cue,
    Object,
}

/// One of the two fixed players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// The opponent.
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Slot index into per-player storage.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Events the physics layer delivers to the rule engine.
/// Produced once per physics step, consumed in order on the simulation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    /// Contact began between two distinct balls.
    BallsCollide(BallId, BallId),
    /// A ball entered a pocket region.
    BallPocketed(BallId),
    /// Aggregate kinetic energy rose above the rest threshold.
    MotionBegin,
    /// Aggregate kinetic energy fell below the rest threshold.
    MotionEnd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_alternates() {
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.other(), Player::One);
        assert_eq!(Player::One.other().other(), Player::One);
    }

    #[test]
    fn cue_id_is_zero() {
        assert!(BallId(0).is_cue());
        assert!(!BallId(3).is_cue());
    }
}
