use serde::{Deserialize, Serialize};

use crate::api::types::{BallId, BallKind};

/// Lifecycle of a ball on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallStatus {
    InPlay,
    Pocketed,
}

/// A ball record. Position and velocity live in the physics world;
/// this holds identity, physical constants and the pocketed lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub kind: BallKind,
    pub radius: f32,
    pub mass: f32,
    /// Points awarded when this ball is pocketed (object balls only).
    pub points: u32,
    status: BallStatus,
}

impl Ball {
    pub fn cue(radius: f32, mass: f32) -> Self {
        Self {
            id: BallId::CUE,
            kind: BallKind::Cue,
            radius,
            mass,
            points: 0,
            status: BallStatus::InPlay,
        }
    }

    pub fn object(id: BallId, radius: f32, mass: f32) -> Self {
        debug_assert!(!id.is_cue(), "object ball cannot take the cue id");
        Self {
            id,
            kind: BallKind::Object,
            radius,
            mass,
            points: 1,
            status: BallStatus::InPlay,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn is_cue(&self) -> bool {
        self.kind == BallKind::Cue
    }

    pub fn status(&self) -> BallStatus {
        self.status
    }

    pub fn is_pocketed(&self) -> bool {
        self.status == BallStatus::Pocketed
    }

    /// Move an object ball to Pocketed. Returns `false` if it already was,
    /// so callers can skip duplicate pocket events.
    pub fn pocket(&mut self) -> bool {
        debug_assert!(!self.is_cue(), "the cue ball is respotted, never pocketed for good");
        if self.status == BallStatus::Pocketed {
            return false;
        }
        self.status = BallStatus::Pocketed;
        true
    }

    /// Put the ball back in play. Only a full game reset does this.
    pub(crate) fn restore(&mut self) {
        self.status = BallStatus::InPlay;
    }
}
