//! Test doubles for the physics command surface.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::api::types::BallId;
use crate::components::ball::Ball;
use crate::rules::bodies::TableBodies;

/// Records bodies as plain position/velocity pairs, no simulation.
#[derive(Debug, Default)]
pub struct FakeBodies {
    pub bodies: BTreeMap<BallId, (Vec2, Vec2)>,
    pub impulses: Vec<(BallId, Vec2)>,
    pub adds: usize,
    pub removes: usize,
}

impl FakeBodies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self, id: BallId) -> Option<Vec2> {
        self.bodies.get(&id).map(|(_, vel)| *vel)
    }
}

impl TableBodies for FakeBodies {
    fn add_body(&mut self, ball: &Ball, pos: Vec2) {
        self.adds += 1;
        self.bodies.insert(ball.id, (pos, Vec2::ZERO));
    }

    fn remove_body(&mut self, id: BallId) {
        if self.bodies.remove(&id).is_some() {
            self.removes += 1;
        }
    }

    fn set_position(&mut self, id: BallId, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.0 = pos;
        }
    }

    fn set_velocity(&mut self, id: BallId, vel: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.1 = vel;
        }
    }

    fn apply_impulse(&mut self, id: BallId, impulse: Vec2) {
        self.impulses.push((id, impulse));
    }

    fn position(&self, id: BallId) -> Option<Vec2> {
        self.bodies.get(&id).map(|(pos, _)| *pos)
    }
}
