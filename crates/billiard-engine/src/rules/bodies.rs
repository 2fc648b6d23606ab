use glam::Vec2;

use crate::api::types::BallId;
use crate::components::ball::Ball;

/// Commands the rule engine issues to the physics layer.
///
/// Implemented by the Rapier-backed `PhysicsWorld`; every call must happen on
/// the simulation thread.
pub trait TableBodies {
    /// Insert a body for `ball` at `pos` with zero velocity.
    /// If the ball already has a body it is repositioned instead.
    fn add_body(&mut self, ball: &Ball, pos: Vec2);

    /// Remove the ball's body. No-op if it has none.
    fn remove_body(&mut self, id: BallId);

    /// Teleport a body. Velocity is left untouched.
    fn set_position(&mut self, id: BallId, pos: Vec2);

    fn set_velocity(&mut self, id: BallId, vel: Vec2);

    fn apply_impulse(&mut self, id: BallId, impulse: Vec2);

    /// Current position, or `None` if the ball has no body.
    fn position(&self, id: BallId) -> Option<Vec2>;

    fn has_body(&self, id: BallId) -> bool {
        self.position(id).is_some()
    }
}
