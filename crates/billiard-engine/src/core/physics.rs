use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::config::TableConfig;
use crate::api::types::{BallId, TableEvent};
use crate::components::ball::Ball;
use crate::rules::bodies::TableBodies;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn na_to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Contact and damping properties shared by every ball.
#[derive(Debug, Clone, Copy)]
pub struct BallMaterial {
    pub restitution: f32,
    pub friction: f32,
    /// Velocity decay standing in for felt friction.
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BallMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.95,
            friction: 0.2,
            linear_damping: 0.6,
            angular_damping: 1.0,
        }
    }
}

/// Handle pair for a body inside Rapier.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// What a collider represents, packed into its `user_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyTag {
    Ball(BallId),
    Pocket(u32),
    Cushion,
}

impl BodyTag {
    const BALL: u128 = 1 << 64;
    const POCKET: u128 = 2 << 64;
    const CUSHION: u128 = 3 << 64;
    const KIND_MASK: u128 = !(u64::MAX as u128);

    fn encode(self) -> u128 {
        match self {
            BodyTag::Ball(id) => Self::BALL | id.0 as u128,
            BodyTag::Pocket(n) => Self::POCKET | n as u128,
            BodyTag::Cushion => Self::CUSHION,
        }
    }

    fn decode(data: u128) -> Option<Self> {
        let low = (data & u64::MAX as u128) as u32;
        match data & Self::KIND_MASK {
            Self::BALL => Some(BodyTag::Ball(BallId(low))),
            Self::POCKET => Some(BodyTag::Pocket(low)),
            Self::CUSHION => Some(BodyTag::Cushion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BallBody {
    body: PhysicsBody,
    mass: f32,
}

// ---------------------------------------------------------------------------
// Event collector
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Zero-gravity Rapier world holding the balls, cushions and pocket sensors.
///
/// Each step reports ball contacts, pocket entries and rest/motion
/// transitions as `TableEvent`s.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    balls: HashMap<BallId, BallBody>,
    material: BallMaterial,
    rest_threshold: f32,
    at_rest: bool,
}

impl PhysicsWorld {
    /// Create an empty world. `rest_threshold` is the aggregate kinetic
    /// energy below which the table counts as settled.
    pub fn new(rest_threshold: f32, material: BallMaterial) -> Self {
        Self {
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            balls: HashMap::new(),
            material,
            rest_threshold,
            at_rest: true,
        }
    }

    /// World with timestep, threshold and ball material taken from the config.
    /// Holds no table geometry yet; see `Table::build`.
    pub fn from_config(config: &TableConfig) -> Self {
        let material = BallMaterial {
            restitution: config.ball_restitution,
            friction: config.friction,
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
        };
        let mut world = Self::new(config.rest_threshold, material);
        world.set_dt(config.fixed_dt);
        world
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Add a fixed rectangular cushion.
    pub fn add_cushion(&mut self, center: Vec2, half_extents: Vec2, restitution: f32) {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(center))
            .build();
        let handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .restitution(restitution)
            .friction(self.material.friction)
            .user_data(BodyTag::Cushion.encode())
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
    }

    /// Add a circular pocket sensor. Balls entering it raise `BallPocketed`.
    pub fn add_pocket(&mut self, index: u32, center: Vec2, radius: f32) {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(center))
            .build();
        let handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::ball(radius)
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(BodyTag::Pocket(index).encode())
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
    }

    fn create_ball(&mut self, ball: &Ball, pos: Vec2) -> BallBody {
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(pos))
            .linear_damping(self.material.linear_damping)
            .angular_damping(self.material.angular_damping)
            .ccd_enabled(true)
            .build();
        let body_handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::ball(ball.radius)
            .mass(ball.mass)
            .restitution(self.material.restitution)
            .friction(self.material.friction)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(BodyTag::Ball(ball.id).encode())
            .build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);
        BallBody {
            body: PhysicsBody {
                body_handle,
                collider_handle,
            },
            mass: ball.mass,
        }
    }

    /// Advance one fixed step and append the resulting table events.
    ///
    /// `MotionBegin` is evaluated before integrating so an impulse applied
    /// since the last step is reported ahead of the contacts it causes;
    /// `MotionEnd` is evaluated after, and settles every ball to zero velocity.
    pub fn step_into(&mut self, events: &mut Vec<TableEvent>) {
        if self.at_rest && self.kinetic_energy() > self.rest_threshold {
            self.at_rest = false;
            events.push(TableEvent::MotionBegin);
        }

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let CollisionEvent::Started(h1, h2, _) = event else {
                continue;
            };
            match (self.collider_tag(h1), self.collider_tag(h2)) {
                (Some(BodyTag::Ball(a)), Some(BodyTag::Ball(b))) => {
                    events.push(TableEvent::BallsCollide(a, b));
                }
                (Some(BodyTag::Ball(id)), Some(BodyTag::Pocket(_)))
                | (Some(BodyTag::Pocket(_)), Some(BodyTag::Ball(id))) => {
                    events.push(TableEvent::BallPocketed(id));
                }
                _ => {}
            }
        }

        if !self.at_rest && self.kinetic_energy() <= self.rest_threshold {
            self.at_rest = true;
            self.settle();
            events.push(TableEvent::MotionEnd);
        }
    }

    /// Aggregate linear kinetic energy of all balls.
    pub fn kinetic_energy(&self) -> f32 {
        self.balls
            .values()
            .filter_map(|b| {
                let rb = self.bodies.get(b.body.body_handle)?;
                Some(0.5 * b.mass * rb.linvel().norm_squared())
            })
            .sum()
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    pub fn velocity(&self, id: BallId) -> Vec2 {
        self.balls
            .get(&id)
            .and_then(|b| self.bodies.get(b.body.body_handle))
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Number of balls with a body in the world.
    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Number of rigid bodies, table geometry included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    fn settle(&mut self) {
        for ball in self.balls.values() {
            if let Some(rb) = self.bodies.get_mut(ball.body.body_handle) {
                rb.set_linvel(vector![0.0, 0.0], false);
                rb.set_angvel(0.0, false);
            }
        }
    }

    fn collider_tag(&self, handle: ColliderHandle) -> Option<BodyTag> {
        let collider = self.colliders.get(handle)?;
        BodyTag::decode(collider.user_data)
    }

    fn rigid_body_mut(&mut self, id: BallId) -> Option<&mut RigidBody> {
        let handle = self.balls.get(&id)?.body.body_handle;
        self.bodies.get_mut(handle)
    }
}

impl TableBodies for PhysicsWorld {
    fn add_body(&mut self, ball: &Ball, pos: Vec2) {
        if let Some(rb) = self.rigid_body_mut(ball.id) {
            rb.set_translation(vec2_to_na(pos), true);
            rb.set_linvel(vector![0.0, 0.0], true);
            rb.set_angvel(0.0, true);
            return;
        }
        let body = self.create_ball(ball, pos);
        self.balls.insert(ball.id, body);
    }

    fn remove_body(&mut self, id: BallId) {
        if let Some(ball) = self.balls.remove(&id) {
            self.bodies.remove(
                ball.body.body_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    fn set_position(&mut self, id: BallId, pos: Vec2) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    fn set_velocity(&mut self, id: BallId, vel: Vec2) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    fn apply_impulse(&mut self, id: BallId, impulse: Vec2) {
        let Some(mass) = self.balls.get(&id).map(|b| b.mass) else {
            return;
        };
        // Rapier mass properties of a fresh body are only valid after a step.
        if let Some(rb) = self.rigid_body_mut(id) {
            let vel = na_to_vec2(rb.linvel()) + impulse / mass;
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    fn position(&self, id: BallId) -> Option<Vec2> {
        let ball = self.balls.get(&id)?;
        let rb = self.bodies.get(ball.body.body_handle)?;
        Some(na_to_vec2(rb.translation()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
