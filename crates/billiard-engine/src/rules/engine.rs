//! Shot rule engine.
//!
//! A shot is one MotionBegin → MotionEnd cycle reported by the physics layer.
//! Collisions and pockets arriving in between are folded into per-shot
//! state; the ruling (fouls, turn switch, respots, re-rack) is made once,
//! when motion ends.

use glam::Vec2;
use thiserror::Error;

use crate::api::config::TableConfig;
use crate::api::types::{BallId, Player, TableEvent};
use crate::core::arena::BallArena;
use crate::rules::bodies::TableBodies;
use crate::rules::rack::RackLayout;
use crate::rules::score::ScoreBoard;
use crate::rules::view::TableView;

const FOUL_PENALTY: u32 = 1;

/// Whether the table is waiting for a shot or balls are rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InMotion,
}

/// Why a shot request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ShotError {
    #[error("balls are still moving")]
    InMotion,
    #[error("a shot was already accepted and has not started yet")]
    ShotPending,
    #[error("impulse {magnitude} is below the minimum {min}")]
    TooWeak { magnitude: f32, min: f32 },
    #[error("impulse is not finite")]
    NotFinite,
    #[error("cue ball has no body on the table")]
    CueBallMissing,
}

/// Transient state of the shot in progress. Reset when motion begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShotState {
    /// Object balls pocketed during this shot, in pocket order.
    pub pocketed: Vec<BallId>,
    /// Latched on the first cue-ball contact with another ball.
    pub cue_touched: bool,
    pub cue_pocketed: bool,
    /// At least one foul was declared this shot.
    pub foul: bool,
    /// The turn has already passed this shot.
    pub turn_passed: bool,
}

/// Summary of one end-of-shot ruling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruling {
    pub shooter: Player,
    pub next_player: Player,
    pub foul: bool,
    pub no_contact: bool,
    pub cue_pocketed: bool,
    pub pocketed: Vec<BallId>,
    pub reracked: bool,
}

pub struct ShotRuleEngine {
    config: TableConfig,
    arena: BallArena,
    rack: RackLayout,
    scores: ScoreBoard,
    current: Player,
    phase: Phase,
    shot: ShotState,
    shot_pending: bool,
    cue_baseline: Vec2,
}

impl ShotRuleEngine {
    pub fn new(config: TableConfig) -> Self {
        let arena = BallArena::from_config(&config);
        let rack = RackLayout::from_config(&config);
        let cue_baseline = config.cue_spot();
        Self {
            config,
            arena,
            rack,
            scores: ScoreBoard::new(),
            current: Player::One,
            phase: Phase::Idle,
            shot: ShotState::default(),
            shot_pending: false,
            cue_baseline,
        }
    }

    /// Rack every object ball, spot the cue ball and publish the scores.
    pub fn setup(&mut self, bodies: &mut dyn TableBodies, view: &mut dyn TableView) {
        let all = self.arena.object_ids();
        self.rack.place(&all, &self.arena, bodies, view, false);
        self.spot_cue(self.config.cue_spot(), bodies, view);
        self.cue_baseline = self.config.cue_spot();
        self.publish_scores(view);
        log::info!(
            "table set: {} object balls, {} to shoot",
            all.len(),
            self.config.player_name(self.current)
        );
    }

    /// Full restart: every ball back in play and re-racked, scores zeroed,
    /// Player One to shoot.
    pub fn reset_game(&mut self, bodies: &mut dyn TableBodies, view: &mut dyn TableView) {
        self.arena.restore_all();
        self.scores.reset();
        self.current = Player::One;
        self.phase = Phase::Idle;
        self.shot = ShotState::default();
        self.shot_pending = false;
        view.set_foul_message("");
        view.set_action_message("");
        self.setup(bodies, view);
        log::info!("game reset");
    }

    // -- Input --

    /// Strike the cue ball. Refused while balls move or a shot is pending.
    /// Returns the impulse actually applied (clamped to the configured max).
    pub fn request_shot(
        &mut self,
        impulse: Vec2,
        bodies: &mut dyn TableBodies,
    ) -> Result<Vec2, ShotError> {
        if self.phase == Phase::InMotion {
            return Err(ShotError::InMotion);
        }
        if self.shot_pending {
            return Err(ShotError::ShotPending);
        }
        if !impulse.is_finite() {
            return Err(ShotError::NotFinite);
        }
        let magnitude = impulse.length();
        if magnitude < self.config.min_shot_impulse {
            return Err(ShotError::TooWeak {
                magnitude,
                min: self.config.min_shot_impulse,
            });
        }
        let pos = bodies.position(BallId::CUE).ok_or(ShotError::CueBallMissing)?;

        let impulse = impulse.clamp_length_max(self.config.max_shot_impulse);
        self.cue_baseline = pos;
        bodies.apply_impulse(BallId::CUE, impulse);
        self.shot_pending = true;
        log::info!("{} shoots, impulse {:?}", self.config.player_name(self.current), impulse);
        Ok(impulse)
    }

    /// Drop an accepted shot that never set the table in motion.
    pub fn abandon_pending_shot(&mut self) {
        if self.shot_pending {
            log::warn!("shot produced no motion; input unlocked");
            self.shot_pending = false;
        }
    }

    // -- Events --

    /// Feed one physics event. Returns the ruling when the event ends a shot.
    pub fn handle(
        &mut self,
        event: TableEvent,
        bodies: &mut dyn TableBodies,
        view: &mut dyn TableView,
    ) -> Option<Ruling> {
        match event {
            TableEvent::MotionBegin => {
                self.on_motion_begin(view);
                None
            }
            TableEvent::BallsCollide(a, b) => {
                self.on_balls_collide(a, b);
                None
            }
            TableEvent::BallPocketed(id) => {
                self.on_ball_pocketed(id, bodies, view);
                None
            }
            TableEvent::MotionEnd => self.on_motion_end(bodies, view),
        }
    }

    pub fn on_motion_begin(&mut self, view: &mut dyn TableView) {
        if self.phase == Phase::InMotion {
            log::warn!("motion begin while already in motion; ignored");
            return;
        }
        self.phase = Phase::InMotion;
        self.shot_pending = false;
        self.shot = ShotState::default();
        view.set_foul_message("");
        view.set_action_message("");
        log::debug!("shot started");
    }

    pub fn on_balls_collide(&mut self, a: BallId, b: BallId) {
        if self.phase != Phase::InMotion {
            log::warn!("collision {:?}/{:?} while idle; ignored", a, b);
            return;
        }
        if self.shot.cue_touched || self.shot.turn_passed {
            return;
        }
        if a.is_cue() != b.is_cue() {
            log::debug!("cue ball first contact with {:?}", if a.is_cue() { b } else { a });
            self.shot.cue_touched = true;
        }
    }

    /// Returns `true` when the event changed any state.
    pub fn on_ball_pocketed(
        &mut self,
        id: BallId,
        bodies: &mut dyn TableBodies,
        view: &mut dyn TableView,
    ) -> bool {
        if self.phase != Phase::InMotion {
            log::warn!("pocket of {:?} while idle; ignored", id);
            return false;
        }
        bodies.set_velocity(id, Vec2::ZERO);

        if id.is_cue() {
            if self.shot.cue_pocketed {
                return false;
            }
            self.shot.cue_pocketed = true;
            self.declare_foul("cue ball has been pocketed", view);
            return true;
        }

        let Some(ball) = self.arena.get_mut(id) else {
            log::warn!("pocket event for unknown ball {:?}", id);
            return false;
        };
        if !ball.pocket() {
            log::warn!("ball {:?} pocketed twice; ignored", id);
            return false;
        }
        let points = ball.points;
        self.shot.pocketed.push(id);
        let score = self.scores.award(self.current, points);
        view.set_player_score(self.current, score);
        bodies.remove_body(id);
        view.remove_ball(id);
        log::debug!("ball {:?} pocketed by {:?}, score {}", id, self.current, score);
        true
    }

    /// Declare a foul against the shooter: penalty now, turn passes at the ruling.
    /// Only valid while balls are moving; returns `false` otherwise.
    pub fn call_foul(&mut self, reason: &str, view: &mut dyn TableView) -> bool {
        if self.phase != Phase::InMotion {
            return false;
        }
        self.declare_foul(reason, view);
        true
    }

    pub fn on_motion_end(
        &mut self,
        bodies: &mut dyn TableBodies,
        view: &mut dyn TableView,
    ) -> Option<Ruling> {
        if self.phase != Phase::InMotion {
            log::warn!("motion end without a shot in progress; ignored");
            return None;
        }
        let shooter = self.current;
        let pocketed_now = self.shot.pocketed.len();
        let mut no_contact = false;

        if !self.shot.cue_pocketed && !self.shot.cue_touched && pocketed_now == 0 {
            self.declare_foul("cue ball did not touch another ball", view);
            bodies.set_position(BallId::CUE, self.cue_baseline);
            bodies.set_velocity(BallId::CUE, Vec2::ZERO);
            no_contact = true;
        } else if !self.shot.cue_pocketed && self.shot.cue_touched && pocketed_now == 0 {
            self.pass_turn(view);
        }

        if self.shot.foul {
            self.pass_turn(view);
        }

        if self.shot.cue_pocketed {
            self.spot_cue(self.config.cue_spot(), bodies, view);
        }

        let reracked = self.rerack_if_one_left(bodies, view);
        if self.arena.remaining().is_empty() {
            self.announce_cleared(view);
        }

        let ruling = Ruling {
            shooter,
            next_player: self.current,
            foul: self.shot.foul,
            no_contact,
            cue_pocketed: self.shot.cue_pocketed,
            pocketed: std::mem::take(&mut self.shot.pocketed),
            reracked,
        };

        self.shot.cue_touched = false;
        self.shot.cue_pocketed = false;
        self.shot.foul = false;
        self.shot.turn_passed = false;
        self.cue_baseline = bodies
            .position(BallId::CUE)
            .unwrap_or_else(|| self.config.cue_spot());
        self.phase = Phase::Idle;

        log::info!(
            "shot ruled: {:?} pocketed {:?}, foul={}, next {:?}",
            ruling.shooter,
            ruling.pocketed,
            ruling.foul,
            ruling.next_player
        );
        Some(ruling)
    }

    // -- Accessors --

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn shot(&self) -> &ShotState {
        &self.shot
    }

    pub fn shot_pending(&self) -> bool {
        self.shot_pending
    }

    pub fn cue_baseline(&self) -> Vec2 {
        self.cue_baseline
    }

    pub fn arena(&self) -> &BallArena {
        &self.arena
    }

    pub fn pocketed_count(&self) -> usize {
        self.arena.pocketed_count()
    }

    pub fn remaining(&self) -> Vec<BallId> {
        self.arena.remaining()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // -- private helpers --

    fn declare_foul(&mut self, reason: &str, view: &mut dyn TableView) {
        self.shot.foul = true;
        view.set_foul_message(&format!("Foul: {reason}"));
        let score = self.scores.penalize(self.current, FOUL_PENALTY);
        view.set_player_score(self.current, score);
        log::info!("foul by {:?}: {}", self.current, reason);
    }

    /// Hand the table to the other player, at most once per shot.
    fn pass_turn(&mut self, view: &mut dyn TableView) {
        if self.shot.turn_passed {
            return;
        }
        self.shot.turn_passed = true;
        self.current = self.current.other();
        view.set_action_message(&format!(
            "Switching players, next player: {}",
            self.config.player_name(self.current)
        ));
    }

    fn spot_cue(&mut self, pos: Vec2, bodies: &mut dyn TableBodies, view: &mut dyn TableView) {
        if bodies.has_body(BallId::CUE) {
            bodies.set_position(BallId::CUE, pos);
            bodies.set_velocity(BallId::CUE, Vec2::ZERO);
        } else {
            bodies.add_body(self.arena.cue(), pos);
        }
        view.add_ball(BallId::CUE);
    }

    /// Once only one object ball is left, respot the cue ball and re-rack the
    /// survivors without the apex slot.
    fn rerack_if_one_left(&mut self, bodies: &mut dyn TableBodies, view: &mut dyn TableView) -> bool {
        let total = self.arena.object_count();
        if self.arena.pocketed_count() + 1 < total {
            return false;
        }
        self.spot_cue(self.config.cue_spot(), bodies, view);
        let remaining = self.arena.remaining();
        self.rack.place(&remaining, &self.arena, bodies, view, true);
        log::info!("one ball left: re-racked {:?}", remaining);
        true
    }

    fn announce_cleared(&self, view: &mut dyn TableView) {
        let one = self.scores.score(Player::One);
        let two = self.scores.score(Player::Two);
        let text = if one == two {
            format!("Table cleared: draw at {one}")
        } else {
            let (winner, high, low) = if one > two {
                (Player::One, one, two)
            } else {
                (Player::Two, two, one)
            };
            format!(
                "Table cleared: {} wins {} to {}",
                self.config.player_name(winner),
                high,
                low
            )
        };
        view.set_action_message(&text);
    }

    fn publish_scores(&self, view: &mut dyn TableView) {
        for player in Player::ALL {
            view.set_player_score(player, self.scores.score(player));
        }
    }
}
