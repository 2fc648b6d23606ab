use crate::api::config::TableConfig;
use crate::api::types::BallId;
use crate::components::ball::Ball;

/// Ball storage addressed by stable `BallId`.
/// Index 0 is the cue ball, index `n` is object ball `n`, so lookups are O(1)
/// and ids never dangle across rack and re-rack.
#[derive(Debug, Clone)]
pub struct BallArena {
    balls: Vec<Ball>,
}

impl BallArena {
    /// One cue ball plus `config.object_balls` object balls, all in play.
    pub fn from_config(config: &TableConfig) -> Self {
        let mut balls = Vec::with_capacity(config.object_balls as usize + 1);
        balls.push(Ball::cue(config.ball_radius, config.ball_mass));
        for n in 1..=config.object_balls {
            balls.push(Ball::object(BallId(n), config.ball_radius, config.ball_mass));
        }
        Self { balls }
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(id.0 as usize)
    }

    pub fn cue(&self) -> &Ball {
        &self.balls[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    /// Object balls only.
    pub fn objects(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().skip(1)
    }

    /// Ids of object balls never pocketed.
    pub fn remaining(&self) -> Vec<BallId> {
        self.objects().filter(|b| !b.is_pocketed()).map(|b| b.id).collect()
    }

    /// Ids of every object ball, pocketed or not.
    pub fn object_ids(&self) -> Vec<BallId> {
        self.objects().map(|b| b.id).collect()
    }

    pub fn object_count(&self) -> usize {
        self.balls.len() - 1
    }

    pub fn pocketed_count(&self) -> usize {
        self.objects().filter(|b| b.is_pocketed()).count()
    }

    /// Return every object ball to play.
    pub(crate) fn restore_all(&mut self) {
        for ball in self.balls.iter_mut().skip(1) {
            ball.restore();
        }
    }
}
