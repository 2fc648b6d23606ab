use crate::api::types::Player;

/// Per-player score counters. Scores are not clamped and may go negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    scores: [i32; 2],
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `points` to `player`. Returns the new score.
    pub fn award(&mut self, player: Player, points: u32) -> i32 {
        let slot = &mut self.scores[player.index()];
        *slot += points as i32;
        *slot
    }

    /// Subtract `points` from `player`. Returns the new score.
    pub fn penalize(&mut self, player: Player, points: u32) -> i32 {
        let slot = &mut self.scores[player.index()];
        *slot -= points as i32;
        *slot
    }

    pub fn score(&self, player: Player) -> i32 {
        self.scores[player.index()]
    }

    pub fn reset(&mut self) {
        self.scores = [0; 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn award_and_penalize_are_independent_per_player() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.award(Player::One, 1), 1);
        assert_eq!(board.award(Player::One, 1), 2);
        assert_eq!(board.penalize(Player::Two, 1), -1);
        assert_eq!(board.score(Player::One), 2);
        assert_eq!(board.score(Player::Two), -1);
    }

    #[test]
    fn penalties_are_not_clamped_at_zero() {
        // Negative scores are kept on purpose.
        let mut board = ScoreBoard::new();
        board.penalize(Player::One, 1);
        board.penalize(Player::One, 1);
        assert_eq!(board.score(Player::One), -2);
    }

    #[test]
    fn reset_zeroes_both() {
        let mut board = ScoreBoard::new();
        board.award(Player::Two, 5);
        board.reset();
        assert_eq!(board, ScoreBoard::default());
    }
}
