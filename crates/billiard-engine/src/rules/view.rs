use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::api::types::{BallId, Player};

/// Fire-and-forget presentation intents emitted by the rule engine.
/// The engine never reads anything back from the view.
pub trait TableView {
    fn set_foul_message(&mut self, text: &str);
    fn set_action_message(&mut self, text: &str);
    fn set_player_score(&mut self, player: Player, value: i32);
    fn add_ball(&mut self, id: BallId);
    fn remove_ball(&mut self, id: BallId);
}

/// Latest state of every presentation intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub foul_message: String,
    pub action_message: String,
    pub scores: [i32; 2],
    pub balls: BTreeSet<BallId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, player: Player) -> i32 {
        self.scores[player.index()]
    }

    pub fn is_visible(&self, id: BallId) -> bool {
        self.balls.contains(&id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl TableView for ViewState {
    fn set_foul_message(&mut self, text: &str) {
        self.foul_message.clear();
        self.foul_message.push_str(text);
    }

    fn set_action_message(&mut self, text: &str) {
        self.action_message.clear();
        self.action_message.push_str(text);
    }

    fn set_player_score(&mut self, player: Player, value: i32) {
        self.scores[player.index()] = value;
    }

    fn add_ball(&mut self, id: BallId) {
        self.balls.insert(id);
    }

    fn remove_ball(&mut self, id: BallId) {
        self.balls.remove(&id);
    }
}

/// A `ViewState` readable from other threads while the simulation thread writes it.
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<Mutex<ViewState>>,
}

impl SharedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current view.
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        // A panicked writer leaves plain data behind; keep serving it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TableView for SharedView {
    fn set_foul_message(&mut self, text: &str) {
        self.lock().set_foul_message(text);
    }

    fn set_action_message(&mut self, text: &str) {
        self.lock().set_action_message(text);
    }

    fn set_player_score(&mut self, player: Player, value: i32) {
        self.lock().set_player_score(player, value);
    }

    fn add_ball(&mut self, id: BallId) {
        self.lock().add_ball(id);
    }

    fn remove_ball(&mut self, id: BallId) {
        self.lock().remove_ball(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_ball_is_a_set_insert() {
        let mut view = ViewState::new();
        view.add_ball(BallId(3));
        view.add_ball(BallId(3));
        assert_eq!(view.balls.len(), 1);
        view.remove_ball(BallId(3));
        assert!(!view.is_visible(BallId(3)));
    }

    #[test]
    fn shared_view_snapshot_sees_writes() {
        let view = SharedView::new();
        let mut writer = view.clone();
        writer.set_player_score(Player::Two, -2);
        writer.set_foul_message("Foul");
        let snap = view.snapshot();
        assert_eq!(snap.score(Player::Two), -2);
        assert_eq!(snap.foul_message, "Foul");
    }

    #[test]
    fn serializes_to_json() {
        let mut view = ViewState::new();
        view.set_action_message("next");
        let json = view.to_json().unwrap();
        assert!(json.contains("\"action_message\":\"next\""));
    }
}
