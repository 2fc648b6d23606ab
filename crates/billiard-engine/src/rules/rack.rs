//! Triangular rack placement.
//!
//! Rows advance along +X one ball diameter apart; within a row balls are one
//! diameter apart along +Y and each row is shifted by one radius, so rows
//! nest into a tight triangle. Each row holds one ball fewer than the one
//! before it, ending in a single-ball apex row.

use glam::Vec2;

use crate::api::config::TableConfig;
use crate::api::types::BallId;
use crate::core::arena::BallArena;
use crate::core::rng::RackRng;
use crate::rules::bodies::TableBodies;
use crate::rules::view::TableView;

pub struct RackLayout {
    origin: Vec2,
    radius: f32,
    first_row: u32,
    rng: RackRng,
}

impl RackLayout {
    pub fn new(origin: Vec2, radius: f32, first_row: u32, rng: RackRng) -> Self {
        Self {
            origin,
            radius,
            first_row: first_row.max(1),
            rng,
        }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(
            config.rack_origin(),
            config.ball_radius,
            config.rack_first_row,
            RackRng::new(config.rack_seed),
        )
    }

    /// Position of the first slot.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Row size to start from for `count` balls: the configured first row, or
    /// the smallest triangle that holds them all if that is larger.
    fn first_row_for(&self, count: usize) -> u32 {
        let mut n = 0u32;
        while (n as usize * (n as usize + 1)) / 2 < count {
            n += 1;
        }
        self.first_row.max(n)
    }

    /// Slot positions for up to `count` balls, in placement order.
    /// With `stop_at_apex_row` the single-ball apex row is never filled, so
    /// fewer than `count` slots may come back.
    pub fn slots(&self, count: usize, stop_at_apex_row: bool) -> Vec<Vec2> {
        let diameter = self.radius * 2.0;
        let mut row_size = self.first_row_for(count);
        let mut row = 0u32;
        let mut col = 0u32;
        let mut slots = Vec::with_capacity(count);

        while slots.len() < count {
            if row_size == 0 || (stop_at_apex_row && row_size == 1) {
                break;
            }
            let x = self.origin.x + diameter * row as f32;
            let y = self.origin.y + diameter * col as f32 + self.radius * row as f32;
            slots.push(Vec2::new(x, y));

            col += 1;
            if col == row_size {
                col = 0;
                row += 1;
                row_size -= 1;
            }
        }
        slots
    }

    /// Shuffle `balls` and place them into rack slots with zero velocity,
    /// (re)inserting each into the physics world and the view.
    /// Returns the placements that were made.
    pub fn place(
        &mut self,
        balls: &[BallId],
        arena: &BallArena,
        bodies: &mut dyn TableBodies,
        view: &mut dyn TableView,
        stop_at_apex_row: bool,
    ) -> Vec<(BallId, Vec2)> {
        let mut order = balls.to_vec();
        self.rng.shuffle(&mut order);

        let slots = self.slots(order.len(), stop_at_apex_row);
        let mut placed = Vec::with_capacity(slots.len());
        for (id, pos) in order.into_iter().zip(slots) {
            let Some(ball) = arena.get(id) else {
                log::warn!("rack: unknown ball {:?} skipped", id);
                continue;
            };
            bodies.add_body(ball, pos);
            bodies.set_velocity(id, Vec2::ZERO);
            view.add_ball(id);
            placed.push((id, pos));
        }
        log::debug!("racked {} of {} balls (stop_at_apex_row={})", placed.len(), balls.len(), stop_at_apex_row);
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::view::ViewState;
    use crate::testing::FakeBodies;

    const R: f32 = 0.5;

    fn layout() -> RackLayout {
        RackLayout::new(Vec2::new(-10.0, -2.0), R, 5, RackRng::new(Some(1)))
    }

    fn assert_no_overlap(slots: &[Vec2]) {
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!(
                    a.distance(*b) >= 2.0 * R - 1e-5,
                    "slots overlap: {:?} {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn full_rack_fills_fifteen_slots_without_overlap() {
        let slots = layout().slots(15, false);
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0], Vec2::new(-10.0, -2.0));
        assert_no_overlap(&slots);
    }

    #[test]
    fn rows_shrink_by_one() {
        let slots = layout().slots(15, false);
        let mut rows: Vec<usize> = Vec::new();
        let mut last_x = f32::NAN;
        for s in &slots {
            if s.x != last_x {
                rows.push(0);
                last_x = s.x;
            }
            *rows.last_mut().unwrap() += 1;
        }
        assert_eq!(rows, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn neighbours_are_tightly_packed() {
        let slots = layout().slots(15, false);
        // Same row: one diameter apart.
        assert!((slots[0].distance(slots[1]) - 2.0 * R).abs() < 1e-5);
        // Next row: one diameter along X, one radius along Y.
        assert!((slots[5].x - slots[0].x - 2.0 * R).abs() < 1e-5);
        assert!((slots[5].y - slots[0].y - R).abs() < 1e-5);
    }

    #[test]
    fn apex_is_the_single_last_slot() {
        let slots = layout().slots(15, false);
        let apex = slots[14];
        assert!((apex.x - (-10.0 + 8.0 * R)).abs() < 1e-5);
        assert!((apex.y - (-2.0 + 4.0 * R)).abs() < 1e-5);
    }

    #[test]
    fn stop_at_apex_row_leaves_apex_empty() {
        let full = layout().slots(15, false);
        let partial = layout().slots(15, true);
        assert_eq!(partial.len(), 14);
        assert_eq!(&full[..14], &partial[..]);
        assert!(!partial.contains(&full[14]));
    }

    #[test]
    fn single_ball_goes_to_origin_even_when_stopping() {
        let slots = layout().slots(1, true);
        assert_eq!(slots, vec![Vec2::new(-10.0, -2.0)]);
    }

    #[test]
    fn empty_list_places_nothing() {
        assert!(layout().slots(0, false).is_empty());
        assert!(layout().slots(0, true).is_empty());
    }

    #[test]
    fn oversized_rack_grows_first_row() {
        let slots = layout().slots(21, false);
        assert_eq!(slots.len(), 21);
        assert_no_overlap(&slots);
    }

    #[test]
    fn place_inserts_into_world_and_view() {
        let config = TableConfig {
            object_balls: 15,
            rack_seed: Some(3),
            ..TableConfig::default()
        };
        let arena = BallArena::from_config(&config);
        let mut rack = RackLayout::from_config(&config);
        let mut bodies = FakeBodies::new();
        let mut view = ViewState::new();

        let placed = rack.place(&arena.object_ids(), &arena, &mut bodies, &mut view, false);

        assert_eq!(placed.len(), 15);
        assert_eq!(bodies.bodies.len(), 15);
        assert_eq!(view.balls.len(), 15);
        for (id, pos) in &placed {
            assert_eq!(bodies.position(*id), Some(*pos));
            assert_eq!(bodies.velocity(*id), Some(Vec2::ZERO));
        }
        let expected = rack.slots(15, false);
        let got: Vec<Vec2> = placed.iter().map(|(_, p)| *p).collect();
        assert_eq!(got, expected);
    }
}
