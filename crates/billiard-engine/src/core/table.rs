//! Static table geometry: cushions with gaps at the pockets, and six pocket sensors.
//!
//! The playing surface is centered on the origin, length along X.

use glam::Vec2;

use crate::api::config::TableConfig;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsWorld;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub width: f32,
    pub height: f32,
    pub pocket_radius: f32,
    pockets: [Vec2; 6],
    cue_spot: Vec2,
    rack_origin: Vec2,
}

/// A cushion as center plus half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CushionSpan {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Table {
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            width: config.table_width,
            height: config.table_height,
            pockets: config.pocket_centers(),
            pocket_radius: config.pocket_radius,
            cue_spot: config.cue_spot(),
            rack_origin: config.rack_origin(),
        }
    }

    pub fn cue_spot(&self) -> Vec2 {
        self.cue_spot
    }

    pub fn rack_origin(&self) -> Vec2 {
        self.rack_origin
    }

    /// Pocket centers: four corners, then the two side pockets.
    pub fn pockets(&self) -> &[Vec2; 6] {
        &self.pockets
    }

    /// Six cushion segments just outside the playing surface: two on each
    /// long rail (split by the side pocket) and one on each short rail.
    /// Every pocket leaves a gap of one pocket radius on each adjoining cushion.
    pub fn cushions(&self, thickness: f32) -> Vec<CushionSpan> {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let gap = self.pocket_radius;
        let half_t = thickness / 2.0;

        let long_half = ((hw - 2.0 * gap) / 2.0).max(0.0);
        let short_half = (hh - gap).max(0.0);

        let mut spans = Vec::with_capacity(6);
        for y in [-(hh + half_t), hh + half_t] {
            for x in [-hw / 2.0, hw / 2.0] {
                spans.push(CushionSpan {
                    center: Vec2::new(x, y),
                    half_extents: Vec2::new(long_half, half_t),
                });
            }
        }
        for x in [-(hw + half_t), hw + half_t] {
            spans.push(CushionSpan {
                center: Vec2::new(x, 0.0),
                half_extents: Vec2::new(half_t, short_half),
            });
        }
        spans.retain(|s| s.half_extents.x > 0.0 && s.half_extents.y > 0.0);
        spans
    }

    /// Insert cushions and pocket sensors into the physics world.
    #[cfg(feature = "physics")]
    pub fn build(config: &TableConfig, world: &mut PhysicsWorld) -> Self {
        let table = Self::from_config(config);
        for span in table.cushions(config.cushion_thickness) {
            world.add_cushion(span.center, span.half_extents, config.cushion_restitution);
        }
        for (i, center) in table.pockets.iter().enumerate() {
            world.add_pocket(i as u32, *center, table.pocket_radius);
        }
        log::info!(
            "table built: {}x{} m, {} pockets",
            table.width,
            table.height,
            table.pockets.len()
        );
        table
    }
}
