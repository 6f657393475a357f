//! The enemy car: falls straight down, respawns above the top edge at a
//! random lane position, and gets faster as the score climbs.

use crate::collision::Collider;
use crate::sprite::{CarModel, CarSprite};
use lr_core::geometry::RoadGeometry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Fall-speed range in pixels per tick, drawn once per spawn. Both endpoints
/// rise with score, so difficulty never regresses within a session.
pub fn speed_range_for(score: u64) -> (f32, f32) {
    match score {
        0..=19 => (2.0, 4.0),
        20..=49 => (3.0, 5.0),
        50..=99 => (4.0, 6.0),
        _ => (5.0, 7.0),
    }
}

pub struct EnemyCar {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub model: CarModel,
    pub sprite: CarSprite,
    assets_dir: PathBuf,
    rng: StdRng,
}

impl EnemyCar {
    pub fn new(assets_dir: &Path, geom: &RoadGeometry) -> Self {
        Self::with_rng(assets_dir, geom, StdRng::from_entropy())
    }

    fn with_rng(assets_dir: &Path, geom: &RoadGeometry, rng: StdRng) -> Self {
        let model = CarModel::new(2).unwrap_or_default();
        let sprite = CarSprite::load(assets_dir, model, (geom.car_width, geom.car_height));
        let mut enemy = Self {
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            model,
            sprite,
            assets_dir: assets_dir.to_path_buf(),
            rng,
        };
        enemy.respawn(geom, 0);
        enemy
    }

    pub fn width(&self) -> u32 {
        self.sprite.width()
    }

    pub fn height(&self) -> u32 {
        self.sprite.height()
    }

    /// Place fully off-screen above the top edge at a uniform random lane
    /// position, with a fresh speed for the current score tier.
    pub fn respawn(&mut self, geom: &RoadGeometry, score: u64) {
        let (lo, hi) = speed_range_for(score);
        self.speed = self.rng.gen_range(lo..=hi);

        let min_x = geom.lane_min_x();
        let max_x = (geom.viewport_width - geom.road_right) as f32 - self.width() as f32;
        self.x = if max_x > min_x {
            self.rng.gen_range(min_x..=max_x)
        } else {
            min_x
        };
        self.y = -(self.height() as f32);
    }

    /// One tick of falling. Past the bottom edge the car respawns immediately.
    pub fn step(&mut self, geom: &RoadGeometry, score: u64) {
        self.y += self.speed;
        if self.y >= geom.viewport_height as f32 {
            self.respawn(geom, score);
        }
    }

    /// Viewport resized: rebuild the sprite at the new size and remap the
    /// position. A car still above the screen stays fully off-screen rather
    /// than being clamped into view.
    pub fn handle_resize(&mut self, old: &RoadGeometry, new: &RoadGeometry) {
        self.sprite = CarSprite::load(
            &self.assets_dir,
            self.model,
            (new.car_width, new.car_height),
        );
        self.x = new.remap_x(old, self.x);
        if self.y < 0.0 {
            self.y = -(self.height() as f32);
        } else {
            self.y = new.remap_y(old, self.y);
        }
    }

    pub fn collider(&self) -> Collider<'_> {
        Collider {
            mask: &self.sprite.mask,
            x: self.x,
            y: self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_geom() -> RoadGeometry {
        RoadGeometry::resolve(800, 600)
    }

    fn seeded_enemy(geom: &RoadGeometry, seed: u64) -> EnemyCar {
        EnemyCar::with_rng(
            Path::new("/nonexistent/assets"),
            geom,
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn speed_tiers_are_monotonic() {
        let scores = [0u64, 19, 20, 49, 50, 99, 100, 10_000];
        let mut last = (0.0f32, 0.0f32);
        for score in scores {
            let (lo, hi) = speed_range_for(score);
            assert!(lo <= hi);
            assert!(lo >= last.0, "min speed regressed at score {score}");
            assert!(hi >= last.1, "max speed regressed at score {score}");
            last = (lo, hi);
        }
    }

    #[test]
    fn spawns_fully_off_screen_within_lane() {
        let geom = test_geom();
        for seed in 0..20 {
            let enemy = seeded_enemy(&geom, seed);
            assert!(enemy.y < 0.0, "seed {seed}");
            assert_eq!(enemy.y, -(enemy.height() as f32));
            assert!(enemy.x >= geom.lane_min_x(), "seed {seed}");
            let max_x =
                (geom.viewport_width - geom.road_right) as f32 - enemy.width() as f32;
            assert!(enemy.x <= max_x, "seed {seed}");
        }
    }

    #[test]
    fn falling_past_bottom_respawns_above() {
        let geom = test_geom();
        let mut enemy = seeded_enemy(&geom, 7);
        let (lo, hi) = speed_range_for(0);
        assert!(enemy.speed >= lo && enemy.speed <= hi);

        // Enough ticks to cross the whole viewport at minimum speed.
        let mut respawned = false;
        let mut prev_y = enemy.y;
        for _ in 0..2000 {
            enemy.step(&geom, 0);
            if enemy.y < prev_y {
                respawned = true;
                break;
            }
            prev_y = enemy.y;
        }
        assert!(respawned, "enemy never wrapped past the bottom edge");
        assert!(enemy.y < 0.0);
        assert!(enemy.x >= geom.lane_min_x());
    }

    #[test]
    fn respawn_speed_follows_current_tier() {
        let geom = test_geom();
        let mut enemy = seeded_enemy(&geom, 42);
        for _ in 0..20 {
            enemy.respawn(&geom, 200);
            let (lo, hi) = speed_range_for(200);
            assert!(enemy.speed >= lo && enemy.speed <= hi);
        }
    }

    #[test]
    fn resize_keeps_offscreen_enemy_offscreen() {
        let old = test_geom();
        let mut enemy = seeded_enemy(&old, 3);
        assert!(enemy.y < 0.0);

        let new = RoadGeometry::resolve(1280, 900);
        enemy.handle_resize(&old, &new);
        assert_eq!(enemy.y, -(enemy.height() as f32));
        assert!(enemy.x >= new.lane_min_x());
    }

    #[test]
    fn resize_remaps_onscreen_enemy() {
        let old = test_geom();
        let mut enemy = seeded_enemy(&old, 9);
        enemy.y = 0.5 * old.vertical_travel();

        let new = RoadGeometry::resolve(640, 1000);
        enemy.handle_resize(&old, &new);
        assert!(enemy.y >= 0.0);
        assert!(enemy.y <= new.vertical_travel());
    }
}
