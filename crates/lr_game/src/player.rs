//! The player car: input-driven movement with no inertia, clamped to the
//! road lane horizontally and to the viewport vertically.

use crate::collision::Collider;
use crate::sprite::{CarModel, CarSprite};
use lr_core::geometry::RoadGeometry;
use std::path::{Path, PathBuf};

/// Constant travel per fixed tick, matching the road scroll feel.
pub const PLAYER_SPEED: f32 = 5.0;

/// Gap between the car and the bottom edge at spawn.
const SPAWN_BOTTOM_MARGIN: f32 = 10.0;

/// Direction the player wants to move this tick, read fresh from input every
/// step. Opposite directions cancel; releasing keys stops the car dead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

pub struct PlayerCar {
    pub x: f32,
    pub y: f32,
    pub model: CarModel,
    pub sprite: CarSprite,
    assets_dir: PathBuf,
}

impl PlayerCar {
    pub fn new(assets_dir: &Path, model: CarModel, geom: &RoadGeometry) -> Self {
        let sprite = CarSprite::load(assets_dir, model, (geom.car_width, geom.car_height));
        let mut car = Self {
            x: 0.0,
            y: 0.0,
            model,
            sprite,
            assets_dir: assets_dir.to_path_buf(),
        };
        car.reset(geom);
        car
    }

    pub fn width(&self) -> u32 {
        self.sprite.width()
    }

    pub fn height(&self) -> u32 {
        self.sprite.height()
    }

    /// Bottom center of the road, the session starting position.
    pub fn reset(&mut self, geom: &RoadGeometry) {
        self.x = ((geom.viewport_width - self.width()) / 2) as f32;
        self.y = geom.viewport_height as f32 - self.height() as f32 - SPAWN_BOTTOM_MARGIN;
        self.clamp_to(geom);
    }

    pub fn step(&mut self, intent: MoveIntent, geom: &RoadGeometry) {
        if intent.left {
            self.x -= PLAYER_SPEED;
        }
        if intent.right {
            self.x += PLAYER_SPEED;
        }
        if intent.up {
            self.y -= PLAYER_SPEED;
        }
        if intent.down {
            self.y += PLAYER_SPEED;
        }
        self.clamp_to(geom);
    }

    /// Switching models replaces sprite and mask at the current geometry
    /// size; position is kept (re-clamped in case the fallback size differs).
    pub fn set_model(&mut self, model: CarModel, geom: &RoadGeometry) {
        if self.model == model {
            return;
        }
        self.model = model;
        self.sprite =
            CarSprite::load(&self.assets_dir, model, (geom.car_width, geom.car_height));
        self.clamp_to(geom);
        log::info!("Player switched to car{}", model.number());
    }

    /// Viewport resized: rebuild the sprite at the new car size and carry the
    /// normalized position over so the car keeps its relative lane placement.
    pub fn handle_resize(&mut self, old: &RoadGeometry, new: &RoadGeometry) {
        self.sprite = CarSprite::load(
            &self.assets_dir,
            self.model,
            (new.car_width, new.car_height),
        );
        self.x = new.remap_x(old, self.x);
        self.y = new.remap_y(old, self.y);
        self.clamp_to(new);
    }

    pub fn collider(&self) -> Collider<'_> {
        Collider {
            mask: &self.sprite.mask,
            x: self.x,
            y: self.y,
        }
    }

    /// Clamp against the entity's own size, which differs from the resolved
    /// car size when the fallback placeholder is in use.
    fn clamp_to(&mut self, geom: &RoadGeometry) {
        let max_x = (geom.viewport_width - geom.road_right) as f32 - self.width() as f32;
        self.x = self.x.clamp(geom.lane_min_x(), max_x.max(geom.lane_min_x()));
        let max_y = (geom.viewport_height as f32 - self.height() as f32).max(0.0);
        self.y = self.y.clamp(0.0, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_geom() -> RoadGeometry {
        RoadGeometry::resolve(800, 600)
    }

    fn test_player(geom: &RoadGeometry) -> PlayerCar {
        // No assets on the test filesystem: exercises the fallback sprite.
        PlayerCar::new(Path::new("/nonexistent/assets"), CarModel::default(), geom)
    }

    #[test]
    fn spawns_at_bottom_center() {
        let geom = test_geom();
        let player = test_player(&geom);
        let expected_x = ((geom.viewport_width - player.width()) / 2) as f32;
        assert_eq!(player.x, expected_x);
        assert_eq!(
            player.y,
            geom.viewport_height as f32 - player.height() as f32 - 10.0
        );
    }

    #[test]
    fn movement_stops_at_road_borders() {
        let geom = test_geom();
        let mut player = test_player(&geom);

        let left = MoveIntent { left: true, ..Default::default() };
        for _ in 0..500 {
            player.step(left, &geom);
        }
        assert_eq!(player.x, geom.lane_min_x());

        let right = MoveIntent { right: true, ..Default::default() };
        for _ in 0..500 {
            player.step(right, &geom);
        }
        let max_x = (geom.viewport_width - geom.road_right) as f32 - player.width() as f32;
        assert_eq!(player.x, max_x);
    }

    #[test]
    fn movement_stops_at_vertical_edges() {
        let geom = test_geom();
        let mut player = test_player(&geom);

        let up = MoveIntent { up: true, ..Default::default() };
        for _ in 0..500 {
            player.step(up, &geom);
        }
        assert_eq!(player.y, 0.0);

        let down = MoveIntent { down: true, ..Default::default() };
        for _ in 0..500 {
            player.step(down, &geom);
        }
        assert_eq!(
            player.y,
            geom.viewport_height as f32 - player.height() as f32
        );
    }

    #[test]
    fn no_intent_means_no_motion() {
        let geom = test_geom();
        let mut player = test_player(&geom);
        let (x, y) = (player.x, player.y);
        player.step(MoveIntent::default(), &geom);
        assert_eq!((player.x, player.y), (x, y));
    }

    #[test]
    fn opposite_intents_cancel() {
        let geom = test_geom();
        let mut player = test_player(&geom);
        let (x, y) = (player.x, player.y);
        player.step(
            MoveIntent { left: true, right: true, up: true, down: true },
            &geom,
        );
        assert_eq!((player.x, player.y), (x, y));
    }

    #[test]
    fn resize_preserves_lane_ratio() {
        let old = RoadGeometry::resolve(800, 600);
        let mut player = test_player(&old);
        // Park at 25% of the lane.
        player.x = old.lane_min_x() + 0.25 * old.lane_span();

        let new = RoadGeometry::resolve(1280, 900);
        player.handle_resize(&old, &new);

        let ratio = new.lane_ratio(player.x);
        assert!((ratio - 0.25).abs() <= 1.0 / new.lane_span());
        assert!(player.x >= new.lane_min_x());
    }
}
